//! Completion status of a SCSI transaction
//!
//! The pass through interface reports three independent channels: the
//! SCSI status byte returned by the target, the host (adapter) status
//! and the driver status, whose upper nibble carries suggestions.
//! [StatusOutcome::check] folds them into success or a single typed
//! [ScsiError].

use serde::{Deserialize, Serialize};

use crate::constants::{driver_status, host_status, sense_key, status};
use crate::sense::{DecodingError, SenseData, SenseInfo};

/// Translate the SCSI status byte
pub fn status_to_string(scsi_status: u8) -> String {
    let text = match scsi_status {
        status::GOOD => "GOOD",
        status::CHECK_CONDITION => "CHECK CONDITION",
        status::CONDITION_MET => "CONDITION MET",
        status::BUSY => "BUSY",
        status::RESERVATION_CONFLICT => "Reservation conflict",
        status::TASK_SET_FULL => "TASK SET FULL",
        status::ACA_ACTIVE => "ACA ACTIVE",
        status::TASK_ABORTED => "TASK ABORTED",
        other => return format!("Reserved of obsolete code: {:#x}", other),
    };
    text.to_string()
}

/// Translate the host adapter status
pub fn host_status_to_string(host: u16) -> String {
    let text = match host {
        host_status::OK => "OK",
        host_status::NO_CONNECT => "NO CONNECT",
        host_status::BUS_BUSY => "BUS BUSY",
        host_status::TIME_OUT => "TIME OUT",
        host_status::BAD_TARGET => "BAD TARGET",
        host_status::ABORT => "ABORT",
        host_status::PARITY => "PARITY",
        host_status::ERROR => "ERROR",
        host_status::RESET => "RESET",
        host_status::BAD_INTR => "BAD INTR",
        host_status::PASSTHROUGH => "PASSTHROUGH",
        host_status::SOFT_ERROR => "SOFT ERROR",
        other => return format!("Unknown host status code: {:#x}", other),
    };
    text.to_string()
}

/// Translate the driver status (lower nibble only)
pub fn driver_status_to_string(driver: u16) -> String {
    let text = match driver & driver_status::MASK {
        driver_status::OK => "OK",
        driver_status::BUSY => "BUSY",
        driver_status::SOFT => "SOFT",
        driver_status::MEDIA => "MEDIA",
        driver_status::ERROR => "ERROR",
        driver_status::INVALID => "INVALID",
        driver_status::TIMEOUT => "TIMEOUT",
        driver_status::HARD => "HARD",
        driver_status::SENSE => "SENSE",
        _ => return format!("Unknown driver status code: {:#x}", driver),
    };
    text.to_string()
}

bitflags::bitflags! {
    /// Driver status suggestions (upper nibble of the driver status)
    ///
    /// Note: `REMAP` shares its bits with `RETRY` and `ABORT`.
    pub struct DriverSuggestions: u16 {
        const RETRY = 0x10;
        const ABORT = 0x20;
        const REMAP = 0x30;
        const DIE = 0x40;
        const SENSE = 0x80;
    }
}

impl DriverSuggestions {
    pub fn from_driver_status(driver: u16) -> Self {
        Self::from_bits_truncate(driver)
    }

    fn names(&self) -> Vec<&'static str> {
        // a suggestion is listed as soon as one of its bits is set
        [
            (Self::RETRY, "RETRY"),
            (Self::ABORT, "ABORT"),
            (Self::REMAP, "REMAP"),
            (Self::DIE, "DIE"),
            (Self::SENSE, "SENSE"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.intersects(*flag))
        .map(|(_, name)| name)
        .collect()
    }
}

/// Render the suggestion list, each entry preceded by a space
pub fn driver_status_suggestions_to_string(driver: u16) -> String {
    DriverSuggestions::from_driver_status(driver)
        .names()
        .iter()
        .map(|name| format!(" {}", name))
        .collect()
}

/// Typed SCSI errors
///
/// All variants except `Error` carry a fully rendered message, which
/// includes the caller context and the numeric codes.
#[derive(thiserror::Error, Debug)]
pub enum ScsiError {
    #[error("{0}")]
    Decoding(#[from] DecodingError),
    #[error("{message}")]
    Status {
        status: u8,
        sense: Option<SenseInfo>,
        message: String,
    },
    #[error("{message}")]
    NotReady { sense: SenseInfo, message: String },
    #[error("{message}")]
    UnitAttention { sense: SenseInfo, message: String },
    #[error("{message}")]
    Host { host_status: u16, message: String },
    #[error("{message}")]
    Driver {
        driver_status: u16,
        suggestions: DriverSuggestions,
        sense: Option<SenseInfo>,
        message: String,
    },
    #[error("{0}")]
    Error(#[from] anyhow::Error),
}

impl From<std::io::Error> for ScsiError {
    fn from(error: std::io::Error) -> Self {
        Self::Error(error.into())
    }
}

impl ScsiError {
    /// Short name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            ScsiError::Decoding(_) => "decoding",
            ScsiError::Status { .. } => "scsi-status",
            ScsiError::NotReady { .. } => "not-ready",
            ScsiError::UnitAttention { .. } => "unit-attention",
            ScsiError::Host { .. } => "host",
            ScsiError::Driver { .. } => "driver",
            ScsiError::Error(_) => "error",
        }
    }

    /// Status errors include their not ready and unit attention refinements
    pub fn is_scsi_status_error(&self) -> bool {
        matches!(
            self,
            ScsiError::Status { .. } | ScsiError::NotReady { .. } | ScsiError::UnitAttention { .. }
        )
    }

    pub fn sense(&self) -> Option<&SenseInfo> {
        match self {
            ScsiError::Status { sense, .. } | ScsiError::Driver { sense, .. } => sense.as_ref(),
            ScsiError::NotReady { sense, .. } | ScsiError::UnitAttention { sense, .. } => {
                Some(sense)
            }
            _ => None,
        }
    }

    /// Serializable summary, used for JSON output
    pub fn summary(&self) -> ScsiErrorSummary {
        ScsiErrorSummary {
            kind: self.kind().to_string(),
            message: self.to_string(),
            sense: self.sense().copied(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScsiErrorSummary {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sense: Option<SenseInfo>,
}

/// Status channels as returned by the transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportStatus {
    pub status: u8,
    pub host_status: u16,
    pub driver_status: u16,
    /// Number of bytes not transferred
    pub resid: usize,
    /// Number of valid bytes in the sense buffer
    pub sense_len: usize,
}

/// A completed transaction: status channels plus attached sense data
#[derive(Debug, Clone, Copy)]
pub struct StatusOutcome<'a> {
    pub status: u8,
    pub host_status: u16,
    pub driver_status: u16,
    pub sense: SenseData<'a>,
}

fn with_context(context: &str, message: String) -> String {
    if context.is_empty() {
        message
    } else {
        format!("{} {}", context, message)
    }
}

// ": <sense key>: <asc/ascq>" or the decoding failure
fn sense_suffix(sense: &SenseData) -> (Option<SenseInfo>, String) {
    let decoded: Result<_, DecodingError> = proxmox_lang::try_block!({
        let info = sense.sense_info()?;
        let key_text = sense.sense_key_string()?;
        let asc_text = sense.acs_string()?;
        Ok((info, key_text, asc_text))
    });

    match decoded {
        Ok((info, key_text, asc_text)) => (Some(info), format!(": {}: {}", key_text, asc_text)),
        Err(err) => (
            None,
            format!(": In addition, failed to get Sense Key string: {}", err),
        ),
    }
}

impl<'a> StatusOutcome<'a> {
    pub fn new(transport: &TransportStatus, sense: &'a [u8]) -> Self {
        Self {
            status: transport.status,
            host_status: transport.host_status,
            driver_status: transport.driver_status,
            sense: SenseData::new(sense),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == status::GOOD
            && self.host_status == host_status::OK
            && (self.driver_status & driver_status::MASK) == driver_status::OK
    }

    /// Map the outcome to success or exactly one error
    ///
    /// The SCSI status is checked first, then the host status and finally
    /// the driver status. `context` is prepended to the error message.
    pub fn check(&self, context: &str) -> Result<(), ScsiError> {
        if self.status != status::GOOD {
            return Err(self.status_error(context));
        }

        if self.host_status != host_status::OK {
            let message = format!(
                "SCSI command failed with host status: {} ({:#04x})",
                host_status_to_string(self.host_status),
                self.host_status
            );
            return Err(ScsiError::Host {
                host_status: self.host_status,
                message: with_context(context, message),
            });
        }

        if (self.driver_status & driver_status::MASK) != driver_status::OK {
            return Err(self.driver_error(context));
        }

        Ok(())
    }

    fn status_error(&self, context: &str) -> ScsiError {
        let mut message = format!(
            "SCSI command failed with status {} ({:#04x})",
            status_to_string(self.status),
            self.status
        );

        if self.status != status::CHECK_CONDITION {
            return ScsiError::Status {
                status: self.status,
                sense: None,
                message: with_context(context, message),
            };
        }

        let (sense, suffix) = sense_suffix(&self.sense);
        message.push_str(&suffix);
        let message = with_context(context, message);

        match sense {
            Some(sense) if sense.sense_key == sense_key::NOT_READY => {
                ScsiError::NotReady { sense, message }
            }
            Some(sense) if sense.sense_key == sense_key::UNIT_ATTENTION => {
                ScsiError::UnitAttention { sense, message }
            }
            sense => ScsiError::Status {
                status: self.status,
                sense,
                message,
            },
        }
    }

    fn driver_error(&self, context: &str) -> ScsiError {
        let suggestions = DriverSuggestions::from_driver_status(self.driver_status);

        let mut message = format!(
            "SCSI command failed with driver status: {} ({:#04x})",
            driver_status_to_string(self.driver_status),
            self.driver_status
        );

        if !suggestions.is_empty() {
            message.push_str(" Driver suggestions:");
            message.push_str(&driver_status_suggestions_to_string(self.driver_status));
        }

        let mut sense = None;
        if (self.driver_status & driver_status::MASK) == driver_status::SENSE
            || suggestions.contains(DriverSuggestions::SENSE)
        {
            let (info, suffix) = sense_suffix(&self.sense);
            sense = info;
            message.push_str(&suffix);
        }

        ScsiError::Driver {
            driver_status: self.driver_status,
            suggestions,
            sense,
            message: with_context(context, message),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fixed_sense(key: u8, asc: u8, ascq: u8) -> [u8; 255] {
        let mut buff = [0u8; 255];
        buff[0] = 0x70;
        buff[2] = key;
        buff[12] = asc;
        buff[13] = ascq;
        buff
    }

    fn outcome(status: u8, host: u16, driver: u16, sense: &[u8]) -> StatusOutcome<'_> {
        StatusOutcome {
            status,
            host_status: host,
            driver_status: driver,
            sense: SenseData::new(sense),
        }
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(status_to_string(status::CHECK_CONDITION), "CHECK CONDITION");
        assert_eq!(status_to_string(status::RESERVATION_CONFLICT), "Reservation conflict");
        assert_eq!(status_to_string(0x22), "Reserved of obsolete code: 0x22");

        assert_eq!(host_status_to_string(host_status::SOFT_ERROR), "SOFT ERROR");
        assert_eq!(host_status_to_string(0x0c), "Unknown host status code: 0xc");

        assert_eq!(driver_status_to_string(driver_status::SENSE | 0x10), "SENSE");
        assert_eq!(driver_status_to_string(0x0d), "Unknown driver status code: 0xd");
    }

    #[test]
    fn test_suggestion_string() {
        assert_eq!(driver_status_suggestions_to_string(0x00), "");
        assert_eq!(driver_status_suggestions_to_string(0x10), " RETRY REMAP");
        assert_eq!(driver_status_suggestions_to_string(0x40), " DIE");
        assert_eq!(
            driver_status_suggestions_to_string(0xf8),
            " RETRY ABORT REMAP DIE SENSE"
        );
    }

    #[test]
    fn test_good() {
        let sense = [0u8; 255];
        let result = outcome(status::GOOD, host_status::OK, driver_status::OK, &sense);
        assert!(result.is_success());
        assert!(result.check("context:").is_ok());
    }

    #[test]
    fn test_not_ready_wins() {
        let sense = fixed_sense(sense_key::NOT_READY, 0x04, 0x01);
        let result = outcome(
            status::CHECK_CONDITION,
            host_status::TIME_OUT,
            driver_status::HARD,
            &sense,
        );
        let err = result.check("").unwrap_err();
        assert!(matches!(err, ScsiError::NotReady { .. }));
        assert!(err.is_scsi_status_error());
        let msg = err.to_string();
        assert!(msg.starts_with("SCSI command failed with status CHECK CONDITION (0x02)"));
        assert!(msg.contains("Not Ready"));
    }

    #[test]
    fn test_unit_attention() {
        let sense = fixed_sense(sense_key::UNIT_ATTENTION, 0x28, 0x00);
        let err = outcome(status::CHECK_CONDITION, 0, 0, &sense)
            .check("")
            .unwrap_err();
        assert!(matches!(err, ScsiError::UnitAttention { .. }));
        assert_eq!(err.sense().map(|s| s.asc), Some(0x28));
    }

    #[test]
    fn test_check_condition_other_key() {
        let sense = fixed_sense(sense_key::MEDIUM_ERROR, 0x14, 0x04);
        let err = outcome(status::CHECK_CONDITION, 0, 0, &sense)
            .check("In test:")
            .unwrap_err();
        assert!(matches!(err, ScsiError::Status { .. }));
        assert_eq!(
            err.to_string(),
            "In test: SCSI command failed with status CHECK CONDITION (0x02): Medium Error: Block sequence error"
        );
    }

    #[test]
    fn test_check_condition_bad_sense() {
        let mut sense = [0u8; 255];
        sense[0] = 0x74;
        let err = outcome(status::CHECK_CONDITION, 0, 0, &sense)
            .check("")
            .unwrap_err();
        assert!(matches!(err, ScsiError::Status { sense: None, .. }));
        let msg = err.to_string();
        assert!(msg.contains("In addition, failed to get Sense Key string"));
        assert!(msg.contains("response code not supported (0x74)"));
    }

    #[test]
    fn test_other_status() {
        let sense = [0u8; 255];
        let err = outcome(status::BUSY, host_status::ERROR, 0, &sense)
            .check("")
            .unwrap_err();
        assert!(matches!(err, ScsiError::Status { status: status::BUSY, .. }));
        assert_eq!(err.to_string(), "SCSI command failed with status BUSY (0x08)");
    }

    #[test]
    fn test_host_error() {
        let sense = [0u8; 255];
        let err = outcome(status::GOOD, host_status::SOFT_ERROR, driver_status::HARD, &sense)
            .check("")
            .unwrap_err();
        assert!(matches!(err, ScsiError::Host { .. }));
        assert!(err.to_string().contains("SOFT ERROR"));
        assert!(err.to_string().contains("0x0b"));
    }

    #[test]
    fn test_driver_error_with_sense() {
        let sense = fixed_sense(0, 0x14, 0x04);
        let driver = driver_status::SENSE | 0x10 | 0x20 | 0x30 | 0x40 | 0x80;
        let err = outcome(status::GOOD, host_status::OK, driver, &sense)
            .check("In exception validation:")
            .unwrap_err();

        assert!(matches!(err, ScsiError::Driver { .. }));
        let msg = err.to_string();
        assert!(msg.starts_with("In exception validation: "));
        assert!(msg.contains(": SENSE"));
        assert!(msg.contains("Driver suggestions:"));
        assert!(msg.contains(" RETRY ABORT REMAP DIE SENSE"));
        assert!(msg.contains("Block sequence error"));
    }

    #[test]
    fn test_driver_retry_sense() {
        let sense = fixed_sense(sense_key::MEDIUM_ERROR, 0x14, 0x04);
        let err = outcome(0, 0, driver_status::SENSE | 0x10, &sense)
            .check("")
            .unwrap_err();
        match &err {
            ScsiError::Driver { suggestions, .. } => {
                assert!(suggestions.contains(DriverSuggestions::RETRY))
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().contains("RETRY"));
        assert!(err.to_string().contains("Medium Error: Block sequence error"));
    }

    #[test]
    fn test_driver_timeout() {
        let sense = fixed_sense(0, 0x14, 0x04);
        let err = outcome(0, 0, driver_status::TIMEOUT, &sense)
            .check("In exception validation:")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("In exception validation: "));
        assert!(msg.contains(": TIMEOUT"));
        assert!(!msg.contains("Driver suggestions:"));
        assert!(!msg.contains("Block sequence error"));
    }

    #[test]
    fn test_suggestions_alone_are_success() {
        let sense = [0u8; 255];
        assert!(outcome(0, 0, 0x10, &sense).check("").is_ok());
    }
}
