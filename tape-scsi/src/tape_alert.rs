//! Tape alert codes
//!
//! See SSC-3, LOG SENSE - LP 2Eh: TapeAlert. Each parameter code
//! (1..=64) is a flag; parameters 28h to 2Eh are obsolete.

use anyhow::{bail, format_err, Error};
use serde::{Deserialize, Serialize};

use crate::constants::log_page;
use crate::log_page::decode_log_page;

// (code, description, compact name)
#[rustfmt::skip]
const TAPE_ALERTS: &[(u16, &str, &str)] = &[
    (0x01, "Read warning", "ReadWarning"),
    (0x02, "Write warning", "WriteWarning"),
    (0x03, "Hard error", "HardError"),
    (0x04, "Medium", "Medium"),
    (0x05, "Read failure", "ReadFailure"),
    (0x06, "Write failure", "WriteFailure"),
    (0x07, "Medium life", "MediumLife"),
    (0x08, "Not data grade", "NotDataGrade"),
    (0x09, "Write protect", "WriteProtect"),
    (0x0A, "Volume removal prevented", "VolumeRemovalPrevented"),
    (0x0B, "Cleaning volume", "CleaningVolume"),
    (0x0C, "Unsupported format", "UnsupportedFormat"),
    (0x0D, "Recoverable mechanical cartridge failure", "RecoverableMechanicalCartridgeFailure"),
    (0x0E, "Unrecoverable mechanical cartridge failure", "UnrecoverableMechanicalCartridgeFailure"),
    (0x0F, "Memory chip in cartridge failure", "MemoryChipInCartridgeFailure"),
    (0x10, "Forced eject", "ForcedEject"),
    (0x11, "Read only format", "ReadOnlyFormat"),
    (0x12, "Tape directory corrupted on load", "TapeDirectoryCorruptedOnLoad"),
    (0x13, "Nearing medium life", "NearingMediumLife"),
    (0x14, "Cleaning required", "CleaningRequired"),
    (0x15, "Cleaning requested", "CleaningRequested"),
    (0x16, "Expired cleaning volume", "ExpiredCleaningVolume"),
    (0x17, "Invalid cleaning volume", "InvalidCleaningVolume"),
    (0x18, "Retension requested", "RetensionRequested"),
    (0x19, "Multi-port interface error on a primary port", "MultiPortInterfaceErrorOnAPrimaryPort"),
    (0x1A, "Cooling fan failure", "CoolingFanFailure"),
    (0x1B, "Power supply failure", "PowerSupplyFailure"),
    (0x1C, "Power consumption", "PowerConsumption"),
    (0x1D, "Drive preventive maintenance required", "DrivePreventiveMaintenanceRequired"),
    (0x1E, "Hardware A", "HardwareA"),
    (0x1F, "Hardware B", "HardwareB"),
    (0x20, "Primary interface", "PrimaryInterface"),
    (0x21, "Eject volume", "EjectVolume"),
    (0x22, "Microcode update fail", "MicrocodeUpdateFail"),
    (0x23, "Drive humidity", "DriveHumidity"),
    (0x24, "Drive temperature", "DriveTemperature"),
    (0x25, "Drive voltage", "DriveVoltage"),
    (0x26, "Predictive failure", "PredictiveFailure"),
    (0x27, "Diagnostics required", "DiagnosticsRequired"),
    (0x2F, "External data encryption control - communication failure", "ExternalDataEncryptionControlCommunicationFailure"),
    (0x30, "External data encryption control - key manager returned an error", "ExternalDataEncryptionControlKeyManagerReturnedAnError"),
    (0x31, "Diminished native capacity", "DiminishedNativeCapacity"),
    (0x32, "Lost statistics", "LostStatistics"),
    (0x33, "Tape directory invalid at unload", "TapeDirectoryInvalidAtUnload"),
    (0x34, "Tape system area write failure", "TapeSystemAreaWriteFailure"),
    (0x35, "Tape system area read failure", "TapeSystemAreaReadFailure"),
    (0x36, "No start of data", "NoStartOfData"),
    (0x37, "Loading or threading failure", "LoadingOrThreadingFailure"),
    (0x38, "Unrecoverable unload failure", "UnrecoverableUnloadFailure"),
    (0x39, "Automation interface failure", "AutomationInterfaceFailure"),
    (0x3A, "Microcode failure", "MicrocodeFailure"),
    (0x3B, "WORM volume - integrity check failed", "WORMVolumeIntegrityCheckFailed"),
    (0x3C, "WORM volume - overwrite attempted", "WORMVolumeOverwriteAttempted"),
];

pub const TAPE_ALERT_LOST_STATISTICS: u16 = 0x32;

enum AlertClass {
    Unexpected,
    Obsolete,
    Known(&'static str, &'static str),
    Reserved,
}

fn classify(code: u16) -> AlertClass {
    if !(1..=64).contains(&code) {
        return AlertClass::Unexpected;
    }
    if (0x28..=0x2e).contains(&code) {
        return AlertClass::Obsolete;
    }
    match TAPE_ALERTS.iter().find(|(c, _, _)| *c == code) {
        Some((_, text, compact)) => AlertClass::Known(*text, *compact),
        None => AlertClass::Reserved,
    }
}

/// Human readable tape alert description
pub fn tape_alert_to_string(code: u16) -> String {
    match classify(code) {
        AlertClass::Unexpected => format!("Unexpected tapeAlert code: {:#x}", code),
        AlertClass::Obsolete => format!("Obsolete tapeAlert code: {:#x}", code),
        AlertClass::Known(text, _) => text.to_string(),
        AlertClass::Reserved => format!("Reserved tapeAlert code: {:#x}", code),
    }
}

/// Tape alert name without spaces, usable as a log key
pub fn tape_alert_to_compact_string(code: u16) -> String {
    match classify(code) {
        AlertClass::Unexpected => format!("tapeAlertUnexpected{:#x}", code),
        AlertClass::Obsolete => format!("tapeAlertObsolete{:#x}", code),
        AlertClass::Known(_, compact) => format!("tapeAlert{}", compact),
        AlertClass::Reserved => format!("tapeAlertReservedCode{:#x}", code),
    }
}

/// Every alert except "Lost statistics" prevents writing
pub fn is_tape_alert_critical_for_write(code: u16) -> bool {
    code != TAPE_ALERT_LOST_STATISTICS
}

/// Decoded tape alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TapeAlert {
    pub code: u16,
    pub text: String,
    pub compact: String,
    pub critical_for_write: bool,
}

impl TapeAlert {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            text: tape_alert_to_string(code),
            compact: tape_alert_to_compact_string(code),
            critical_for_write: is_tape_alert_critical_for_write(code),
        }
    }
}

/// Decode LP 2Eh into the list of active alert codes
///
/// Each parameter carries a single byte whose bit 0 is the alert flag.
pub fn decode_tape_alert_page(data: &[u8]) -> Result<Vec<u16>, Error> {
    let page = decode_log_page(data, log_page::TAPE_ALERT)?;

    proxmox_lang::try_block!({
        let mut codes = Vec::new();
        for param in page.parameters.iter() {
            if param.value.len() != 1 {
                bail!(
                    "invalid parameter length {} for code {:#x}",
                    param.value.len(),
                    param.parameter_code
                );
            }
            if (param.value[0] & 0x01) != 0 {
                codes.push(param.parameter_code);
            }
        }
        Ok(codes)
    })
    .map_err(|err: Error| format_err!("decode tape alert page failed - {}", err))
}

/// Returns the alerts with the most critical ones first
pub fn tape_alerts_from_codes(codes: &[u16]) -> Vec<TapeAlert> {
    let mut alerts: Vec<TapeAlert> = codes.iter().map(|code| TapeAlert::new(*code)).collect();
    alerts.sort_by_key(|alert| !alert.critical_for_write);
    alerts
}
