//! Sense data interpretation
//!
//! Devices report sense data either in fixed format (response code
//! 70h/71h) or in descriptor format (72h/73h). [SenseData] is a read
//! only view over a sense buffer which dispatches on that code.

use serde::{Deserialize, Serialize};

use crate::asc_table::get_asc_ascq_string;
use crate::codec::{get_flag, get_u32};
use crate::constants::sense_key;

/// Raised when a buffer carries an unexpected discriminator or is too
/// short for the requested field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DecodingError(pub String);

macro_rules! decoding_err {
    ($($arg:tt)*) => {
        DecodingError(format!($($arg)*))
    };
}

pub(crate) use decoding_err;

/// Sense Key Descriptions
pub const SENSE_KEY_DESCRIPTIONS: [&str; 15] = [
    "No Sense",
    "Recovered Error",
    "Not Ready",
    "Medium Error",
    "Hardware Error",
    "Illegal Request",
    "Unit Attention",
    "Data Protect",
    "Blank Check",
    "Vendor Specific(9)",
    "Copy Aborted",
    "Aborted Command",
    "Equal",
    "Volume Overflow",
    "Miscompare",
];

pub const FIXED_CURRENT: u8 = 0x70;
pub const FIXED_DEFERRED: u8 = 0x71;
pub const DESCRIPTOR_CURRENT: u8 = 0x72;
pub const DESCRIPTOR_DEFERRED: u8 = 0x73;

// fixed format: key in byte 2, ASC/ASCQ in bytes 12/13
const FIXED_MIN_LEN: usize = 14;
// descriptor format: key in byte 1, ASC/ASCQ in bytes 2/3
const DESCRIPTOR_MIN_LEN: usize = 4;

/// Get the sense key text, fails for keys above 0x0E
pub fn sense_key_string(key: u8) -> Result<&'static str, DecodingError> {
    if key > sense_key::LAST_WITH_TEXT {
        return Err(decoding_err!(
            "no Sense Key with this value ({:#x})",
            key
        ));
    }
    Ok(SENSE_KEY_DESCRIPTIONS[key as usize])
}

/// Sense data view
#[derive(Debug, Clone, Copy)]
pub struct SenseData<'a> {
    data: &'a [u8],
}

impl<'a> SenseData<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Response code (byte 0, without the VALID bit)
    pub fn response_code(&self) -> u8 {
        self.data.first().map(|b| b & 0x7f).unwrap_or(0)
    }

    pub fn is_fixed_format(&self) -> bool {
        matches!(self.response_code(), FIXED_CURRENT | FIXED_DEFERRED)
    }

    pub fn is_descriptor_format(&self) -> bool {
        matches!(self.response_code(), DESCRIPTOR_CURRENT | DESCRIPTOR_DEFERRED)
    }

    pub fn is_current(&self) -> bool {
        matches!(self.response_code(), FIXED_CURRENT | DESCRIPTOR_CURRENT)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.response_code(), FIXED_DEFERRED | DESCRIPTOR_DEFERRED)
    }

    // returns the byte at the offset valid for the detected format
    fn format_byte(
        &self,
        what: &str,
        fixed_offset: usize,
        descriptor_offset: usize,
    ) -> Result<u8, DecodingError> {
        let (offset, min_len) = if self.is_fixed_format() {
            (fixed_offset, FIXED_MIN_LEN)
        } else if self.is_descriptor_format() {
            (descriptor_offset, DESCRIPTOR_MIN_LEN)
        } else {
            return Err(decoding_err!(
                "no {} with this response code or response code not supported ({:#x})",
                what,
                self.response_code()
            ));
        };

        if self.data.len() < min_len {
            return Err(decoding_err!(
                "sense data too short to read the {} ({} < {})",
                what,
                self.data.len(),
                min_len
            ));
        }

        Ok(self.data[offset])
    }

    pub fn sense_key(&self) -> Result<u8, DecodingError> {
        Ok(self.format_byte("Sense Key", 2, 1)? & 0x0f)
    }

    pub fn asc(&self) -> Result<u8, DecodingError> {
        self.format_byte("ASC", 12, 2)
    }

    pub fn ascq(&self) -> Result<u8, DecodingError> {
        self.format_byte("ASCQ", 13, 3)
    }

    pub fn sense_key_string(&self) -> Result<&'static str, DecodingError> {
        sense_key_string(self.sense_key()?)
    }

    /// ASC/ASCQ as human readable text
    pub fn acs_string(&self) -> Result<String, DecodingError> {
        Ok(get_asc_ascq_string(self.asc()?, self.ascq()?))
    }

    pub fn sense_info(&self) -> Result<SenseInfo, DecodingError> {
        Ok(SenseInfo {
            sense_key: self.sense_key()?,
            asc: self.asc()?,
            ascq: self.ascq()?,
        })
    }

    /// Fixed format only: FILEMARK, EOM and ILI bits
    pub fn fixed_flags(&self) -> Option<(bool, bool, bool)> {
        if !self.is_fixed_format() || self.data.len() < FIXED_MIN_LEN {
            return None;
        }
        let b2 = self.data[2];
        Some((get_flag(b2, 7), get_flag(b2, 6), get_flag(b2, 5)))
    }

    /// Fixed format only: the INFORMATION field (bytes 3-6)
    pub fn information(&self) -> Option<u32> {
        if !self.is_fixed_format() || self.data.len() < FIXED_MIN_LEN {
            return None;
        }
        Some(get_u32(self.data, 3))
    }
}

/// Decoded sense key and additional sense code
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseInfo {
    pub sense_key: u8,
    pub asc: u8,
    pub ascq: u8,
}

impl SenseInfo {
    pub fn additional_sense_text(&self) -> String {
        get_asc_ascq_string(self.asc, self.ascq)
    }
}

impl std::fmt::Display for SenseInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sense_text = sense_key_string(self.sense_key)
            .map(String::from)
            .unwrap_or_else(|_| format!("Invalid sense {:02X}", self.sense_key));

        write!(f, "{}: {}", sense_text, self.additional_sense_text())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sense_buffer(response_code: u8) -> [u8; 255] {
        let mut buff = [0u8; 255];
        buff[0] = response_code;
        buff
    }

    #[test]
    fn test_format_predicates() {
        let expected = [
            (0x70, true, false, true, false),
            (0x71, true, false, false, true),
            (0x72, false, true, true, false),
            (0x73, false, true, false, true),
            (0x74, false, false, false, false),
        ];
        for (code, fixed, descriptor, current, deferred) in expected {
            let buff = sense_buffer(code);
            let sense = SenseData::new(&buff);
            assert_eq!(sense.is_fixed_format(), fixed, "code {:#x}", code);
            assert_eq!(sense.is_descriptor_format(), descriptor, "code {:#x}", code);
            assert_eq!(sense.is_current(), current, "code {:#x}", code);
            assert_eq!(sense.is_deferred(), deferred, "code {:#x}", code);
        }

        // VALID bit is ignored
        let buff = sense_buffer(0xf0);
        assert!(SenseData::new(&buff).is_fixed_format());
    }

    #[test]
    fn test_fixed_format() -> Result<(), DecodingError> {
        let mut buff = sense_buffer(0x70);
        buff[2] = 0xFE;
        buff[12] = 0x12;
        buff[13] = 0x34;
        let sense = SenseData::new(&buff);
        assert_eq!(sense.sense_key()?, 0xE);
        assert_eq!(sense.sense_key_string()?, "Miscompare");
        assert_eq!(sense.asc()?, 0x12);
        assert_eq!(sense.ascq()?, 0x34);
        assert_eq!(sense.fixed_flags(), Some((true, true, true)));

        let mut buff = sense_buffer(0x71);
        buff[2] = 0xFA;
        let sense = SenseData::new(&buff);
        assert_eq!(sense.sense_key_string()?, "Copy Aborted");
        Ok(())
    }

    #[test]
    fn test_descriptor_format() -> Result<(), DecodingError> {
        let mut buff = sense_buffer(0x72);
        buff[1] = 0xFB;
        buff[2] = 0x56;
        buff[3] = 0x78;
        let sense = SenseData::new(&buff);
        assert_eq!(sense.sense_key()?, 0xB);
        assert_eq!(sense.sense_key_string()?, "Aborted Command");
        assert_eq!(sense.asc()?, 0x56);
        assert_eq!(sense.ascq()?, 0x78);
        assert_eq!(sense.fixed_flags(), None);

        let mut buff = sense_buffer(0x73);
        buff[2] = 0x0b;
        buff[3] = 0x08;
        assert_eq!(SenseData::new(&buff).acs_string()?, "Warning - power loss expected");

        buff[2] = 0x40;
        buff[3] = 0xab;
        assert_eq!(
            SenseData::new(&buff).acs_string()?,
            "Diagnostic failure on component (ab)"
        );

        buff[2] = 0x00;
        buff[3] = 0x1f;
        assert_eq!(SenseData::new(&buff).acs_string()?, "Unknown ASC/ASCQ:00/1f");
        Ok(())
    }

    #[test]
    fn test_unsupported_response_code() {
        let buff = sense_buffer(0x74);
        let sense = SenseData::new(&buff);

        for err in [
            sense.sense_key().unwrap_err(),
            sense.asc().unwrap_err(),
            sense.ascq().unwrap_err(),
            sense.acs_string().unwrap_err(),
            sense.sense_key_string().unwrap_err(),
        ] {
            assert!(
                err.to_string().contains("response code not supported (0x74)"),
                "unexpected message: {}",
                err
            );
        }
    }

    #[test]
    fn test_sense_key_out_of_range() {
        let mut buff = sense_buffer(0x70);
        buff[2] = 0x0F;
        let err = SenseData::new(&buff).sense_key_string().unwrap_err();
        assert!(err.to_string().contains("no Sense Key with this value (0xf)"));
    }

    #[test]
    fn test_short_buffer() {
        let buff = [0x70, 0, 0x02];
        assert!(SenseData::new(&buff).sense_key().is_err());
        assert!(SenseData::new(&[]).sense_key().is_err());
    }

    #[test]
    fn test_sense_info_display() {
        let info = SenseInfo {
            sense_key: sense_key::MEDIUM_ERROR,
            asc: 0x14,
            ascq: 0x04,
        };
        assert_eq!(info.to_string(), "Medium Error: Block sequence error");
    }
}
