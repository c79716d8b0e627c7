//! SCSI constants used by the tape codec
//!
//! Operation codes follow SPC-4/SSC-3, vendor specific page numbers
//! are marked as such.

use std::time::Duration;

/// Default command timeout (15 minutes), applied by the transport.
pub const SCSI_DEFAULT_TIMEOUT: Duration = Duration::from_secs(900);

/// The sense buffer length is transferred as single byte.
pub const MAX_SENSE_LEN: usize = 255;

/// Upper bound for the number of wraps on current LTO media.
pub const MAX_LTO_TAPE_WRAPS: usize = 280;

/// SCSI operation codes
pub mod opcode {
    pub const TEST_UNIT_READY: u8 = 0x00;
    pub const REWIND: u8 = 0x01;
    pub const REQUEST_SENSE: u8 = 0x03;
    pub const FORMAT_MEDIUM: u8 = 0x04;
    pub const READ_BLOCK_LIMITS: u8 = 0x05;
    pub const READ_6: u8 = 0x08;
    pub const WRITE_6: u8 = 0x0a;
    pub const WRITE_FILEMARKS_6: u8 = 0x10;
    pub const SPACE_6: u8 = 0x11;
    pub const INQUIRY: u8 = 0x12;
    pub const MODE_SELECT_6: u8 = 0x15;
    pub const RESERVE_6: u8 = 0x16;
    pub const RELEASE_6: u8 = 0x17;
    pub const ERASE_6: u8 = 0x19;
    pub const MODE_SENSE_6: u8 = 0x1a;
    pub const LOAD_UNLOAD: u8 = 0x1b;
    pub const PREVENT_ALLOW_MEDIUM_REMOVAL: u8 = 0x1e;
    pub const LOCATE_10: u8 = 0x2b;
    pub const READ_POSITION: u8 = 0x34;
    pub const WRITE_BUFFER: u8 = 0x3b;
    pub const READ_BUFFER: u8 = 0x3c;
    pub const REPORT_DENSITY_SUPPORT: u8 = 0x44;
    pub const LOG_SELECT: u8 = 0x4c;
    pub const LOG_SENSE: u8 = 0x4d;
    pub const MODE_SELECT_10: u8 = 0x55;
    pub const MODE_SENSE_10: u8 = 0x5a;
    pub const PERSISTENT_RESERVE_IN: u8 = 0x5e;
    pub const PERSISTENT_RESERVE_OUT: u8 = 0x5f;
    pub const READ_ATTRIBUTE: u8 = 0x8c;
    pub const WRITE_ATTRIBUTE: u8 = 0x8d;
    pub const LOCATE_16: u8 = 0x92;
    pub const REPORT_LUNS: u8 = 0xa0;
    pub const SECURITY_PROTOCOL_IN: u8 = 0xa2;
    pub const MAINTENANCE_IN: u8 = 0xa3;
    pub const MAINTENANCE_OUT: u8 = 0xa4;
    pub const MOVE_MEDIUM: u8 = 0xa5;
    pub const SECURITY_PROTOCOL_OUT: u8 = 0xb5;
    pub const READ_ELEMENT_STATUS: u8 = 0xb8;
}

/// Peripheral device types (INQUIRY byte 0, bits 0-4)
pub mod device_type {
    pub const DISK: u8 = 0x00;
    pub const TAPE: u8 = 0x01;
    pub const PRINTER: u8 = 0x02;
    pub const PROCESSOR: u8 = 0x03;
    pub const WRITE_ONCE: u8 = 0x04;
    pub const CDROM: u8 = 0x05;
    pub const SCANNER: u8 = 0x06;
    pub const OPTICAL_MEMORY: u8 = 0x07;
    pub const MEDIUM_CHANGER: u8 = 0x08;
    pub const COMMUNICATIONS: u8 = 0x09;
    pub const STORAGE_ARRAY_CONTROLLER: u8 = 0x0c;
    pub const ENCLOSURE_SERVICES: u8 = 0x0d;
    pub const RBC: u8 = 0x0e;
    pub const OCRW: u8 = 0x0f;
    pub const BRIDGE_CONTROLLER: u8 = 0x10;
    pub const OSD: u8 = 0x11;
    pub const AUTOMATION_DRIVE_INTERFACE: u8 = 0x12;
    pub const WELL_KNOWN_LUN: u8 = 0x1e;
    pub const NO_LUN: u8 = 0x7f;
}

/// Peripheral device type text (see `inquiry` command)
///
/// see <https://en.wikipedia.org/wiki/SCSI_Peripheral_Device_Type>
pub const PERIPHERAL_DEVICE_TYPE_TEXT: [&str; 32] = [
    "Disk Drive",
    "Tape Drive",
    "Printer",
    "Processor",
    "Write-once",
    "CD-ROM", // 05h
    "Scanner",
    "Optical",
    "Medium Changer", // 08h
    "Communications",
    "ASC IT8",
    "ASC IT8",
    "RAID Array",
    "Enclosure Services",
    "Simplified direct-access",
    "Optical card reader/writer",
    "Bridging Expander",
    "Object-based Storage",
    "Automation/Drive Interface",
    "Security manager",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Well known logical unit",
    "Unknown",
];

/// SCSI status byte values (SAM)
pub mod status {
    pub const GOOD: u8 = 0x00;
    pub const CHECK_CONDITION: u8 = 0x02;
    pub const CONDITION_MET: u8 = 0x04;
    pub const BUSY: u8 = 0x08;
    pub const RESERVATION_CONFLICT: u8 = 0x18;
    pub const TASK_SET_FULL: u8 = 0x28;
    pub const ACA_ACTIVE: u8 = 0x30;
    pub const TASK_ABORTED: u8 = 0x40;
}

/// Host adapter status (`host_status` of `sg_io_hdr`)
pub mod host_status {
    pub const OK: u16 = 0x00;
    pub const NO_CONNECT: u16 = 0x01;
    pub const BUS_BUSY: u16 = 0x02;
    pub const TIME_OUT: u16 = 0x03;
    pub const BAD_TARGET: u16 = 0x04;
    pub const ABORT: u16 = 0x05;
    pub const PARITY: u16 = 0x06;
    pub const ERROR: u16 = 0x07;
    pub const RESET: u16 = 0x08;
    pub const BAD_INTR: u16 = 0x09;
    pub const PASSTHROUGH: u16 = 0x0a;
    pub const SOFT_ERROR: u16 = 0x0b;
}

/// Driver status (`driver_status` of `sg_io_hdr`), low nibble
pub mod driver_status {
    pub const OK: u16 = 0x00;
    pub const BUSY: u16 = 0x01;
    pub const SOFT: u16 = 0x02;
    pub const MEDIA: u16 = 0x03;
    pub const ERROR: u16 = 0x04;
    pub const INVALID: u16 = 0x05;
    pub const TIMEOUT: u16 = 0x06;
    pub const HARD: u16 = 0x07;
    pub const SENSE: u16 = 0x08;
    pub const MASK: u16 = 0x0f;
}

/// Sense keys (SPC-4 table 27)
pub mod sense_key {
    pub const NO_SENSE: u8 = 0x00;
    pub const RECOVERED_ERROR: u8 = 0x01;
    pub const NOT_READY: u8 = 0x02;
    pub const MEDIUM_ERROR: u8 = 0x03;
    pub const HARDWARE_ERROR: u8 = 0x04;
    pub const ILLEGAL_REQUEST: u8 = 0x05;
    pub const UNIT_ATTENTION: u8 = 0x06;
    pub const DATA_PROTECT: u8 = 0x07;
    pub const BLANK_CHECK: u8 = 0x08;
    pub const VENDOR_SPECIFIC: u8 = 0x09;
    pub const COPY_ABORTED: u8 = 0x0a;
    pub const ABORTED_COMMAND: u8 = 0x0b;
    pub const EQUAL: u8 = 0x0c;
    pub const VOLUME_OVERFLOW: u8 = 0x0d;
    pub const MISCOMPARE: u8 = 0x0e;
    pub const LAST_WITH_TEXT: u8 = MISCOMPARE;
}

/// Log page codes
pub mod log_page {
    pub const WRITE_ERRORS: u8 = 0x02;
    pub const READ_ERRORS: u8 = 0x03;
    pub const NON_MEDIUM_ERRORS: u8 = 0x06;
    pub const SEQUENTIAL_ACCESS_DEVICE: u8 = 0x0c;
    /// IBM specific
    pub const VOLUME_STATISTICS: u8 = 0x17;
    pub const TAPE_ALERT: u8 = 0x2e;
    /// LTO and SDLT
    pub const DATA_COMPRESSION_32H: u8 = 0x32;
    /// IBM specific, shares the code with the compression page
    pub const DRIVE_WRITE_ERRORS: u8 = 0x32;
    pub const DRIVE_WRITE_ERRORS_LTO: u8 = 0x33;
    pub const DRIVE_READ_FORWARD_ERRORS: u8 = 0x34;
    /// IBM specific
    pub const DRIVE_READ_BACKWARD_ERRORS: u8 = 0x36;
    /// IBM specific
    pub const PERFORMANCE_CHARACTERISTICS: u8 = 0x37;
    pub const BLOCK_BYTES_TRANSFERRED: u8 = 0x38;
    /// Oracle T10000 specific
    pub const VENDOR_UNIQUE_DRIVE_STATISTICS: u8 = 0x3d;
}

/// Page control field of LOG SENSE/SELECT
pub mod page_control {
    pub const THRESHOLD_VALUES: u8 = 0x00;
    pub const CUMULATIVE_VALUES: u8 = 0x01;
    pub const DEFAULT_THRESHOLD_VALUES: u8 = 0x02;
    pub const DEFAULT_CUMULATIVE_VALUES: u8 = 0x03;
}

/// Parameters of the sequential access device log page (0Ch)
pub mod sequential_access_param {
    pub const RECEIVED_FROM_INITIATOR: u16 = 0x0000;
    pub const WRITTEN_ON_TAPE: u16 = 0x0001;
    pub const READ_FROM_TAPE: u16 = 0x0002;
    pub const READ_BY_INITIATOR: u16 = 0x0003;
    pub const CLEANING: u16 = 0x0100;
    /// 4k units left on tape from the current position
    pub const LEFT_ON_TAPE: u16 = 0x8000;
}

/// Parameters of the block bytes transferred log page (38h), IBM 3592
pub mod block_bytes_transferred_param {
    pub const HOST_WRITE_BLOCKS_PROCESSED: u16 = 0x0000;
    pub const HOST_WRITE_KIB_PROCESSED: u16 = 0x0001;
    pub const HOST_READ_BLOCKS_PROCESSED: u16 = 0x0002;
    pub const HOST_READ_KIB_PROCESSED: u16 = 0x0003;
    pub const DEVICE_WRITE_DATASETS_PROCESSED: u16 = 0x0004;
    pub const DEVICE_WRITE_KIB_PROCESSED: u16 = 0x0005;
    pub const DEVICE_READ_DATASETS_PROCESSED: u16 = 0x0006;
    pub const DEVICE_READ_KIB_PROCESSED: u16 = 0x0007;
}

/// Parameters of the data compression log page (32h)
pub mod data_compression_param {
    /// x100
    pub const READ_COMPRESSION_RATIO: u16 = 0x0000;
    /// x100
    pub const WRITE_COMPRESSION_RATIO: u16 = 0x0001;
    pub const MB_TRANSFERRED_TO_SERVER: u16 = 0x0002;
    pub const BYTES_TRANSFERRED_TO_SERVER: u16 = 0x0003;
    pub const MB_READ_FROM_TAPE: u16 = 0x0004;
    pub const BYTES_READ_FROM_TAPE: u16 = 0x0005;
    pub const MB_TRANSFERRED_FROM_SERVER: u16 = 0x0006;
    pub const BYTES_TRANSFERRED_FROM_SERVER: u16 = 0x0007;
    pub const MB_WRITTEN_TO_TAPE: u16 = 0x0008;
    pub const BYTES_WRITTEN_TO_TAPE: u16 = 0x0009;
}

/// Mode page codes
pub mod mode_page {
    pub const CONTROL_DATA_PROTECTION: u8 = 0x0a;
    pub const CONTROL_DATA_PROTECTION_SUBPAGE: u8 = 0xf0;
    pub const DEVICE_CONFIGURATION: u8 = 0x10;
    /// Bytes of the control data protection page not covered by its
    /// page length field.
    pub const CONTROL_DATA_PROTECTION_LENGTH_ADDITION: u8 = 4;
}

/// Vital product data pages
pub mod vpd_page {
    pub const UNIT_SERIAL_NUMBER: u8 = 0x80;
}

/// Logical block protection methods
pub mod lbp_method {
    pub const DO_NOT_USE: u8 = 0x00;
    pub const REED_SOLOMON: u8 = 0x01;
    pub const CRC32C: u8 = 0x02;

    pub const REED_SOLOMON_LENGTH: u8 = 4;
    pub const CRC32C_LENGTH: u8 = 4;

    pub const REED_SOLOMON_SEED: u32 = 0x0;
    pub const CRC32C_SEED: u32 = 0xffff_ffff;
}

pub fn lbp_method_to_string(method: u8) -> &'static str {
    match method {
        lbp_method::DO_NOT_USE => "DoNotUse",
        lbp_method::REED_SOLOMON => "Reed-Solomon",
        lbp_method::CRC32C => "CRC32C",
        _ => "Unknown",
    }
}

/// Tape data encryption (SSC-3 8.5)
pub mod encryption {
    pub const ENC_KEY_LENGTH: usize = 0x20;

    pub const SECURITY_PROTOCOL_INFORMATION: u8 = 0x00;
    pub const TAPE_DATA_ENCRYPTION: u8 = 0x20;

    pub const SET_DATA_ENCRYPTION_PAGE: u16 = 0x0010;
    pub const SA_ENCAPSULATION_PAGE: u16 = 0x0011;

    pub const SCOPE_PUBLIC: u8 = 0;
    pub const SCOPE_LOCAL: u8 = 1;
    pub const SCOPE_ALL_IT_NEXUS: u8 = 2;

    pub const ENCRYPTION_MODE_DISABLE: u8 = 0;
    pub const ENCRYPTION_MODE_EXTERNAL: u8 = 1;
    pub const ENCRYPTION_MODE_ENCRYPT: u8 = 2;

    pub const DECRYPTION_MODE_DISABLE: u8 = 0;
    pub const DECRYPTION_MODE_RAW: u8 = 1;
    pub const DECRYPTION_MODE_DECRYPT: u8 = 2;
    pub const DECRYPTION_MODE_MIXED: u8 = 3;

    pub const KEY_FORMAT_NORMAL: u8 = 0;
    pub const KEY_FORMAT_REFERENCE: u8 = 1;
    pub const KEY_FORMAT_WRAPPED: u8 = 2;
    pub const KEY_FORMAT_ESP_SCSI: u8 = 3;
}

/// Recommended access order
pub mod rao {
    /// Service action of MAINTENANCE IN/OUT for RAO
    pub const SERVICE_ACTION: u8 = 0x1d;
    /// RAO process value "generate"
    pub const PROCESS_GENERATE: u8 = 0x02;
    pub const UDS_NAME_LEN: usize = 10;
    pub const UDS_DESCRIPTOR_LEN: usize = 32;
    /// Descriptor length field value (size without the field itself)
    pub const UDS_DESCRIPTOR_LENGTH_FIELD: u16 = 0x1e;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lbp_method_names() {
        assert_eq!(lbp_method_to_string(lbp_method::DO_NOT_USE), "DoNotUse");
        assert_eq!(lbp_method_to_string(lbp_method::REED_SOLOMON), "Reed-Solomon");
        assert_eq!(lbp_method_to_string(lbp_method::CRC32C), "CRC32C");
        assert_eq!(lbp_method_to_string(0x17), "Unknown");
    }
}
