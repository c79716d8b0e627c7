//! Command descriptor blocks
//!
//! Each command is a fixed size byte array. `new()` zeroes it and fills
//! in the operation code (and the service action for MAINTENANCE
//! IN/OUT based commands), everything else is set by the caller before
//! the CDB is handed to the transport. Offsets follow SPC-4/SSC-3 and
//! the LTO SCSI Reference.

use anyhow::Error;

use crate::codec::{put_u16, put_u32, set_bits, set_flag};
use crate::constants::{opcode, rao};

macro_rules! cdb_type {
    ($(#[$attr:meta])* $name:ident, $len:expr, $opcode:expr) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name([u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn set_control(&mut self, control: u8) -> &mut Self {
                self.0[$len - 1] = control;
                self
            }

            fn zeroed() -> Self {
                let mut cdb = [0u8; $len];
                cdb[0] = $opcode;
                Self(cdb)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

cdb_type!(
    /// CDB: INQUIRY (12h)
    InquiryCdb,
    6,
    opcode::INQUIRY
);

impl InquiryCdb {
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Request a vital product data page
    pub fn set_evpd(&mut self, evpd: bool) -> &mut Self {
        set_flag(&mut self.0[1], 0, evpd);
        self
    }

    pub fn set_page_code(&mut self, page_code: u8) -> &mut Self {
        self.0[2] = page_code;
        self
    }

    pub fn set_allocation_length(&mut self, len: u16) -> &mut Self {
        put_u16(&mut self.0, 3, len);
        self
    }
}

cdb_type!(
    /// CDB: REQUEST SENSE (03h)
    RequestSenseCdb,
    6,
    opcode::REQUEST_SENSE
);

impl RequestSenseCdb {
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Up to 96 bytes for LTO drives
    pub fn set_allocation_length(&mut self, len: u8) -> &mut Self {
        self.0[4] = len;
        self
    }
}

cdb_type!(
    /// CDB: TEST UNIT READY (00h)
    TestUnitReadyCdb,
    6,
    opcode::TEST_UNIT_READY
);

impl TestUnitReadyCdb {
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Enable deferred CHECK CONDITION (IBM only)
    pub fn set_edcc(&mut self, edcc: bool) -> &mut Self {
        set_flag(&mut self.0[2], 0, edcc);
        self
    }
}

cdb_type!(
    /// CDB: MODE SENSE(6) (1Ah)
    ModeSense6Cdb,
    6,
    opcode::MODE_SENSE_6
);

impl ModeSense6Cdb {
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Disable block descriptors
    pub fn set_dbd(&mut self, dbd: bool) -> &mut Self {
        set_flag(&mut self.0[1], 3, dbd);
        self
    }

    pub fn set_page_code(&mut self, page_code: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[2], 0, 6, page_code)?;
        Ok(self)
    }

    pub fn set_page_control(&mut self, pc: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[2], 6, 2, pc)?;
        Ok(self)
    }

    pub fn set_subpage_code(&mut self, subpage_code: u8) -> &mut Self {
        self.0[3] = subpage_code;
        self
    }

    pub fn set_allocation_length(&mut self, len: u8) -> &mut Self {
        self.0[4] = len;
        self
    }
}

cdb_type!(
    /// CDB: MODE SELECT(6) (15h)
    ModeSelect6Cdb,
    6,
    opcode::MODE_SELECT_6
);

impl ModeSelect6Cdb {
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Save parameters
    pub fn set_sp(&mut self, sp: bool) -> &mut Self {
        set_flag(&mut self.0[1], 0, sp);
        self
    }

    /// Page format
    pub fn set_pf(&mut self, pf: bool) -> &mut Self {
        set_flag(&mut self.0[1], 4, pf);
        self
    }

    pub fn set_param_list_length(&mut self, len: u8) -> &mut Self {
        self.0[4] = len;
        self
    }
}

cdb_type!(
    /// CDB: LOCATE(10) (2Bh)
    Locate10Cdb,
    10,
    opcode::LOCATE_10
);

impl Locate10Cdb {
    pub fn new() -> Self {
        Self::zeroed()
    }

    pub fn set_immed(&mut self, immed: bool) -> &mut Self {
        set_flag(&mut self.0[1], 0, immed);
        self
    }

    /// Change partition
    pub fn set_cp(&mut self, cp: bool) -> &mut Self {
        set_flag(&mut self.0[1], 1, cp);
        self
    }

    /// Block address type
    pub fn set_bt(&mut self, bt: bool) -> &mut Self {
        set_flag(&mut self.0[1], 2, bt);
        self
    }

    pub fn set_logical_object_id(&mut self, id: u32) -> &mut Self {
        put_u32(&mut self.0, 3, id);
        self
    }

    pub fn set_partition(&mut self, partition: u8) -> &mut Self {
        self.0[8] = partition;
        self
    }
}

cdb_type!(
    /// CDB: READ POSITION (34h)
    ReadPositionCdb,
    10,
    opcode::READ_POSITION
);

impl ReadPositionCdb {
    /// Short form block id
    pub const SHORT_FORM: u8 = 0x00;
    /// Long form
    pub const LONG_FORM: u8 = 0x06;
    /// Extended form
    pub const EXTENDED_FORM: u8 = 0x08;

    pub fn new() -> Self {
        Self::zeroed()
    }

    pub fn set_service_action(&mut self, service_action: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[1], 0, 5, service_action)?;
        Ok(self)
    }

    /// Only used by the extended form
    pub fn set_allocation_length(&mut self, len: u16) -> &mut Self {
        put_u16(&mut self.0, 7, len);
        self
    }
}

cdb_type!(
    /// CDB: LOG SELECT (4Ch)
    LogSelectCdb,
    10,
    opcode::LOG_SELECT
);

impl LogSelectCdb {
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Save parameters
    pub fn set_sp(&mut self, sp: bool) -> &mut Self {
        set_flag(&mut self.0[1], 0, sp);
        self
    }

    /// Parameter code reset
    pub fn set_pcr(&mut self, pcr: bool) -> &mut Self {
        set_flag(&mut self.0[1], 1, pcr);
        self
    }

    pub fn set_page_code(&mut self, page_code: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[2], 0, 6, page_code)?;
        Ok(self)
    }

    pub fn set_page_control(&mut self, pc: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[2], 6, 2, pc)?;
        Ok(self)
    }

    pub fn set_subpage_code(&mut self, subpage_code: u8) -> &mut Self {
        self.0[3] = subpage_code;
        self
    }

    pub fn set_param_list_length(&mut self, len: u16) -> &mut Self {
        put_u16(&mut self.0, 7, len);
        self
    }
}

cdb_type!(
    /// CDB: LOG SENSE (4Dh)
    LogSenseCdb,
    10,
    opcode::LOG_SENSE
);

impl LogSenseCdb {
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Save parameters
    pub fn set_sp(&mut self, sp: bool) -> &mut Self {
        set_flag(&mut self.0[1], 0, sp);
        self
    }

    /// Parameter pointer control
    pub fn set_ppc(&mut self, ppc: bool) -> &mut Self {
        set_flag(&mut self.0[1], 1, ppc);
        self
    }

    pub fn set_page_code(&mut self, page_code: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[2], 0, 6, page_code)?;
        Ok(self)
    }

    pub fn set_page_control(&mut self, pc: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[2], 6, 2, pc)?;
        Ok(self)
    }

    pub fn set_subpage_code(&mut self, subpage_code: u8) -> &mut Self {
        self.0[3] = subpage_code;
        self
    }

    pub fn set_parameter_pointer(&mut self, pointer: u16) -> &mut Self {
        put_u16(&mut self.0, 5, pointer);
        self
    }

    pub fn set_allocation_length(&mut self, len: u16) -> &mut Self {
        put_u16(&mut self.0, 7, len);
        self
    }
}

cdb_type!(
    /// CDB: READ END OF WRAP POSITION (A3h/1Fh/45h)
    ReadEndOfWrapPositionCdb,
    12,
    opcode::MAINTENANCE_IN
);

impl ReadEndOfWrapPositionCdb {
    pub const SERVICE_ACTION: u8 = 0x1f;
    pub const SERVICE_ACTION_QUALIFIER: u8 = 0x45;

    pub fn new() -> Self {
        let mut cdb = Self::zeroed();
        cdb.0[1] = Self::SERVICE_ACTION;
        cdb.0[2] = Self::SERVICE_ACTION_QUALIFIER;
        cdb
    }

    /// Wrap number valid
    pub fn set_wnv(&mut self, wnv: bool) -> &mut Self {
        set_flag(&mut self.0[3], 0, wnv);
        self
    }

    /// Report all wraps (long form reply)
    pub fn set_ra(&mut self, ra: bool) -> &mut Self {
        set_flag(&mut self.0[3], 1, ra);
        self
    }

    pub fn set_wrap_number(&mut self, wrap: u8) -> &mut Self {
        self.0[5] = wrap;
        self
    }

    pub fn set_allocation_length(&mut self, len: u32) -> &mut Self {
        put_u32(&mut self.0, 6, len);
        self
    }
}

cdb_type!(
    /// CDB: RECEIVE RECOMMENDED ACCESS ORDER (MAINTENANCE IN, A3h/1Dh)
    ReceiveRaoCdb,
    12,
    opcode::MAINTENANCE_IN
);

impl ReceiveRaoCdb {
    pub fn new() -> Self {
        let mut cdb = Self::zeroed();
        cdb.0[1] = rao::SERVICE_ACTION;
        cdb
    }

    /// Return the UDS limits page instead of the RAO list
    pub fn set_uds_limits(&mut self, uds_limits: bool) -> &mut Self {
        set_flag(&mut self.0[1], 7, uds_limits);
        self
    }

    pub fn set_rao_list_offset(&mut self, offset: u32) -> &mut Self {
        put_u32(&mut self.0, 2, offset);
        self
    }

    pub fn set_allocation_length(&mut self, len: u32) -> &mut Self {
        put_u32(&mut self.0, 6, len);
        self
    }

    pub fn set_uds_type(&mut self, uds_type: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[10], 0, 3, uds_type)?;
        Ok(self)
    }
}

cdb_type!(
    /// CDB: GENERATE RECOMMENDED ACCESS ORDER (MAINTENANCE OUT, A4h/1Dh)
    GenerateRaoCdb,
    12,
    opcode::MAINTENANCE_OUT
);

impl GenerateRaoCdb {
    pub fn new() -> Self {
        let mut cdb = Self::zeroed();
        cdb.0[1] = rao::SERVICE_ACTION;
        cdb.0[2] = rao::PROCESS_GENERATE;
        cdb
    }

    pub fn set_rao_process(&mut self, process: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[2], 0, 3, process)?;
        Ok(self)
    }

    pub fn set_uds_type(&mut self, uds_type: u8) -> Result<&mut Self, Error> {
        set_bits(&mut self.0[3], 0, 3, uds_type)?;
        Ok(self)
    }

    pub fn set_param_list_length(&mut self, len: u32) -> &mut Self {
        put_u32(&mut self.0, 6, len);
        self
    }
}

cdb_type!(
    /// CDB: SECURITY PROTOCOL IN (A2h)
    SpinCdb,
    12,
    opcode::SECURITY_PROTOCOL_IN
);

cdb_type!(
    /// CDB: SECURITY PROTOCOL OUT (B5h)
    SpoutCdb,
    12,
    opcode::SECURITY_PROTOCOL_OUT
);

macro_rules! security_protocol_fields {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                Self::zeroed()
            }

            pub fn set_security_protocol(&mut self, protocol: u8) -> &mut Self {
                self.0[1] = protocol;
                self
            }

            pub fn set_security_protocol_specific(&mut self, specific: u16) -> &mut Self {
                put_u16(&mut self.0, 2, specific);
                self
            }

            /// Allocation length (SPIN) or transfer length (SPOUT)
            pub fn set_allocation_length(&mut self, len: u32) -> &mut Self {
                put_u32(&mut self.0, 6, len);
                self
            }
        }
    };
}

security_protocol_fields!(SpinCdb);
security_protocol_fields!(SpoutCdb);

macro_rules! impl_default {
    ($($name:ident),*) => {
        $(
            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }
        )*
    };
}

impl_default!(
    InquiryCdb,
    RequestSenseCdb,
    TestUnitReadyCdb,
    ModeSense6Cdb,
    ModeSelect6Cdb,
    Locate10Cdb,
    ReadPositionCdb,
    LogSelectCdb,
    LogSenseCdb,
    ReadEndOfWrapPositionCdb,
    ReceiveRaoCdb,
    GenerateRaoCdb,
    SpinCdb,
    SpoutCdb
);
