//! REQUEST SENSE data (fixed format, IBM LTO 96 byte layout)
//!
//! The first 18 bytes are the standard fixed format sense data, the
//! remaining bytes are vendor specific. Shorter transfers are accepted
//! as long as they cover the fields needed for the physical position.

use anyhow::{bail, format_err, Error};
use serde::{Deserialize, Serialize};

use crate::codec::{c_field_to_string, get_bits, get_flag, get_u16, get_u24, get_u32};
use crate::position::PhysicalPositionInfo;
use crate::sense::SenseInfo;

pub const REQUEST_SENSE_FULL_LEN: usize = 96;

/// Allocation length needed to get the physical position (wrap + LPOS)
pub const REQUEST_SENSE_POSITION_LEN: usize = 34;

/// Decoded REQUEST SENSE data
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RequestSenseData {
    pub valid: bool,
    pub response_code: u8,
    pub sense_key: u8,
    pub filemark: bool,
    pub eom: bool,
    pub ili: bool,
    pub information: u32,
    pub additional_sense_length: u8,
    pub command_specific: u32,
    pub asc: u8,
    pub ascq: u8,
    pub fru: u8,
    pub sksv: bool,
    pub cd: bool,
    pub bpv: bool,
    pub bit_pointer: u8,
    pub sense_key_specific: u16,
    pub reporting_error_flags: u16,
    pub volume_valid: bool,
    pub dump: bool,
    pub cleaning_needed: bool,
    pub drive_service_required: bool,
    pub volume_label: String,
    pub physical_wrap: u8,
    pub relative_lpos: u32,
    pub scsi_address: u8,
    pub rs422: u8,
    pub active_partition: u8,
    pub port_identifier: u32,
    pub relative_target_port: u8,
    pub tape_partitions_exist: bool,
    pub tape_directory_valid: bool,
    pub host_command: u8,
    pub media_type: u8,
    pub cartridge_gen_type: u8,
    pub volume_label_cartridge_type: String,
    pub logical_block_number: u32,
    pub dataset_number: u32,
    /// (first error FSC, first error flags) .. (last error FSC, flags)
    pub error_fsc: [(u16, u16); 4],
    pub lpos_region: u8,
    pub erp_summary: Vec<u8>,
    pub cartridge_serial_number: String,
}

fn field_or_default<T: Default>(data: &[u8], end: usize, f: impl FnOnce() -> T) -> T {
    if data.len() >= end {
        f()
    } else {
        T::default()
    }
}

impl RequestSenseData {
    /// Decode sense data, fields beyond the transferred length are zero
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        proxmox_lang::try_block!({
            if data.len() < REQUEST_SENSE_POSITION_LEN {
                bail!(
                    "got too few data ({} < {})",
                    data.len(),
                    REQUEST_SENSE_POSITION_LEN
                );
            }

            let response_code = get_bits(data[0], 0, 7);
            if response_code != 0x70 && response_code != 0x71 {
                bail!("unexpected response code {:#x}", response_code);
            }

            let error_fsc = [
                field_or_default(data, 57, || (get_u16(data, 53), get_u16(data, 55))),
                field_or_default(data, 61, || (get_u16(data, 57), get_u16(data, 59))),
                field_or_default(data, 65, || (get_u16(data, 61), get_u16(data, 63))),
                field_or_default(data, 69, || (get_u16(data, 65), get_u16(data, 67))),
            ];

            Ok(RequestSenseData {
                valid: get_flag(data[0], 7),
                response_code,
                sense_key: get_bits(data[2], 0, 4),
                ili: get_flag(data[2], 5),
                eom: get_flag(data[2], 6),
                filemark: get_flag(data[2], 7),
                information: get_u32(data, 3),
                additional_sense_length: data[7],
                command_specific: get_u32(data, 8),
                asc: data[12],
                ascq: data[13],
                fru: data[14],
                bit_pointer: get_bits(data[15], 0, 3),
                bpv: get_flag(data[15], 3),
                cd: get_flag(data[15], 6),
                sksv: get_flag(data[15], 7),
                sense_key_specific: get_u16(data, 16),
                reporting_error_flags: get_u16(data, 18),
                volume_valid: get_flag(data[21], 0),
                dump: get_flag(data[21], 1),
                cleaning_needed: get_flag(data[21], 3),
                drive_service_required: get_flag(data[21], 4),
                volume_label: c_field_to_string(&data[22..29]),
                physical_wrap: data[29],
                relative_lpos: get_u32(data, 30),
                scsi_address: field_or_default(data, 35, || data[34]),
                rs422: field_or_default(data, 36, || data[35]),
                active_partition: field_or_default(data, 37, || get_bits(data[36], 0, 3)),
                port_identifier: field_or_default(data, 40, || get_u24(data, 37)),
                relative_target_port: field_or_default(data, 41, || get_bits(data[40], 0, 3)),
                tape_partitions_exist: field_or_default(data, 41, || get_flag(data[40], 6)),
                tape_directory_valid: field_or_default(data, 41, || get_flag(data[40], 7)),
                host_command: field_or_default(data, 42, || data[41]),
                media_type: field_or_default(data, 43, || get_bits(data[42], 0, 4)),
                cartridge_gen_type: field_or_default(data, 43, || get_bits(data[42], 4, 4)),
                volume_label_cartridge_type: field_or_default(data, 45, || {
                    c_field_to_string(&data[43..45])
                }),
                logical_block_number: field_or_default(data, 49, || get_u32(data, 45)),
                dataset_number: field_or_default(data, 53, || get_u32(data, 49)),
                error_fsc,
                lpos_region: field_or_default(data, 70, || data[69]),
                erp_summary: field_or_default(data, 86, || data[70..86].to_vec()),
                cartridge_serial_number: field_or_default(data, 96, || {
                    c_field_to_string(&data[86..96])
                }),
            })
        })
        .map_err(|err: Error| format_err!("decode request sense data failed - {}", err))
    }

    pub fn sense_info(&self) -> SenseInfo {
        SenseInfo {
            sense_key: self.sense_key,
            asc: self.asc,
            ascq: self.ascq,
        }
    }

    pub fn physical_position_info(&self) -> PhysicalPositionInfo {
        PhysicalPositionInfo {
            wrap: self.physical_wrap,
            lpos: self.relative_lpos,
        }
    }
}
