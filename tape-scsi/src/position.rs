//! Tape position data
//!
//! READ POSITION (short form), READ END OF WRAP POSITION (short and
//! long form) and the physical position taken from REQUEST SENSE.

use anyhow::{bail, format_err, Error};
use serde::{Deserialize, Serialize};

use crate::codec::{get_flag, get_u16, get_u24, get_u32, get_u48};

pub const READ_POSITION_SHORT_LEN: usize = 20;

/// READ POSITION short form data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPositionShort {
    /// Beginning of partition
    pub bop: bool,
    /// End of partition
    pub eop: bool,
    /// Logical object count unknown
    pub locu: bool,
    /// Byte count unknown
    pub bycu: bool,
    /// Logical object location unknown
    pub lolu: bool,
    /// Position error, location fields overflowed
    pub perr: bool,
    /// Beyond programmable early warning
    pub bpew: bool,
    pub partition: u8,
    pub first_block: u32,
    pub last_block: u32,
    pub blocks_in_buffer: u32,
    pub bytes_in_buffer: u32,
}

impl ReadPositionShort {
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        proxmox_lang::try_block!({
            if data.len() < READ_POSITION_SHORT_LEN {
                bail!("got too few data ({} < {})", data.len(), READ_POSITION_SHORT_LEN);
            }
            let flags = data[0];
            Ok(ReadPositionShort {
                bpew: get_flag(flags, 0),
                perr: get_flag(flags, 1),
                lolu: get_flag(flags, 2),
                bycu: get_flag(flags, 4),
                locu: get_flag(flags, 5),
                eop: get_flag(flags, 6),
                bop: get_flag(flags, 7),
                partition: data[1],
                first_block: get_u32(data, 4),
                last_block: get_u32(data, 8),
                blocks_in_buffer: get_u24(data, 13),
                bytes_in_buffer: get_u32(data, 16),
            })
        })
        .map_err(|err: Error| format_err!("decode read position data failed - {}", err))
    }

    /// Position fields, only valid if no overflow was reported
    pub fn position_info(&self) -> Result<PositionInfo, Error> {
        if self.perr {
            bail!("An overflow has occurred in the position data, use the long form");
        }
        Ok(PositionInfo {
            current_position: self.first_block,
            oldest_dirty_object: self.last_block,
            dirty_objects_count: self.blocks_in_buffer,
            dirty_bytes_count: self.bytes_in_buffer,
        })
    }
}

/// Logical position and write buffer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PositionInfo {
    pub current_position: u32,
    pub oldest_dirty_object: u32,
    pub dirty_objects_count: u32,
    pub dirty_bytes_count: u32,
}

/// Physical head position (LTO)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PhysicalPositionInfo {
    /// Physical wrap, the LSB is the direction (1 = towards BOT)
    pub wrap: u8,
    /// Relative longitudinal position
    pub lpos: u32,
}

impl PhysicalPositionInfo {
    pub fn towards_bot(&self) -> bool {
        self.wrap != 0xff && (self.wrap & 1) != 0
    }
}

/// Wrap descriptor of the READ END OF WRAP POSITION long form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndOfWrapPosition {
    pub wrap_number: u16,
    pub partition: u16,
    /// Logical object identifier at the end of the wrap (48 bit)
    pub block_id: u64,
}

const WRAP_DESCRIPTOR_LEN: usize = 12;

/// Decode the READ END OF WRAP POSITION short form (single wrap)
pub fn decode_end_of_wrap_position_short(data: &[u8]) -> Result<u64, Error> {
    proxmox_lang::try_block!({
        if data.len() < 10 {
            bail!("got too few data ({} < 10)", data.len());
        }
        let len = get_u16(data, 0);
        if len != 8 {
            bail!("unexpected response data length {}", len);
        }
        Ok(get_u48(data, 4))
    })
    .map_err(|err: Error| format_err!("decode end of wrap position failed - {}", err))
}

/// Decode the READ END OF WRAP POSITION long form
///
/// The number of descriptors is (response data length - 2) / 12.
pub fn decode_end_of_wrap_positions(data: &[u8]) -> Result<Vec<EndOfWrapPosition>, Error> {
    proxmox_lang::try_block!({
        if data.len() < 4 {
            bail!("got too few data ({} < 4)", data.len());
        }
        let len = get_u16(data, 0) as usize;
        let count = len.saturating_sub(2) / WRAP_DESCRIPTOR_LEN;

        let needed = 4 + count * WRAP_DESCRIPTOR_LEN;
        if needed > data.len() {
            bail!("response data length {} exceeds buffer ({} bytes)", len, data.len());
        }

        let list = (0..count)
            .map(|i| {
                let offset = 4 + i * WRAP_DESCRIPTOR_LEN;
                EndOfWrapPosition {
                    wrap_number: get_u16(data, offset),
                    partition: get_u16(data, offset + 2),
                    block_id: get_u48(data, offset + 6),
                }
            })
            .collect();

        Ok(list)
    })
    .map_err(|err: Error| format_err!("decode end of wrap positions failed - {}", err))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_position_short() -> Result<(), Error> {
        let mut data = [0u8; 20];
        data[0] = 0x80 | 0x01;
        data[1] = 0x02;
        data[4..8].copy_from_slice(&[0xAB, 0xCD, 0xEF, 0x12]);
        data[8..12].copy_from_slice(&[0x34, 0x56, 0x78, 0x9A]);
        data[12] = 0xFF;
        data[13..16].copy_from_slice(&[0xAB, 0xCD, 0xEF]);
        data[16..20].copy_from_slice(&[0x12, 0x34, 0x56, 0x78]);

        let pos = ReadPositionShort::decode(&data)?;
        assert!(pos.bop);
        assert!(pos.bpew);
        assert!(!pos.eop);
        assert!(!pos.perr);
        assert_eq!(pos.partition, 2);
        assert_eq!(pos.first_block, 0xABCDEF12);
        assert_eq!(pos.last_block, 0x3456789A);
        assert_eq!(pos.blocks_in_buffer, 0xABCDEF);
        assert_eq!(pos.bytes_in_buffer, 0x12345678);

        let info = pos.position_info()?;
        assert_eq!(info.current_position, 0xABCDEF12);
        assert_eq!(info.oldest_dirty_object, 0x3456789A);
        assert_eq!(info.dirty_objects_count, 0xABCDEF);
        assert_eq!(info.dirty_bytes_count, 0x12345678);
        Ok(())
    }

    #[test]
    fn test_read_position_overflow() -> Result<(), Error> {
        let mut data = [0u8; 20];
        data[0] = 0x02;
        let pos = ReadPositionShort::decode(&data)?;
        assert!(pos.perr);
        let err = pos.position_info().unwrap_err();
        assert!(err.to_string().contains("An overflow has occurred"));

        assert!(ReadPositionShort::decode(&data[..10]).is_err());
        Ok(())
    }

    #[test]
    fn test_end_of_wrap_short() -> Result<(), Error> {
        let data = [0x00, 0x08, 0xFF, 0xFF, 0xAB, 0xCD, 0xEF, 0x12, 0x34, 0x56];
        assert_eq!(decode_end_of_wrap_position_short(&data)?, 0xABCDEF123456);
        Ok(())
    }

    #[test]
    fn test_end_of_wrap_long() -> Result<(), Error> {
        let wraps = crate::constants::MAX_LTO_TAPE_WRAPS;
        let mut data = vec![0u8; 4 + 12 * wraps];
        let len = (2 + 12 * wraps) as u16;
        data[0..2].copy_from_slice(&len.to_be_bytes());
        assert_eq!(len, 0x0D22);

        for wrap in 0..wraps {
            let offset = 4 + wrap * 12;
            data[offset..offset + 2].copy_from_slice(&(wrap as u16).to_be_bytes());
            data[offset + 2..offset + 4].copy_from_slice(&[0xEF, 0x01]);
            data[offset + 4] = 0xFF;
            data[offset + 5] = 0xFF;
            data[offset + 6..offset + 12]
                .copy_from_slice(&[0xAB, 0xCD, 0xEF, 0x12, 0x34, 0x56]);
        }

        let list = decode_end_of_wrap_positions(&data)?;
        assert_eq!(list.len(), wraps);
        assert_eq!(list[7].wrap_number, 7);
        assert_eq!(list[7].partition, 0xEF01);
        assert_eq!(list[7].block_id, 0xABCDEF123456);

        // truncated transfer
        assert!(decode_end_of_wrap_positions(&data[..100]).is_err());
        Ok(())
    }

    #[test]
    fn test_physical_direction() {
        let pos = PhysicalPositionInfo { wrap: 3, lpos: 0 };
        assert!(pos.towards_bot());
        let pos = PhysicalPositionInfo { wrap: 0xff, lpos: 0 };
        assert!(!pos.towards_bot());
    }
}
