//! Big endian helpers for SCSI wire structures
//!
//! SCSI transfers every multi-byte integer in big endian (network)
//! order. The `to_*` functions read a field of exact width into a host
//! integer, the `set_*` functions write it back. Fields of 3 and 6 bytes
//! are zero-extended on read and range checked on write.
//!
//! The `get_*`/`put_*` variants operate on a field at a fixed offset
//! inside a larger buffer and are used by the CDB and page structures.

use std::fmt::Write;

use anyhow::{bail, Error};

/// Largest value a 3 byte field can hold
pub const U24_MAX: u32 = 0x00ff_ffff;

/// Largest value a 6 byte field can hold
pub const U48_MAX: u64 = 0x0000_ffff_ffff_ffff;

pub fn to_u16(t: &[u8; 2]) -> u16 {
    u16::from_be_bytes(*t)
}

/// Read a 3 byte field (zero-extended)
pub fn to_u24(t: &[u8; 3]) -> u32 {
    u32::from_be_bytes([0, t[0], t[1], t[2]])
}

pub fn to_u32(t: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*t)
}

pub fn to_s32(t: &[u8; 4]) -> i32 {
    i32::from_be_bytes(*t)
}

/// Read a 6 byte field (zero-extended)
///
/// READ END OF WRAP POSITION reports logical object identifiers with
/// 48 bits.
pub fn to_u48(t: &[u8; 6]) -> u64 {
    u64::from_be_bytes([0, 0, t[0], t[1], t[2], t[3], t[4], t[5]])
}

pub fn to_u64(t: &[u8; 8]) -> u64 {
    u64::from_be_bytes(*t)
}

pub fn set_u16(t: &mut [u8; 2], value: u16) {
    *t = value.to_be_bytes();
}

pub fn set_u24(t: &mut [u8; 3], value: u32) -> Result<(), Error> {
    if value > U24_MAX {
        bail!("value {:#x} does not fit into 3 bytes", value);
    }
    let bytes = value.to_be_bytes();
    t.copy_from_slice(&bytes[1..]);
    Ok(())
}

pub fn set_u32(t: &mut [u8; 4], value: u32) {
    *t = value.to_be_bytes();
}

pub fn set_u48(t: &mut [u8; 6], value: u64) -> Result<(), Error> {
    if value > U48_MAX {
        bail!("value {:#x} does not fit into 6 bytes", value);
    }
    let bytes = value.to_be_bytes();
    t.copy_from_slice(&bytes[2..]);
    Ok(())
}

pub fn set_u64(t: &mut [u8; 8], value: u64) {
    *t = value.to_be_bytes();
}

/// Copy `W` bytes at `offset` out of `buf`
///
/// Panics if the field is outside of `buf`, so callers must check the
/// buffer length first (fixed size structures always do).
pub fn field<const W: usize>(buf: &[u8], offset: usize) -> [u8; W] {
    std::array::from_fn(|i| buf[offset + i])
}

pub fn get_u16(buf: &[u8], offset: usize) -> u16 {
    to_u16(&field(buf, offset))
}

pub fn get_u24(buf: &[u8], offset: usize) -> u32 {
    to_u24(&field(buf, offset))
}

pub fn get_u32(buf: &[u8], offset: usize) -> u32 {
    to_u32(&field(buf, offset))
}

pub fn get_u48(buf: &[u8], offset: usize) -> u64 {
    to_u48(&field(buf, offset))
}

pub fn get_u64(buf: &[u8], offset: usize) -> u64 {
    to_u64(&field(buf, offset))
}

pub fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    let mut t = [0u8; 2];
    set_u16(&mut t, value);
    buf[offset..offset + 2].copy_from_slice(&t);
}

pub fn put_u24(buf: &mut [u8], offset: usize, value: u32) -> Result<(), Error> {
    let mut t = [0u8; 3];
    set_u24(&mut t, value)?;
    buf[offset..offset + 3].copy_from_slice(&t);
    Ok(())
}

pub fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    let mut t = [0u8; 4];
    set_u32(&mut t, value);
    buf[offset..offset + 4].copy_from_slice(&t);
}

pub fn put_u48(buf: &mut [u8], offset: usize, value: u64) -> Result<(), Error> {
    let mut t = [0u8; 6];
    set_u48(&mut t, value)?;
    buf[offset..offset + 6].copy_from_slice(&t);
    Ok(())
}

pub fn put_u64(buf: &mut [u8], offset: usize, value: u64) {
    let mut t = [0u8; 8];
    set_u64(&mut t, value);
    buf[offset..offset + 8].copy_from_slice(&t);
}

/// Extract `width` bits starting at bit `shift` (bit 0 is the LSB)
pub fn get_bits(byte: u8, shift: u8, width: u8) -> u8 {
    (byte >> shift) & bit_mask(width)
}

/// Store `value` into `width` bits starting at bit `shift`
///
/// Values wider than the field are rejected.
pub fn set_bits(byte: &mut u8, shift: u8, width: u8, value: u8) -> Result<(), Error> {
    let mask = bit_mask(width);
    if value & !mask != 0 {
        bail!("value {:#x} does not fit into a {} bit field", value, width);
    }
    *byte = (*byte & !(mask << shift)) | (value << shift);
    Ok(())
}

pub fn get_flag(byte: u8, bit: u8) -> bool {
    (byte & (1 << bit)) != 0
}

pub fn set_flag(byte: &mut u8, bit: u8, value: bool) {
    if value {
        *byte |= 1 << bit;
    } else {
        *byte &= !(1 << bit);
    }
}

fn bit_mask(width: u8) -> u8 {
    if width >= 8 {
        0xff
    } else {
        (1u8 << width) - 1
    }
}

/// Converts SCSI ASCII text into String, trim zero and spaces
pub fn scsi_ascii_to_string(data: &[u8]) -> String {
    String::from_utf8_lossy(data)
        .trim_matches(char::from(0))
        .trim()
        .to_string()
}

/// Converts a fixed size C string field, stopping at the first NUL byte
pub fn c_field_to_string(data: &[u8]) -> String {
    let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// Render a buffer as hex dump, 16 bytes per line
///
/// Used to attach raw sense or page data to diagnostics.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (line_nr, line) in data.chunks(16).enumerate() {
        if line_nr > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:04x}:", line_nr * 16);
        for (i, byte) in line.iter().enumerate() {
            if i == 8 {
                out.push(' ');
            }
            let _ = write!(out, " {:02x}", byte);
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_host_integers() {
        assert_eq!(to_u16(&[0x12, 0x34]), 0x1234);
        assert_eq!(to_u24(&[0xAA, 0xBB, 0xCC]), 0xAABBCC);
        assert_eq!(to_u32(&[0xDE, 0xAD, 0xBE, 0xEF]), 0xDEADBEEF);
        assert_eq!(to_s32(&[0xE6, 0x29, 0x66, 0x5B]), -433494437);
        assert_eq!(to_u48(&[0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]), 0xDEADBEEFCAFE);
        assert_eq!(
            to_u64(&[0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE, 0xFA, 0xDE]),
            0xDEADBEEFCAFEFADE
        );
    }

    #[test]
    fn test_set_integers() -> Result<(), Error> {
        let mut t2 = [0u8; 2];
        set_u16(&mut t2, 0xBEEF);
        assert_eq!(t2, [0xBE, 0xEF]);

        let mut t3 = [0u8; 3];
        set_u24(&mut t3, 0x123456)?;
        assert_eq!(t3, [0x12, 0x34, 0x56]);

        let mut t4 = [0u8; 4];
        set_u32(&mut t4, 0x1234_5678);
        assert_eq!(t4, [0x12, 0x34, 0x56, 0x78]);

        let mut t6 = [0u8; 6];
        set_u48(&mut t6, 0x0102_0304_0506)?;
        assert_eq!(t6, [1, 2, 3, 4, 5, 6]);

        let mut t8 = [0u8; 8];
        set_u64(&mut t8, 0x0102_0304_0506_0708);
        assert_eq!(t8, [1, 2, 3, 4, 5, 6, 7, 8]);

        Ok(())
    }

    #[test]
    fn test_round_trip() -> Result<(), Error> {
        for value in [0u16, 1, 0x00ff, 0x8000, u16::MAX] {
            let mut t = [0u8; 2];
            set_u16(&mut t, value);
            assert_eq!(to_u16(&t), value);
        }
        for value in [0u32, 1, 0x00_8000, 0x12_3456, U24_MAX] {
            let mut t = [0u8; 3];
            set_u24(&mut t, value)?;
            assert_eq!(to_u24(&t), value);
        }
        for value in [0u32, 1, 0x8000_0000, 0xCAFE_BABE, u32::MAX] {
            let mut t = [0u8; 4];
            set_u32(&mut t, value);
            assert_eq!(to_u32(&t), value);
        }
        for value in [0u64, 1, 0x8000_0000_0000, 0x1234_5678_9ABC, U48_MAX] {
            let mut t = [0u8; 6];
            set_u48(&mut t, value)?;
            assert_eq!(to_u48(&t), value);
        }
        for value in [0u64, 1, 0x8000_0000_0000_0000, 0x0123_4567_89AB_CDEF, u64::MAX] {
            let mut t = [0u8; 8];
            set_u64(&mut t, value);
            assert_eq!(to_u64(&t), value);
        }
        Ok(())
    }

    #[test]
    fn test_narrow_field_overflow() {
        let mut t3 = [0u8; 3];
        assert!(set_u24(&mut t3, U24_MAX + 1).is_err());
        assert_eq!(t3, [0, 0, 0]);

        let mut t6 = [0u8; 6];
        assert!(set_u48(&mut t6, U48_MAX + 1).is_err());
        assert_eq!(t6, [0; 6]);

        let mut byte = 0u8;
        assert!(set_bits(&mut byte, 0, 5, 0x20).is_err());
        assert_eq!(byte, 0);
    }

    #[test]
    fn test_offset_access() -> Result<(), Error> {
        let mut buf = [0u8; 16];
        put_u16(&mut buf, 1, 0x0102);
        put_u24(&mut buf, 3, 0x030405)?;
        put_u32(&mut buf, 6, 0x0607_0809);
        put_u48(&mut buf, 10, 0x0A0B_0C0D_0E0F)?;

        assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
        assert_eq!(get_u16(&buf, 1), 0x0102);
        assert_eq!(get_u24(&buf, 3), 0x030405);
        assert_eq!(get_u32(&buf, 6), 0x0607_0809);
        assert_eq!(get_u48(&buf, 10), 0x0A0B_0C0D_0E0F);
        assert_eq!(get_u64(&buf, 8), 0x0809_0A0B_0C0D_0E0F);
        Ok(())
    }

    #[test]
    fn test_bit_fields() -> Result<(), Error> {
        let mut byte = 0u8;
        set_bits(&mut byte, 6, 2, 0b11)?;
        set_bits(&mut byte, 0, 6, 0x2e)?;
        assert_eq!(byte, 0xEE);
        assert_eq!(get_bits(byte, 6, 2), 0b11);
        assert_eq!(get_bits(byte, 0, 6), 0x2e);

        set_flag(&mut byte, 4, false);
        assert_eq!(byte, 0xEE & !0x10);
        assert!(!get_flag(byte, 4));
        assert!(get_flag(byte, 7));
        Ok(())
    }

    #[test]
    fn test_strings() {
        assert_eq!(scsi_ascii_to_string(b"IBM     \0\0"), "IBM");
        assert_eq!(c_field_to_string(b"000042\0\0\0\0"), "000042");
        assert_eq!(c_field_to_string(b"0123456789"), "0123456789");
    }

    #[test]
    fn test_hex_dump() {
        let data: Vec<u8> = (0u8..18).collect();
        assert_eq!(
            hex_dump(&data),
            "0000: 00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f\n0010: 10 11"
        );
    }
}
