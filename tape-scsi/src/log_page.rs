//! LOG SENSE page decoding
//!
//! A log page is a 4 byte header (page code, subpage code, page length)
//! followed by a list of parameters. Each parameter starts with a 4
//! byte header (parameter code, control byte, parameter length).

use anyhow::{bail, format_err, Error};
use endian_trait::Endian;
use serde::{Deserialize, Serialize};

use proxmox_io::ReadExt;

use crate::constants::{
    block_bytes_transferred_param, data_compression_param, log_page, sequential_access_param,
};

#[repr(C, packed)]
#[derive(Endian, Debug, Copy, Clone)]
pub struct LogPageHeader {
    /// DS, SPF and page code
    pub page_code: u8,
    pub subpage_code: u8,
    pub page_length: u16,
}

#[repr(C, packed)]
#[derive(Endian, Debug, Copy, Clone)]
pub struct LpParameterHeader {
    pub parameter_code: u16,
    pub control: u8,
    pub parameter_len: u8,
}

/// A single log parameter with its raw value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogParameter {
    pub parameter_code: u16,
    pub control: u8,
    pub value: Vec<u8>,
}

impl LogParameter {
    /// Parse one parameter (header and value)
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let mut reader = data;
        Self::read_from(&mut reader)
    }

    fn read_from(reader: &mut &[u8]) -> Result<Self, Error> {
        let head: LpParameterHeader = unsafe { reader.read_be_value()? };
        let value = reader
            .read_exact_allocated(head.parameter_len as usize)
            .map_err(|err| {
                format_err!(
                    "parameter {:04x}h truncated ({} bytes expected) - {}",
                    { head.parameter_code },
                    head.parameter_len,
                    err
                )
            })?;

        Ok(Self {
            parameter_code: head.parameter_code,
            control: head.control,
            value,
        })
    }

    /// Value as unsigned integer, right aligned
    pub fn u64_value(&self) -> Result<u64, Error> {
        let len = self.value.len();
        if len > 8 {
            bail!("invalid counter size '{}'", len);
        }
        Ok(self
            .value
            .iter()
            .fold(0, |value, curr| (value << 8) | *curr as u64))
    }

    /// Value as signed integer, right aligned and sign extended
    pub fn i64_value(&self) -> Result<i64, Error> {
        let len = self.value.len();
        let value = self.u64_value()?;
        if len == 0 || len == 8 {
            return Ok(value as i64);
        }
        let shift = 64 - (len as u32 * 8);
        Ok(((value << shift) as i64) >> shift)
    }
}

/// Decoded log page
#[derive(Debug, Clone)]
pub struct LogPage {
    pub page_code: u8,
    pub subpage_code: u8,
    pub parameters: Vec<LogParameter>,
}

impl LogPage {
    pub fn parameter(&self, code: u16) -> Option<&LogParameter> {
        self.parameters.iter().find(|p| p.parameter_code == code)
    }
}

/// Split a log page into its parameters
///
/// Fails if the page code does not match `expected_page`.
pub fn decode_log_page(data: &[u8], expected_page: u8) -> Result<LogPage, Error> {
    proxmox_lang::try_block!({
        let mut reader = data;
        let header: LogPageHeader = unsafe { reader.read_be_value()? };

        let page_code = header.page_code & 0x3f;
        if page_code != expected_page {
            bail!(
                "invalid response - got page {:02x}h, expected {:02x}h",
                page_code,
                expected_page
            );
        }

        let page_len = header.page_length as usize;
        if (page_len + 4) > data.len() {
            bail!("invalid page length");
        }
        let mut reader = &data[4..page_len + 4];

        let mut parameters = Vec::new();
        while !reader.is_empty() {
            parameters.push(LogParameter::read_from(&mut reader)?);
        }

        Ok(LogPage {
            page_code,
            subpage_code: header.subpage_code,
            parameters,
        })
    })
    .map_err(|err: Error| format_err!("decode log page {:02x}h failed - {}", expected_page, err))
}

/// Data amount transferred through the drive, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompressionStats {
    /// Bytes received from the host
    pub from_host: u64,
    /// Bytes written to the medium (after compression)
    pub to_tape: u64,
    /// Bytes read from the medium
    pub from_tape: u64,
    /// Bytes sent to the host
    pub to_host: u64,
}

impl CompressionStats {
    /// Difference to an earlier snapshot, used by drives which cannot
    /// reset their counters.
    pub fn since(&self, base: &CompressionStats) -> CompressionStats {
        CompressionStats {
            from_host: self.from_host.saturating_sub(base.from_host),
            to_tape: self.to_tape.saturating_sub(base.to_tape),
            from_tape: self.from_tape.saturating_sub(base.from_tape),
            to_host: self.to_host.saturating_sub(base.to_host),
        }
    }
}

/// Decode the sequential access device page (0Ch), values in bytes
pub fn decode_sequential_access_page(data: &[u8]) -> Result<CompressionStats, Error> {
    let page = decode_log_page(data, log_page::SEQUENTIAL_ACCESS_DEVICE)?;

    let mut stats = CompressionStats::default();
    for param in page.parameters.iter() {
        match param.parameter_code {
            sequential_access_param::RECEIVED_FROM_INITIATOR => {
                stats.from_host = param.u64_value()?
            }
            sequential_access_param::WRITTEN_ON_TAPE => stats.to_tape = param.u64_value()?,
            sequential_access_param::READ_FROM_TAPE => stats.from_tape = param.u64_value()?,
            sequential_access_param::READ_BY_INITIATOR => stats.to_host = param.u64_value()?,
            _ => {}
        }
    }

    Ok(stats)
}

const MB: i64 = 1_000_000;

/// Decode the LTO data compression page (32h)
///
/// Counters are reported as MB (10^6) plus a signed byte remainder.
pub fn decode_data_compression_page(data: &[u8]) -> Result<CompressionStats, Error> {
    let page = decode_log_page(data, log_page::DATA_COMPRESSION_32H)?;

    let mut mb = [0i64; 4];
    let mut bytes = [0i64; 4];

    for param in page.parameters.iter() {
        use data_compression_param::*;

        let (slot, is_mb) = match param.parameter_code {
            MB_TRANSFERRED_FROM_SERVER => (0, true),
            BYTES_TRANSFERRED_FROM_SERVER => (0, false),
            MB_WRITTEN_TO_TAPE => (1, true),
            BYTES_WRITTEN_TO_TAPE => (1, false),
            MB_READ_FROM_TAPE => (2, true),
            BYTES_READ_FROM_TAPE => (2, false),
            MB_TRANSFERRED_TO_SERVER => (3, true),
            BYTES_TRANSFERRED_TO_SERVER => (3, false),
            _ => continue,
        };

        if is_mb {
            mb[slot] = param.u64_value()? as i64;
        } else {
            bytes[slot] = param.i64_value()?;
        }
    }

    let total = |slot: usize| -> u64 {
        mb[slot]
            .saturating_mul(MB)
            .saturating_add(bytes[slot])
            .max(0) as u64
    };

    Ok(CompressionStats {
        from_host: total(0),
        to_tape: total(1),
        from_tape: total(2),
        to_host: total(3),
    })
}

/// Decode the block bytes transferred page (38h, IBM 3592), values in KiB
pub fn decode_block_bytes_transferred_page(data: &[u8]) -> Result<CompressionStats, Error> {
    let page = decode_log_page(data, log_page::BLOCK_BYTES_TRANSFERRED)?;

    let mut stats = CompressionStats::default();
    for param in page.parameters.iter() {
        use block_bytes_transferred_param::*;

        let value = param.u64_value()?.saturating_mul(1024);
        match param.parameter_code {
            HOST_WRITE_KIB_PROCESSED => stats.from_host = value,
            DEVICE_WRITE_KIB_PROCESSED => stats.to_tape = value,
            DEVICE_READ_KIB_PROCESSED => stats.from_tape = value,
            HOST_READ_KIB_PROCESSED => stats.to_host = value,
            _ => {}
        }
    }

    Ok(stats)
}
