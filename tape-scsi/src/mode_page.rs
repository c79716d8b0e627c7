//! MODE SENSE(6) / MODE SELECT(6) parameter data
//!
//! Parameter list layout: 4 byte header, one 8 byte block descriptor,
//! then the mode page.

use anyhow::{bail, format_err, Error};
use endian_trait::Endian;
use serde::{Deserialize, Serialize};

use proxmox_io::{ReadExt, WriteExt};

use crate::codec::{get_bits, get_flag, set_bits, set_flag, to_u16, to_u24};
use crate::constants::{lbp_method, lbp_method_to_string, mode_page};

#[repr(C, packed)]
#[derive(Endian, Debug, Copy, Clone, Default)]
pub struct ModeParameterHeader6 {
    /// Does not include itself, must be zero for MODE SELECT
    pub mode_data_len: u8,
    pub medium_type: u8,
    pub flags2: u8,
    pub block_descriptor_len: u8,
}

impl ModeParameterHeader6 {
    pub fn speed(&self) -> u8 {
        get_bits(self.flags2, 0, 4)
    }

    #[allow(clippy::unusual_byte_groupings)]
    pub fn buffer_mode(&self) -> u8 {
        (self.flags2 & 0b0_111_0000) >> 4
    }

    #[allow(clippy::unusual_byte_groupings)]
    pub fn write_protect(&self) -> bool {
        (self.flags2 & 0b1_000_0000) != 0
    }

    pub fn reset_mode_data_len(&mut self) {
        self.mode_data_len = 0;
    }
}

#[repr(C, packed)]
#[derive(Endian, Debug, Copy, Clone, Default)]
/// Block descriptor for sequential access devices
pub struct ModeBlockDescriptor {
    pub density_code: u8,
    pub number_of_blocks: [u8; 3],
    reserved: u8,
    pub block_length: [u8; 3],
}

impl ModeBlockDescriptor {
    pub fn number_of_blocks(&self) -> u32 {
        to_u24(&self.number_of_blocks)
    }

    pub fn block_length(&self) -> u32 {
        to_u24(&self.block_length)
    }

    pub fn set_block_length(&mut self, length: u32) -> Result<(), Error> {
        if length > 0x80_00_00 {
            bail!("block length '{}' is too large", length);
        }
        crate::codec::set_u24(&mut self.block_length, length)
    }
}

#[repr(C, packed)]
#[derive(Endian, Debug, Copy, Clone, Default)]
/// Device configuration mode page (10h)
pub struct DeviceConfigurationModePage {
    pub page_code: u8, // 0x10
    pub page_length: u8, // 0x0e
    pub flags2: u8,
    pub active_partition: u8,
    pub write_buffer_full_ratio: u8,
    pub read_buffer_empty_ratio: u8,
    pub write_delay_time: [u8; 2],
    pub flags8: u8,
    pub gap_size: u8,
    pub flags10: u8,
    pub buffer_size_at_early_warning: [u8; 3],
    pub select_data_compression_algorithm: u8,
    pub flags15: u8,
}

impl DeviceConfigurationModePage {
    pub fn active_format(&self) -> u8 {
        get_bits(self.flags2, 0, 5)
    }

    pub fn write_delay_time(&self) -> u16 {
        to_u16(&self.write_delay_time)
    }

    /// Logical object identifiers supported
    pub fn lois(&self) -> bool {
        get_flag(self.flags8, 6)
    }

    pub fn soft_write_protect(&self) -> bool {
        get_flag(self.flags10, 2)
    }

    pub fn compression_enabled(&self) -> bool {
        self.select_data_compression_algorithm != 0
    }

    pub fn set_compression(&mut self, enable: bool) {
        self.select_data_compression_algorithm = if enable { 1 } else { 0 };
    }
}

#[repr(C, packed)]
#[derive(Endian, Debug, Copy, Clone, Default)]
/// Control data protection mode page (0Ah, subpage F0h)
pub struct ControlDataProtectionModePage {
    /// Page code (bits 0-5), SPF (bit 6), PS (bit 7)
    pub flags0: u8,
    pub subpage_code: u8,
    /// Page length, n - 3
    pub page_length: u16,
    pub lbp_method: u8,
    pub lbp_information_length: u8,
    pub flags6: u8,
    pub flags7: u8,
    reserved: [u8; 24],
}

impl ControlDataProtectionModePage {
    pub fn page_code(&self) -> u8 {
        get_bits(self.flags0, 0, 6)
    }

    pub fn lbp_read(&self) -> bool {
        get_flag(self.flags6, 6)
    }

    pub fn lbp_write(&self) -> bool {
        get_flag(self.flags6, 7)
    }

    pub fn set_lbp(&mut self, info: &LbpInfo) -> Result<(), Error> {
        self.lbp_method = info.method;
        set_bits(&mut self.lbp_information_length, 0, 6, info.method_length)?;
        set_flag(&mut self.flags6, 6, info.read);
        set_flag(&mut self.flags6, 7, info.write);
        // PS is reported by MODE SENSE but must be zero for MODE SELECT
        set_flag(&mut self.flags0, 7, false);
        Ok(())
    }

    pub fn lbp_info(&self) -> LbpInfo {
        LbpInfo {
            method: self.lbp_method,
            method_length: get_bits(self.lbp_information_length, 0, 6),
            read: self.lbp_read(),
            write: self.lbp_write(),
        }
    }
}

/// Logical block protection state
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct LbpInfo {
    pub method: u8,
    pub method_length: u8,
    pub read: bool,
    pub write: bool,
}

impl LbpInfo {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn crc32c(write: bool) -> Self {
        Self {
            method: lbp_method::CRC32C,
            method_length: lbp_method::CRC32C_LENGTH,
            read: true,
            write,
        }
    }

    pub fn method_name(&self) -> &'static str {
        lbp_method_to_string(self.method)
    }
}

/// Decoded MODE SENSE(6) response
#[derive(Debug, Copy, Clone)]
pub struct ModeSense6Data<P> {
    pub header: ModeParameterHeader6,
    pub block_descriptor: ModeBlockDescriptor,
    pub page: P,
}

/// Decode MODE SENSE(6) data with block descriptor
///
/// Warning: P needs to be repr(C, packed)]
pub fn decode_mode_sense6<P: Endian>(data: &[u8]) -> Result<ModeSense6Data<P>, Error> {
    proxmox_lang::try_block!({
        let mut reader = data;

        let header: ModeParameterHeader6 = unsafe { reader.read_be_value()? };
        let expected_len = header.mode_data_len as usize + 1;

        if data.len() < expected_len {
            bail!(
                "wrong mode_data_len: got {}, expected {}",
                data.len(),
                expected_len
            );
        }

        if header.block_descriptor_len != 8 {
            let len = header.block_descriptor_len;
            bail!("wrong block_descriptor_len: {}, expected 8", len);
        }

        let block_descriptor: ModeBlockDescriptor = unsafe { reader.read_be_value()? };

        let page: P = unsafe { reader.read_be_value()? };

        Ok(ModeSense6Data {
            header,
            block_descriptor,
            page,
        })
    })
    .map_err(|err: Error| format_err!("decode mode sense(6) failed - {}", err))
}

impl<P: Endian + Copy> ModeSense6Data<P> {
    /// Encode as MODE SELECT(6) parameter list
    ///
    /// The mode data length is reset to zero. `page_len` limits the
    /// number of page bytes sent.
    pub fn encode_mode_select(&self, page_len: usize) -> Result<Vec<u8>, Error> {
        let mut header = self.header;
        header.reset_mode_data_len();

        let mut data = Vec::new();
        unsafe {
            data.write_be_value(header)?;
            data.write_be_value(self.block_descriptor)?;
            data.write_be_value(self.page)?;
        }

        let total = 4 + 8 + page_len;
        if total > data.len() {
            bail!(
                "mode select parameter list too long ({} > {})",
                total,
                data.len()
            );
        }
        data.truncate(total);

        if data.len() > u8::MAX as usize {
            bail!("mode select(6) parameters too long");
        }

        Ok(data)
    }
}

impl ModeSense6Data<DeviceConfigurationModePage> {
    pub fn check_page(&self) -> Result<(), Error> {
        let code = get_bits(self.page.page_code, 0, 6);
        if code != mode_page::DEVICE_CONFIGURATION {
            bail!("got wrong page code {:02x}h", code);
        }
        Ok(())
    }

    /// Set density (if non zero) and compression, returns the MODE SELECT data
    pub fn encode_density_and_compression(
        &mut self,
        density_code: u8,
        compression: bool,
    ) -> Result<Vec<u8>, Error> {
        if density_code != 0 {
            self.block_descriptor.density_code = density_code;
        }
        self.page.set_compression(compression);
        self.encode_mode_select(std::mem::size_of::<DeviceConfigurationModePage>())
    }
}

impl ModeSense6Data<ControlDataProtectionModePage> {
    pub fn check_page(&self) -> Result<(), Error> {
        let code = self.page.page_code();
        if code != mode_page::CONTROL_DATA_PROTECTION {
            bail!("got wrong page code {:02x}h", code);
        }
        if self.page.subpage_code != mode_page::CONTROL_DATA_PROTECTION_SUBPAGE {
            bail!("got wrong subpage code {:02x}h", self.page.subpage_code);
        }
        Ok(())
    }

    /// Modify the LBP fields, returns the MODE SELECT data
    ///
    /// Only `page length + 4` page bytes are sent.
    pub fn encode_lbp(&mut self, info: &LbpInfo) -> Result<Vec<u8>, Error> {
        self.page.set_lbp(info)?;
        let page_len = self.page.page_length as usize
            + mode_page::CONTROL_DATA_PROTECTION_LENGTH_ADDITION as usize;
        self.encode_mode_select(page_len)
    }
}
