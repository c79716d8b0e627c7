//! INQUIRY data and the unit serial number VPD page
//!
//! Oracle T10000 drives extend the standard data with a vendor part
//! carrying the key management and encryption settings.

use anyhow::{bail, format_err, Error};
use endian_trait::Endian;
use serde::{Deserialize, Serialize};

use proxmox_io::ReadExt;

use crate::codec::{get_bits, get_flag, scsi_ascii_to_string};
use crate::constants::{vpd_page, PERIPHERAL_DEVICE_TYPE_TEXT};

// Standard inquiry data, first 36 bytes
#[repr(C, packed)]
#[derive(Endian)]
struct StandardInquiry {
    peripheral: u8,
    rmb: u8,
    version: u8,
    flags3: u8,
    additional_length: u8,
    flags5: u8,
    flags6: u8,
    flags7: u8,
    vendor: [u8; 8],
    product: [u8; 16],
    revision: [u8; 4],
}

pub const STANDARD_INQUIRY_LEN: usize = 36;

/// Decoded standard INQUIRY data
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct InquiryData {
    /// Peripheral device type (0-31)
    pub peripheral_type: u8,
    /// Peripheral device type as string
    pub peripheral_type_text: String,
    pub peripheral_qualifier: u8,
    /// Removable medium
    pub rmb: bool,
    pub version: u8,
    pub response_data_format: u8,
    pub hisup: bool,
    pub norm_aca: bool,
    /// Protection information supported
    pub protect: bool,
    pub three_pc: bool,
    pub tpgs: u8,
    pub acc: bool,
    pub sccs: bool,
    pub multi_port: bool,
    pub enc_serv: bool,
    pub cmd_que: bool,
    pub vendor: String,
    pub product: String,
    pub revision: String,
}

impl InquiryData {
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        proxmox_lang::try_block!({
            if data.len() < STANDARD_INQUIRY_LEN {
                bail!("got too few data ({} < {})", data.len(), STANDARD_INQUIRY_LEN);
            }

            let mut reader = data;
            let page: StandardInquiry = unsafe { reader.read_be_value()? };

            let peripheral_type = get_bits(page.peripheral, 0, 5);

            Ok(InquiryData {
                peripheral_type,
                peripheral_type_text: PERIPHERAL_DEVICE_TYPE_TEXT[peripheral_type as usize]
                    .to_string(),
                peripheral_qualifier: get_bits(page.peripheral, 5, 3),
                rmb: get_flag(page.rmb, 7),
                version: page.version,
                response_data_format: get_bits(page.flags3, 0, 4),
                hisup: get_flag(page.flags3, 4),
                norm_aca: get_flag(page.flags3, 5),
                protect: get_flag(page.flags5, 0),
                three_pc: get_flag(page.flags5, 3),
                tpgs: get_bits(page.flags5, 4, 2),
                acc: get_flag(page.flags5, 6),
                sccs: get_flag(page.flags5, 7),
                multi_port: get_flag(page.flags6, 4),
                enc_serv: get_flag(page.flags6, 6),
                cmd_que: get_flag(page.flags7, 1),
                vendor: scsi_ascii_to_string(&page.vendor),
                product: scsi_ascii_to_string(&page.product),
                revision: scsi_ascii_to_string(&page.revision),
            })
        })
        .map_err(|err: Error| format_err!("decode inquiry page failed - {}", err))
    }
}

/// Standard INQUIRY data including the T10000 vendor part
pub const T10000_INQUIRY_LEN: usize = 74;

const T10000_KEY_MGMT_OFFSET: usize = 54;
const T10000_FLAGS_OFFSET: usize = 55;

/// Vendor specific INQUIRY fields of Oracle T10000 drives
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct T10000InquiryData {
    /// Key management method, zero if encryption is disabled
    pub key_management: u8,
    pub csl: bool,
    /// Data compression
    pub dcmp: bool,
    pub vol_safe: bool,
    /// Library attached
    pub lib_att: bool,
    pub encryption: bool,
}

impl T10000InquiryData {
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        if data.len() <= T10000_FLAGS_OFFSET {
            bail!(
                "decode T10000 inquiry page failed - got too few data ({} < {})",
                data.len(),
                T10000_FLAGS_OFFSET + 1
            );
        }
        let flags = data[T10000_FLAGS_OFFSET];

        Ok(Self {
            key_management: data[T10000_KEY_MGMT_OFFSET],
            csl: get_flag(flags, 0),
            dcmp: get_flag(flags, 1),
            vol_safe: get_flag(flags, 2),
            lib_att: get_flag(flags, 3),
            encryption: get_flag(flags, 4),
        })
    }

    /// Encryption is enabled from the library if a key management
    /// method is set
    pub fn encryption_capable(&self) -> bool {
        self.key_management != 0
    }
}

/// Decode VPD page 80h (unit serial number)
///
/// The serial number is the first `page length` bytes after the 4 byte
/// header, without trailing padding.
pub fn decode_unit_serial_number(data: &[u8]) -> Result<String, Error> {
    proxmox_lang::try_block!({
        if data.len() < 4 {
            bail!("got too few data ({} < 4)", data.len());
        }
        if data[1] != vpd_page::UNIT_SERIAL_NUMBER {
            bail!("unexpected page code {:02x}h", data[1]);
        }
        let page_len = data[3] as usize;
        let serial = match data.get(4..4 + page_len) {
            Some(serial) => serial,
            None => bail!("page length {} exceeds data length {}", page_len, data.len()),
        };
        Ok(scsi_ascii_to_string(serial))
    })
    .map_err(|err: Error| format_err!("decode unit serial number page failed - {}", err))
}
