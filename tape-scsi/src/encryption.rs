//! Tape data encryption (SECURITY PROTOCOL IN/OUT)

use std::io::Write;

use anyhow::{bail, format_err, Error};
use endian_trait::Endian;

use proxmox_io::WriteExt;

use crate::codec::get_u16;
use crate::constants::encryption::*;

#[derive(Endian)]
#[repr(C, packed)]
struct SspSetDataEncryptionPage {
    page_code: u16,
    page_len: u16,
    scope_byte: u8,
    control_byte_5: u8,
    encryption_mode: u8,
    decryption_mode: u8,
    algorithm_index: u8,
    key_format: u8,
    kad_format: u8,
    reserved: [u8; 7],
    key_len: u16,
    /* key follows */
}

/// Size of the set data encryption parameter list (header + 256 bit key)
pub const SET_DATA_ENCRYPTION_PARAM_LEN: usize = 20 + ENC_KEY_LENGTH;

/// Build the SPOUT set data encryption page (0010h)
///
/// With a key, data is encrypted and mixed mode decryption is used.
/// Without key, both modes are disabled. Keys shorter than 32 bytes are
/// right padded with zeros, longer keys are truncated.
pub fn encode_set_data_encryption(key: Option<&[u8]>) -> Result<Vec<u8>, Error> {
    let (encryption_mode, decryption_mode) = match key {
        Some(_) => (ENCRYPTION_MODE_ENCRYPT, DECRYPTION_MODE_MIXED),
        None => (ENCRYPTION_MODE_DISABLE, DECRYPTION_MODE_DISABLE),
    };

    let page = SspSetDataEncryptionPage {
        page_code: SET_DATA_ENCRYPTION_PAGE,
        page_len: (SET_DATA_ENCRYPTION_PARAM_LEN - 4) as u16,
        scope_byte: SCOPE_LOCAL << 5, // local nexus scope, required by some vendors
        control_byte_5: 0,
        encryption_mode,
        decryption_mode,
        algorithm_index: 0x01,
        key_format: KEY_FORMAT_NORMAL,
        kad_format: 0,
        reserved: [0u8; 7],
        key_len: ENC_KEY_LENGTH as u16,
    };

    let mut key_data = [0u8; ENC_KEY_LENGTH];
    if let Some(key) = key {
        if key.is_empty() {
            bail!("got empty encryption key");
        }
        let len = key.len().min(ENC_KEY_LENGTH);
        key_data[..len].copy_from_slice(&key[..len]);
    }

    let mut data = Vec::with_capacity(SET_DATA_ENCRYPTION_PARAM_LEN);
    unsafe { data.write_be_value(page)? };
    data.write_all(&key_data)?;

    Ok(data)
}

/// Decode the SPIN security protocol information list (protocol 00h, page 0000h)
pub fn decode_supported_protocols(data: &[u8]) -> Result<Vec<u8>, Error> {
    proxmox_lang::try_block!({
        if data.len() < 8 {
            bail!("got too few data ({} < 8)", data.len());
        }
        let list_len = get_u16(data, 6) as usize;
        match data.get(8..8 + list_len) {
            Some(list) => Ok(list.to_vec()),
            None => bail!("protocol list length {} exceeds data length {}", list_len, data.len()),
        }
    })
    .map_err(|err: Error| format_err!("decode security protocol list failed - {}", err))
}

/// Encryption is usable if the drive reports more than the information
/// protocol (00h) in its list.
pub fn is_encryption_capable(data: &[u8]) -> Result<bool, Error> {
    if data.len() < 8 {
        bail!("decode security protocol list failed - got too few data ({} < 8)", data.len());
    }
    Ok(get_u16(data, 6) > 1)
}
