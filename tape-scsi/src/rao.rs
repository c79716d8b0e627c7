//! Recommended access order (RAO) wire format
//!
//! A set of user data segments (UDS, named ranges of logical objects)
//! is submitted with GENERATE RECOMMENDED ACCESS ORDER, the drive then
//! returns the same segments reordered by RECEIVE RECOMMENDED ACCESS
//! ORDER. The UDS name identifies a segment, the returned order never
//! matches the submitted one by position.

use std::collections::HashMap;

use anyhow::{bail, format_err, Error};
use serde::{Deserialize, Serialize};

use crate::codec::{get_bits, get_u16, get_u32, get_u64, put_u16, put_u32, put_u64};
use crate::constants::rao::{UDS_DESCRIPTOR_LEN, UDS_DESCRIPTOR_LENGTH_FIELD, UDS_NAME_LEN};

/// Size of the UDS limits page
pub const UDS_LIMITS_LEN: usize = 4;

const RAO_LIST_HEADER_LEN: usize = 8;
const GENERATE_PARAMS_HEADER_LEN: usize = 8;

/// RAO capabilities of the drive
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct UdsLimits {
    /// Maximum number of UDS descriptors per request, zero if RAO is not supported
    pub max_supported: u16,
    pub max_size: u16,
}

impl UdsLimits {
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        if data.len() < UDS_LIMITS_LEN {
            bail!(
                "decode UDS limits failed - got too few data ({} < {})",
                data.len(),
                UDS_LIMITS_LEN
            );
        }
        Ok(Self {
            max_supported: get_u16(data, 0),
            max_size: get_u16(data, 2),
        })
    }

    pub fn supports_rao(&self) -> bool {
        self.max_supported > 0
    }
}

/// A named range of logical objects on one partition
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RaoExtent {
    /// At most 10 bytes, unique within a request
    pub name: String,
    pub partition: u8,
    pub begin: u64,
    pub end: u64,
}

impl RaoExtent {
    pub fn new<S: Into<String>>(name: S, partition: u8, begin: u64, end: u64) -> Self {
        Self {
            name: name.into(),
            partition,
            begin,
            end,
        }
    }

    /// Append the 32 byte UDS descriptor
    pub fn encode_descriptor(&self, data: &mut Vec<u8>) -> Result<(), Error> {
        let name = self.name.as_bytes();
        if name.is_empty() || name.len() > UDS_NAME_LEN {
            bail!(
                "invalid UDS name '{}' (length must be 1 to {} bytes)",
                self.name,
                UDS_NAME_LEN
            );
        }
        if self.begin > self.end {
            bail!(
                "invalid UDS '{}' - begin {} is after end {}",
                self.name,
                self.begin,
                self.end
            );
        }

        let mut desc = [0u8; UDS_DESCRIPTOR_LEN];
        put_u16(&mut desc, 0, UDS_DESCRIPTOR_LENGTH_FIELD);
        desc[5..5 + name.len()].copy_from_slice(name);
        desc[15] = self.partition;
        put_u64(&mut desc, 16, self.begin);
        put_u64(&mut desc, 24, self.end);

        data.extend_from_slice(&desc);
        Ok(())
    }

    pub fn decode_descriptor(desc: &[u8]) -> Result<Self, Error> {
        if desc.len() < UDS_DESCRIPTOR_LEN {
            bail!("UDS descriptor too short ({} bytes)", desc.len());
        }
        let name = &desc[5..5 + UDS_NAME_LEN];
        let end = name.iter().position(|b| *b == 0).unwrap_or(UDS_NAME_LEN);
        let name = match std::str::from_utf8(&name[..end]) {
            Ok(name) => name.to_string(),
            Err(err) => bail!("invalid UDS name - {}", err),
        };

        Ok(Self {
            name,
            partition: desc[15],
            begin: get_u64(desc, 16),
            end: get_u64(desc, 24),
        })
    }
}

/// Build the GENERATE RECOMMENDED ACCESS ORDER parameter list
///
/// Only the first `max_supported` extents are sent.
pub fn encode_generate_rao_params(
    extents: &[RaoExtent],
    max_supported: u16,
) -> Result<Vec<u8>, Error> {
    proxmox_lang::try_block!({
        let count = extents.len().min(max_supported as usize);
        if count == 0 {
            bail!("no user data segments to submit");
        }

        let extents = &extents[..count];
        let mut names = std::collections::HashSet::new();
        for extent in extents {
            if !names.insert(extent.name.as_str()) {
                bail!("duplicate UDS name '{}'", extent.name);
            }
        }

        let mut data = vec![0u8; GENERATE_PARAMS_HEADER_LEN];
        put_u32(&mut data, 4, (count * UDS_DESCRIPTOR_LEN) as u32);
        for extent in extents {
            extent.encode_descriptor(&mut data)?;
        }

        Ok(data)
    })
    .map_err(|err: Error| format_err!("encode generate RAO parameters failed - {}", err))
}

/// Allocation length needed to receive `count` reordered descriptors
pub fn rao_list_allocation_length(count: usize) -> u32 {
    (RAO_LIST_HEADER_LEN + count * UDS_DESCRIPTOR_LEN) as u32
}

/// Decoded RECEIVE RECOMMENDED ACCESS ORDER response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RaoList {
    pub rao_process: u8,
    pub status: u8,
    pub descriptors: Vec<RaoExtent>,
}

impl RaoList {
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        proxmox_lang::try_block!({
            if data.len() < RAO_LIST_HEADER_LEN {
                bail!("got too few data ({} < {})", data.len(), RAO_LIST_HEADER_LEN);
            }
            let list_len = get_u32(data, 4) as usize;
            let count = list_len / UDS_DESCRIPTOR_LEN;

            let needed = RAO_LIST_HEADER_LEN + count * UDS_DESCRIPTOR_LEN;
            if needed > data.len() {
                bail!(
                    "descriptor list length {} exceeds data length {}",
                    list_len,
                    data.len()
                );
            }

            let descriptors = data[RAO_LIST_HEADER_LEN..needed]
                .chunks_exact(UDS_DESCRIPTOR_LEN)
                .map(RaoExtent::decode_descriptor)
                .collect::<Result<Vec<_>, Error>>()?;

            Ok(Self {
                rao_process: get_bits(data[0], 0, 3),
                status: get_bits(data[1], 0, 3),
                descriptors,
            })
        })
        .map_err(|err: Error| format_err!("decode RAO list failed - {}", err))
    }

    /// Return the requested extents in recommended order, matched by name
    pub fn reorder(&self, requested: &[RaoExtent]) -> Result<Vec<RaoExtent>, Error> {
        let by_name: HashMap<&str, &RaoExtent> = requested
            .iter()
            .map(|extent| (extent.name.as_str(), extent))
            .collect();

        self.descriptors
            .iter()
            .map(|desc| match by_name.get(desc.name.as_str()) {
                Some(extent) => Ok((*extent).clone()),
                None => Err(format_err!("drive returned unknown UDS name '{}'", desc.name)),
            })
            .collect()
    }
}

/// Extents in the order recommended by the drive
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RecommendedOrder {
    pub rao_process: u8,
    /// RAO status as reported by the drive
    pub status: u8,
    pub extents: Vec<RaoExtent>,
}
