//! Tape drive command layer
//!
//! `ScsiTape` builds the CDBs, hands them to a [`ScsiTransport`],
//! runs the status checks and decodes the returned data. The transport
//! is the only part that talks to the operating system (usually a SG_IO
//! ioctl on a `/dev/sgX` or `/dev/nstX` handle).

use std::time::Duration;

use anyhow::{bail, format_err, Error};
use serde::{Deserialize, Serialize};

use crate::cdb::{
    GenerateRaoCdb, InquiryCdb, Locate10Cdb, LogSelectCdb, LogSenseCdb, ModeSelect6Cdb,
    ModeSense6Cdb, ReadEndOfWrapPositionCdb, ReadPositionCdb, ReceiveRaoCdb, RequestSenseCdb,
    SpinCdb, SpoutCdb, TestUnitReadyCdb,
};
use crate::constants::{
    encryption, log_page, mode_page, page_control, rao, vpd_page, MAX_LTO_TAPE_WRAPS,
    MAX_SENSE_LEN, SCSI_DEFAULT_TIMEOUT,
};
use crate::encryption::{encode_set_data_encryption, is_encryption_capable};
use crate::inquiry::{
    decode_unit_serial_number, InquiryData, T10000InquiryData, T10000_INQUIRY_LEN,
};
use crate::log_page::{
    decode_block_bytes_transferred_page, decode_data_compression_page,
    decode_sequential_access_page, CompressionStats,
};
use crate::mode_page::{
    decode_mode_sense6, ControlDataProtectionModePage, DeviceConfigurationModePage, LbpInfo,
    ModeSense6Data,
};
use crate::position::{
    decode_end_of_wrap_positions, EndOfWrapPosition, PhysicalPositionInfo, PositionInfo,
    ReadPositionShort, READ_POSITION_SHORT_LEN,
};
use crate::rao::{
    encode_generate_rao_params, rao_list_allocation_length, RaoExtent, RaoList,
    RecommendedOrder, UdsLimits, UDS_LIMITS_LEN,
};
use crate::request_sense::{RequestSenseData, REQUEST_SENSE_POSITION_LEN};
use crate::status::{ScsiError, StatusOutcome, TransportStatus};
use crate::tape_alert::{
    decode_tape_alert_page, is_tape_alert_critical_for_write, tape_alert_to_compact_string,
    tape_alert_to_string,
};

/// Data phase of a SCSI command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataTransfer {
    None,
    /// Buffer to be filled by the device, its length is the allocation length
    FromDevice(Vec<u8>),
    ToDevice(Vec<u8>),
}

/// A single command as handed to the transport
#[derive(Debug, Clone)]
pub struct ScsiRequest {
    pub cdb: Vec<u8>,
    pub data: DataTransfer,
    pub sense: Vec<u8>,
    pub timeout: Duration,
}

impl ScsiRequest {
    pub fn new(cdb: &[u8], data: DataTransfer, timeout: Duration) -> Self {
        Self {
            cdb: cdb.to_vec(),
            data,
            sense: vec![0u8; MAX_SENSE_LEN],
            timeout,
        }
    }
}

/// Submits commands to a device
///
/// Implementations fill the data and sense buffers of the request and
/// return the three status channels. Errors are reserved for failures
/// to submit the command at all (bad handle, ioctl failure).
pub trait ScsiTransport {
    fn submit(&mut self, request: &mut ScsiRequest) -> Result<TransportStatus, Error>;
}

impl<T: ScsiTransport + ?Sized> ScsiTransport for &mut T {
    fn submit(&mut self, request: &mut ScsiRequest) -> Result<TransportStatus, Error> {
        (**self).submit(request)
    }
}

impl<T: ScsiTransport + ?Sized> ScsiTransport for Box<T> {
    fn submit(&mut self, request: &mut ScsiRequest) -> Result<TransportStatus, Error> {
        (**self).submit(request)
    }
}

/// Drive family, selects how compression statistics are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriveFamily {
    /// LTO (and SDLT), data compression page 32h
    Lto,
    /// IBM 3592, block bytes transferred page 38h
    Ibm3592,
    /// Oracle T10000, sequential access device page 0Ch, cannot be reset
    T10000,
}

const INQUIRY_ALLOCATION_LEN: u16 = 96;
const LOG_SENSE_ALLOCATION_LEN: u16 = 4096;

pub struct ScsiTape<T> {
    transport: T,
    timeout: Duration,
    family: DriveFamily,
    compression_base: CompressionStats,
    lbp: LbpInfo,
}

impl<T: ScsiTransport> ScsiTape<T> {
    pub fn new(transport: T, family: DriveFamily) -> Self {
        Self {
            transport,
            timeout: SCSI_DEFAULT_TIMEOUT,
            family,
            compression_base: CompressionStats::default(),
            lbp: LbpInfo::disabled(),
        }
    }

    /// Timeout handed to the transport for each command
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn family(&self) -> DriveFamily {
        self.family
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    fn execute(
        &mut self,
        context: &str,
        cdb: &[u8],
        data: DataTransfer,
    ) -> Result<Vec<u8>, ScsiError> {
        log::debug!("{}: submit CDB {}", context, hex::encode(cdb));

        let mut request = ScsiRequest::new(cdb, data, self.timeout);

        let status = self
            .transport
            .submit(&mut request)
            .map_err(|err| format_err!("{} failed - {}", context, err))?;

        let sense_len = status.sense_len.min(request.sense.len());
        let outcome = StatusOutcome::new(&status, &request.sense[..sense_len]);

        if let Err(err) = outcome.check(&format!("{} failed -", context)) {
            log::warn!("{}", err);
            return Err(err);
        }

        match request.data {
            DataTransfer::FromDevice(mut buffer) => {
                if status.resid > buffer.len() {
                    return Err(format_err!(
                        "{} failed - got strange resid (value too big)",
                        context
                    )
                    .into());
                }
                buffer.truncate(buffer.len() - status.resid);
                Ok(buffer)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Run a command which returns data, `len` is the allocation length
    pub fn do_in_command(
        &mut self,
        context: &str,
        cdb: &[u8],
        len: usize,
    ) -> Result<Vec<u8>, ScsiError> {
        self.execute(context, cdb, DataTransfer::FromDevice(vec![0u8; len]))
    }

    pub fn do_out_command(
        &mut self,
        context: &str,
        cdb: &[u8],
        data: Vec<u8>,
    ) -> Result<(), ScsiError> {
        self.execute(context, cdb, DataTransfer::ToDevice(data))?;
        Ok(())
    }

    pub fn do_command(&mut self, context: &str, cdb: &[u8]) -> Result<(), ScsiError> {
        self.execute(context, cdb, DataTransfer::None)?;
        Ok(())
    }

    pub fn inquiry(&mut self) -> Result<InquiryData, ScsiError> {
        let mut cdb = InquiryCdb::new();
        cdb.set_allocation_length(INQUIRY_ALLOCATION_LEN);

        let data = self.do_in_command("inquiry", cdb.as_bytes(), INQUIRY_ALLOCATION_LEN as usize)?;
        Ok(InquiryData::decode(&data)?)
    }

    /// Vendor assigned serial number (VPD page 80h)
    pub fn serial_number(&mut self) -> Result<String, ScsiError> {
        let mut cdb = InquiryCdb::new();
        cdb.set_evpd(true)
            .set_page_code(vpd_page::UNIT_SERIAL_NUMBER)
            .set_allocation_length(255);

        let data = self.do_in_command("read serial number", cdb.as_bytes(), 255)?;
        Ok(decode_unit_serial_number(&data)?)
    }

    pub fn test_unit_ready(&mut self) -> Result<(), ScsiError> {
        let cdb = TestUnitReadyCdb::new();
        self.do_command("test unit ready", cdb.as_bytes())
    }

    /// Position to a logical object in the current partition
    pub fn locate(&mut self, logical_object_id: u32) -> Result<(), ScsiError> {
        let mut cdb = Locate10Cdb::new();
        cdb.set_logical_object_id(logical_object_id);
        self.do_command("locate", cdb.as_bytes())
    }

    /// Position to a logical object in the given partition
    pub fn locate_partition(
        &mut self,
        partition: u8,
        logical_object_id: u32,
    ) -> Result<(), ScsiError> {
        let mut cdb = Locate10Cdb::new();
        cdb.set_cp(true)
            .set_partition(partition)
            .set_logical_object_id(logical_object_id);
        self.do_command("locate", cdb.as_bytes())
    }

    pub fn read_position(&mut self) -> Result<ReadPositionShort, ScsiError> {
        let mut cdb = ReadPositionCdb::new();
        // allocation length must stay zero for the short form
        cdb.set_service_action(ReadPositionCdb::SHORT_FORM)?;

        let data = self.do_in_command("read position", cdb.as_bytes(), READ_POSITION_SHORT_LEN)?;
        Ok(ReadPositionShort::decode(&data)?)
    }

    pub fn position_info(&mut self) -> Result<PositionInfo, ScsiError> {
        Ok(self.read_position()?.position_info()?)
    }

    /// Physical wrap and LPOS, taken from the vendor part of REQUEST SENSE
    pub fn physical_position_info(&mut self) -> Result<PhysicalPositionInfo, ScsiError> {
        let mut cdb = RequestSenseCdb::new();
        cdb.set_allocation_length(REQUEST_SENSE_POSITION_LEN as u8);

        let data = self.do_in_command(
            "request sense",
            cdb.as_bytes(),
            REQUEST_SENSE_POSITION_LEN,
        )?;
        Ok(RequestSenseData::decode(&data)?.physical_position_info())
    }

    /// End of wrap positions of all wraps (long form)
    pub fn end_of_wrap_positions(&mut self) -> Result<Vec<EndOfWrapPosition>, ScsiError> {
        let len = 4 + 12 * MAX_LTO_TAPE_WRAPS;

        let mut cdb = ReadEndOfWrapPositionCdb::new();
        cdb.set_wnv(false)
            .set_ra(true)
            .set_wrap_number(0)
            .set_allocation_length(len as u32);

        let data = self.do_in_command("read end of wrap position", cdb.as_bytes(), len)?;
        Ok(decode_end_of_wrap_positions(&data)?)
    }

    fn log_sense(&mut self, context: &str, page: u8) -> Result<Vec<u8>, ScsiError> {
        let mut cdb = LogSenseCdb::new();
        cdb.set_page_code(page)?
            .set_page_control(page_control::CUMULATIVE_VALUES)?;
        cdb.set_allocation_length(LOG_SENSE_ALLOCATION_LEN);

        self.do_in_command(context, cdb.as_bytes(), LOG_SENSE_ALLOCATION_LEN as usize)
    }

    fn log_select_reset(&mut self, context: &str, page: u8) -> Result<(), ScsiError> {
        let mut cdb = LogSelectCdb::new();
        cdb.set_pcr(true)
            .set_page_code(page)?
            .set_page_control(page_control::DEFAULT_CUMULATIVE_VALUES)?;

        self.do_command(context, cdb.as_bytes())
    }

    /// Active tape alert flags
    pub fn tape_alert_codes(&mut self) -> Result<Vec<u16>, ScsiError> {
        let data = self.log_sense("read tape alert flags", log_page::TAPE_ALERT)?;
        Ok(decode_tape_alert_page(&data)?)
    }

    pub fn tape_alerts(&self, codes: &[u16]) -> Vec<String> {
        codes.iter().map(|code| tape_alert_to_string(*code)).collect()
    }

    pub fn tape_alerts_compact(&self, codes: &[u16]) -> Vec<String> {
        codes
            .iter()
            .map(|code| tape_alert_to_compact_string(*code))
            .collect()
    }

    /// Returns true if one of the alerts prevents writing
    pub fn tape_alerts_critical_for_write(&self, codes: &[u16]) -> bool {
        codes
            .iter()
            .any(|code| is_tape_alert_critical_for_write(*code))
    }

    fn mode_sense6<P: endian_trait::Endian>(
        &mut self,
        context: &str,
        page_code: u8,
        subpage_code: u8,
        len: u8,
    ) -> Result<ModeSense6Data<P>, ScsiError> {
        let mut cdb = ModeSense6Cdb::new();
        cdb.set_page_code(page_code)?
            .set_subpage_code(subpage_code)
            .set_allocation_length(len);

        let data = self.do_in_command(context, cdb.as_bytes(), len as usize)?;
        Ok(decode_mode_sense6(&data)?)
    }

    fn mode_select6(&mut self, context: &str, data: Vec<u8>) -> Result<(), ScsiError> {
        let len = match u8::try_from(data.len()) {
            Ok(len) => len,
            Err(_) => return Err(format_err!("{} failed - parameters too long", context).into()),
        };

        let mut cdb = ModeSelect6Cdb::new();
        cdb.set_pf(true).set_param_list_length(len);

        self.do_out_command(context, cdb.as_bytes(), data)
    }

    /// Read the device configuration page (10h)
    pub fn device_configuration(
        &mut self,
    ) -> Result<ModeSense6Data<DeviceConfigurationModePage>, ScsiError> {
        let len = (4 + 8 + std::mem::size_of::<DeviceConfigurationModePage>()) as u8;
        let mode: ModeSense6Data<DeviceConfigurationModePage> = self.mode_sense6(
            "read device configuration",
            mode_page::DEVICE_CONFIGURATION,
            0,
            len,
        )?;
        mode.check_page()?;
        Ok(mode)
    }

    /// Current density code and compression state
    pub fn density_and_compression(&mut self) -> Result<(u8, bool), ScsiError> {
        let mode = self.device_configuration()?;
        Ok((
            mode.block_descriptor.density_code,
            mode.page.compression_enabled(),
        ))
    }

    /// Set compression and (if non zero) the density code
    pub fn set_density_and_compression(
        &mut self,
        compression: bool,
        density_code: u8,
    ) -> Result<(), ScsiError> {
        let mut mode = self.device_configuration()?;
        let data = mode.encode_density_and_compression(density_code, compression)?;
        self.mode_select6("set density and compression", data)
    }

    fn control_data_protection(
        &mut self,
    ) -> Result<ModeSense6Data<ControlDataProtectionModePage>, ScsiError> {
        let len = (4 + 8 + std::mem::size_of::<ControlDataProtectionModePage>()) as u8;
        let mode: ModeSense6Data<ControlDataProtectionModePage> = self.mode_sense6(
            "read control data protection",
            mode_page::CONTROL_DATA_PROTECTION,
            mode_page::CONTROL_DATA_PROTECTION_SUBPAGE,
            len,
        )?;
        mode.check_page()?;
        Ok(mode)
    }

    pub fn lbp_info(&mut self) -> Result<LbpInfo, ScsiError> {
        Ok(self.control_data_protection()?.page.lbp_info())
    }

    pub fn set_logical_block_protection(&mut self, info: LbpInfo) -> Result<(), ScsiError> {
        let mut mode = self.control_data_protection()?;
        let data = mode.encode_lbp(&info)?;
        self.mode_select6("set logical block protection", data)?;
        self.lbp = info;
        Ok(())
    }

    pub fn enable_crc32c_lbp_read_only(&mut self) -> Result<(), ScsiError> {
        self.set_logical_block_protection(LbpInfo::crc32c(false))
    }

    pub fn enable_crc32c_lbp_read_write(&mut self) -> Result<(), ScsiError> {
        self.set_logical_block_protection(LbpInfo::crc32c(true))
    }

    pub fn disable_logical_block_protection(&mut self) -> Result<(), ScsiError> {
        self.set_logical_block_protection(LbpInfo::disabled())
    }

    /// Protection mode last set through this handle
    pub fn lbp_in_use(&self) -> LbpInfo {
        self.lbp
    }

    fn raw_compression_stats(&mut self) -> Result<CompressionStats, ScsiError> {
        let context = "read compression statistics";
        let stats = match self.family {
            DriveFamily::Lto => {
                let data = self.log_sense(context, log_page::DATA_COMPRESSION_32H)?;
                decode_data_compression_page(&data)?
            }
            DriveFamily::Ibm3592 => {
                let data = self.log_sense(context, log_page::BLOCK_BYTES_TRANSFERRED)?;
                decode_block_bytes_transferred_page(&data)?
            }
            DriveFamily::T10000 => {
                let data = self.log_sense(context, log_page::SEQUENTIAL_ACCESS_DEVICE)?;
                decode_sequential_access_page(&data)?
            }
        };
        Ok(stats)
    }

    /// Byte counters since the last [`Self::clear_compression_stats`]
    pub fn compression_stats(&mut self) -> Result<CompressionStats, ScsiError> {
        let stats = self.raw_compression_stats()?;
        Ok(stats.since(&self.compression_base))
    }

    pub fn clear_compression_stats(&mut self) -> Result<(), ScsiError> {
        let context = "clear compression statistics";
        match self.family {
            DriveFamily::Lto => self.log_select_reset(context, log_page::DATA_COMPRESSION_32H),
            DriveFamily::Ibm3592 => {
                self.log_select_reset(context, log_page::BLOCK_BYTES_TRANSFERRED)
            }
            DriveFamily::T10000 => {
                // counters cannot be reset, remember a snapshot instead
                self.compression_base = self.raw_compression_stats()?;
                Ok(())
            }
        }
    }

    /// Check if encryption is enabled on the drive
    ///
    /// T10000 drives reject SPIN while encryption is disabled from the
    /// library, their capability is read from the vendor INQUIRY data.
    /// All other drives report it in the security protocol list.
    pub fn encryption_capable(&mut self) -> Result<bool, ScsiError> {
        match self.family {
            DriveFamily::T10000 => Ok(self.t10000_inquiry()?.encryption_capable()),
            DriveFamily::Lto | DriveFamily::Ibm3592 => self.security_protocol_encryption_capable(),
        }
    }

    /// Standard INQUIRY including the T10000 vendor part
    pub fn t10000_inquiry(&mut self) -> Result<T10000InquiryData, ScsiError> {
        let mut cdb = InquiryCdb::new();
        cdb.set_allocation_length(T10000_INQUIRY_LEN as u16);

        let data = self.do_in_command("read T10000 inquiry", cdb.as_bytes(), T10000_INQUIRY_LEN)?;
        Ok(T10000InquiryData::decode(&data)?)
    }

    // SPIN 00h
    fn security_protocol_encryption_capable(&mut self) -> Result<bool, ScsiError> {
        let len = 8 + 20;

        let mut cdb = SpinCdb::new();
        cdb.set_security_protocol(encryption::SECURITY_PROTOCOL_INFORMATION)
            .set_security_protocol_specific(0x0000)
            .set_allocation_length(len as u32);

        let data = self.do_in_command("read security protocol list", cdb.as_bytes(), len)?;
        Ok(is_encryption_capable(&data)?)
    }

    fn spout_set_data_encryption(&mut self, context: &str, key: Option<&[u8]>) -> Result<(), ScsiError> {
        let data = encode_set_data_encryption(key)?;

        let mut cdb = SpoutCdb::new();
        cdb.set_security_protocol(encryption::TAPE_DATA_ENCRYPTION)
            .set_security_protocol_specific(encryption::SET_DATA_ENCRYPTION_PAGE)
            .set_allocation_length(data.len() as u32);

        self.do_out_command(context, cdb.as_bytes(), data)
    }

    /// Load an encryption key, an empty key clears it
    pub fn set_encryption_key(&mut self, key: &[u8]) -> Result<(), ScsiError> {
        if !self.encryption_capable()? {
            return Err(format_err!(
                "set encryption key failed - drive has no encryption capabilities enabled"
            )
            .into());
        }
        if key.is_empty() {
            return self.spout_set_data_encryption("clear encryption key", None);
        }
        self.spout_set_data_encryption("set encryption key", Some(key))
    }

    /// Returns false if the drive is not encryption capable
    pub fn clear_encryption_key(&mut self) -> Result<bool, ScsiError> {
        if !self.encryption_capable()? {
            return Ok(false);
        }
        self.spout_set_data_encryption("clear encryption key", None)?;
        Ok(true)
    }

    /// RAO capabilities (maximum number and size of UDS)
    pub fn limit_uds(&mut self) -> Result<UdsLimits, ScsiError> {
        let mut cdb = ReceiveRaoCdb::new();
        cdb.set_uds_limits(true)
            .set_allocation_length(UDS_LIMITS_LEN as u32);

        let data = self.do_in_command("read UDS limits", cdb.as_bytes(), UDS_LIMITS_LEN)?;
        Ok(UdsLimits::decode(&data)?)
    }

    /// Submit up to `max_supported` extents for reordering
    pub fn generate_rao(
        &mut self,
        extents: &[RaoExtent],
        max_supported: u16,
    ) -> Result<(), ScsiError> {
        let data = encode_generate_rao_params(extents, max_supported)?;

        let mut cdb = GenerateRaoCdb::new();
        cdb.set_rao_process(rao::PROCESS_GENERATE)?
            .set_param_list_length(data.len() as u32);

        self.do_out_command("generate RAO", cdb.as_bytes(), data)
    }

    /// Fetch the recommended order of `count` previously submitted extents
    pub fn receive_rao(&mut self, count: usize) -> Result<RaoList, ScsiError> {
        let len = rao_list_allocation_length(count);

        let mut cdb = ReceiveRaoCdb::new();
        cdb.set_uds_limits(false).set_allocation_length(len);

        let data = self.do_in_command("receive RAO", cdb.as_bytes(), len as usize)?;
        Ok(RaoList::decode(&data)?)
    }

    /// Generate and receive the recommended order
    ///
    /// Returns the submitted extents (at most `max_supported`) in the
    /// order recommended by the drive, together with the RAO process
    /// and status codes of the response. A non-zero status is passed
    /// on unchanged, interpreting it is up to the caller.
    pub fn query_rao(
        &mut self,
        extents: &[RaoExtent],
        max_supported: u16,
    ) -> Result<RecommendedOrder, ScsiError> {
        if max_supported == 0 {
            return Err(format_err!("query RAO failed - drive does not support RAO").into());
        }
        let count = extents.len().min(max_supported as usize);

        self.generate_rao(extents, max_supported)?;
        let list = self.receive_rao(count)?;

        Ok(RecommendedOrder {
            rao_process: list.rao_process,
            status: list.status,
            extents: list.reorder(&extents[..count])?,
        })
    }
}

/// Check that a drive answers INQUIRY as a tape device
pub fn check_tape_device<T: ScsiTransport>(tape: &mut ScsiTape<T>) -> Result<InquiryData, Error> {
    let info = tape.inquiry()?;
    if info.peripheral_type != crate::constants::device_type::TAPE {
        bail!(
            "not a tape device (peripheral device type {})",
            info.peripheral_type_text
        );
    }
    Ok(info)
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;

    use super::*;
    use crate::constants::status;

    struct MockResponse {
        status: TransportStatus,
        data: Vec<u8>,
        sense: Vec<u8>,
    }

    #[derive(Default)]
    struct MockTransport {
        cdbs: Vec<Vec<u8>>,
        written: Vec<Vec<u8>>,
        timeouts: Vec<Duration>,
        responses: VecDeque<MockResponse>,
    }

    impl MockTransport {
        fn reply(&mut self, data: &[u8]) -> &mut Self {
            self.responses.push_back(MockResponse {
                status: TransportStatus::default(),
                data: data.to_vec(),
                sense: Vec::new(),
            });
            self
        }

        fn reply_check_condition(&mut self, sense: &[u8]) -> &mut Self {
            self.responses.push_back(MockResponse {
                status: TransportStatus {
                    status: status::CHECK_CONDITION,
                    ..Default::default()
                },
                data: Vec::new(),
                sense: sense.to_vec(),
            });
            self
        }

        fn reply_status(&mut self, status: TransportStatus) -> &mut Self {
            self.responses.push_back(MockResponse {
                status,
                data: Vec::new(),
                sense: Vec::new(),
            });
            self
        }
    }

    impl ScsiTransport for MockTransport {
        fn submit(&mut self, request: &mut ScsiRequest) -> Result<TransportStatus, Error> {
            self.cdbs.push(request.cdb.clone());
            self.timeouts.push(request.timeout);

            let response = match self.responses.pop_front() {
                Some(response) => response,
                None => bail!("no response queued"),
            };

            let mut status = response.status;
            match &mut request.data {
                DataTransfer::FromDevice(buffer) => {
                    let len = buffer.len().min(response.data.len());
                    buffer[..len].copy_from_slice(&response.data[..len]);
                    status.resid = buffer.len() - len;
                }
                DataTransfer::ToDevice(data) => self.written.push(data.clone()),
                DataTransfer::None => {}
            }

            request.sense[..response.sense.len()].copy_from_slice(&response.sense);
            status.sense_len = response.sense.len();

            Ok(status)
        }
    }

    fn fixed_sense(key: u8, asc: u8, ascq: u8) -> Vec<u8> {
        let mut sense = vec![0u8; 18];
        sense[0] = 0x70;
        sense[2] = key;
        sense[7] = 10;
        sense[12] = asc;
        sense[13] = ascq;
        sense
    }

    fn log_page(page: u8, params: &[(u16, &[u8])]) -> Vec<u8> {
        let mut data = vec![page, 0, 0, 0];
        for (code, value) in params {
            data.extend_from_slice(&code.to_be_bytes());
            data.push(0x00);
            data.push(value.len() as u8);
            data.extend_from_slice(value);
        }
        let len = (data.len() - 4) as u16;
        data[2..4].copy_from_slice(&len.to_be_bytes());
        data
    }

    #[test]
    fn test_inquiry() -> Result<(), Error> {
        let mut data = vec![0u8; 36];
        data[0] = 0x01;
        data[1] = 0x80;
        data[8..16].copy_from_slice(b"HP      ");
        data[16..32].copy_from_slice(b"Ultrium 8-SCSI  ");
        data[32..36].copy_from_slice(b"J4DB");

        let mut transport = MockTransport::default();
        transport.reply(&data);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let info = check_tape_device(&mut tape)?;
        assert_eq!(info.vendor, "HP");
        assert_eq!(info.product, "Ultrium 8-SCSI");

        assert_eq!(transport.cdbs[0], vec![0x12, 0x00, 0x00, 0x00, 0x60, 0x00]);
        assert_eq!(transport.timeouts[0], SCSI_DEFAULT_TIMEOUT);
        Ok(())
    }

    #[test]
    fn test_serial_number_and_timeout() -> Result<(), Error> {
        let mut data = vec![0x01, 0x80, 0x00, 0x0a];
        data.extend_from_slice(b"1013000255");

        let mut transport = MockTransport::default();
        transport.reply(&data);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        tape.set_timeout(Duration::from_secs(30));
        assert_eq!(tape.serial_number()?, "1013000255");

        assert_eq!(transport.cdbs[0], vec![0x12, 0x01, 0x80, 0x00, 0xff, 0x00]);
        assert_eq!(transport.timeouts[0], Duration::from_secs(30));
        Ok(())
    }

    #[test]
    fn test_not_ready() {
        let mut transport = MockTransport::default();
        transport.reply_check_condition(&fixed_sense(0x02, 0x3a, 0x00));

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let err = tape.test_unit_ready().unwrap_err();
        assert!(matches!(err, ScsiError::NotReady { .. }));
        let message = err.to_string();
        assert!(message.starts_with("test unit ready failed - "));
        assert!(message.contains("Medium not present"));
        assert_eq!(transport.cdbs[0], vec![0u8; 6]);
    }

    #[test]
    fn test_host_error() {
        let mut transport = MockTransport::default();
        transport.reply_status(TransportStatus {
            host_status: crate::constants::host_status::TIME_OUT,
            ..Default::default()
        });

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let err = tape.locate(0x1234).unwrap_err();
        assert!(matches!(err, ScsiError::Host { .. }));
        assert!(err.to_string().contains("TIME OUT"));
        assert_eq!(
            transport.cdbs[0],
            vec![0x2b, 0x00, 0x00, 0x00, 0x00, 0x12, 0x34, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_transport_failure() {
        let mut transport = MockTransport::default();
        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let err = tape.test_unit_ready().unwrap_err();
        assert!(matches!(err, ScsiError::Error(_)));
        assert!(err.to_string().contains("no response queued"));
    }

    #[test]
    fn test_position_info() -> Result<(), Error> {
        let mut data = vec![0u8; 20];
        data[0] = 0x80;
        data[4..8].copy_from_slice(&[0, 0, 0x01, 0x00]);
        data[8..12].copy_from_slice(&[0, 0, 0x00, 0xf0]);
        data[15] = 0x10;
        data[16..20].copy_from_slice(&[0, 0x10, 0, 0]);

        let mut transport = MockTransport::default();
        transport.reply(&data);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let info = tape.position_info()?;
        assert_eq!(info.current_position, 0x100);
        assert_eq!(info.oldest_dirty_object, 0xf0);
        assert_eq!(info.dirty_objects_count, 0x10);
        assert_eq!(info.dirty_bytes_count, 0x100000);
        assert_eq!(transport.cdbs[0][0], 0x34);
        assert_eq!(&transport.cdbs[0][1..10], &[0u8; 9]);
        Ok(())
    }

    #[test]
    fn test_short_transfer() {
        let mut transport = MockTransport::default();
        transport.reply(&[0u8; 12]);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let err = tape.position_info().unwrap_err();
        assert!(err.to_string().contains("got too few data"));
    }

    #[test]
    fn test_physical_position() -> Result<(), Error> {
        let mut data = fixed_sense(0, 0, 0);
        data.resize(34, 0);
        data[29] = 0x21;
        data[30..34].copy_from_slice(&[0x00, 0x00, 0x30, 0x39]);

        let mut transport = MockTransport::default();
        transport.reply(&data);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let pos = tape.physical_position_info()?;
        assert_eq!(pos.wrap, 0x21);
        assert_eq!(pos.lpos, 12345);
        assert_eq!(transport.cdbs[0], vec![0x03, 0, 0, 0, 34, 0]);
        Ok(())
    }

    #[test]
    fn test_end_of_wrap_positions() -> Result<(), Error> {
        let mut data = vec![0x00, 0x1a, 0x00, 0x00];
        for wrap in 0u16..2 {
            data.extend_from_slice(&wrap.to_be_bytes());
            data.extend_from_slice(&[0, 0, 0, 0]);
            data.extend_from_slice(&[0, 0, 0, 0, 0x10, wrap as u8]);
        }

        let mut transport = MockTransport::default();
        transport.reply(&data);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let list = tape.end_of_wrap_positions()?;
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].wrap_number, 1);
        assert_eq!(list[1].block_id, 0x1001);

        let cdb = &transport.cdbs[0];
        assert_eq!(&cdb[0..3], &[0xa3, 0x1f, 0x45]);
        assert_eq!(cdb[3], 0x02);
        assert_eq!(&cdb[6..10], &((4 + 12 * 280) as u32).to_be_bytes());
        Ok(())
    }

    #[test]
    fn test_tape_alerts() -> Result<(), Error> {
        let data = log_page(0x2e, &[(0x01, &[0]), (0x14, &[1]), (0x32, &[1])]);

        let mut transport = MockTransport::default();
        transport.reply(&data);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let codes = tape.tape_alert_codes()?;
        assert_eq!(codes, vec![0x14, 0x32]);
        assert_eq!(
            tape.tape_alerts(&codes),
            vec!["Cleaning required", "Lost statistics"]
        );
        assert_eq!(
            tape.tape_alerts_compact(&codes),
            vec!["tapeAlertCleaningRequired", "tapeAlertLostStatistics"]
        );
        assert!(tape.tape_alerts_critical_for_write(&codes));
        assert!(!tape.tape_alerts_critical_for_write(&[0x32]));

        // page code 2Eh, PC = 01b
        assert_eq!(transport.cdbs[0][2], 0x6e);
        Ok(())
    }

    #[test]
    fn test_density_and_compression() -> Result<(), Error> {
        let mut data = vec![0u8; 28];
        data[0] = 27;
        data[3] = 8;
        data[4] = 0x5a;
        data[12] = 0x10;
        data[13] = 0x0e;
        data[26] = 0x00;

        let mut transport = MockTransport::default();
        transport.reply(&data).reply(&[]);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        tape.set_density_and_compression(true, 0)?;

        assert_eq!(transport.cdbs[0], vec![0x1a, 0x00, 0x10, 0x00, 28, 0x00]);
        assert_eq!(transport.cdbs[1], vec![0x15, 0x10, 0x00, 0x00, 28, 0x00]);
        let written = &transport.written[0];
        assert_eq!(written.len(), 28);
        assert_eq!(written[0], 0);
        assert_eq!(written[4], 0x5a);
        assert_eq!(written[26], 1);
        Ok(())
    }

    #[test]
    fn test_logical_block_protection() -> Result<(), Error> {
        let mut data = vec![0u8; 44];
        data[0] = 43;
        data[3] = 8;
        data[12] = 0x8a;
        data[13] = 0xf0;
        data[15] = 0x1c;

        let mut transport = MockTransport::default();
        transport.reply(&data).reply(&[]);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        tape.enable_crc32c_lbp_read_write()?;
        assert_eq!(tape.lbp_in_use(), LbpInfo::crc32c(true));

        assert_eq!(transport.cdbs[0], vec![0x1a, 0x00, 0x0a, 0xf0, 44, 0x00]);
        assert_eq!(transport.cdbs[1][4], 44);
        let written = &transport.written[0];
        assert_eq!(written[12], 0x0a);
        assert_eq!(written[16], 0x02);
        assert_eq!(written[17], 0x04);
        assert_eq!(written[18], 0xc0);
        Ok(())
    }

    #[test]
    fn test_compression_stats_lto() -> Result<(), Error> {
        let data = log_page(0x32, &[(0x06, &[0x03]), (0x07, &[0x00, 0x10])]);

        let mut transport = MockTransport::default();
        transport.reply(&data).reply(&[]);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let stats = tape.compression_stats()?;
        assert_eq!(stats.from_host, 3_000_016);
        tape.clear_compression_stats()?;

        // LOG SELECT, PCR set, PC = 11b, page 32h
        assert_eq!(transport.cdbs[1][0], 0x4c);
        assert_eq!(transport.cdbs[1][1], 0x02);
        assert_eq!(transport.cdbs[1][2], 0xf2);
        Ok(())
    }

    #[test]
    fn test_compression_stats_t10000() -> Result<(), Error> {
        let first = log_page(0x0c, &[(0x00, &[0x00, 0x10, 0x00, 0x00])]);
        let second = log_page(0x0c, &[(0x00, &[0x00, 0x18, 0x00, 0x00])]);

        let mut transport = MockTransport::default();
        transport.reply(&first).reply(&second);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::T10000);
        tape.clear_compression_stats()?;
        let stats = tape.compression_stats()?;
        assert_eq!(stats.from_host, 0x080000);
        assert_eq!(transport.cdbs.len(), 2);
        assert!(transport.cdbs.iter().all(|cdb| cdb[0] == 0x4d));
        Ok(())
    }

    #[test]
    fn test_encryption() -> Result<(), Error> {
        let mut capable = vec![0u8; 10];
        capable[7] = 2;
        capable[9] = 0x20;

        let mut transport = MockTransport::default();
        transport.reply(&capable).reply(&[]);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Ibm3592);
        tape.set_encryption_key(b"0123456789abcdef")?;

        assert_eq!(transport.cdbs[0][0], 0xa2);
        assert_eq!(&transport.cdbs[1][0..4], &[0xb5, 0x20, 0x00, 0x10]);
        assert_eq!(&transport.cdbs[1][6..10], &[0, 0, 0, 52]);
        assert_eq!(&transport.written[0][20..36], b"0123456789abcdef");
        Ok(())
    }

    #[test]
    fn test_clear_encryption_with_empty_key() -> Result<(), Error> {
        let mut capable = vec![0u8; 10];
        capable[7] = 2;
        capable[9] = 0x20;

        let mut transport = MockTransport::default();
        transport.reply(&capable).reply(&[]);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        tape.set_encryption_key(b"")?;

        // a single capability check, then SPOUT
        assert_eq!(transport.cdbs.len(), 2);
        assert_eq!(transport.cdbs[0][0], 0xa2);
        assert_eq!(transport.cdbs[1][0], 0xb5);
        assert_eq!(transport.written[0][6], 0x00);
        assert_eq!(transport.written[0][7], 0x00);
        assert!(transport.written[0][20..].iter().all(|b| *b == 0));
        Ok(())
    }

    fn t10000_inquiry(key_management: u8) -> Vec<u8> {
        let mut data = vec![0u8; 74];
        data[0] = 0x01;
        data[8..16].copy_from_slice(b"STK     ");
        data[16..32].copy_from_slice(b"T10000D         ");
        data[54] = key_management;
        data
    }

    #[test]
    fn test_encryption_t10000() -> Result<(), Error> {
        let mut transport = MockTransport::default();
        transport
            .reply(&t10000_inquiry(0))
            .reply(&t10000_inquiry(0))
            .reply(&t10000_inquiry(0x01))
            .reply(&[]);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::T10000);
        assert!(!tape.clear_encryption_key()?);
        assert!(tape.set_encryption_key(b"key").is_err());
        tape.set_encryption_key(b"key")?;

        // capability is read with INQUIRY, never with SPIN
        assert_eq!(&transport.cdbs[0][..], &[0x12, 0x00, 0x00, 0x00, 74, 0x00]);
        assert!(transport.cdbs.iter().all(|cdb| cdb[0] != 0xa2));
        assert_eq!(transport.cdbs[3][0], 0xb5);
        assert_eq!(transport.written.len(), 1);
        assert_eq!(&transport.written[0][20..23], b"key");
        Ok(())
    }

    #[test]
    fn test_encryption_not_capable() -> Result<(), Error> {
        let mut not_capable = vec![0u8; 9];
        not_capable[7] = 1;

        let mut transport = MockTransport::default();
        transport.reply(&not_capable).reply(&not_capable);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        assert!(!tape.clear_encryption_key()?);
        assert!(tape.set_encryption_key(b"key").is_err());
        assert!(transport.written.is_empty());
        Ok(())
    }

    #[test]
    fn test_rao_not_supported() -> Result<(), Error> {
        let mut transport = MockTransport::default();
        transport.reply(&[0, 0, 0, 0]);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let limits = tape.limit_uds()?;
        assert!(!limits.supports_rao());
        assert!(tape.query_rao(&[RaoExtent::new("1", 0, 0, 1)], 0).is_err());

        let cdb = &transport.cdbs[0];
        assert_eq!(&cdb[0..2], &[0xa3, 0x9d]);
        assert_eq!(&cdb[6..10], &[0, 0, 0, 4]);
        Ok(())
    }

    #[test]
    fn test_query_rao_status() -> Result<(), Error> {
        let extents = vec![RaoExtent::new("x", 1, 5, 9), RaoExtent::new("y", 1, 1, 2)];

        let mut response = vec![0x02, 0x01, 0x00, 0x00];
        response.extend_from_slice(&64u32.to_be_bytes());
        extents[1].encode_descriptor(&mut response)?;
        extents[0].encode_descriptor(&mut response)?;

        let mut transport = MockTransport::default();
        transport.reply(&[]).reply(&response);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let order = tape.query_rao(&extents, 10)?;
        assert_eq!(order.status, 1);
        assert_eq!(order.rao_process, 2);
        assert_eq!(order.extents, vec![extents[1].clone(), extents[0].clone()]);
        Ok(())
    }

    #[test]
    fn test_rao_query_failure() {
        let mut transport = MockTransport::default();
        transport.reply_check_condition(&fixed_sense(0x05, 0x20, 0x00));

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let err = tape.limit_uds().unwrap_err();
        assert!(err.is_scsi_status_error());
        assert!(err.to_string().contains("Illegal Request"));
    }

    #[test]
    fn test_query_rao() -> Result<(), Error> {
        let extents = vec![
            RaoExtent::new("a", 0, 100, 200),
            RaoExtent::new("b", 0, 10, 20),
            RaoExtent::new("c", 0, 50, 60),
        ];

        let mut response = vec![0x02, 0x00, 0x00, 0x00];
        response.extend_from_slice(&64u32.to_be_bytes());
        extents[1].encode_descriptor(&mut response)?;
        extents[0].encode_descriptor(&mut response)?;

        let mut transport = MockTransport::default();
        transport.reply(&[]).reply(&response);

        let mut tape = ScsiTape::new(&mut transport, DriveFamily::Lto);
        let order = tape.query_rao(&extents, 2)?;
        assert_eq!(order.extents, vec![extents[1].clone(), extents[0].clone()]);
        assert_eq!(order.rao_process, 2);
        assert_eq!(order.status, 0);

        assert_eq!(&transport.cdbs[0][0..4], &[0xa4, 0x1d, 0x02, 0x00]);
        assert_eq!(&transport.cdbs[0][6..10], &[0, 0, 0, 72]);
        assert_eq!(transport.written[0].len(), 72);
        assert_eq!(&transport.cdbs[1][6..10], &[0, 0, 0, 72]);
        Ok(())
    }
}
