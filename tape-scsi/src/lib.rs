//! SCSI tape command codec
//!
//! This library builds command descriptor blocks for tape drives,
//! decodes their responses and sense data, and maps the status of a
//! completed command to success or a typed error. Submitting commands
//! to the device is left to a [`ScsiTransport`] implementation.

pub mod asc_table;
pub mod cdb;
pub mod codec;
pub mod constants;
pub mod encryption;
pub mod inquiry;
pub mod log_page;
pub mod mode_page;
pub mod position;
pub mod rao;
pub mod request_sense;
pub mod tape_alert;

mod sense;
pub use sense::*;

mod status;
pub use status::*;

mod drive;
pub use drive::*;

pub use asc_table::get_asc_ascq_string;
