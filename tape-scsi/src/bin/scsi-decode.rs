//! Decode SCSI tape diagnostics offline
//!
//! Renders sense buffers, ASC/ASCQ pairs and tape alert codes as text,
//! and runs the status checks for a given set of status channels. This
//! is useful to interpret values found in kernel or application logs.

use anyhow::{bail, format_err, Error};
use serde_json::{json, Value};

use proxmox_router::cli::*;
use proxmox_schema::{api, IntegerSchema, Schema, StringSchema};

use tape_scsi::{
    codec::hex_dump, get_asc_ascq_string, request_sense::RequestSenseData, tape_alert::TapeAlert,
    SenseData, StatusOutcome, TransportStatus,
};

pub const HEX_BUFFER_SCHEMA: Schema =
    StringSchema::new("Buffer as hex string (whitespace and ':' separators are ignored).")
        .min_length(2)
        .schema();

pub const BYTE_SCHEMA: Schema = IntegerSchema::new("Byte value.")
    .minimum(0)
    .maximum(0xff)
    .schema();

pub const STATUS_CODE_SCHEMA: Schema = IntegerSchema::new("Status channel value.")
    .minimum(0)
    .maximum(0xffff)
    .schema();

pub const TAPE_ALERT_CODE_SCHEMA: Schema = IntegerSchema::new("Tape alert code.")
    .minimum(0)
    .maximum(0xffff)
    .schema();

fn parse_hex_buffer(text: &str) -> Result<Vec<u8>, Error> {
    let text = text.trim();
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    let digits: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();

    hex::decode(&digits).map_err(|err| format_err!("unable to parse hex buffer - {}", err))
}

fn print_result(output_format: &str, result: Value, text: &str) -> Result<(), Error> {
    if output_format == "json-pretty" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if output_format == "json" {
        println!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }

    if output_format != "text" {
        bail!("unknown output format '{}'", output_format);
    }

    println!("{}", text);

    Ok(())
}

#[api(
   input: {
        properties: {
            sense: {
                schema: HEX_BUFFER_SCHEMA,
            },
            "output-format": {
                schema: OUTPUT_FORMAT,
                optional: true,
            },
        },
    },
)]
/// Decode a sense buffer
fn sense(sense: String, param: Value) -> Result<(), Error> {
    let output_format = get_output_format(&param);

    let data = parse_hex_buffer(&sense)?;
    log::debug!("sense buffer:\n{}", hex_dump(&data));

    let sense = SenseData::new(&data);
    let info = sense.sense_info()?;

    let format = if sense.is_fixed_format() {
        "fixed"
    } else {
        "descriptor"
    };

    let mut result = json!({
        "response-code": sense.response_code(),
        "format": format,
        "deferred": sense.is_deferred(),
        "sense-key": info.sense_key,
        "sense-key-text": sense.sense_key_string()?,
        "asc": info.asc,
        "ascq": info.ascq,
        "asc-text": info.additional_sense_text(),
    });

    let mut text = format!(
        "{} {} sense data\n{}",
        if sense.is_current() { "current" } else { "deferred" },
        format,
        info
    );

    if let Some((filemark, eom, ili)) = sense.fixed_flags() {
        result["filemark"] = filemark.into();
        result["eom"] = eom.into();
        result["ili"] = ili.into();
        text.push_str(&format!("\nfilemark: {}, eom: {}, ili: {}", filemark, eom, ili));
    }

    if let Some(information) = sense.information() {
        result["information"] = information.into();
        text.push_str(&format!("\ninformation: {:#x}", information));
    }

    // vendor part with the physical position (LTO)
    if sense.is_fixed_format() {
        if let Ok(request_sense) = RequestSenseData::decode(&data) {
            let position = request_sense.physical_position_info();
            result["physical-position"] = serde_json::to_value(position)?;
            text.push_str(&format!(
                "\nphysical wrap: {}, lpos: {}",
                position.wrap, position.lpos
            ));
        }
    }

    print_result(&output_format, result, &text)
}

#[api(
   input: {
        properties: {
            asc: {
                schema: BYTE_SCHEMA,
            },
            ascq: {
                schema: BYTE_SCHEMA,
            },
            "output-format": {
                schema: OUTPUT_FORMAT,
                optional: true,
            },
        },
    },
)]
/// Lookup the description of an additional sense code
fn asc(asc: u8, ascq: u8, param: Value) -> Result<(), Error> {
    let output_format = get_output_format(&param);

    let text = get_asc_ascq_string(asc, ascq);
    let result = json!({ "asc": asc, "ascq": ascq, "text": text });

    print_result(&output_format, result, &text)
}

#[api(
   input: {
        properties: {
            code: {
                schema: TAPE_ALERT_CODE_SCHEMA,
            },
            "output-format": {
                schema: OUTPUT_FORMAT,
                optional: true,
            },
        },
    },
)]
/// Describe a tape alert code
fn tape_alert(code: u16, param: Value) -> Result<(), Error> {
    let output_format = get_output_format(&param);

    let alert = TapeAlert::new(code);
    let text = format!(
        "{} ({}){}",
        alert.text,
        alert.compact,
        if alert.critical_for_write {
            ", critical for write"
        } else {
            ""
        }
    );

    print_result(&output_format, serde_json::to_value(&alert)?, &text)
}

#[api(
   input: {
        properties: {
            status: {
                schema: BYTE_SCHEMA,
                optional: true,
                default: 0,
            },
            "host-status": {
                schema: STATUS_CODE_SCHEMA,
                optional: true,
                default: 0,
            },
            "driver-status": {
                schema: STATUS_CODE_SCHEMA,
                optional: true,
                default: 0,
            },
            sense: {
                schema: HEX_BUFFER_SCHEMA,
                optional: true,
            },
            "output-format": {
                schema: OUTPUT_FORMAT,
                optional: true,
            },
        },
    },
)]
/// Run the status checks for the given status channels
fn status(
    status: u8,
    host_status: u16,
    driver_status: u16,
    sense: Option<String>,
    param: Value,
) -> Result<(), Error> {
    let output_format = get_output_format(&param);

    let sense = match sense {
        Some(sense) => parse_hex_buffer(&sense)?,
        None => Vec::new(),
    };

    let transport = TransportStatus {
        status,
        host_status,
        driver_status,
        sense_len: sense.len(),
        ..Default::default()
    };

    let outcome = StatusOutcome::new(&transport, &sense);

    let (result, text) = match outcome.check("") {
        Ok(()) => (json!({ "kind": "ok" }), String::from("OK")),
        Err(err) => (serde_json::to_value(err.summary())?, err.to_string()),
    };

    print_result(&output_format, result, &text)
}

fn main() -> Result<(), Error> {
    init_cli_logger("TAPE_SCSI_LOG", "info");

    let cmd_def = CliCommandMap::new()
        .usage_skip_options(&["output-format"])
        .insert("asc", CliCommand::new(&API_METHOD_ASC).arg_param(&["asc", "ascq"]))
        .insert("sense", CliCommand::new(&API_METHOD_SENSE).arg_param(&["sense"]))
        .insert("status", CliCommand::new(&API_METHOD_STATUS))
        .insert(
            "tape-alert",
            CliCommand::new(&API_METHOD_TAPE_ALERT).arg_param(&["code"]),
        );

    let rpcenv = CliEnvironment::new();

    run_cli_command(cmd_def, rpcenv, None);

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_hex_buffer() -> Result<(), Error> {
        assert_eq!(parse_hex_buffer("70 00 03")?, vec![0x70, 0x00, 0x03]);
        assert_eq!(parse_hex_buffer("0x7000:03")?, vec![0x70, 0x00, 0x03]);
        assert!(parse_hex_buffer("7").is_err());
        assert!(parse_hex_buffer("zz").is_err());
        Ok(())
    }
}
