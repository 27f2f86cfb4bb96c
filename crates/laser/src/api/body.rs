//! Parsing of the raw bodies sent to PUT endpoints.
//!
//! Clients send bare values, optionally wrapped in JSON quotes (`75.5` or `"75.5"`).
//! A body that is not UTF-8 is reported with the same message as malformed text.

use crate::error::{LaserError, LaserResult};
use std::num::IntErrorKind;

fn unquote<'a>(body: &'a [u8], format_message: &str) -> LaserResult<&'a str> {
    std::str::from_utf8(body)
        .map(|text| text.trim().trim_matches('"').trim())
        .map_err(|_| LaserError::invalid_parameter(format_message))
}

/// Integers beyond `i64` saturate so the caller's range check rejects them.
fn parse_int(body: &[u8], format_message: &str) -> LaserResult<i64> {
    match unquote(body, format_message)?.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(LaserError::invalid_parameter(format_message)),
        },
    }
}

pub fn parse_attenuator_percentage(body: &[u8]) -> LaserResult<f64> {
    let message = "Invalid attenuator percentage format";
    unquote(body, message)?
        .parse::<f64>()
        .map_err(|_| LaserError::invalid_parameter(message))
}

pub fn parse_pp_divider(body: &[u8]) -> LaserResult<i64> {
    parse_int(body, "Invalid PP divider format")
}

pub fn parse_preset_index(body: &[u8]) -> LaserResult<i64> {
    parse_int(body, "Invalid preset index format")
}

/// Accepts `true/1/yes/on` and `false/0/no/off`, case-insensitive.
pub fn parse_bool(body: &[u8]) -> LaserResult<bool> {
    let message = "Invalid boolean format";
    match unquote(body, message)?.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(LaserError::invalid_parameter(message)),
    }
}
