//! Conversion between raw counts and the platform's abbreviated display strings.
//!
//! Bilibili renders large counts with Chinese magnitude units: `1.2万+` is
//! twelve thousand, `1.5亿+` is one hundred and fifty million. The live-count
//! endpoint hands these strings out directly, while the statistics endpoint
//! returns raw integers that have to be rendered the same way.

use serde_json::Value;

use crate::error::CountError;

const WAN: u64 = 10_000;
const YI: u64 = 100_000_000;

const WAN_SUFFIX: &str = "万+";
const YI_SUFFIX: &str = "亿+";
// Older thousands marker, e.g. "5000+". The encoder never produces it.
const THOUSANDS_SUFFIX: &str = "000+";

/// Parses a display string such as `"1.2万+"`, `"5000+"` or `"123"` into its count.
///
/// Fractional bases are scaled with integer arithmetic, digits below the unit
/// resolution are truncated.
pub fn decode(display: &str) -> Result<u64, CountError> {
    let s = display.trim();
    let invalid = || CountError::InvalidDisplay(display.to_string());

    if let Some(base) = s.strip_suffix(WAN_SUFFIX) {
        return scale_decimal(base, WAN).ok_or_else(invalid);
    }
    if let Some(base) = s.strip_suffix(YI_SUFFIX) {
        return scale_decimal(base, YI).ok_or_else(invalid);
    }
    if let Some(head) = s.strip_suffix(THOUSANDS_SUFFIX) {
        return format!("{head}000").parse().map_err(|_| invalid());
    }
    s.parse().map_err(|_| invalid())
}

/// Renders a raw count the way the platform displays it.
pub fn encode(value: u64) -> String {
    if value < WAN {
        value.to_string()
    } else {
        format_scaled(value as f64)
    }
}

/// Like [`encode`] but for fractional input. Values below ten thousand are
/// truncated to an integer.
pub fn encode_float(value: f64) -> Result<String, CountError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CountError::OutOfRange(value));
    }
    if value < WAN as f64 {
        return Ok((value.trunc() as u64).to_string());
    }
    Ok(format_scaled(value))
}

/// Renders a JSON value holding a count. Anything that is not a JSON number is
/// rejected with [`CountError::NotNumeric`].
pub fn encode_value(value: &Value) -> Result<String, CountError> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(v) => Ok(encode(v)),
            None => encode_float(n.as_f64().unwrap_or(f64::NAN)),
        },
        other => Err(CountError::NotNumeric(other.to_string())),
    }
}

fn format_scaled(value: f64) -> String {
    if value < YI as f64 {
        with_unit(value / WAN as f64, WAN_SUFFIX)
    } else {
        with_unit(value / YI as f64, YI_SUFFIX)
    }
}

fn with_unit(quotient: f64, suffix: &str) -> String {
    if quotient.fract() == 0.0 {
        format!("{}{suffix}", quotient as u64)
    } else {
        format!("{quotient:.1}{suffix}")
    }
}

fn scale_decimal(base: &str, unit: u64) -> Option<u64> {
    let (whole, frac) = base.split_once('.').unwrap_or((base, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole = if whole.is_empty() { 0 } else { whole.parse::<u64>().ok()? };
    let mut value = whole.checked_mul(unit)?;
    let mut place = unit;
    for digit in frac.bytes() {
        place /= 10;
        if place == 0 {
            break;
        }
        value = value.checked_add(u64::from(digit - b'0') * place)?;
    }
    Some(value)
}
