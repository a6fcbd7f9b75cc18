pub mod counties;

pub use counties::{CountyCodes, COUNTY_CODES};
use thiserror::Error;

/// Value written to `pctnum` for any row that could not be normalized.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Minimum number of digits in the numeric part of a `pctnum`.
const PRECINCT_WIDTH: usize = 4;

/// Why a row could not be given a `pctnum`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PctnumError {
    #[error("precinct code {0:?} is not a number")]
    UnparsablePrecinctCode(String),
    #[error("county {0:?} is not in the county code table")]
    UnknownCounty(String),
}

/// Drops `_` digit separators. An underscore is only allowed with a digit on
/// both sides (`"1_000"`); anywhere else the code is rejected.
fn strip_digit_separators(raw: &str) -> Option<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    for (i, &c) in chars.iter().enumerate() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
        let next_digit = chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if !(prev_digit && next_digit) {
            return None;
        }
    }
    Some(out)
}

/// Parses `"25"`, `" 25.0 "`, `"025.0"`, `"2.5e1"`, `"1_000"` ... and
/// truncates toward zero. NaN and infinities are rejected; there is no upper
/// bound on magnitude.
fn parse_precinct_number(raw: &str) -> Option<f64> {
    let value: f64 = strip_digit_separators(raw.trim())?.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc())
}

/// Zero-pads an integral value to [`PRECINCT_WIDTH`] characters, sign
/// included: `25` -> `"0025"`, `-5` -> `"-005"`, `1e19` -> all 20 digits.
fn format_precinct_number(number: f64) -> String {
    // `-0.0 < 0.0` is false, so a truncated -0.5 prints as "0000".
    let negative = number < 0.0;
    let digits = format!("{:.0}", number.abs());
    if negative {
        format!("-{:0>width$}", digits, width = PRECINCT_WIDTH - 1)
    } else {
        format!("{:0>width$}", digits, width = PRECINCT_WIDTH)
    }
}

/// Builds the composite precinct identifier, reporting which part failed.
///
/// The precinct code is checked before the county, so a row that fails both
/// ways is reported as [`PctnumError::UnparsablePrecinctCode`].
pub fn try_derive_pctnum(
    county_name: &str,
    precinct_code: &str,
    county_codes: &CountyCodes,
) -> Result<String, PctnumError> {
    let number = parse_precinct_number(precinct_code)
        .ok_or_else(|| PctnumError::UnparsablePrecinctCode(precinct_code.to_string()))?;

    let prefix = county_codes
        .get(county_name)
        .ok_or_else(|| PctnumError::UnknownCounty(county_name.to_string()))?;

    Ok(format!("{}{}", prefix, format_precinct_number(number)))
}

/// Like [`try_derive_pctnum`], but every failure becomes [`ERROR_SENTINEL`].
pub fn derive_pctnum(county_name: &str, precinct_code: &str, county_codes: &CountyCodes) -> String {
    try_derive_pctnum(county_name, precinct_code, county_codes)
        .unwrap_or_else(|_| ERROR_SENTINEL.to_string())
}
