//! Tag grammar utilities shared by every layer of the engine
//!
//! Number formatting for tag parameters, literal pattern escaping, numeric
//! detection for parameter coercion and conversion of style-notation colours
//! (`&HAABBGGRR`) into override-tag notation (`&HBBGGRR&`, `&HAA&`).

pub mod errors;

pub use errors::{CoreError, Result};

use regex::Regex;
use std::sync::OnceLock;

/// Format a numeric tag parameter in its shortest textual form
///
/// Formats to three decimal places, then strips trailing zeros and a
/// trailing decimal point. Negative zero collapses to `0`.
///
/// # Example
///
/// ```rust
/// # use ass_sections_core::utils::format_number;
/// assert_eq!(format_number(2.5), "2.5");
/// assert_eq!(format_number(3.0), "3");
/// assert_eq!(format_number(1.2345), "1.234");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    let mut out = format!("{value:.3}");
    if out.contains('.') {
        let keep = out.trim_end_matches('0').trim_end_matches('.').len();
        out.truncate(keep);
    }
    if out == "-0" {
        out.replace_range(.., "0");
    }
    out
}

/// Escape pattern metacharacters so `text` matches literally
///
/// Arbitrary tag-parameter text (`(1,2)`, `&H00FF00&`, `m 0 0 l 10 10`) can
/// be dropped into a search pattern without being interpreted.
///
/// ```rust
/// # use ass_sections_core::utils::escape_pattern;
/// let pattern = regex::Regex::new(&escape_pattern("\\pos(1.5,2)")).unwrap();
/// assert!(pattern.is_match("{\\pos(1.5,2)}"));
/// assert!(!pattern.is_match("{\\pos(105,2)}"));
/// ```
#[must_use]
pub fn escape_pattern(text: &str) -> String {
    regex::escape(text)
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*[-+]?(?:\d+\.?\d*|\.\d+)\s*$").expect("numeric pattern is valid")
    })
}

/// Check whether a tag parameter should be coerced to a number
///
/// Accepts plain decimal notation only; exponents, `inf` and `NaN` stay text
/// because they never appear as tag parameters.
#[must_use]
pub fn looks_numeric(text: &str) -> bool {
    numeric_pattern().is_match(text)
}

/// Parse a tag parameter as a number when it looks numeric
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    if looks_numeric(text) {
        text.trim().parse().ok()
    } else {
        None
    }
}

/// Split a style colour into its alpha byte and `BBGGRR` part
///
/// Accepts `&HAABBGGRR`, `&HBBGGRR`, with or without a trailing `&`.
fn split_style_color(color_str: &str) -> Result<(u8, u32)> {
    let trimmed = color_str.trim();
    let hex_part = trimmed
        .strip_prefix("&H")
        .or_else(|| trimmed.strip_prefix("&h"))
        .map_or(trimmed, |rest| rest.strip_suffix('&').unwrap_or(rest));

    if hex_part.is_empty() || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoreError::InvalidColor(color_str.to_string()));
    }

    let value = u32::from_str_radix(hex_part, 16)
        .map_err(|_| CoreError::InvalidColor(color_str.to_string()))?;

    match hex_part.len() {
        1..=6 => Ok((0, value)),
        7 | 8 => Ok(((value >> 24) as u8, value & 0x00FF_FFFF)),
        _ => Err(CoreError::InvalidColor(color_str.to_string())),
    }
}

/// Convert a style colour to override-tag colour notation
///
/// ```rust
/// # use ass_sections_core::utils::color_from_style;
/// assert_eq!(color_from_style("&H80FF8800").unwrap(), "&HFF8800&");
/// ```
///
/// # Errors
///
/// Returns [`CoreError::InvalidColor`] when the value is not hexadecimal.
pub fn color_from_style(color_str: &str) -> Result<String> {
    let (_, bgr) = split_style_color(color_str)?;
    Ok(format!("&H{bgr:06X}&"))
}

/// Extract the alpha byte of a style colour in override-tag notation
///
/// ```rust
/// # use ass_sections_core::utils::alpha_from_style;
/// assert_eq!(alpha_from_style("&H80FF8800").unwrap(), "&H80&");
/// ```
///
/// # Errors
///
/// Returns [`CoreError::InvalidColor`] when the value is not hexadecimal.
pub fn alpha_from_style(color_str: &str) -> Result<String> {
    let (alpha, _) = split_style_color(color_str)?;
    Ok(format!("&H{alpha:02X}&"))
}
