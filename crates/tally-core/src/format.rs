//! # Display Formatting
//!
//! Conversions between `f64` and the text the calculator display holds.
//!
//! ## Canonical Form
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  value                       display                                    │
//! │  ─────                       ───────                                    │
//! │  20.0                        "20"            (no trailing ".0")         │
//! │  0.1 + 0.2                   "0.30000000000000004"  (shortest exact)    │
//! │  -0.0                        "0"                                        │
//! │  1e21                        "1e+21"         (exponent from 1e21 up)    │
//! │  0.0000001                   "1e-7"          (exponent below 1e-6)      │
//! │  NaN                         "NaN"                                      │
//! │  ±∞                          "Infinity" / "-Infinity"                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is the same rendering a browser gives `String(number)`, so a display
//! produced here reads identically in the web caller.

use crate::error::ValidationError;

/// Magnitude from which numbers switch to exponent notation.
const EXPONENT_UPPER: f64 = 1e21;

/// Magnitude below which non-zero numbers switch to exponent notation.
const EXPONENT_LOWER: f64 = 1e-6;

/// Renders a number in canonical display form.
///
/// ## Example
/// ```rust
/// use tally_core::format::format_number;
///
/// assert_eq!(format_number(20.0), "20");
/// assert_eq!(format_number(2.5), "2.5");
/// assert_eq!(format_number(f64::NAN), "NaN");
/// assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
/// assert_eq!(format_number(1e21), "1e+21");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER {
        // `{:e}` gives "1e21" / "1.5e-7"; positive exponents carry an explicit sign.
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        format!("{}", value)
    }
}

/// Renders a number with exactly two fractional digits, rounding half away
/// from zero at the cent.
///
/// ## Example
/// ```rust
/// use tally_core::format::format_fixed2;
///
/// assert_eq!(format_fixed2(180.0), "180.00");
/// assert_eq!(format_fixed2(108.25000000000001), "108.25");
/// assert_eq!(format_fixed2(0.125), "0.13");
/// ```
pub fn format_fixed2(value: f64) -> String {
    if !value.is_finite() {
        return format_number(value);
    }

    let cents = (value * 100.0).round();
    let rounded = cents / 100.0;
    // Avoid "-0.00" for tiny negatives.
    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Parses a display string into a number.
///
/// Accepts everything the display can hold: canonical literals, the
/// trailing-point editing state (`"3."`), exponent forms, `"NaN"` and
/// `"Infinity"`. Anything else (a lone `"-"`, an empty string) reads as 0 so
/// the engine never has to fail.
///
/// ## Example
/// ```rust
/// use tally_core::format::parse_display;
///
/// assert_eq!(parse_display("3."), 3.0);
/// assert_eq!(parse_display("1e+21"), 1e21);
/// assert!(parse_display("NaN").is_nan());
/// assert_eq!(parse_display("-"), 0.0);
/// ```
pub fn parse_display(display: &str) -> f64 {
    parse_literal(display).unwrap_or(0.0)
}

/// Strict form of [`parse_display`]: rejects text that is not a number.
pub fn parse_literal(text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    let invalid = || ValidationError::InvalidNumber {
        value: text.to_string(),
    };

    match trimmed {
        "NaN" => return Ok(f64::NAN),
        "Infinity" | "+Infinity" => return Ok(f64::INFINITY),
        "-Infinity" => return Ok(f64::NEG_INFINITY),
        _ => {}
    }

    // Rust's parser also takes "inf" and "nan"; the display never holds those.
    let has_letters = trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E');
    if trimmed.is_empty() || has_letters {
        return Err(invalid());
    }

    trimmed.parse::<f64>().map_err(|_| invalid())
}

/// Inserts `,` thousands separators into the integer part of a display
/// string. Non-numeric displays (`"NaN"`) and exponent forms are returned
/// unchanged.
///
/// ## Example
/// ```rust
/// use tally_core::format::group_thousands;
///
/// assert_eq!(group_thousands("1234567.891"), "1,234,567.891");
/// assert_eq!(group_thousands("-1000"), "-1,000");
/// assert_eq!(group_thousands("12."), "12.");
/// assert_eq!(group_thousands("NaN"), "NaN");
/// ```
pub fn group_thousands(display: &str) -> String {
    let (sign, unsigned) = match display.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", display),
    };

    let (int_part, frac_part) = match unsigned.find('.') {
        Some(pos) => unsigned.split_at(pos),
        None => (unsigned, ""),
    };

    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return display.to_string();
    }
    if frac_part.contains(['e', 'E']) {
        return display.to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}{}", sign, grouped, frac_part)
}

// =============================================================================
// Unit Tests
// =============================================================================
