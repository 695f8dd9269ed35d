//! Cell values and on-demand numeric coercion.
//!
//! Cells are stored as text. A cell is either `Text` (never the empty string)
//! or `Empty`; numbers only exist transiently while an operation compares or
//! aggregates them, so exported values round-trip exactly as they were
//! imported.
//!
//! # Examples
//!
//! ```
//! use datamanip::CellValue;
//!
//! let cell = CellValue::from("42.5 kg");
//! assert_eq!(cell.as_number(), Some(42.5));
//! assert!(CellValue::from("").is_missing());
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawCell", into = "String")]
pub enum CellValue {
    /// Non-empty text.
    Text(String),
    /// Missing value (empty string, null or absent).
    #[default]
    Empty,
}

impl CellValue {
    /// Build a cell from text; the empty string becomes `Empty`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    /// True for `Empty`.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The cell's text, `""` for `Empty`.
    pub fn as_str(&self) -> &str {
        match self {
            CellValue::Text(s) => s,
            CellValue::Empty => "",
        }
    }

    /// Parse the cell as a number, see [`parse_number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Text(s) => parse_number(s),
            CellValue::Empty => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::text(value)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map(CellValue::text).unwrap_or_default()
    }
}

impl From<CellValue> for String {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Text(s) => s,
            CellValue::Empty => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape accepted from import collaborators: spreadsheet readers hand
/// over numbers and booleans as well as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
}

impl From<RawCell> for CellValue {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Text(s) => CellValue::text(s),
            RawCell::Number(n) => match n.as_f64() {
                Some(f) if n.is_f64() => CellValue::text(format_number(f)),
                _ => CellValue::text(n.to_string()),
            },
            RawCell::Bool(b) => CellValue::text(b.to_string()),
            RawCell::Null => CellValue::Empty,
        }
    }
}

// ============================================================================
// Numeric coercion
// ============================================================================

/// Parse the longest numeric prefix of `text`.
///
/// Leading whitespace is skipped, then an optional sign, digits with an
/// optional fraction and exponent (or `Infinity`). Anything after the prefix
/// is ignored, so `"12abc"` parses as 12 while `"abc"` and `"."` do not parse.
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            end = j;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].trim_end_matches('.').parse::<f64>().ok()
}

/// Shortest decimal text for a number (`30`, `2.5`, `Infinity`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Decimal places a [`Decimal`] can carry.
const MAX_DECIMAL_SCALE: usize = 28;

/// Fixed-point text with `digits` decimals. Negative zero prints as zero.
///
/// Rounding works on the exact binary value and sends exact ties away from
/// zero, so `2.5` gives `"3"` and `0.125` gives `"0.13"`, while `1.005`
/// (stored just below the tie) gives `"1.00"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format_number(value);
    }
    let value = if value == 0.0 { 0.0 } else { value };
    if digits <= MAX_DECIMAL_SCALE {
        if let Some(exact) = Decimal::from_f64_retain(value) {
            let rounded = exact.round_dp_with_strategy(digits as u32, RoundingStrategy::MidpointAwayFromZero);
            return format!("{:.*}", digits, rounded);
        }
    }
    format!("{:.*}", digits, value)
}
