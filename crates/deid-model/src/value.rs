//! Cell values and their canonical string rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A loosely typed spreadsheet cell.
///
/// Empty cells are not represented here; a row simply has no entry for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// Canonical string form used for hashing and header labels.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => format_number(*value),
            Self::Bool(flag) => flag.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Formats a number the way spreadsheet-to-JSON tooling stringifies it.
///
/// Integral values have no fractional part, and magnitudes outside
/// `[1e-6, 1e21)` switch to exponent form with an explicit sign (`1e+21`).
///
/// # Examples
///
/// ```
/// use deid_model::format_number;
///
/// assert_eq!(format_number(40.0), "40");
/// assert_eq!(format_number(1.5), "1.5");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(1.5e-7), "1.5e-7");
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
    if (1e-6..1e21).contains(&value.abs()) {
        return format!("{value}");
    }
    let exponent_form = format!("{value:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponent_form,
    }
}
