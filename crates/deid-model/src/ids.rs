#![deny(unsafe_code)]

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::ModelError;

const KEY_PREFIX: &str = "col";

/// Stable, position-derived column identifier.
///
/// Keys render as `col1`, `col2`, ... and order by position, so `col2 < col10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey(NonZeroU32);

impl ColumnKey {
    /// Key for a 0-based physical column index.
    pub fn from_index(index: usize) -> Self {
        let position = u32::try_from(index)
            .ok()
            .and_then(|idx| idx.checked_add(1))
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MAX);
        Self(position)
    }

    /// 1-based column position.
    pub fn position(self) -> u32 {
        self.0.get()
    }

    /// 0-based physical column index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidColumnKey(value.to_string());
        let digits = value.trim().strip_prefix(KEY_PREFIX).ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let position: u32 = digits.parse().map_err(|_| invalid())?;
        NonZeroU32::new(position).map(Self).ok_or_else(invalid)
    }
}

impl FromStr for ColumnKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEY_PREFIX}{}", self.0)
    }
}

impl serde::Serialize for ColumnKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ColumnKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
