//! Tabular data model for participant de-identification.
//!
//! - [`Column`] / [`ColumnKey`]: positional column identity plus display label
//! - [`CellValue`] / [`Row`] / [`Dataset`]: parsed sheet contents
//! - [`HashedRecord`]: one pseudonymised output row

pub mod error;
pub mod ids;
pub mod record;
pub mod table;
pub mod value;

pub use error::{ModelError, Result};
pub use ids::ColumnKey;
pub use record::HashedRecord;
pub use table::{Column, Dataset, Row};
pub use value::{CellValue, format_number};
