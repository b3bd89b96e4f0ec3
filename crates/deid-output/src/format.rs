use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported output file formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    /// Infers the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/hashed.XLSX")),
            Some(OutputFormat::Xlsx)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("hashed.csv")),
            Some(OutputFormat::Csv)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("hashed.json")),
            Some(OutputFormat::Json)
        );
        assert_eq!(OutputFormat::from_path(Path::new("hashed.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("hashed")), None);
    }
}
