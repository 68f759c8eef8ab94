use std::str::FromStr;

use crate::error::GridError;
use crate::row::ROW_OVERLAP_THRESHOLD;

pub const DEFAULT_DELIMITER_OVERLAP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format '{other}', expected json or csv")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Share of the shorter row two rows must overlap by to merge.
    pub row_overlap: f64,
    /// Share of the shorter delimiter two delimiters must overlap by to group.
    pub delimiter_overlap: f64,
    pub min_delimiters: usize,
    pub min_rows: usize,
}

impl GridOptions {
    pub fn validate(&self) -> Result<(), GridError> {
        for (name, value) in [
            ("row_overlap", self.row_overlap),
            ("delimiter_overlap", self.delimiter_overlap),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(GridError::InvalidOption(format!(
                    "{name} must be within (0, 1], got {value}"
                )));
            }
        }

        if self.min_delimiters == 0 {
            return Err(GridError::InvalidOption(
                "min_delimiters must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row_overlap: ROW_OVERLAP_THRESHOLD,
            delimiter_overlap: DEFAULT_DELIMITER_OVERLAP,
            min_delimiters: 2,
            min_rows: 1,
        }
    }
}
