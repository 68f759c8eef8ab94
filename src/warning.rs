use serde::Serialize;

use crate::geometry::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    MalformedCell,
    EmptyCandidate,
    TooFewDelimiters,
    TooFewRows,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridWarning {
    pub code: WarningCode,
    pub message: String,
    pub region: Option<Cell>,
    pub count: Option<usize>,
}

impl GridWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            region: None,
            count: None,
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: Cell) -> Self {
        self.region = Some(region);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}
