use serde::{Deserialize, Serialize};

use crate::geometry::Cell;

/// Content cell placed on the grid, with whatever the OCR stage attached.
///
/// `value` and `confidence` are carried through untouched; only `bbox` has
/// geometric meaning here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableCell {
    pub bbox: Cell,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub confidence: Option<u8>,
}

impl TableCell {
    #[must_use]
    pub fn new(bbox: Cell) -> Self {
        Self {
            bbox,
            value: None,
            confidence: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// One grid coordinate occupied by `cell`.
///
/// A cell spanning several rows or columns shows up once per occupied slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition<C = TableCell> {
    pub cell: C,
    pub row: usize,
    pub col: usize,
}

impl<C> CellPosition<C> {
    #[must_use]
    pub const fn new(cell: C, row: usize, col: usize) -> Self {
        Self { cell, row, col }
    }
}
