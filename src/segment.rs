use serde::{Deserialize, Serialize};

use crate::geometry::Cell;

/// Candidate page region for a borderless table.
///
/// Bounds are fixed at construction; elements are attached afterwards. A
/// segment without elements is unpopulated, which is distinct from a
/// populated segment that happens to contain no element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    elements: Option<Vec<Cell>>,
}

impl ImageSegment {
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            elements: None,
        }
    }

    #[must_use]
    pub const fn from_bounds(bounds: Cell) -> Self {
        Self::new(bounds.x1, bounds.y1, bounds.x2, bounds.y2)
    }

    #[must_use]
    pub fn with_elements(mut self, elements: Vec<Cell>) -> Self {
        self.set_elements(elements);
        self
    }

    #[must_use]
    pub const fn bounds(&self) -> Cell {
        Cell::new(self.x1, self.y1, self.x2, self.y2)
    }

    #[must_use]
    pub fn height(&self) -> i64 {
        self.bounds().height()
    }

    /// Attaches `elements`, replacing whatever was attached before.
    pub fn set_elements(&mut self, elements: Vec<Cell>) {
        self.elements = Some(elements);
    }

    /// Attaches the candidates lying inside the segment bounds, in input order.
    pub fn populate_from(&mut self, candidates: &[Cell]) {
        let bounds = self.bounds();
        let inside = candidates
            .iter()
            .filter(|cell| bounds.contains(cell))
            .copied()
            .collect();
        self.set_elements(inside);
    }

    #[must_use]
    pub fn elements(&self) -> Option<&[Cell]> {
        self.elements.as_deref()
    }

    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.elements.is_some()
    }
}
