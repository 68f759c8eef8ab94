//! Axis-aligned rectangles in page pixel space.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A detected visual primitive: line segment, contour or text box.
///
/// Coordinates are taken as given. A cell with `x2 < x1` or `y2 < y1` is
/// representable and yields negative extents; see [`Cell::is_well_formed`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[must_use]
    pub fn width(&self) -> i64 {
        i64::from(self.x2) - i64::from(self.x1)
    }

    #[must_use]
    pub fn height(&self) -> i64 {
        i64::from(self.y2) - i64::from(self.y1)
    }

    #[must_use]
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Vertical overlap of both cells divided by the shorter height.
    ///
    /// `None` when either cell has zero or negative height. Disjoint cells
    /// give a negative ratio.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn vertical_overlap_ratio(&self, other: &Cell) -> Option<f64> {
        let shortest = self.height().min(other.height());
        if shortest <= 0 {
            return None;
        }
        let overlap = i64::from(self.y2.min(other.y2)) - i64::from(self.y1.max(other.y1));
        Some(overlap as f64 / shortest as f64)
    }

    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// True when `other` lies entirely inside `self`, edges included.
    #[must_use]
    pub const fn contains(&self, other: &Cell) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// Shared region of both cells. Touching edges produce a zero-area cell.
    #[must_use]
    pub fn intersection(&self, other: &Cell) -> Option<Cell> {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);
        (x1 <= x2 && y1 <= y2).then_some(Cell { x1, y1, x2, y2 })
    }

    #[must_use]
    pub fn union(&self, other: &Cell) -> Cell {
        Cell {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Bounding box of a set of cells, `None` for an empty set.
    #[must_use]
    pub fn enclosing<'a, I>(cells: I) -> Option<Cell>
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        cells.into_iter().copied().reduce(|acc, cell| acc.union(&cell))
    }
}

impl FromStr for Cell {
    type Err = GridError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parts = input.split(',').map(str::trim).collect::<Vec<_>>();
        if parts.len() != 4 {
            return Err(GridError::InvalidCell(format!(
                "'{input}': expected exactly 4 coordinates x1,y1,x2,y2"
            )));
        }

        let mut coords = [0_i32; 4];
        for (slot, (name, raw)) in coords
            .iter_mut()
            .zip(["x1", "y1", "x2", "y2"].into_iter().zip(parts))
        {
            *slot = raw.parse().map_err(|_| {
                GridError::InvalidCell(format!("invalid {name} coordinate: '{raw}'"))
            })?;
        }

        Ok(Cell::new(coords[0], coords[1], coords[2], coords[3]))
    }
}
