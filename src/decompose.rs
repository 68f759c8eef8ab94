//! Merged-cell spans from grid placements.
//!
//! Every distinct cell gets its occupied coordinates covered by rectangles
//! extracted greedily: seed at the smallest remaining coordinate in row-major
//! order, extend right along the seed row, then extend down while the whole
//! column run is present. Downstream grid reconstruction depends on these
//! exact boundaries, so the seed and extension order are fixed.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::CellPosition;

/// Inclusive, 0-indexed rectangle on the table grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpan {
    pub col_start: usize,
    pub row_start: usize,
    pub col_end: usize,
    pub row_end: usize,
}

impl GridSpan {
    /// `(col_start, row_start, col_end, row_end)`.
    #[must_use]
    pub const fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.col_start, self.row_start, self.col_end, self.row_end)
    }

    #[must_use]
    pub const fn row_span(&self) -> usize {
        self.row_end - self.row_start + 1
    }

    #[must_use]
    pub const fn col_span(&self) -> usize {
        self.col_end - self.col_start + 1
    }

    #[must_use]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        self.row_start <= row && row <= self.row_end && self.col_start <= col && col <= self.col_end
    }

    /// Covered `(row, col)` coordinates in row-major order.
    pub fn coordinates(self) -> impl Iterator<Item = (usize, usize)> {
        let (cols, rows) = (self.col_start..=self.col_end, self.row_start..=self.row_end);
        rows.flat_map(move |row| cols.clone().map(move |col| (row, col)))
    }
}

/// A rectangle together with the cell it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpan<C> {
    pub cell: C,
    pub span: GridSpan,
}

fn next_index(index: usize) -> Option<usize> {
    index.checked_add(1)
}

/// Covers `occupied` `(row, col)` coordinates with disjoint rectangles.
#[must_use]
pub fn decompose_coordinates(mut occupied: BTreeSet<(usize, usize)>) -> Vec<GridSpan> {
    let mut spans = Vec::new();

    while let Some(&(row_start, col_start)) = occupied.first() {
        let mut col_end = col_start;
        while let Some(next) = next_index(col_end).filter(|&c| occupied.contains(&(row_start, c))) {
            col_end = next;
        }

        let mut row_end = row_start;
        while let Some(next) = next_index(row_end)
            .filter(|&r| (col_start..=col_end).all(|c| occupied.contains(&(r, c))))
        {
            row_end = next;
        }

        let span = GridSpan {
            col_start,
            row_start,
            col_end,
            row_end,
        };
        for coordinate in span.coordinates() {
            occupied.remove(&coordinate);
        }
        spans.push(span);
    }

    spans
}

fn partition_by_cell<C>(positions: &[CellPosition<C>]) -> Vec<(&C, BTreeSet<(usize, usize)>)>
where
    C: Eq + Hash,
{
    let mut slot_of: HashMap<&C, usize> = HashMap::new();
    let mut groups: Vec<(&C, BTreeSet<(usize, usize)>)> = Vec::new();

    for position in positions {
        let slot = *slot_of.entry(&position.cell).or_insert_with(|| {
            groups.push((&position.cell, BTreeSet::new()));
            groups.len() - 1
        });
        groups[slot].1.insert((position.row, position.col));
    }

    groups
}

/// Rectangles for every distinct cell, cells in order of first appearance.
#[must_use]
pub fn cell_spans<C>(positions: &[CellPosition<C>]) -> Vec<CellSpan<C>>
where
    C: Clone + Eq + Hash,
{
    let partitions = partition_by_cell(positions);
    let cells = partitions.len();

    let spans = partitions
        .into_iter()
        .flat_map(|(cell, occupied)| {
            decompose_coordinates(occupied)
                .into_iter()
                .map(move |span| CellSpan {
                    cell: cell.clone(),
                    span,
                })
        })
        .collect::<Vec<_>>();

    debug!(
        positions = positions.len(),
        cells,
        spans = spans.len(),
        "decomposed cell positions"
    );
    spans
}

/// The ordered rectangle sequence for a table's placements.
#[must_use]
pub fn create_all_rectangles<C>(positions: &[CellPosition<C>]) -> Vec<GridSpan>
where
    C: Clone + Eq + Hash,
{
    cell_spans(positions)
        .into_iter()
        .map(|cell_span| cell_span.span)
        .collect()
}
