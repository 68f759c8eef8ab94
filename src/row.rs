use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::GridError;
use crate::geometry::Cell;

/// Minimum share of the shorter row's height two rows must overlap by.
pub const ROW_OVERLAP_THRESHOLD: f64 = 0.33;

/// Cells judged to sit on the same horizontal band.
///
/// Equality compares member cells as sets; hashing only looks at the bounding
/// box, which equal rows always share.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    cells: Vec<Cell>,
}

impl TableRow {
    pub fn new(cells: Vec<Cell>) -> Result<Self, GridError> {
        if cells.is_empty() {
            return Err(GridError::EmptyRow);
        }
        Ok(Self { cells })
    }

    #[must_use]
    pub fn from_cell(cell: Cell) -> Self {
        Self { cells: vec![cell] }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn x1(&self) -> i32 {
        self.cells.iter().map(|c| c.x1).min().unwrap_or_default()
    }

    #[must_use]
    pub fn y1(&self) -> i32 {
        self.cells.iter().map(|c| c.y1).min().unwrap_or_default()
    }

    #[must_use]
    pub fn x2(&self) -> i32 {
        self.cells.iter().map(|c| c.x2).max().unwrap_or_default()
    }

    #[must_use]
    pub fn y2(&self) -> i32 {
        self.cells.iter().map(|c| c.y2).max().unwrap_or_default()
    }

    #[must_use]
    pub fn bbox(&self) -> Cell {
        Cell::new(self.x1(), self.y1(), self.x2(), self.y2())
    }

    #[must_use]
    pub fn v_center(&self) -> f64 {
        (f64::from(self.y1()) + f64::from(self.y2())) / 2.0
    }

    #[must_use]
    pub fn height(&self) -> i64 {
        self.bbox().height()
    }

    /// Vertical overlap divided by the shorter height.
    ///
    /// `None` when either row has zero or negative height; such pairs never overlap.
    #[must_use]
    pub fn overlap_ratio(&self, other: &TableRow) -> Option<f64> {
        self.bbox().vertical_overlap_ratio(&other.bbox())
    }

    #[must_use]
    pub fn overlaps(&self, other: &TableRow) -> bool {
        self.overlaps_with(other, ROW_OVERLAP_THRESHOLD)
    }

    #[must_use]
    pub fn overlaps_with(&self, other: &TableRow, threshold: f64) -> bool {
        self.overlap_ratio(other).is_some_and(|ratio| ratio >= threshold)
    }

    /// New row holding the cells of both rows, duplicates included.
    #[must_use]
    pub fn merge(&self, other: &TableRow) -> TableRow {
        let mut cells = Vec::with_capacity(self.cells.len() + other.cells.len());
        cells.extend_from_slice(&self.cells);
        cells.extend_from_slice(&other.cells);
        TableRow { cells }
    }
}

impl PartialEq for TableRow {
    fn eq(&self, other: &Self) -> bool {
        self.cells.iter().collect::<BTreeSet<_>>() == other.cells.iter().collect::<BTreeSet<_>>()
    }
}

impl Eq for TableRow {}

impl Hash for TableRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.x1(), self.y1(), self.x2(), self.y2()).hash(state);
    }
}

fn bands_overlap(a: &Cell, b: &Cell, threshold: f64) -> bool {
    a.vertical_overlap_ratio(b).is_some_and(|ratio| ratio >= threshold)
}

fn first_overlapping_pair(bands: &[Cell], threshold: f64) -> Option<(usize, usize)> {
    bands.iter().enumerate().find_map(|(i, a)| {
        bands
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(_, b)| bands_overlap(a, b, threshold))
            .map(|(j, _)| (i, j))
    })
}

/// Merges overlapping rows until no pair overlaps at `threshold`.
///
/// Each pass merges the first overlapping pair `(i, j)` into slot `i` and
/// drops slot `j`. Merged bands are compared through their grown bounding box.
/// Rows that never merge keep their relative order.
///
/// Bounding boxes are cached per band, but every merge rescans from the first
/// band, so the worst case is cubic in the number of input rows.
#[must_use]
pub fn cluster_rows(mut rows: Vec<TableRow>, threshold: f64) -> Vec<TableRow> {
    let initial = rows.len();
    let mut bands = rows.iter().map(TableRow::bbox).collect::<Vec<_>>();
    while let Some((i, j)) = first_overlapping_pair(&bands, threshold) {
        let absorbed = rows.remove(j);
        let absorbed_band = bands.remove(j);
        trace!(into = ?bands[i], from = ?absorbed_band, "merging rows");
        rows[i] = rows[i].merge(&absorbed);
        bands[i] = bands[i].union(&absorbed_band);
    }
    debug!(initial, clustered = rows.len(), "clustered rows");
    rows
}

/// Clusters individual elements into row bands, one seed row per element.
#[must_use]
pub fn cluster_elements(elements: &[Cell], threshold: f64) -> Vec<TableRow> {
    let seeds = elements.iter().copied().map(TableRow::from_cell).collect();
    cluster_rows(seeds, threshold)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{ROW_OVERLAP_THRESHOLD, TableRow, cluster_elements, cluster_rows};
    use crate::error::GridError;
    use crate::geometry::Cell;

    fn row(cells: &[Cell]) -> TableRow {
        TableRow::new(cells.to_vec()).expect("row should have cells")
    }

    #[test]
    fn rejects_empty_row() {
        assert!(matches!(TableRow::new(Vec::new()), Err(GridError::EmptyRow)));
    }

    #[test]
    fn bbox_and_center_follow_members() {
        let r = row(&[Cell::new(10, 5, 40, 25), Cell::new(50, 0, 90, 20)]);
        assert_eq!(r.bbox(), Cell::new(10, 0, 90, 25));
        assert_eq!(r.height(), 25);
        assert!((r.v_center() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn overlap_is_symmetric() {
        let pairs = [
            (Cell::new(0, 0, 10, 10), Cell::new(0, 7, 10, 40)),
            (Cell::new(0, 0, 10, 30), Cell::new(0, 20, 10, 25)),
            (Cell::new(0, 0, 10, 10), Cell::new(0, 50, 10, 60)),
            (Cell::new(0, 0, 10, 9), Cell::new(0, 6, 10, 15)),
        ];
        for (a, b) in pairs {
            let (ra, rb) = (TableRow::from_cell(a), TableRow::from_cell(b));
            assert_eq!(ra.overlaps(&rb), rb.overlaps(&ra), "pair {a:?} / {b:?}");
        }
    }

    #[test]
    fn overlap_threshold_is_inclusive() {
        let a = TableRow::from_cell(Cell::new(0, 0, 10, 100));
        let exact = TableRow::from_cell(Cell::new(0, 67, 10, 200));
        let short = TableRow::from_cell(Cell::new(0, 68, 10, 200));

        assert!(a.overlaps(&exact));
        assert!(!a.overlaps(&short));
    }

    #[test]
    fn zero_height_rows_never_overlap() {
        let flat = TableRow::from_cell(Cell::new(0, 10, 50, 10));
        let tall = TableRow::from_cell(Cell::new(0, 0, 50, 20));

        assert_eq!(flat.overlap_ratio(&tall), None);
        assert!(!flat.overlaps(&tall));
        assert!(!tall.overlaps(&flat));
        assert!(!flat.overlaps(&flat));
    }

    #[test]
    fn merge_concatenates_without_dedup() {
        let shared = Cell::new(0, 0, 10, 10);
        let a = row(&[shared, Cell::new(20, 0, 30, 10)]);
        let b = row(&[shared]);

        let merged = a.merge(&b);
        assert_eq!(merged.len(), a.len() + b.len());
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn equality_ignores_order_and_hash_uses_bbox() {
        let cells = [Cell::new(0, 0, 10, 10), Cell::new(20, 2, 30, 12)];
        let a = row(&cells);
        let b = row(&[cells[1], cells[0]]);
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clusters_elements_into_bands() {
        let elements = [
            Cell::new(0, 0, 50, 10),
            Cell::new(100, 40, 150, 50),
            Cell::new(60, 2, 90, 11),
            Cell::new(160, 41, 200, 52),
            Cell::new(0, 80, 40, 90),
        ];

        let rows = cluster_elements(&elements, ROW_OVERLAP_THRESHOLD);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], row(&[elements[0], elements[2]]));
        assert_eq!(rows[1], row(&[elements[1], elements[3]]));
        assert_eq!(rows[2], row(&[elements[4]]));
    }

    #[test]
    fn grown_band_is_compared_as_a_whole() {
        // c overlaps b on its own, but not the taller band built from a and b.
        let a = Cell::new(0, 0, 10, 10);
        let b = Cell::new(20, 6, 30, 16);
        let c = Cell::new(40, 12, 50, 100);

        assert!(TableRow::from_cell(b).overlaps(&TableRow::from_cell(c)));

        let rows = cluster_elements(&[a, b, c], ROW_OVERLAP_THRESHOLD);
        assert_eq!(rows, vec![row(&[a, b]), row(&[c])]);
    }

    #[test]
    fn rows_at_opposite_coordinate_extremes_stay_apart() {
        let low = Cell::new(0, -2_000_000_000, 10, -1_999_999_990);
        let high = Cell::new(0, 2_000_000_000, 10, 2_000_000_010);

        assert!(!TableRow::from_cell(low).overlaps(&TableRow::from_cell(high)));
        let rows = cluster_elements(&[low, high], ROW_OVERLAP_THRESHOLD);
        assert_eq!(rows, vec![row(&[low]), row(&[high])]);

        let tall = row(&[low, high]);
        assert_eq!(tall.height(), 4_000_000_010);
    }

    #[test]
    fn reclustering_is_idempotent() {
        let elements = [
            Cell::new(0, 0, 50, 10),
            Cell::new(60, 1, 90, 11),
            Cell::new(0, 30, 50, 40),
            Cell::new(0, 60, 50, 70),
        ];
        let once = cluster_elements(&elements, ROW_OVERLAP_THRESHOLD);
        let twice = cluster_rows(once.clone(), ROW_OVERLAP_THRESHOLD);

        assert_eq!(once, twice);
        for (left, right) in once.iter().zip(&twice) {
            assert_eq!(left.cells(), right.cells());
        }
    }
}
