use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::geometry::Cell;

/// Rule lines bounding a borderless table candidate, with the elements they enclose.
///
/// The bounding box is derived from the delimiters on every read and is
/// `(0, 0, 0, 0)` while the group is empty. Equality and hashing ignore
/// insertion order and duplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelimiterGroup {
    delimiters: Vec<Cell>,
    elements: Vec<Cell>,
}

impl DelimiterGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_delimiters(delimiters: Vec<Cell>) -> Self {
        Self {
            delimiters,
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_elements(mut self, elements: Vec<Cell>) -> Self {
        self.elements = elements;
        self
    }

    pub fn add(&mut self, delimiter: Cell) {
        self.delimiters.push(delimiter);
    }

    pub fn add_element(&mut self, element: Cell) {
        self.elements.push(element);
    }

    #[must_use]
    pub fn delimiters(&self) -> &[Cell] {
        &self.delimiters
    }

    #[must_use]
    pub fn elements(&self) -> &[Cell] {
        &self.elements
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delimiters.is_empty()
    }

    #[must_use]
    pub fn x1(&self) -> i32 {
        self.delimiters.iter().map(|d| d.x1).min().unwrap_or(0)
    }

    #[must_use]
    pub fn y1(&self) -> i32 {
        self.delimiters.iter().map(|d| d.y1).min().unwrap_or(0)
    }

    #[must_use]
    pub fn x2(&self) -> i32 {
        self.delimiters.iter().map(|d| d.x2).max().unwrap_or(0)
    }

    #[must_use]
    pub fn y2(&self) -> i32 {
        self.delimiters.iter().map(|d| d.y2).max().unwrap_or(0)
    }

    #[must_use]
    pub fn bbox(&self) -> Cell {
        Cell::enclosing(&self.delimiters).unwrap_or_default()
    }

    #[must_use]
    pub fn width(&self) -> i64 {
        self.bbox().width()
    }

    #[must_use]
    pub fn height(&self) -> i64 {
        self.bbox().height()
    }

    #[must_use]
    pub fn area(&self) -> i64 {
        self.bbox().area()
    }

    fn canonical(&self) -> (BTreeSet<Cell>, BTreeSet<Cell>) {
        (
            self.delimiters.iter().copied().collect(),
            self.elements.iter().copied().collect(),
        )
    }
}

impl PartialEq for DelimiterGroup {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for DelimiterGroup {}

impl Hash for DelimiterGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

fn vertically_linked(a: &Cell, b: &Cell, min_overlap: f64) -> bool {
    a.vertical_overlap_ratio(b).is_some_and(|ratio| ratio >= min_overlap)
}

fn find_root(parents: &mut [usize], mut node: usize) -> usize {
    while parents[node] != node {
        parents[node] = parents[parents[node]];
        node = parents[node];
    }
    node
}

/// Groups rule lines whose vertical extents overlap by at least
/// `min_overlap` of the shorter line, then attaches to every group the
/// elements lying inside its bounding box.
///
/// Groups come out in the order of their first delimiter in `delimiters`;
/// delimiters keep their input order inside a group. Zero-height delimiters
/// never link to anything and end up in singleton groups.
#[must_use]
pub fn group_delimiters(
    delimiters: &[Cell],
    elements: &[Cell],
    min_overlap: f64,
) -> Vec<DelimiterGroup> {
    let mut parents = (0..delimiters.len()).collect::<Vec<_>>();
    for (i, a) in delimiters.iter().enumerate() {
        for (j, b) in delimiters.iter().enumerate().skip(i + 1) {
            if vertically_linked(a, b, min_overlap) {
                let (ra, rb) = (find_root(&mut parents, i), find_root(&mut parents, j));
                if ra != rb {
                    trace!(?a, ?b, "linking delimiters");
                    parents[ra.max(rb)] = ra.min(rb);
                }
            }
        }
    }

    let mut group_of_root = vec![None; delimiters.len()];
    let mut groups: Vec<DelimiterGroup> = Vec::new();
    for (index, delimiter) in delimiters.iter().enumerate() {
        let root = find_root(&mut parents, index);
        let slot = *group_of_root[root].get_or_insert_with(|| {
            groups.push(DelimiterGroup::new());
            groups.len() - 1
        });
        groups[slot].add(*delimiter);
    }

    for group in &mut groups {
        let bbox = group.bbox();
        for element in elements.iter().filter(|element| bbox.contains(element)) {
            group.add_element(*element);
        }
    }

    debug!(
        delimiters = delimiters.len(),
        groups = groups.len(),
        "grouped delimiters"
    );
    groups
}
