#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tablegrid::Cell;

pub fn cell_json(cell: Cell) -> Value {
    json!({ "x1": cell.x1, "y1": cell.y1, "x2": cell.x2, "y2": cell.y2 })
}

pub fn write_fixture(
    dir: &Path,
    name: &str,
    value: &Value,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
    Ok(path)
}

/// Two-column borderless table: three vertical rules and three text rows,
/// plus a paragraph below it and a horizontal rule between the two.
pub fn borderless_page() -> (Cell, Vec<Cell>, Vec<Cell>) {
    let bounds = Cell::new(0, 0, 400, 300);
    let elements = vec![
        Cell::new(20, 30, 140, 45),
        Cell::new(160, 31, 280, 44),
        Cell::new(20, 60, 140, 75),
        Cell::new(160, 61, 280, 76),
        Cell::new(20, 90, 140, 105),
        Cell::new(160, 90, 280, 104),
        Cell::new(20, 200, 380, 220),
    ];
    let delimiters = vec![
        Cell::new(10, 20, 12, 120),
        Cell::new(150, 20, 152, 120),
        Cell::new(290, 25, 292, 118),
        Cell::new(0, 150, 400, 150),
        Cell::new(500, 0, 502, 100),
    ];
    (bounds, elements, delimiters)
}
