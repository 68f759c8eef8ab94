mod decompose;
mod delimiter;
mod error;
mod export;
mod geometry;
mod model;
mod options;
mod row;
mod segment;
mod warning;

use serde::Serialize;
use tracing::{debug, warn};

pub use decompose::{CellSpan, GridSpan, cell_spans, create_all_rectangles, decompose_coordinates};
pub use delimiter::{DelimiterGroup, group_delimiters};
pub use error::GridError;
pub use export::{RowRecord, row_records, rows_to_csv_string, spans_to_csv_string};
pub use geometry::Cell;
pub use model::{CellPosition, TableCell};
pub use options::{DEFAULT_DELIMITER_OVERLAP, GridOptions, OutputFormat};
pub use row::{ROW_OVERLAP_THRESHOLD, TableRow, cluster_elements, cluster_rows};
pub use segment::ImageSegment;
pub use warning::{GridWarning, WarningCode};

/// A delimiter group that survived filtering, with its elements split into rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCandidate {
    pub bbox: Cell,
    pub group: DelimiterGroup,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAnalysis {
    pub segment: Cell,
    pub candidates: Vec<TableCandidate>,
    pub warnings: Vec<GridWarning>,
}

fn report_malformed(cells: &[Cell], what: &str, region: Cell, warnings: &mut Vec<GridWarning>) {
    let malformed = cells.iter().filter(|cell| !cell.is_well_formed()).count();
    if malformed == 0 {
        return;
    }

    warn!(malformed, what, "cells with inverted coordinates");
    warnings.push(
        GridWarning::new(
            WarningCode::MalformedCell,
            format!("{what} with x2<x1 or y2<y1 are kept as-is"),
        )
        .with_region(region)
        .with_count(malformed),
    );
}

fn filter_candidates(
    groups: Vec<DelimiterGroup>,
    options: &GridOptions,
    warnings: &mut Vec<GridWarning>,
) -> Vec<DelimiterGroup> {
    let mut out = Vec::new();

    for group in groups {
        if group.area() == 0 {
            warnings.push(
                GridWarning::new(
                    WarningCode::EmptyCandidate,
                    "skipping delimiter group with zero area",
                )
                .with_region(group.bbox()),
            );
            continue;
        }

        if group.delimiters().len() < options.min_delimiters {
            warnings.push(
                GridWarning::new(
                    WarningCode::TooFewDelimiters,
                    "skipping delimiter group with too few delimiters",
                )
                .with_region(group.bbox())
                .with_count(group.delimiters().len()),
            );
            continue;
        }

        out.push(group);
    }

    out
}

/// Clusters the elements of a populated segment into row bands.
pub fn cluster_segment_rows(
    segment: &ImageSegment,
    options: &GridOptions,
) -> Result<Vec<TableRow>, GridError> {
    options.validate()?;
    let elements = populated_elements(segment)?;
    Ok(cluster_elements(elements, options.row_overlap))
}

fn populated_elements(segment: &ImageSegment) -> Result<&[Cell], GridError> {
    segment.elements().ok_or(GridError::UnpopulatedSegment {
        x1: segment.x1,
        y1: segment.y1,
        x2: segment.x2,
        y2: segment.y2,
    })
}

/// Proposes borderless table candidates inside `segment`.
///
/// Delimiters not touching the segment are ignored. Groups with zero area,
/// too few delimiters or too few rows are dropped with a warning.
pub fn analyze_segment(
    segment: &ImageSegment,
    delimiters: &[Cell],
    options: &GridOptions,
) -> Result<RegionAnalysis, GridError> {
    options.validate()?;
    let elements = populated_elements(segment)?;
    let bounds = segment.bounds();

    let mut warnings = Vec::new();
    report_malformed(elements, "elements", bounds, &mut warnings);
    report_malformed(delimiters, "delimiters", bounds, &mut warnings);

    let inside = delimiters
        .iter()
        .filter(|delimiter| bounds.intersection(delimiter).is_some())
        .copied()
        .collect::<Vec<_>>();
    let groups = group_delimiters(&inside, elements, options.delimiter_overlap);
    let groups = filter_candidates(groups, options, &mut warnings);

    let mut candidates = Vec::new();
    for group in groups {
        let rows = cluster_elements(group.elements(), options.row_overlap);
        if rows.len() < options.min_rows {
            warnings.push(
                GridWarning::new(WarningCode::TooFewRows, "skipping candidate with too few rows")
                    .with_region(group.bbox())
                    .with_count(rows.len()),
            );
            continue;
        }

        candidates.push(TableCandidate {
            bbox: group.bbox(),
            group,
            rows,
        });
    }

    debug!(
        elements = elements.len(),
        delimiters = inside.len(),
        candidates = candidates.len(),
        warnings = warnings.len(),
        "analyzed segment"
    );

    Ok(RegionAnalysis {
        segment: bounds,
        candidates,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::{filter_candidates, report_malformed};
    use crate::{Cell, DelimiterGroup, GridOptions, WarningCode};

    #[test]
    fn drops_empty_and_thin_groups() {
        let groups = vec![
            DelimiterGroup::new(),
            DelimiterGroup::from_delimiters(vec![Cell::new(0, 0, 2, 50)]),
            DelimiterGroup::from_delimiters(vec![Cell::new(0, 0, 2, 50), Cell::new(40, 0, 42, 50)]),
        ];
        let mut warnings = Vec::new();

        let kept = filter_candidates(groups, &GridOptions::default(), &mut warnings);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox(), Cell::new(0, 0, 42, 50));
        let codes = warnings.iter().map(|w| w.code).collect::<Vec<_>>();
        assert_eq!(
            codes,
            vec![WarningCode::EmptyCandidate, WarningCode::TooFewDelimiters]
        );
    }

    #[test]
    fn counts_malformed_cells_once() {
        let cells = [Cell::new(10, 0, 0, 10), Cell::new(0, 10, 10, 0), Cell::new(0, 0, 1, 1)];
        let mut warnings = Vec::new();

        report_malformed(&cells, "elements", Cell::new(0, 0, 100, 100), &mut warnings);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::MalformedCell);
        assert_eq!(warnings[0].count, Some(2));
    }
}
