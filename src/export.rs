use csv::WriterBuilder;
use serde::Serialize;

use crate::decompose::CellSpan;
use crate::error::GridError;
use crate::geometry::Cell;
use crate::model::TableCell;
use crate::row::TableRow;

/// Flat view of a row band for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRecord {
    pub index: usize,
    pub bbox: Cell,
    pub v_center: f64,
    pub cells: Vec<Cell>,
}

#[must_use]
pub fn row_records(rows: &[TableRow]) -> Vec<RowRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| RowRecord {
            index,
            bbox: row.bbox(),
            v_center: row.v_center(),
            cells: row.cells().to_vec(),
        })
        .collect()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, GridError> {
    let bytes = writer
        .into_inner()
        .map_err(|error| GridError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| GridError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

pub fn rows_to_csv_string(rows: &[TableRow], delimiter: u8) -> Result<String, GridError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    writer.write_record(["row", "x1", "y1", "x2", "y2", "cell_count"])?;
    for record in row_records(rows) {
        writer.write_record([
            record.index.to_string(),
            record.bbox.x1.to_string(),
            record.bbox.y1.to_string(),
            record.bbox.x2.to_string(),
            record.bbox.y2.to_string(),
            record.cells.len().to_string(),
        ])?;
    }
    writer.flush()?;
    finish(writer)
}

pub fn spans_to_csv_string(
    spans: &[CellSpan<TableCell>],
    delimiter: u8,
) -> Result<String, GridError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    writer.write_record(["col_start", "row_start", "col_end", "row_end", "value"])?;
    for cell_span in spans {
        let span = cell_span.span;
        writer.write_record([
            span.col_start.to_string(),
            span.row_start.to_string(),
            span.col_end.to_string(),
            span.row_end.to_string(),
            cell_span.cell.value.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::{rows_to_csv_string, spans_to_csv_string};
    use crate::decompose::cell_spans;
    use crate::geometry::Cell;
    use crate::model::{CellPosition, TableCell};
    use crate::row::{ROW_OVERLAP_THRESHOLD, cluster_elements};

    #[test]
    fn writes_one_line_per_row() {
        let rows = cluster_elements(
            &[Cell::new(0, 0, 10, 10), Cell::new(20, 1, 30, 11), Cell::new(0, 40, 10, 50)],
            ROW_OVERLAP_THRESHOLD,
        );

        let csv = rows_to_csv_string(&rows, b',').expect("csv should be written");
        assert_eq!(
            csv,
            "row,x1,y1,x2,y2,cell_count\n0,0,0,30,11,2\n1,0,40,10,50,1\n"
        );
    }

    #[test]
    fn writes_span_values_with_custom_delimiter() {
        let cell = TableCell::new(Cell::new(0, 0, 10, 10)).with_value("Total");
        let positions = vec![
            CellPosition::new(cell.clone(), 0, 0),
            CellPosition::new(cell, 0, 1),
        ];

        let csv =
            spans_to_csv_string(&cell_spans(&positions), b';').expect("csv should be written");
        assert_eq!(csv, "col_start;row_start;col_end;row_end;value\n0;0;1;0;Total\n");
    }
}
