//! Workbook loading via calamine.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_from_rs, DataType, Range, Reader, Xlsx};
use quotemerge_models::CellValue;
use tracing::debug;

use super::date::DateMode;
use super::grid::Grid;
use crate::error::{QuoteError, QuoteResult};

/// Reads one worksheet of a workbook into a [`Grid`].
#[derive(Debug, Clone, Default)]
pub struct WorkbookLoader {
    date_mode: DateMode,
    sheet_name: Option<String>,
}

impl WorkbookLoader {
    pub fn new(date_mode: DateMode) -> Self {
        Self {
            date_mode,
            sheet_name: None,
        }
    }

    /// Read the named worksheet instead of the first one.
    pub fn with_sheet(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = Some(sheet_name.into());
        self
    }

    /// Opens any format calamine understands (xlsx, xlsm, xlsb, xls, ods).
    pub fn load_path(&self, path: &Path) -> QuoteResult<Grid> {
        let mut workbook = open_workbook_auto(path)?;
        let range = self.select_range(&mut workbook)?;
        debug!(path = %path.display(), "Loaded worksheet");
        Ok(self.grid_from_range(&range))
    }

    pub fn load_xlsx_bytes(&self, data: &[u8]) -> QuoteResult<Grid> {
        let cursor = Cursor::new(data);
        let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)?;
        let range = self.select_range(&mut workbook)?;
        Ok(self.grid_from_range(&range))
    }

    fn select_range<RS, R>(&self, workbook: &mut R) -> QuoteResult<Range<DataType>>
    where
        RS: Read + Seek,
        R: Reader<RS>,
        QuoteError: From<R::Error>,
    {
        let sheet_name = match &self.sheet_name {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| QuoteError::workbook("No sheets found in workbook"))?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .ok_or_else(|| QuoteError::workbook(format!("Worksheet '{}' not found", sheet_name)))??;

        Ok(range)
    }

    /// Cells keep their absolute sheet coordinates: a used range starting
    /// at C5 yields two leading empty columns and four leading empty rows.
    fn grid_from_range(&self, range: &Range<DataType>) -> Grid {
        let (first_row, first_col) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); first_row];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; first_col];
            cells.extend(row.iter().map(cell_from_data));
            rows.push(cells);
        }

        let grid = Grid::new(rows).with_date_mode(self.date_mode);
        debug!(rows = grid.row_count(), cols = grid.col_count(), "Built cell grid");
        grid
    }
}

/// Date/time cells keep their raw serial so the extractor can apply the
/// workbook's date mode itself.
pub fn cell_from_data(value: &DataType) -> CellValue {
    match value {
        DataType::Empty | DataType::Error(_) => CellValue::Empty,
        DataType::String(text) => CellValue::Text(text.clone()),
        DataType::Float(number) | DataType::DateTime(number) => CellValue::Number(*number),
        DataType::Int(number) => CellValue::Number(*number as f64),
        DataType::Bool(flag) => CellValue::Bool(*flag),
        other => CellValue::Text(other.to_string()),
    }
}
