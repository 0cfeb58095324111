use quotemerge_models::CellValue;

use super::date::DateMode;

static EMPTY: CellValue = CellValue::Empty;

/// Rectangular, row-major grid of cell values plus the workbook's date
/// convention.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellValue>,
    date_mode: DateMode,
}

impl Grid {
    /// Builds a grid from possibly ragged rows; short rows are padded with
    /// empty cells.
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        let row_count = rows.len();
        let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut cells = Vec::with_capacity(row_count * col_count);
        for mut row in rows {
            row.resize(col_count, CellValue::Empty);
            cells.extend(row);
        }

        Self {
            rows: row_count,
            cols: col_count,
            cells,
            date_mode: DateMode::default(),
        }
    }

    pub fn with_date_mode(mut self, date_mode: DateMode) -> Self {
        self.date_mode = date_mode;
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    pub fn date_mode(&self) -> DateMode {
        self.date_mode
    }

    /// Out-of-range coordinates read as empty.
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        if row < self.rows && col < self.cols {
            &self.cells[row * self.cols + col]
        } else {
            &EMPTY
        }
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        if row < self.rows {
            &self.cells[row * self.cols..(row + 1) * self.cols]
        } else {
            &[]
        }
    }
}
