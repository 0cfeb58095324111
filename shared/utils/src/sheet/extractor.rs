//! Quote Sheet Extractor
//!
//! Recovers a quote document from a loosely structured sheet by locating
//! label cells. Header fields sit to the right of their label; the item
//! table starts at the "LineNumber" label and maps columns to fields
//! positionally through the label rows read so far.

use quotemerge_models::{CellValue, Label, ParsedQuote, QuoteDocument, QuoteItem};
use tracing::{debug, info, trace};

use super::date::date_from_serial;
use super::grid::Grid;
use crate::config::ExtractorConfig;
use crate::error::{QuoteError, QuoteResult};

/// Where the scanner is within the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Looking for header fields and the start of an item table.
    ScanningForHeader,
    /// The last table row held only labels.
    ReadingLabels { origin_col: usize },
    /// The last table row held item values.
    ReadingItems { origin_col: usize },
    /// The table was closed by a terminator on the current row.
    Terminated,
}

/// Column mapping and items of the item table being read.
#[derive(Debug)]
struct ItemTable {
    /// Row holding the table's "LineNumber" label.
    start_row: usize,
    labels: Vec<Label>,
    items: Vec<QuoteItem>,
}

impl ItemTable {
    fn starting_at(start_row: usize) -> Self {
        Self {
            start_row,
            labels: Vec::new(),
            items: Vec::new(),
        }
    }
}

enum RowKind {
    Blank,
    Labels,
    Values,
}

pub struct QuoteExtractor {
    config: ExtractorConfig,
    terminator: String,
}

impl Default for QuoteExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl QuoteExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let terminator = "-".repeat(config.terminator_dashes);
        Self { config, terminator }
    }

    /// Extracts the published quote document.
    pub fn extract_document(&self, grid: &Grid) -> QuoteResult<QuoteDocument> {
        Ok(self.extract(grid)?.to_document())
    }

    /// Extracts every recognised field, including ones the published
    /// document leaves out.
    pub fn extract(&self, grid: &Grid) -> QuoteResult<ParsedQuote> {
        let mut quote = ParsedQuote::default();
        let mut table: Option<ItemTable> = None;
        let mut state = ScanState::ScanningForHeader;
        let mut row = 0;

        while row < grid.row_count() {
            let next = match state {
                ScanState::ScanningForHeader => {
                    match self.scan_header_row(grid, row, &mut quote)? {
                        Some(origin_col) => {
                            debug!(row, col = origin_col, "Item table starts");
                            table = Some(ItemTable::starting_at(row));
                            // The label row itself is the first table row.
                            ScanState::ReadingLabels { origin_col }
                        }
                        None => {
                            row += 1;
                            ScanState::ScanningForHeader
                        }
                    }
                }
                ScanState::ReadingLabels { origin_col } | ScanState::ReadingItems { origin_col } => {
                    let start_row = table.as_ref().map_or(row, |current| current.start_row);

                    if self.is_terminator_row(grid, row, origin_col) {
                        debug!(row, "Item table terminated");
                        ScanState::Terminated
                    } else if row == start_row {
                        // Header fields on the label row were read when the table opened.
                        self.advance_table_row(grid, &mut row, origin_col, &mut table, state)?
                    } else if let Some(col) = self.scan_header_row(grid, row, &mut quote)? {
                        // Another "LineNumber" label restarts the table; items read
                        // so far are kept.
                        debug!(row, col, "Item table restarts");
                        self.close_table(&mut quote, table.take());
                        table = Some(ItemTable::starting_at(row));
                        ScanState::ReadingLabels { origin_col: col }
                    } else {
                        self.advance_table_row(grid, &mut row, origin_col, &mut table, state)?
                    }
                }
                ScanState::Terminated => {
                    self.close_table(&mut quote, table.take());
                    // Header fields on the terminator row are still read, but
                    // the row never opens another table.
                    self.scan_header_row(grid, row, &mut quote)?;
                    row += 1;
                    ScanState::ScanningForHeader
                }
            };

            if next != state {
                trace!(row, from = ?state, to = ?next, "Scan state change");
            }
            state = next;
        }

        self.close_table(&mut quote, table.take());

        info!(
            quote = quote.quote_number.is_some(),
            date = quote.date.is_some(),
            items = quote.items.as_ref().map_or(0, Vec::len),
            "Extracted quote sheet"
        );
        Ok(quote)
    }

    /// Reads `row` into the open table and moves past it.
    fn advance_table_row(
        &self,
        grid: &Grid,
        row: &mut usize,
        origin_col: usize,
        table: &mut Option<ItemTable>,
        state: ScanState,
    ) -> QuoteResult<ScanState> {
        let current = table.get_or_insert_with(|| ItemTable::starting_at(*row));
        let kind = self.read_table_row(grid, *row, origin_col, current)?;
        *row += 1;

        Ok(match kind {
            RowKind::Labels => ScanState::ReadingLabels { origin_col },
            RowKind::Values => ScanState::ReadingItems { origin_col },
            RowKind::Blank => state,
        })
    }

    /// Captures header fields on `row`. Returns the column of the first
    /// "LineNumber" label when the row opens an item table.
    fn scan_header_row(&self, grid: &Grid, row: usize, quote: &mut ParsedQuote) -> QuoteResult<Option<usize>> {
        let mut table_start = None;

        for col in 0..grid.col_count() {
            let cell = grid.get(row, col);
            if cell.is_blank() {
                continue;
            }

            match Label::from_cell(cell) {
                Some(Label::QuoteNumber) => {
                    if let Some(value) = self.adjacent_value(grid, row, col) {
                        debug!(row, col, value = %value, "Captured quote number");
                        quote.quote_number = Some(value);
                    }
                }
                Some(Label::ShipTo) => {
                    if let Some(value) = self.adjacent_value(grid, row, col) {
                        debug!(row, col, value = %value, "Captured ship-to");
                        quote.ship_to = Some(value);
                    }
                }
                Some(Label::Date) => {
                    if let Some(value) = self.adjacent_value(grid, row, col) {
                        let date = self.format_date(grid, row, col + 1, &value)?;
                        debug!(row, col, date = %date, "Captured date");
                        quote.date = Some(date);
                    }
                }
                Some(Label::LineNumber) => {
                    table_start.get_or_insert(col);
                }
                _ => {
                    if let Some(name) = self.name_value(cell) {
                        debug!(row, col, name = %name, "Captured name");
                        quote.name = Some(name);
                    }
                }
            }
        }

        Ok(table_start)
    }

    /// Value to the right of a header label. `None` when the label sits in
    /// the last column or its neighbour is itself a label.
    fn adjacent_value(&self, grid: &Grid, row: usize, col: usize) -> Option<CellValue> {
        if col + 1 >= grid.col_count() {
            return None;
        }
        let next = grid.get(row, col + 1);
        if Label::from_cell(next).is_some() {
            return None;
        }

        if next.is_blank() {
            Some(CellValue::text(self.config.missing_value.as_str()))
        } else {
            Some(next.clone())
        }
    }

    fn format_date(&self, grid: &Grid, row: usize, col: usize, value: &CellValue) -> QuoteResult<String> {
        if grid.get(row, col).is_blank() {
            return Ok(self.config.missing_value.clone());
        }

        let serial = value
            .as_number()
            .ok_or_else(|| QuoteError::parse(row, col, format!("Date value '{}' is not a date serial", value)))?;
        let date = date_from_serial(serial, grid.date_mode())
            .ok_or_else(|| QuoteError::parse(row, col, format!("Date serial {} is out of range", serial)))?;

        Ok(date.format(&self.config.date_format).to_string())
    }

    /// "Name: Jane Doe" style cells: "Name", optional whitespace, then the
    /// separator. The value is whatever follows the last separator.
    fn name_value(&self, cell: &CellValue) -> Option<String> {
        let text = cell.as_text()?;
        let rest = text.strip_prefix(Label::Name.as_str())?;
        if !rest.trim_start().starts_with(self.config.name_separator.as_str()) {
            return None;
        }
        text.rsplit(self.config.name_separator.as_str())
            .next()
            .map(|name| name.trim().to_string())
    }

    /// A text cell left of the table origin starting with the dash run.
    fn is_terminator_row(&self, grid: &Grid, row: usize, origin_col: usize) -> bool {
        (0..origin_col).any(|col| {
            grid.get(row, col)
                .as_text()
                .is_some_and(|text| text.starts_with(&self.terminator))
        })
    }

    fn read_table_row(&self, grid: &Grid, row: usize, origin_col: usize, table: &mut ItemTable) -> QuoteResult<RowKind> {
        let mut item = QuoteItem::default();
        let mut assigned = 0;
        let mut saw_labels = false;

        for col in origin_col..grid.col_count() {
            let cell = grid.get(row, col);
            if cell.is_blank() {
                continue;
            }

            if let Some(label) = Label::from_cell(cell) {
                table.labels.push(label);
                saw_labels = true;
                continue;
            }

            let offset = col - origin_col;
            let label = table.labels.get(offset).copied().ok_or_else(|| {
                QuoteError::parse(
                    row,
                    col,
                    format!(
                        "Value '{}' at table column {} has no column label ({} labels read)",
                        cell,
                        offset,
                        table.labels.len()
                    ),
                )
            })?;

            // Header labels inside the table still count towards a non-blank
            // item even though the item has no field for them.
            item.set(label, cell.clone());
            assigned += 1;
        }

        if assigned > 0 {
            trace!(row, fields = assigned, "Read item row");
            table.items.push(item);
            Ok(RowKind::Values)
        } else if saw_labels {
            Ok(RowKind::Labels)
        } else {
            Ok(RowKind::Blank)
        }
    }

    fn close_table(&self, quote: &mut ParsedQuote, table: Option<ItemTable>) {
        if let Some(table) = table {
            debug!(items = table.items.len(), labels = table.labels.len(), "Closing item table");
            quote.items.get_or_insert_with(Vec::new).extend(table.items);
        }
    }
}
