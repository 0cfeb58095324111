//! Part List Parser
//!
//! Multi-format loader for BoM and distributor part lists: CSV, JSON and
//! Excel. Every format is reduced to [`PartRow`]s; turning rows into
//! validated [`PartLine`](quotemerge_models::PartLine)s is the validator's job.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{QuoteError, QuoteResult};
use crate::sheet::{DateMode, WorkbookLoader};

/// Supported part list file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Csv,
    Json,
    Excel, // XLSX
}

impl ListFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xlsx" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// One data row of a part list before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PartRow {
    /// 1-based line/row number in the source, for messages.
    pub row_number: usize,
    pub part_number: Option<String>,
    /// Raw quantity text; parsed by the validator.
    pub quantity: Option<String>,
    pub raw_data: HashMap<String, String>,
}

/// Complete parsed part list with metadata
#[derive(Debug, Clone)]
pub struct ParsedPartList {
    pub filename: String,
    pub format: ListFormat,
    pub rows: Vec<PartRow>,
    pub column_headers: Vec<String>,
    pub total_rows: usize,
    pub parse_warnings: Vec<String>,
}

/// Main part list parser
pub struct PartListParser {
    /// Column name mappings, compared against lowercased trimmed headers
    part_number_columns: Vec<String>,
    quantity_columns: Vec<String>,
}

impl Default for PartListParser {
    fn default() -> Self {
        Self {
            part_number_columns: vec![
                "part number".to_string(),
                "part_number".to_string(),
                "partnumber".to_string(),
                "part no".to_string(),
                "part_no".to_string(),
                "pn".to_string(),
            ],
            quantity_columns: vec![
                "quantity".to_string(),
                "qty".to_string(),
            ],
        }
    }
}

impl PartListParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_file(&self, path: &Path) -> QuoteResult<ParsedPartList> {
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        self.parse_bytes(filename, &data, None)
    }

    /// Parse a part list from bytes
    pub fn parse_bytes(&self, filename: &str, data: &[u8], format: Option<ListFormat>) -> QuoteResult<ParsedPartList> {
        let format = format
            .or_else(|| ListFormat::from_extension(Path::new(filename)))
            .ok_or_else(|| QuoteError::validation("file_type", format!("Could not determine format of '{}'", filename)))?;

        let parsed = match format {
            ListFormat::Csv => self.parse_csv(filename, data),
            ListFormat::Json => self.parse_json(filename, data),
            ListFormat::Excel => self.parse_excel(filename, data),
        }?;

        debug!(
            filename = %parsed.filename,
            rows = parsed.total_rows,
            warnings = parsed.parse_warnings.len(),
            "Parsed part list"
        );
        Ok(parsed)
    }

    /// Parse CSV format
    fn parse_csv(&self, filename: &str, data: &[u8]) -> QuoteResult<ParsedPartList> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(normalize_header)
            .collect();

        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    if record.iter().all(|value| value.is_empty()) {
                        continue;
                    }
                    let raw_data: HashMap<String, String> = headers
                        .iter()
                        .enumerate()
                        .filter_map(|(i, h)| record.get(i).map(|v| (h.clone(), v.to_string())))
                        .collect();

                    rows.push(self.map_row(idx + 2, &raw_data));
                }
                Err(e) => {
                    warnings.push(format!("Row {}: Parse error - {}", idx + 2, e));
                }
            }
        }

        Ok(ParsedPartList {
            filename: filename.to_string(),
            format: ListFormat::Csv,
            total_rows: rows.len(),
            rows,
            column_headers: headers,
            parse_warnings: warnings,
        })
    }

    /// Parse a JSON array of objects
    fn parse_json(&self, filename: &str, data: &[u8]) -> QuoteResult<ParsedPartList> {
        let records: Vec<serde_json::Value> = serde_json::from_slice(data)?;
        let (rows, headers, warnings) = self.map_values(&records);

        Ok(ParsedPartList {
            filename: filename.to_string(),
            format: ListFormat::Json,
            total_rows: rows.len(),
            rows,
            column_headers: headers,
            parse_warnings: warnings,
        })
    }

    /// Parse in-memory records such as `{"Part Number": "ABC", "Quantity": 2}`.
    pub fn parse_values(&self, name: &str, records: &[serde_json::Value]) -> ParsedPartList {
        let (rows, headers, warnings) = self.map_values(records);

        ParsedPartList {
            filename: name.to_string(),
            format: ListFormat::Json,
            total_rows: rows.len(),
            rows,
            column_headers: headers,
            parse_warnings: warnings,
        }
    }

    fn map_values(&self, records: &[serde_json::Value]) -> (Vec<PartRow>, Vec<String>, Vec<String>) {
        let mut rows = Vec::new();
        let mut headers: Vec<String> = Vec::new();
        let mut warnings = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let Some(object) = record.as_object() else {
                warnings.push(format!("Record {}: expected an object, found {}", idx + 1, record));
                // Keep the slot so record numbering stays aligned with the input.
                rows.push(self.map_row(idx + 1, &HashMap::new()));
                continue;
            };

            let raw_data: HashMap<String, String> = object
                .iter()
                .filter_map(|(key, value)| {
                    let text = match value {
                        serde_json::Value::Null => return None,
                        serde_json::Value::String(text) => text.trim().to_string(),
                        other => other.to_string(),
                    };
                    Some((normalize_header(key), text))
                })
                .collect();

            for key in object.keys().map(|key| normalize_header(key)) {
                if !headers.contains(&key) {
                    headers.push(key);
                }
            }

            rows.push(self.map_row(idx + 1, &raw_data));
        }

        (rows, headers, warnings)
    }

    /// Parse the first worksheet of an XLSX workbook; the first non-blank
    /// row holds the headers.
    fn parse_excel(&self, filename: &str, data: &[u8]) -> QuoteResult<ParsedPartList> {
        let grid = WorkbookLoader::new(DateMode::default()).load_xlsx_bytes(data)?;

        let header_row = (0..grid.row_count())
            .find(|&row| grid.row(row).iter().any(|cell| !cell.is_blank()))
            .ok_or_else(|| QuoteError::workbook("Empty worksheet"))?;

        let headers: Vec<String> = grid
            .row(header_row)
            .iter()
            .map(|cell| normalize_header(&cell.to_string()))
            .collect();

        let mut rows = Vec::new();
        for row in header_row + 1..grid.row_count() {
            let cells = grid.row(row);
            if cells.iter().all(|cell| cell.is_blank()) {
                continue;
            }
            let raw_data: HashMap<String, String> = headers
                .iter()
                .zip(cells)
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, cell)| (h.clone(), cell.to_string().trim().to_string()))
                .collect();

            rows.push(self.map_row(row + 1, &raw_data));
        }

        Ok(ParsedPartList {
            filename: filename.to_string(),
            format: ListFormat::Excel,
            total_rows: rows.len(),
            rows,
            column_headers: headers,
            parse_warnings: Vec::new(),
        })
    }

    fn map_row(&self, row_number: usize, raw_data: &HashMap<String, String>) -> PartRow {
        PartRow {
            row_number,
            part_number: self.find_value(&self.part_number_columns, raw_data),
            quantity: self.find_value(&self.quantity_columns, raw_data),
            raw_data: raw_data.clone(),
        }
    }

    /// Find value by checking multiple possible column names
    fn find_value(&self, candidates: &[String], data: &HashMap<String, String>) -> Option<String> {
        for candidate in candidates {
            if let Some(value) = data.get(candidate) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ListFormat::from_extension(Path::new("bom.csv")), Some(ListFormat::Csv));
        assert_eq!(ListFormat::from_extension(Path::new("disti.JSON")), Some(ListFormat::Json));
        assert_eq!(ListFormat::from_extension(Path::new("bom.xlsx")), Some(ListFormat::Excel));
        assert_eq!(ListFormat::from_extension(Path::new("bom.txt")), None);
    }

    #[test]
    fn test_csv_parsing() {
        let csv_data = b"Part Number,Quantity\nABC,2\n XYZ , 1 \n,\nIJK,";

        let parser = PartListParser::new();
        let result = parser.parse_csv("bom.csv", csv_data).unwrap();

        assert_eq!(result.column_headers, vec!["part number", "quantity"]);
        assert_eq!(result.total_rows, 3);
        assert_eq!(result.rows[0].part_number, Some("ABC".to_string()));
        assert_eq!(result.rows[0].quantity, Some("2".to_string()));
        assert_eq!(result.rows[1].part_number, Some("XYZ".to_string()));
        assert_eq!(result.rows[2].row_number, 5);
        assert_eq!(result.rows[2].quantity, None);
    }

    #[test]
    fn test_csv_header_aliases() {
        let csv_data = b"PN,Qty,Notes\nABC,4,spare";

        let result = PartListParser::new().parse_csv("disti.csv", csv_data).unwrap();

        assert_eq!(result.rows[0].part_number, Some("ABC".to_string()));
        assert_eq!(result.rows[0].quantity, Some("4".to_string()));
        assert_eq!(result.rows[0].raw_data.get("notes"), Some(&"spare".to_string()));
    }

    #[test]
    fn test_json_parsing() {
        let json = br#"[{"Part Number": "ABC", "Quantity": 2}, {"Part Number": "XYZ", "Quantity": "1"}, 7]"#;

        let result = PartListParser::new().parse_bytes("bom.json", json, None).unwrap();

        assert_eq!(result.format, ListFormat::Json);
        assert_eq!(result.total_rows, 3);
        assert_eq!(result.rows[0].quantity, Some("2".to_string()));
        assert_eq!(result.rows[1].quantity, Some("1".to_string()));
        assert_eq!(result.rows[2].part_number, None);
        assert_eq!(result.parse_warnings.len(), 1);
    }

    #[test]
    fn test_null_fields_are_missing() {
        let records = vec![serde_json::json!({"Part Number": "ABC", "Quantity": null})];

        let result = PartListParser::new().parse_values("bom", &records);

        assert_eq!(result.rows[0].part_number, Some("ABC".to_string()));
        assert_eq!(result.rows[0].quantity, None);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let error = PartListParser::new().parse_bytes("bom.txt", b"", None).unwrap_err();
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
    }

    proptest! {
        /// Every non-blank CSV data row is accounted for.
        #[test]
        fn prop_csv_rows_are_preserved(
            parts in prop::collection::vec(("[A-Z]{2}-[0-9]{3}", 0..1000u32), 1..20),
        ) {
            let mut csv = String::from("Part Number,Quantity\n");
            for (part, qty) in &parts {
                csv.push_str(&format!("{},{}\n", part, qty));
            }

            let result = PartListParser::new().parse_csv("bom.csv", csv.as_bytes()).unwrap();

            prop_assert_eq!(result.total_rows, parts.len());
            for (row, (part, qty)) in result.rows.iter().zip(&parts) {
                prop_assert_eq!(row.part_number.as_deref(), Some(part.as_str()));
                prop_assert_eq!(row.quantity.clone(), Some(qty.to_string()));
            }
        }
    }
}
