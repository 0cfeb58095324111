//! Reconciliation report rendering.

use quotemerge_models::MergedRecord;

use crate::config::ReportConfig;
use crate::error::QuoteResult;

pub const REPORT_HEADERS: [&str; 5] = ["BoM PN", "BoM Qty", "Disti PN", "Disti Qty", "Error Flag"];

/// Marker printed in the error column.
pub const ERROR_MARK: &str = "X";

pub struct ReportRenderer {
    column_width: usize,
    pretty_json: bool,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl ReportRenderer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            column_width: config.column_width,
            pretty_json: config.pretty_json,
        }
    }

    /// Fixed-width text table: a header line, then one line per record.
    /// Cells are left-justified and never truncated.
    pub fn render_table(&self, records: &[MergedRecord]) -> String {
        let mut lines = Vec::with_capacity(records.len() + 1);
        lines.push(self.render_line(REPORT_HEADERS.iter().map(|h| h.to_string())));

        for record in records {
            lines.push(self.render_line(
                [
                    record.bom_part_number.clone().unwrap_or_default(),
                    record.bom_quantity.map(|q| q.to_string()).unwrap_or_default(),
                    record.disti_part_number.clone().unwrap_or_default(),
                    record.disti_quantity.map(|q| q.to_string()).unwrap_or_default(),
                    if record.error_flag { ERROR_MARK.to_string() } else { String::new() },
                ]
                .into_iter(),
            ));
        }

        lines.join("\n")
    }

    pub fn render_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> QuoteResult<String> {
        let json = if self.pretty_json {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    fn render_line(&self, cells: impl Iterator<Item = String>) -> String {
        cells
            .map(|cell| format!("{:<width$}", cell, width = self.column_width))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotemerge_models::PartLine;

    #[test]
    fn test_table_layout() {
        let records = vec![
            MergedRecord::matched(&PartLine::new("ABC", 2), 2),
            MergedRecord::unmatched(&PartLine::new("DEF", 2)),
            MergedRecord::leftover(&PartLine::new("GEF", 2)),
        ];

        let table = ReportRenderer::default().render_table(&records);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "BoM PN     BoM Qty    Disti PN   Disti Qty  Error Flag");
        assert_eq!(lines[1], "ABC        2          ABC        2                    ");
        assert_eq!(lines[2], "DEF        2                                X         ");
        assert_eq!(lines[3], "                      GEF        2          X         ");
    }

    #[test]
    fn test_long_values_are_not_truncated() {
        let renderer = ReportRenderer::new(&ReportConfig {
            column_width: 4,
            pretty_json: false,
        });
        let table = renderer.render_table(&[MergedRecord::unmatched(&PartLine::new("LONGPART-01", 12))]);

        assert!(table.lines().nth(1).unwrap().starts_with("LONGPART-01 12  "));
    }

    #[test]
    fn test_compact_json() {
        let renderer = ReportRenderer::new(&ReportConfig {
            column_width: 10,
            pretty_json: false,
        });
        let json = renderer.render_json(&[MergedRecord::leftover(&PartLine::new("GEF", 2))]).unwrap();

        assert_eq!(
            json,
            r#"[{"bom_part_number":null,"bom_quantity":null,"disti_part_number":"GEF","disti_quantity":2,"error_flag":true}]"#
        );
    }
}
