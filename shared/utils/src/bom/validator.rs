//! Part List Validator
//!
//! Validates parsed part lists for completeness and correctness and converts
//! them into typed part lines.

use std::collections::HashSet;

use quotemerge_models::PartLine;
use tracing::{debug, warn};

use super::parser::{ParsedPartList, PartRow};
use crate::error::{QuoteError, QuoteResult};

/// Validation severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

/// Single validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    /// Zero-based position of the record in the list.
    pub index: usize,
    pub row: Option<usize>,
    pub field: Option<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Validation result for a part list
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub issues: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

/// Summary statistics for validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub missing_parts: usize,
    pub missing_quantities: usize,
    pub invalid_quantities: usize,
    pub duplicate_parts: usize,
}

/// Part list validator
pub struct PartListValidator {
    /// Name used in error messages, e.g. "BoM" or "Disti".
    list_name: String,
    /// Supply lists are expected to hold one line per part number; only the
    /// first line of a repeated part can ever be consumed.
    warn_duplicate_parts: bool,
}

impl Default for PartListValidator {
    fn default() -> Self {
        Self::for_demand()
    }
}

impl PartListValidator {
    /// Validator for a bill of materials, where repeated parts are normal.
    pub fn for_demand() -> Self {
        Self {
            list_name: "BoM".to_string(),
            warn_duplicate_parts: false,
        }
    }

    /// Validator for a distributor list.
    pub fn for_supply() -> Self {
        Self {
            list_name: "Disti".to_string(),
            warn_duplicate_parts: true,
        }
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    /// Validate a parsed part list
    pub fn validate(&self, list: &ParsedPartList) -> ValidationResult {
        let mut issues = Vec::new();
        let mut missing_parts = 0;
        let mut missing_quantities = 0;
        let mut invalid_quantities = 0;
        let mut duplicate_parts = 0;
        let mut invalid_rows = 0;
        let mut seen = HashSet::new();

        for (index, row) in list.rows.iter().enumerate() {
            let mut row_valid = true;

            if row.part_number.is_none() {
                missing_parts += 1;
                row_valid = false;
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Error,
                    index,
                    row: Some(row.row_number),
                    field: Some("Part Number".to_string()),
                    message: "Missing part number".to_string(),
                    suggestion: Some("Add a part number to this row".to_string()),
                });
            }

            match row.quantity.as_deref().map(parse_quantity) {
                None => {
                    missing_quantities += 1;
                    row_valid = false;
                    issues.push(ValidationIssue {
                        severity: ValidationSeverity::Error,
                        index,
                        row: Some(row.row_number),
                        field: Some("Quantity".to_string()),
                        message: "Missing quantity".to_string(),
                        suggestion: Some("Add a whole-number quantity to this row".to_string()),
                    });
                }
                Some(Err(message)) => {
                    invalid_quantities += 1;
                    row_valid = false;
                    issues.push(ValidationIssue {
                        severity: ValidationSeverity::Error,
                        index,
                        row: Some(row.row_number),
                        field: Some("Quantity".to_string()),
                        message,
                        suggestion: Some("Quantities must be whole numbers of zero or more".to_string()),
                    });
                }
                Some(Ok(0)) => {
                    issues.push(ValidationIssue {
                        severity: ValidationSeverity::Info,
                        index,
                        row: Some(row.row_number),
                        field: Some("Quantity".to_string()),
                        message: "Zero quantity".to_string(),
                        suggestion: None,
                    });
                }
                Some(Ok(_)) => {}
            }

            if self.warn_duplicate_parts {
                if let Some(part) = &row.part_number {
                    if !seen.insert(part.clone()) {
                        duplicate_parts += 1;
                        issues.push(ValidationIssue {
                            severity: ValidationSeverity::Warning,
                            index,
                            row: Some(row.row_number),
                            field: Some("Part Number".to_string()),
                            message: format!("Duplicate part number: {}", part),
                            suggestion: Some("Aggregate supply into a single line per part number".to_string()),
                        });
                    }
                }
            }

            if !row_valid {
                invalid_rows += 1;
            }
        }

        let error_count = issues.iter().filter(|i| i.severity == ValidationSeverity::Error).count();
        let warning_count = issues.iter().filter(|i| i.severity == ValidationSeverity::Warning).count();

        ValidationResult {
            is_valid: error_count == 0,
            error_count,
            warning_count,
            issues,
            summary: ValidationSummary {
                total_rows: list.total_rows,
                valid_rows: list.rows.len() - invalid_rows,
                invalid_rows,
                missing_parts,
                missing_quantities,
                invalid_quantities,
                duplicate_parts,
            },
        }
    }

    /// Validates `list` and converts it to part lines, failing on the first
    /// record with an error. Warnings are logged.
    pub fn to_part_lines(&self, list: &ParsedPartList) -> QuoteResult<Vec<PartLine>> {
        let result = self.validate(list);

        if let Some(issue) = result.issues.iter().find(|i| i.severity == ValidationSeverity::Error) {
            return Err(QuoteError::invalid_record(
                &self.list_name,
                issue.index,
                match issue.row {
                    Some(row) => format!("{} (row {} of {})", issue.message, row, list.filename),
                    None => issue.message.clone(),
                },
            ));
        }

        for issue in &result.issues {
            match issue.severity {
                ValidationSeverity::Warning => warn!(list = %self.list_name, row = ?issue.row, "{}", issue.message),
                _ => debug!(list = %self.list_name, row = ?issue.row, "{}", issue.message),
            }
        }

        list.rows.iter().enumerate().map(|(index, row)| self.to_part_line(index, row)).collect()
    }

    fn to_part_line(&self, index: usize, row: &PartRow) -> QuoteResult<PartLine> {
        let part_number = row
            .part_number
            .clone()
            .ok_or_else(|| QuoteError::invalid_record(&self.list_name, index, "Missing part number"))?;
        let quantity = row
            .quantity
            .as_deref()
            .ok_or_else(|| QuoteError::invalid_record(&self.list_name, index, "Missing quantity"))
            .and_then(|raw| {
                parse_quantity(raw).map_err(|message| QuoteError::invalid_record(&self.list_name, index, message))
            })?;

        Ok(PartLine::new(part_number, quantity))
    }
}

/// Accepts integers, integral decimals ("2.0") and surrounding whitespace.
pub fn parse_quantity(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();

    let quantity = match trimmed.parse::<i64>() {
        Ok(quantity) => quantity,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                value as i64
            }
            _ => return Err(format!("Invalid quantity: '{}'", raw)),
        },
    };

    if quantity < 0 {
        return Err(format!("Negative quantity: {}", quantity));
    }

    Ok(quantity)
}
