//! Part list domain models for BoM/distributor reconciliation.
//!
//! This module defines the demand and supply line types consumed by the
//! reconciler and the merged records it produces.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single (part number, quantity) line from either side of a reconciliation.
///
/// Field names follow the column headers used by upstream spreadsheets, so a
/// JSON array of `{"Part Number": .., "Quantity": ..}` objects deserializes
/// directly into `Vec<PartLine>`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq, Hash)]
pub struct PartLine {
    #[serde(rename = "Part Number")]
    #[validate(length(min = 1, message = "Part number must not be empty"))]
    pub part_number: String,
    #[serde(rename = "Quantity")]
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i64,
}

/// Demand-side line from a bill of materials. Duplicate part numbers are
/// separate demand lines.
pub type BomRecord = PartLine;

/// Supply-side line from a distributor quote, one per distinct part number.
pub type DistiRecord = PartLine;

impl PartLine {
    pub fn new(part_number: impl Into<String>, quantity: i64) -> Self {
        Self {
            part_number: part_number.into(),
            quantity,
        }
    }
}

/// One row of the reconciliation report.
///
/// Depending on which side is populated the record is a matched (or partially
/// matched) demand line, an unmatched demand line, or leftover supply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergedRecord {
    pub bom_part_number: Option<String>,
    pub bom_quantity: Option<i64>,
    pub disti_part_number: Option<String>,
    pub disti_quantity: Option<i64>,
    pub error_flag: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MergeStatus {
    /// Demand fully covered by supply.
    Matched,
    /// Demand only partly covered.
    Short,
    /// No usable supply for the demand line.
    Unmatched,
    /// Supply left over once all demand was applied.
    Leftover,
}

impl MergedRecord {
    /// Demand line that consumed `supplied` units of the matching supply lot.
    pub fn matched(bom: &BomRecord, supplied: i64) -> Self {
        Self {
            bom_part_number: Some(bom.part_number.clone()),
            bom_quantity: Some(bom.quantity),
            disti_part_number: Some(bom.part_number.clone()),
            disti_quantity: Some(supplied),
            error_flag: bom.quantity != supplied,
        }
    }

    pub fn unmatched(bom: &BomRecord) -> Self {
        Self {
            bom_part_number: Some(bom.part_number.clone()),
            bom_quantity: Some(bom.quantity),
            disti_part_number: None,
            disti_quantity: None,
            error_flag: true,
        }
    }

    pub fn leftover(disti: &DistiRecord) -> Self {
        Self {
            bom_part_number: None,
            bom_quantity: None,
            disti_part_number: Some(disti.part_number.clone()),
            disti_quantity: Some(disti.quantity),
            error_flag: true,
        }
    }

    pub fn status(&self) -> MergeStatus {
        match (&self.bom_part_number, &self.disti_part_number) {
            (None, _) => MergeStatus::Leftover,
            (Some(_), None) => MergeStatus::Unmatched,
            (Some(_), Some(_)) if self.error_flag => MergeStatus::Short,
            (Some(_), Some(_)) => MergeStatus::Matched,
        }
    }

    /// Units of supply this record took from the distributor list. Leftover
    /// records report stock that was never consumed, so they count as zero.
    pub fn consumed(&self) -> i64 {
        match self.status() {
            MergeStatus::Matched | MergeStatus::Short => self.disti_quantity.unwrap_or(0),
            MergeStatus::Unmatched | MergeStatus::Leftover => 0,
        }
    }
}
