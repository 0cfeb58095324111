//! BoM (Bill of Materials) Reconciliation Module
//!
//! Loads demand and supply part lists, validates them, reconciles demand
//! against supply and renders the merged report.
//! Supports CSV, JSON and Excel (XLSX) part lists.

pub mod parser;
pub mod validator;
pub mod reconciler;
pub mod report;

pub use parser::{ListFormat, ParsedPartList, PartListParser, PartRow};
pub use reconciler::{reconcile, Reconciliation, ReconciliationSummary};
pub use report::ReportRenderer;
pub use validator::{parse_quantity, PartListValidator, ValidationResult, ValidationSeverity};
