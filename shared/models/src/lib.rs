//! # quotemerge Core Domain Models
//!
//! This module contains the domain models shared by the BoM/distributor
//! reconciler and the quote sheet extractor. All models implement
//! serialization/deserialization with serde; part lines carry validation
//! rules through the validator crate.
//!
//! ## Key Models
//!
//! - **PartLine**: A (part number, quantity) line on either side of a reconciliation
//! - **MergedRecord**: One row of the reconciliation report with its error flag
//! - **CellValue**: A raw spreadsheet cell value (text, number, bool or blank)
//! - **ParsedQuote** / **QuoteDocument**: The full and the published view of a quote sheet

pub mod part;
pub mod cell;
pub mod quote;


pub use part::*;
pub use cell::*;
pub use quote::*;
