//! Quote Sheet Module
//!
//! Loads a worksheet into a cell grid and recovers the quote document it
//! holds.

pub mod date;
pub mod grid;
pub mod loader;
pub mod extractor;

pub use date::{date_from_serial, DateMode};
pub use extractor::QuoteExtractor;
pub use grid::Grid;
pub use loader::WorkbookLoader;
