//! Quote document models recovered from semi-structured quote spreadsheets.
//!
//! The extractor fills a [`ParsedQuote`] with everything it recognised; the
//! published [`QuoteDocument`] keeps only the whitelisted fields.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell::CellValue;

/// The fixed set of label strings recognised in a quote sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Label {
    #[serde(rename = "Quote Number")]
    QuoteNumber,
    #[serde(rename = "Ship To")]
    ShipTo,
    Date,
    Name,
    LineNumber,
    PartNumber,
    Description,
    #[serde(rename = "Item Type")]
    ItemType,
    Price,
}

impl Label {
    pub const ALL: [Label; 9] = [
        Label::QuoteNumber,
        Label::ShipTo,
        Label::Date,
        Label::Name,
        Label::LineNumber,
        Label::PartNumber,
        Label::Description,
        Label::ItemType,
        Label::Price,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::QuoteNumber => "Quote Number",
            Label::ShipTo => "Ship To",
            Label::Date => "Date",
            Label::Name => "Name",
            Label::LineNumber => "LineNumber",
            Label::PartNumber => "PartNumber",
            Label::Description => "Description",
            Label::ItemType => "Item Type",
            Label::Price => "Price",
        }
    }

    /// Exact, case-sensitive match against the label set.
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == text)
    }

    /// Only text cells can be labels.
    pub fn from_cell(cell: &CellValue) -> Option<Self> {
        cell.as_text().and_then(Self::parse)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line item of the quote table with every recognised column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    #[serde(rename = "LineNumber", default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<CellValue>,
    #[serde(rename = "PartNumber", default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<CellValue>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<CellValue>,
    #[serde(rename = "Item Type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<CellValue>,
    #[serde(rename = "Price", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<CellValue>,
}

impl QuoteItem {
    /// Stores `value` under `label`. Header labels have no item column and
    /// are ignored; returns whether the value was stored.
    pub fn set(&mut self, label: Label, value: CellValue) -> bool {
        let slot = match label {
            Label::LineNumber => &mut self.line_number,
            Label::PartNumber => &mut self.part_number,
            Label::Description => &mut self.description,
            Label::ItemType => &mut self.item_type,
            Label::Price => &mut self.price,
            Label::QuoteNumber | Label::ShipTo | Label::Date | Label::Name => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Everything the extractor recovered from a sheet, including fields that
/// are not published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuote {
    pub quote_number: Option<CellValue>,
    pub ship_to: Option<CellValue>,
    pub date: Option<String>,
    pub name: Option<String>,
    /// `None` when the sheet has no item table at all.
    pub items: Option<Vec<QuoteItem>>,
}

impl ParsedQuote {
    /// Applies the output whitelist: Quote, Date, Items and, per item,
    /// LineNumber, PartNumber, Description, Price.
    pub fn to_document(&self) -> QuoteDocument {
        QuoteDocument {
            quote: self.quote_number.clone(),
            date: self.date.clone(),
            items: self
                .items
                .as_ref()
                .map(|items| items.iter().map(QuoteLine::from).collect()),
        }
    }
}

/// Published quote record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteDocument {
    #[serde(rename = "Quote", default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<CellValue>,
    #[serde(rename = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "Items", default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<QuoteLine>>,
}

/// Published line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    #[serde(rename = "LineNumber", default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<CellValue>,
    #[serde(rename = "PartNumber", default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<CellValue>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<CellValue>,
    #[serde(rename = "Price", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<CellValue>,
}

impl From<&QuoteItem> for QuoteLine {
    fn from(item: &QuoteItem) -> Self {
        Self {
            line_number: item.line_number.clone(),
            part_number: item.part_number.clone(),
            description: item.description.clone(),
            price: item.price.clone(),
        }
    }
}
