//! Payment field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, InvoiceParser, PaymentParser};

use crate::models::payment::ExtractedFields;

/// Extract payment fields from invoice text with default settings.
pub fn extract(text: &str) -> ExtractedFields {
    PaymentParser::new().parse(text).fields
}
