//! Currency detection.

use super::patterns::CZK_MARKER;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::payment::{Currency, Region};

/// Finds explicit mentions of the Czech crown in text.
pub struct CurrencyExtractor;

impl CurrencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyExtractor {
    type Output = ExtractionMatch<Currency>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        CZK_MARKER
            .find(text)
            .map(|m| ExtractionMatch::from_regex_match(Currency::Czk, 0.9, m))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CZK_MARKER
            .find_iter(text)
            .map(|m| ExtractionMatch::from_regex_match(Currency::Czk, 0.9, m))
            .collect()
    }
}

/// Decide the payment currency.
///
/// CZK wins when the text mentions it; otherwise a Czech IBAN implies CZK;
/// otherwise `default` applies.
pub fn detect_currency(text: &str, iban: &str, default: Currency) -> Currency {
    if let Some(found) = CurrencyExtractor::new().extract(text) {
        return found.value;
    }
    if Region::Czech.matches_iban(iban) {
        return Currency::Czk;
    }
    default
}

/// Currency of an invoice judged from its text and IBAN, EUR when nothing points to CZK.
pub fn extract_currency(text: &str, iban: &str) -> Currency {
    detect_currency(text, iban, Currency::default())
}
