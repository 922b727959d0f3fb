//! Rule-based field extractors for payment data.

pub mod amounts;
pub mod currency;
pub mod iban;
pub mod patterns;
pub mod reference;

pub use amounts::{extract_amount, parse_amount, AmountExtractor};
pub use currency::{detect_currency, extract_currency, CurrencyExtractor};
pub use iban::{extract_iban, format_iban, validate_iban, IbanExtractor};
pub use patterns::*;
pub use reference::{extract_reference, ReferenceExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A single way of finding a field in text.
pub type Matcher<T> = fn(&str) -> Option<ExtractionMatch<T>>;

/// Run matchers in order and keep the first hit.
pub fn first_match<T>(text: &str, matchers: &[Matcher<T>]) -> Option<ExtractionMatch<T>> {
    matchers.iter().find_map(|matcher| matcher(text))
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub(crate) fn from_regex_match(value: T, confidence: f32, m: regex::Match<'_>) -> Self {
        Self::new(value, confidence, m.as_str()).with_position(m.start(), m.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &str) -> Option<ExtractionMatch<u8>> {
        None
    }

    fn one(text: &str) -> Option<ExtractionMatch<u8>> {
        text.contains('1').then(|| ExtractionMatch::new(1, 0.5, "1"))
    }

    fn two(text: &str) -> Option<ExtractionMatch<u8>> {
        text.contains('2').then(|| ExtractionMatch::new(2, 0.5, "2"))
    }

    #[test]
    fn test_first_match_respects_order() {
        let matchers: [Matcher<u8>; 3] = [never, one, two];

        assert_eq!(first_match("12", &matchers).map(|m| m.value), Some(1));
        assert_eq!(first_match("2", &matchers).map(|m| m.value), Some(2));
        assert!(first_match("x", &matchers).is_none());
    }
}
