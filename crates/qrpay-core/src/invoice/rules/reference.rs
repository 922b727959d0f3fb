//! Variable symbol (payment reference) extraction.

use super::patterns::{REFERENCE_LABELED, REFERENCE_STANDALONE};
use super::{first_match, ExtractionMatch, FieldExtractor, Matcher};

/// Variable symbol extractor.
///
/// A labeled symbol ("VS: 123") is preferred. Without a label, any
/// standalone 10-digit number is taken, which may also hit dates or phone
/// numbers written without separators.
pub struct ReferenceExtractor;

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self
    }

    const MATCHERS: [Matcher<String>; 2] = [labeled, standalone];
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ReferenceExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(text, &Self::MATCHERS)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let labeled = REFERENCE_LABELED.captures_iter(text).filter_map(|caps| {
            Some(ExtractionMatch::from_regex_match(caps[2].to_string(), 0.95, caps.get(0)?))
        });
        let standalone = REFERENCE_STANDALONE.captures_iter(text).filter_map(|caps| {
            Some(ExtractionMatch::from_regex_match(caps[1].to_string(), 0.5, caps.get(0)?))
        });

        labeled.chain(standalone).collect()
    }
}

fn labeled(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = REFERENCE_LABELED.captures(text)?;
    Some(ExtractionMatch::from_regex_match(caps[2].to_string(), 0.95, caps.get(0)?))
}

fn standalone(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = REFERENCE_STANDALONE.captures(text)?;
    Some(ExtractionMatch::from_regex_match(caps[1].to_string(), 0.5, caps.get(0)?))
}

/// Extract the variable symbol, or an empty string.
pub fn extract_reference(text: &str) -> String {
    ReferenceExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labeled_reference() {
        assert_eq!(extract_reference("VS: 0001234567 KS: 0308"), "0001234567");
        assert_eq!(extract_reference("vs 2023001"), "2023001");
        assert_eq!(extract_reference("Variabilný symbol: 42"), "42");
        assert_eq!(extract_reference("VARIABILNY SYMBOL 777"), "777");
    }

    #[test]
    fn test_standalone_fallback() {
        assert_eq!(extract_reference("Faktúra 1234567890 zo dňa"), "1234567890");
    }

    #[test]
    fn test_standalone_ignores_longer_numbers() {
        assert_eq!(extract_reference("Objednávka 123456789012"), "");
        assert_eq!(extract_reference("č. 123456789"), "");
    }

    #[test]
    fn test_label_beats_earlier_standalone() {
        let text = "Doklad 9999999999\nVS: 12345";
        assert_eq!(extract_reference(text), "12345");
    }

    #[test]
    fn test_labeled_takes_at_most_ten_digits() {
        assert_eq!(extract_reference("VS:123456789012"), "1234567890");
    }

    #[test]
    fn test_no_reference() {
        assert_eq!(extract_reference("bez symbolu"), "");
    }
}
