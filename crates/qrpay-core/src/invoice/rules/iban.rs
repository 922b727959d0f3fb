//! IBAN extraction for Slovak and Czech bank accounts.

use tracing::trace;

use super::patterns::IBAN_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// IBAN field extractor.
///
/// Candidates are returned in text order. Checksum validation is off by
/// default, so any structurally matching code is accepted.
pub struct IbanExtractor {
    validate: bool,
}

impl IbanExtractor {
    /// Create a new IBAN extractor.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Set whether to skip candidates that fail the MOD-97 checksum.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for IbanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IbanExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        IBAN_PATTERN
            .find_iter(text)
            .filter_map(|m| {
                let iban = compact(m.as_str());
                if self.validate && !validate_iban(&iban) {
                    trace!("Skipping IBAN candidate {} with bad checksum", iban);
                    return None;
                }
                Some(ExtractionMatch::from_regex_match(iban, 0.95, m))
            })
            .collect()
    }
}

/// Extract the first IBAN from text, or an empty string.
pub fn extract_iban(text: &str) -> String {
    IbanExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_default()
}

/// Check an IBAN's MOD-97 checksum (ISO 13616).
pub fn validate_iban(iban: &str) -> bool {
    let iban = compact(iban).to_uppercase();
    let bytes = iban.as_bytes();

    if bytes.len() < 5 || bytes.len() > 34 {
        return false;
    }
    if !bytes[..2].iter().all(u8::is_ascii_uppercase) || !bytes[2..4].iter().all(u8::is_ascii_digit)
    {
        return false;
    }

    // Rotate the country code and check digits to the end, letters count as 10..35
    let mut remainder = 0u32;
    for &b in bytes[4..].iter().chain(&bytes[..4]) {
        remainder = match b {
            b'0'..=b'9' => (remainder * 10 + u32::from(b - b'0')) % 97,
            b'A'..=b'Z' => (remainder * 100 + u32::from(b - b'A') + 10) % 97,
            _ => return false,
        };
    }

    remainder == 1
}

/// Format IBAN in groups of 4 characters.
pub fn format_iban(iban: &str) -> String {
    compact(iban)
        .as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn compact(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
