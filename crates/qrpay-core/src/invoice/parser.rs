//! Payment field parser combining the rule extractors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::payment::{Currency, ExtractedFields};

use super::rules::{
    amounts::AmountExtractor, currency::detect_currency, iban::IbanExtractor,
    reference::ReferenceExtractor, FieldExtractor,
};

/// Result of payment field extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted payment fields.
    pub fields: ExtractedFields,
    /// Raw text the fields were taken from.
    pub raw_text: String,
    /// Fields that fell back to their defaults.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice text parsing.
pub trait InvoiceParser {
    /// Parse payment fields from text. Missing fields keep their defaults.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Rule-based payment parser.
pub struct PaymentParser {
    /// Whether to validate IBAN checksums.
    validate_iban: bool,
    /// Currency used when nothing points elsewhere.
    default_currency: Currency,
}

impl PaymentParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            validate_iban: false,
            default_currency: Currency::Eur,
        }
    }

    /// Build a parser from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_iban_validation(config.validate_iban)
            .with_default_currency(config.default_currency)
    }

    /// Set IBAN validation.
    pub fn with_iban_validation(mut self, validate: bool) -> Self {
        self.validate_iban = validate;
        self
    }

    /// Set the fallback currency.
    pub fn with_default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }
}

impl Default for PaymentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for PaymentParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        // Instant::now panics on wasm32-unknown-unknown
        #[cfg(not(target_arch = "wasm32"))]
        let start = std::time::Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing payment data from {} characters of text", text.len());

        let iban = IbanExtractor::new()
            .with_validation(self.validate_iban)
            .extract(text);
        match &iban {
            Some(m) => debug!("IBAN {} at {:?}", m.value, m.position),
            None => warnings.push("Could not extract IBAN".to_string()),
        }
        let iban = iban.map(|m| m.value).unwrap_or_default();

        let amount = AmountExtractor::new().extract(text);
        match &amount {
            Some(m) => debug!("Amount {} from {:?}", m.value, m.source),
            None => warnings.push("Could not extract amount".to_string()),
        }
        let amount = amount.map(|m| m.value).unwrap_or(Decimal::ZERO);

        let currency = detect_currency(text, &iban, self.default_currency);

        let reference = ReferenceExtractor::new().extract(text);
        match &reference {
            Some(m) => debug!("Variable symbol {} (confidence {:.2})", m.value, m.confidence),
            None => warnings.push("Could not extract variable symbol".to_string()),
        }
        let reference = reference.map(|m| m.value).unwrap_or_default();

        let fields = ExtractedFields {
            iban,
            amount,
            currency,
            reference,
        };

        debug!(
            "Extracted payment fields with {} missing: {:?}",
            warnings.len(),
            fields
        );

        #[cfg(not(target_arch = "wasm32"))]
        let processing_time_ms = start.elapsed().as_millis() as u64;
        #[cfg(target_arch = "wasm32")]
        let processing_time_ms = 0;

        ExtractionResult {
            fields,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_parse_slovak_invoice() {
        let text = r#"
            FAKTÚRA č. 2024015

            Dodávateľ:
            Príklad s.r.o., Hlavná 1, 811 01 Bratislava
            IČO: 12345678
            IBAN: SK31 1200 0000 1987 4263 7541

            Variabilný symbol: 2024015
            Dátum splatnosti: 15.02.2024

            Spolu k úhrade: 149,90 EUR
        "#;

        let result = PaymentParser::new().parse(text);

        assert_eq!(
            result.fields,
            ExtractedFields {
                iban: "SK3112000000198742637541".to_string(),
                amount: Decimal::from_str("149.90").unwrap(),
                currency: Currency::Eur,
                reference: "2024015".to_string(),
            }
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_czech_invoice() {
        let text = "Faktura 2023001\nČíslo účtu: CZ65 0800 0000 1920 0014 5399\nVS: 2023001\nCelkem k úhradě: 250,00 Kč";

        let result = PaymentParser::new().parse(text);

        assert_eq!(result.fields.iban, "CZ6508000000192000145399");
        assert_eq!(result.fields.amount, Decimal::from_str("250.00").unwrap());
        assert_eq!(result.fields.currency, Currency::Czk);
        assert_eq!(result.fields.reference, "2023001");
    }

    #[test]
    fn test_parse_empty_text_yields_defaults() {
        let result = PaymentParser::new().parse("");

        assert_eq!(result.fields, ExtractedFields::default());
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_default_currency_from_config() {
        let config = ExtractionConfig {
            validate_iban: true,
            default_currency: Currency::Czk,
        };

        let result = PaymentParser::from_config(&config).parse("IBAN SK0000000000000000000000");
        assert_eq!(result.fields.iban, "");
        assert_eq!(result.fields.currency, Currency::Czk);
    }
}
