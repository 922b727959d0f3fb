//! Amount extraction.
//!
//! Invoices print the currency either after the number (`123,45 EUR`) or
//! before it (`€ 123.45`). The suffix form is tried first; whichever matcher
//! hits first decides the amount.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{AMOUNT_THEN_CURRENCY, CURRENCY_THEN_AMOUNT};
use super::{first_match, ExtractionMatch, FieldExtractor, Matcher};

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    const MATCHERS: [Matcher<Decimal>; 2] = [amount_then_currency, currency_then_amount];
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(text, &Self::MATCHERS)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let suffixed = AMOUNT_THEN_CURRENCY.captures_iter(text).filter_map(|caps| {
            let value = parse_amount(&caps[1])?;
            Some(ExtractionMatch::from_regex_match(value, 0.9, caps.get(0)?))
        });
        let prefixed = CURRENCY_THEN_AMOUNT.captures_iter(text).filter_map(|caps| {
            let value = parse_amount(&caps[2])?;
            Some(ExtractionMatch::from_regex_match(value, 0.85, caps.get(0)?))
        });

        suffixed.chain(prefixed).collect()
    }
}

fn amount_then_currency(text: &str) -> Option<ExtractionMatch<Decimal>> {
    let caps = AMOUNT_THEN_CURRENCY.captures(text)?;
    let value = parse_amount(&caps[1])?;
    Some(ExtractionMatch::from_regex_match(value, 0.9, caps.get(0)?))
}

fn currency_then_amount(text: &str) -> Option<ExtractionMatch<Decimal>> {
    let caps = CURRENCY_THEN_AMOUNT.captures(text)?;
    let value = parse_amount(&caps[2])?;
    Some(ExtractionMatch::from_regex_match(value, 0.85, caps.get(0)?))
}

/// Extract the amount due, or zero when no amount is found.
pub fn extract_amount(text: &str) -> Decimal {
    AmountExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or(Decimal::ZERO)
}

/// Parse an amount with a comma or dot decimal separator ("123,45", "9.90").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.trim().replace(',', ".")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("123,45"), Some(dec("123.45")));
        assert_eq!(parse_amount("9.90"), Some(dec("9.90")));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_amount_before_currency() {
        assert_eq!(extract_amount("Total 123,45 EUR"), dec("123.45"));
        assert_eq!(extract_amount("Spolu: 80.00eur"), dec("80.00"));
        assert_eq!(extract_amount("Celkem 1250,00 Kč"), dec("1250.00"));
        assert_eq!(extract_amount("Celkem 1250,00 KČ"), dec("1250.00"));
    }

    #[test]
    fn test_currency_before_amount() {
        assert_eq!(extract_amount("EUR 9,90"), dec("9.90"));
        assert_eq!(extract_amount("K úhrade: € 42.10"), dec("42.10"));
        assert_eq!(extract_amount("czk 300,00"), dec("300.00"));
    }

    #[test]
    fn test_suffix_form_is_tried_first() {
        // The prefixed amount appears earlier, but the suffix matcher runs first.
        let text = "EUR 5,00 poplatok, spolu 20,00 EUR";
        assert_eq!(extract_amount(text), dec("20.00"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "Medzisúčet 10,00 EUR\nSpolu 12,00 EUR";
        assert_eq!(extract_amount(text), dec("10.00"));
    }

    #[test]
    fn test_no_amount() {
        assert_eq!(extract_amount("Suma 120 EUR"), Decimal::ZERO);
        assert_eq!(extract_amount("123,45 USD"), Decimal::ZERO);
        assert_eq!(extract_amount(""), Decimal::ZERO);
    }

    #[test]
    fn test_extract_all_orders_suffix_matches_first() {
        let text = "EUR 1,00 and 2,00 EUR";
        let all = AmountExtractor::new().extract_all(text);
        let values: Vec<Decimal> = all.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![dec("2.00"), dec("1.00")]);
    }
}
