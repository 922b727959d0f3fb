//! Regex patterns for payment data on Slovak and Czech invoices.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // IBAN: SK/CZ + 2 check digits + 20 digits, optionally grouped by 4
    pub static ref IBAN_PATTERN: Regex = Regex::new(
        r"(SK|CZ)[0-9]{2}(?:\s?[0-9]{4}){5}"
    ).unwrap();

    // Amount followed by a currency marker: 123,45 EUR / 99.90 Kč
    pub static ref AMOUNT_THEN_CURRENCY: Regex = Regex::new(
        r"(?i)([0-9]{1,10}[,.][0-9]{2})\s?(EUR|€|Kč|CZK)"
    ).unwrap();

    // Currency marker followed by an amount: EUR 9,90 / € 12.00
    pub static ref CURRENCY_THEN_AMOUNT: Regex = Regex::new(
        r"(?i)(EUR|€|Kč|CZK)\s?([0-9]{1,10}[,.][0-9]{2})"
    ).unwrap();

    // Any mention of the Czech crown
    pub static ref CZK_MARKER: Regex = Regex::new(
        r"(?i)CZK|Kč"
    ).unwrap();

    // Labeled variable symbol: "VS: 123", "Variabilny symbol 123", "Variabilný symbol: 123"
    pub static ref REFERENCE_LABELED: Regex = Regex::new(
        r"(?i)(VS|Variabiln[yý] symbol):?\s*([0-9]{1,10})"
    ).unwrap();

    // Bare 10-digit number, not part of a longer one
    pub static ref REFERENCE_STANDALONE: Regex = Regex::new(
        r"\b([0-9]{10})\b"
    ).unwrap();
}
