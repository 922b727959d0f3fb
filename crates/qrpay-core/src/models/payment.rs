//! Payment data models shared by the extractor, the selector and the encoders.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment region, each with its own QR payment standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Slovak invoices, paid with PAY by square codes.
    #[default]
    Slovakia,
    /// Czech invoices, paid with QR Platba codes.
    Czech,
}

impl Region {
    /// All supported regions, in display order.
    pub const ALL: [Region; 2] = [Region::Slovakia, Region::Czech];

    /// IBAN country prefix expected for this region.
    pub fn iban_prefix(&self) -> &'static str {
        match self {
            Self::Slovakia => "SK",
            Self::Czech => "CZ",
        }
    }

    /// Home currency of the region.
    pub fn currency(&self) -> Currency {
        match self {
            Self::Slovakia => Currency::Eur,
            Self::Czech => Currency::Czk,
        }
    }

    /// Payload format used for payments in this region.
    pub fn payload_format(&self) -> PayloadFormat {
        match self {
            Self::Slovakia => PayloadFormat::PayBySquare,
            Self::Czech => PayloadFormat::QrPlatba,
        }
    }

    /// Guess the region from an IBAN. Anything that is not Czech is Slovak.
    pub fn infer(iban: &str) -> Self {
        if iban.trim_start().starts_with(Self::Czech.iban_prefix()) {
            Self::Czech
        } else {
            Self::Slovakia
        }
    }

    /// Check whether the IBAN carries this region's prefix.
    pub fn matches_iban(&self, iban: &str) -> bool {
        iban.trim_start().starts_with(self.iban_prefix())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slovakia => write!(f, "slovakia"),
            Self::Czech => write!(f, "czech"),
        }
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sk" | "slovakia" | "slovak" | "a" => Ok(Self::Slovakia),
            "cz" | "czech" | "czechia" | "b" => Ok(Self::Czech),
            other => Err(format!("unknown region: {}", other)),
        }
    }
}

/// Supported payment currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Czk,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Czk => "CZK",
        }
    }

    /// Parse a currency code or symbol as printed on invoices (EUR, €, CZK, Kč).
    pub fn from_marker(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EUR" | "€" => Some(Self::Eur),
            "CZK" | "KČ" => Some(Self::Czk),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_marker(s).ok_or_else(|| format!("unsupported currency: {}", s))
    }
}

/// Payment fields found in invoice text.
///
/// Every field has a usable default, so a failed match simply leaves the
/// default in place for the user to fill in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Account identifier (IBAN) without spaces, or empty.
    pub iban: String,

    /// Amount due, zero when unknown.
    pub amount: Decimal,

    /// Payment currency.
    pub currency: Currency,

    /// Variable symbol (digits only), or empty.
    pub reference: String,
}

impl ExtractedFields {
    /// Region suggested by the IBAN prefix.
    pub fn inferred_region(&self) -> Region {
        Region::infer(&self.iban)
    }
}

/// Editable payment form, the state of one submission.
///
/// Seeded from [`ExtractedFields`], edited by the user and then handed to
/// [`crate::payment::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentForm {
    /// Beneficiary IBAN.
    pub iban: String,

    /// Amount to pay, zero leaves the amount open.
    pub amount: Decimal,

    /// Currency, `None` omits it where the format allows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    /// Variable symbol.
    #[serde(default)]
    pub reference: String,

    /// Message for the beneficiary.
    #[serde(default)]
    pub note: String,

    /// Region selected by the user.
    pub region: Region,

    /// Payment due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl PaymentForm {
    /// Seed a form from extraction output, guessing the region from the IBAN.
    pub fn from_extracted(fields: &ExtractedFields) -> Self {
        Self {
            iban: fields.iban.clone(),
            amount: fields.amount,
            currency: Some(fields.currency),
            reference: fields.reference.clone(),
            note: String::new(),
            region: fields.inferred_region(),
            due_date: None,
        }
    }

    pub fn with_iban(mut self, iban: impl Into<String>) -> Self {
        self.iban = iban.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_currency(mut self, currency: Option<Currency>) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }
}

impl Default for PaymentForm {
    fn default() -> Self {
        Self::from_extracted(&ExtractedFields::default())
    }
}

/// QR payment payload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// Slovak PAY by square (compressed, base32hex).
    PayBySquare,
    /// Czech QR Platba (Short Payment Descriptor).
    QrPlatba,
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayBySquare => write!(f, "PAY by square"),
            Self::QrPlatba => write!(f, "QR Platba"),
        }
    }
}

/// A finished payload string, ready for a QR renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    format: PayloadFormat,
    data: String,
}

impl Payload {
    pub(crate) fn new(format: PayloadFormat, data: String) -> Self {
        Self { format, data }
    }

    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn into_string(self) -> String {
        self.data
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

/// Non-fatal warning: the IBAN prefix disagrees with the chosen region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMismatch {
    /// Region the user selected.
    pub selected: Region,
    /// Prefix actually found on the IBAN.
    pub iban_prefix: String,
}

impl fmt::Display for RegionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selected {} invoice, but the IBAN does not start with {} (found {:?})",
            self.selected,
            self.selected.iban_prefix(),
            self.iban_prefix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_infer() {
        assert_eq!(Region::infer("CZ6508000000192000145399"), Region::Czech);
        assert_eq!(Region::infer("SK3112000000198742637541"), Region::Slovakia);
        assert_eq!(Region::infer(""), Region::Slovakia);
        assert_eq!(Region::infer("DE89370400440532013000"), Region::Slovakia);
    }

    #[test]
    fn test_region_from_str() {
        assert_eq!("CZ".parse::<Region>(), Ok(Region::Czech));
        assert_eq!("slovakia".parse::<Region>(), Ok(Region::Slovakia));
        assert!("hu".parse::<Region>().is_err());
    }

    #[test]
    fn test_currency_markers() {
        assert_eq!(Currency::from_marker("eur"), Some(Currency::Eur));
        assert_eq!(Currency::from_marker("€"), Some(Currency::Eur));
        assert_eq!(Currency::from_marker("kč"), Some(Currency::Czk));
        assert_eq!(Currency::from_marker("Kč"), Some(Currency::Czk));
        assert_eq!(Currency::from_marker("USD"), None);
    }

    #[test]
    fn test_form_from_extracted() {
        let fields = ExtractedFields {
            iban: "CZ6508000000192000145399".to_string(),
            amount: Decimal::new(25000, 2),
            currency: Currency::Czk,
            reference: "2023001".to_string(),
        };

        let form = PaymentForm::from_extracted(&fields);
        assert_eq!(form.region, Region::Czech);
        assert_eq!(form.currency, Some(Currency::Czk));
        assert!(form.note.is_empty());
    }

    #[test]
    fn test_currency_serde() {
        let json = serde_json::to_string(&Currency::Czk).unwrap();
        assert_eq!(json, "\"CZK\"");
    }
}
