//! WASM bindings for invoice payment QR payloads.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! The payload strings it returns are handed to a JS QR renderer.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use qrpay_core::invoice::{InvoiceParser, PaymentParser};
use qrpay_core::models::payment::{Currency, PayloadFormat, PaymentForm, Region};
use qrpay_core::payment::{generate, GeneratedPayment};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract payment fields from invoice text.
///
/// Missing fields come back with their defaults (empty IBAN, zero amount).
#[wasm_bindgen]
pub fn extract_payment_from_text(text: &str) -> Result<JsValue, JsValue> {
    let result = PaymentParser::new().parse(text);
    to_js(&result.fields)
}

#[derive(Serialize)]
struct PaymentOutput {
    payload: String,
    format: PayloadFormat,
    region: Region,
    warnings: Vec<String>,
}

impl From<GeneratedPayment> for PaymentOutput {
    fn from(generated: GeneratedPayment) -> Self {
        Self {
            format: generated.payload.format(),
            payload: generated.payload.into_string(),
            region: generated.region,
            warnings: generated.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Generate the payload for a payment form object.
///
/// Region mismatches are reported on the browser console and in the
/// `warnings` array; a missing IBAN or invalid data throws.
#[wasm_bindgen]
pub fn generate_payment(form: JsValue) -> Result<JsValue, JsValue> {
    let form: PaymentForm = serde_wasm_bindgen::from_value(form)?;

    let generated = generate(&form).map_err(|e| JsValue::from_str(&e.to_string()))?;
    for warning in &generated.warnings {
        web_sys::console::warn_1(&JsValue::from_str(&warning.to_string()));
    }

    to_js(&PaymentOutput::from(generated))
}

/// Validate an IBAN (international bank account number).
#[wasm_bindgen]
pub fn validate_iban(iban: &str) -> bool {
    qrpay_core::invoice::rules::validate_iban(iban)
}

/// Format IBAN in groups of 4.
#[wasm_bindgen]
pub fn format_iban(iban: &str) -> String {
    qrpay_core::invoice::rules::format_iban(iban)
}

/// Regions a form can select, as `{ id, ibanPrefix, currency }` objects.
#[wasm_bindgen]
pub fn supported_regions() -> Result<js_sys::Array, JsValue> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct RegionInfo {
        id: Region,
        iban_prefix: &'static str,
        currency: Currency,
    }

    Region::ALL
        .iter()
        .map(|region| {
            to_js(&RegionInfo {
                id: *region,
                iban_prefix: region.iban_prefix(),
                currency: region.currency(),
            })
        })
        .collect()
}

/// Payment extractor class for browser use.
#[wasm_bindgen]
pub struct PaymentExtractor {
    parser: PaymentParser,
}

#[wasm_bindgen]
impl PaymentExtractor {
    /// Create a new payment extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: PaymentParser::new(),
        }
    }

    /// Skip IBAN candidates with a bad checksum.
    #[wasm_bindgen]
    pub fn set_validate_iban(&mut self, validate: bool) {
        self.parser = std::mem::take(&mut self.parser).with_iban_validation(validate);
    }

    /// Set the currency used when the text names none (`EUR` or `CZK`).
    #[wasm_bindgen]
    pub fn set_default_currency(&mut self, code: &str) -> Result<(), JsValue> {
        let currency: Currency = code.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.parser = std::mem::take(&mut self.parser).with_default_currency(currency);
        Ok(())
    }

    /// Extract payment fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text).fields)
    }

    /// Get extraction result with warnings and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }

    /// Seed a payment form from text, with the region guessed from the IBAN.
    #[wasm_bindgen]
    pub fn prefill_form(&self, text: &str) -> Result<JsValue, JsValue> {
        let fields = self.parser.parse(text).fields;
        to_js(&PaymentForm::from_extracted(&fields))
    }
}

impl Default for PaymentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const CZECH_INVOICE: &str =
        "Číslo účtu: CZ65 0800 0000 1920 0014 5399\nVS: 2023001\nCelkem: 250,00 Kč";

    #[wasm_bindgen_test]
    fn test_validate_iban() {
        assert!(validate_iban("SK31 1200 0000 1987 4263 7541"));
        assert!(!validate_iban("SK00 1200 0000 1987 4263 7541"));
    }

    #[wasm_bindgen_test]
    fn test_format_iban() {
        assert_eq!(
            format_iban("CZ6508000000192000145399"),
            "CZ65 0800 0000 1920 0014 5399"
        );
    }

    #[wasm_bindgen_test]
    fn test_supported_regions() {
        assert_eq!(supported_regions().unwrap().length(), 2);
    }

    #[wasm_bindgen_test]
    fn test_prefill_then_generate() {
        let extractor = PaymentExtractor::new();
        let form = extractor.prefill_form(CZECH_INVOICE).unwrap();

        let output = generate_payment(form).unwrap();
        let payload = js_sys::Reflect::get(&output, &JsValue::from_str("payload"))
            .unwrap()
            .as_string()
            .unwrap();
        assert_eq!(
            payload,
            "SPD*1.0*ACC:CZ6508000000192000145399*AM:250.00*CC:CZK*X-VS:2023001*"
        );
    }

    #[wasm_bindgen_test]
    fn test_generate_without_iban_throws() {
        let extractor = PaymentExtractor::new();
        let form = extractor.prefill_form("no payment data").unwrap();
        assert!(generate_payment(form).is_err());
    }

    #[wasm_bindgen_test]
    fn test_default_currency() {
        let mut extractor = PaymentExtractor::new();
        assert!(extractor.set_default_currency("USD").is_err());
        assert!(extractor.set_default_currency("czk").is_ok());
    }
}
