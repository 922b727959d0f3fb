//! QR Platba (Short Payment Descriptor) payload for Czech payments.
//!
//! Wire format, segments in this order, optional ones in brackets:
//!
//! ```text
//! SPD*1.0*ACC:{iban}*[AM:{amount}*][CC:{currency}*][MSG:{NOTE}*][X-VS:{reference}*]
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;

use super::{format_amount, Result};
use crate::error::EncodeError;
use crate::models::payment::{ExtractedFields, Payload, PayloadFormat, PaymentForm};

/// Format header and version.
pub const HEADER: &str = "SPD*1.0*";

/// Build a QR Platba payload. Empty optional fields are left out.
pub fn encode(form: &PaymentForm) -> Payload {
    let mut spd = String::from(HEADER);

    push_segment(&mut spd, "ACC", &form.iban);
    if form.amount > Decimal::ZERO {
        push_segment(&mut spd, "AM", &format_amount(form.amount));
    }
    if let Some(currency) = form.currency {
        push_segment(&mut spd, "CC", currency.code());
    }
    if !form.note.is_empty() {
        push_segment(&mut spd, "MSG", &form.note.to_uppercase());
    }
    if !form.reference.is_empty() {
        push_segment(&mut spd, "X-VS", &form.reference);
    }

    trace!("Built SPD payload of {} characters", spd.len());
    Payload::new(PayloadFormat::QrPlatba, spd)
}

/// Build a QR Platba payload straight from extracted fields and a note.
pub fn encode_b(fields: &ExtractedFields, note: &str) -> Payload {
    encode(&PaymentForm::from_extracted(fields).with_note(note))
}

fn push_segment(spd: &mut String, key: &str, value: &str) {
    spd.push_str(key);
    spd.push(':');
    spd.push_str(value);
    spd.push('*');
}

/// Key/value content of a SPD string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaydFields {
    /// Format version, `1.0` for current payloads.
    pub version: String,
    /// Segments in payload order.
    pub entries: Vec<(String, String)>,
}

impl SpaydFields {
    /// Look up the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Read a SPD string back into its segments.
pub fn parse(payload: &str) -> Result<SpaydFields> {
    let mut parts = payload.trim().split('*');

    if parts.next() != Some("SPD") {
        return Err(EncodeError::Malformed("missing SPD header".to_string()));
    }
    let version = parts
        .next()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EncodeError::Malformed("missing SPD version".to_string()))?
        .to_string();

    let entries = parts
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .split_once(':')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| EncodeError::Malformed(format!("segment without key: {}", segment)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SpaydFields { version, entries })
}
