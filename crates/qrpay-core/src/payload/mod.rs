//! QR payment payload encoders.
//!
//! - [`pay_by_square`]: Slovak PAY by square (CRC32, LZMA, base32hex)
//! - [`qr_platba`]: Czech QR Platba / Short Payment Descriptor

pub mod pay_by_square;
pub mod qr_platba;

pub use pay_by_square::{encode_a, PayBySquareData};
pub use qr_platba::{encode_b, SpaydFields};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::EncodeError;
use crate::models::payment::PayloadFormat;

/// Result type for payload operations.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Format an amount with exactly two fractional digits, rounding half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Content of a payload string read back into fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum DecodedPayload {
    PayBySquare(PayBySquareData),
    QrPlatba(SpaydFields),
}

impl DecodedPayload {
    pub fn format(&self) -> PayloadFormat {
        match self {
            Self::PayBySquare(_) => PayloadFormat::PayBySquare,
            Self::QrPlatba(_) => PayloadFormat::QrPlatba,
        }
    }
}

/// Read a payload string of either format.
pub fn decode(payload: &str) -> Result<DecodedPayload> {
    let payload = payload.trim();
    if payload.starts_with(qr_platba::HEADER) {
        qr_platba::parse(payload).map(DecodedPayload::QrPlatba)
    } else {
        pay_by_square::decode(payload).map(DecodedPayload::PayBySquare)
    }
}
