//! Core library for invoice payment QR codes.
//!
//! This crate provides:
//! - PDF text extraction (behind the `pdf` feature)
//! - Payment field extraction from invoice text (IBAN, amount, currency, variable symbol)
//! - PAY by square (Slovakia) and QR Platba (Czech Republic) payload encoders
//! - Region-based encoder selection for a submitted payment form

pub mod error;
pub mod invoice;
pub mod models;
pub mod payload;
pub mod payment;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use error::{EncodeError, PaymentError, PdfError, QrPayError, Result};
pub use invoice::{extract, ExtractionResult, InvoiceParser, PaymentParser};
pub use models::config::QrPayConfig;
pub use models::payment::{
    Currency, ExtractedFields, Payload, PayloadFormat, PaymentForm, Region, RegionMismatch,
};
pub use payload::{decode, encode_a, encode_b, DecodedPayload};
pub use payment::{generate, select, GeneratedPayment, Selection};
#[cfg(feature = "pdf")]
pub use pdf::{PdfExtractor, PdfProcessor};
