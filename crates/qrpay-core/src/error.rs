//! Error types for the qrpay-core library.

use thiserror::Error;

/// Main error type for the qrpay library.
#[derive(Error, Debug)]
pub enum QrPayError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Payload encoding error.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Payment generation error.
    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised while building or reading a payment payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The account identifier is empty.
    #[error("IBAN is required")]
    EmptyIban,

    /// The account identifier violates the IBAN structure.
    #[error("invalid IBAN {iban}: {reason}")]
    InvalidIban { iban: String, reason: String },

    /// The amount cannot be represented in the payload.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The reference code is not a 1-10 digit number.
    #[error("invalid variable symbol: {0}")]
    InvalidReference(String),

    /// The note exceeds the format limit.
    #[error("note is too long ({len} characters, at most {max})")]
    NoteTooLong { len: usize, max: usize },

    /// A field contains a character the format reserves.
    #[error("field {field} contains a reserved character")]
    InvalidCharacter { field: &'static str },

    /// The serialized data does not fit the length header.
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// LZMA compression or decompression failed.
    #[error("compression failed: {0}")]
    Compression(String),

    /// A payload string could not be read back.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The payload checksum does not match its content.
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    Checksum { expected: u32, actual: u32 },
}

/// Errors that stop a payment submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// No IBAN was provided, nothing is generated.
    #[error("IBAN is required")]
    MissingIdentifier,

    /// The selected encoder rejected the payment data.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Result type for the qrpay library.
pub type Result<T> = std::result::Result<T, QrPayError>;
