//! PAY by square payload for Slovak payments.
//!
//! Layout of an encoded payment order (by square v1.0.0):
//!
//! 1. payment fields joined with `\t`
//! 2. prefixed with their CRC32, 4 bytes little-endian
//! 3. compressed as a raw LZMA1 stream (lc=3, lp=0, pb=2)
//! 4. prefixed with a 2-byte by square header and the 2-byte little-endian
//!    length of step 2
//! 5. written in base32hex without padding

use chrono::NaiveDate;
use data_encoding::BASE32HEX_NOPAD;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;

use super::{format_amount, Result};
use crate::error::EncodeError;
use crate::models::payment::{Currency, ExtractedFields, Payload, PayloadFormat, PaymentForm};

/// By square header: type 0 (payment), version 0, document type 0, reserved 0.
const BYSQUARE_HEADER: [u8; 2] = [0x00, 0x00];

/// Size of the `.lzma` header lzma-rs writes in front of the raw stream:
/// properties (1), dictionary size (4), unpacked size (8).
const LZMA_HEADER_LEN: usize = 13;

/// lc=3, lp=0, pb=2 encoded as `(pb * 5 + lp) * 9 + lc`.
const LZMA_PROPERTIES: u8 = 0x5d;

const LZMA_DICT_SIZE: u32 = 128 * 1024;

const MAX_NOTE_LEN: usize = 140;
const MAX_REFERENCE_LEN: usize = 10;
const MIN_IBAN_LEN: usize = 15;
const MAX_IBAN_LEN: usize = 34;
const MIN_FIELDS: usize = 14;
const MAX_AMOUNT_DIGITS: u32 = 15;

const DATE_FORMAT: &str = "%Y%m%d";

/// Payment order fields carried in a PAY by square payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayBySquareData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub variable_symbol: String,
    pub constant_symbol: String,
    pub specific_symbol: String,
    pub note: String,
    pub iban: String,
    pub bic: String,
    pub beneficiary_name: String,
}

impl PayBySquareData {
    /// Validate a payment form and convert it to payload fields.
    pub fn from_form(form: &PaymentForm) -> Result<Self> {
        let iban: String = form.iban.chars().filter(|c| !c.is_whitespace()).collect();
        check_iban(&iban)?;

        if form.amount < Decimal::ZERO {
            return Err(EncodeError::InvalidAmount(format!("{} is negative", form.amount)));
        }
        if form.amount.trunc() >= Decimal::from(10i64.pow(MAX_AMOUNT_DIGITS)) {
            return Err(EncodeError::InvalidAmount(format!(
                "{} has more than {} integer digits",
                form.amount, MAX_AMOUNT_DIGITS
            )));
        }

        let reference = form.reference.trim();
        if reference.len() > MAX_REFERENCE_LEN || !reference.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodeError::InvalidReference(reference.to_string()));
        }

        let note_len = form.note.chars().count();
        if note_len > MAX_NOTE_LEN {
            return Err(EncodeError::NoteTooLong {
                len: note_len,
                max: MAX_NOTE_LEN,
            });
        }
        if form.note.contains('\t') {
            return Err(EncodeError::InvalidCharacter { field: "note" });
        }

        Ok(Self {
            amount: (form.amount > Decimal::ZERO).then_some(form.amount),
            currency: form.currency.unwrap_or(Currency::Eur).code().to_string(),
            due_date: form.due_date,
            variable_symbol: reference.to_string(),
            note: form.note.clone(),
            iban,
            ..Self::default()
        })
    }

    /// Tab-separated field list, the uncompressed payload body.
    pub fn serialize(&self) -> String {
        let amount = self.amount.map(format_amount).unwrap_or_default();
        let due_date = self
            .due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();

        let fields: [&str; 19] = [
            "",                     // invoice id
            "1",                    // number of payments
            "1",                    // payment order
            &amount,
            &self.currency,
            &due_date,
            &self.variable_symbol,
            &self.constant_symbol,
            &self.specific_symbol,
            "",                     // originator reference (SEPA)
            &self.note,
            "1",                    // number of bank accounts
            &self.iban,
            &self.bic,
            "0",                    // no standing order
            "0",                    // no direct debit
            &self.beneficiary_name,
            "",                     // beneficiary address line 1
            "",                     // beneficiary address line 2
        ];
        fields.join("\t")
    }

    /// Parse a tab-separated payload body.
    pub fn deserialize(body: &str) -> Result<Self> {
        let fields: Vec<&str> = body.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(EncodeError::Malformed(format!(
                "expected at least {} fields, found {}",
                MIN_FIELDS,
                fields.len()
            )));
        }
        if fields[2] != "1" {
            return Err(EncodeError::Malformed(format!(
                "unsupported payment type {:?}",
                fields[2]
            )));
        }

        let amount = match fields[3] {
            "" => None,
            s => Some(
                s.parse::<Decimal>()
                    .map_err(|_| EncodeError::Malformed(format!("bad amount {:?}", s)))?,
            ),
        };
        let due_date = match fields[5] {
            "" => None,
            s => Some(
                NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .map_err(|_| EncodeError::Malformed(format!("bad due date {:?}", s)))?,
            ),
        };

        Ok(Self {
            amount,
            currency: fields[4].to_string(),
            due_date,
            variable_symbol: fields[6].to_string(),
            constant_symbol: fields[7].to_string(),
            specific_symbol: fields[8].to_string(),
            note: fields[10].to_string(),
            iban: fields[12].to_string(),
            bic: fields[13].to_string(),
            beneficiary_name: fields.get(16).map(|s| s.to_string()).unwrap_or_default(),
        })
    }
}

/// Build a PAY by square payload from a payment form.
pub fn encode(form: &PaymentForm) -> Result<Payload> {
    let data = PayBySquareData::from_form(form)?;
    let encoded = pack(data.serialize().as_bytes())?;
    Ok(Payload::new(PayloadFormat::PayBySquare, encoded))
}

/// Build a PAY by square payload straight from extracted fields and a note.
pub fn encode_a(fields: &ExtractedFields, note: &str) -> Result<Payload> {
    encode(&PaymentForm::from_extracted(fields).with_note(note))
}

/// Read a PAY by square payload back into its fields.
pub fn decode(payload: &str) -> Result<PayBySquareData> {
    let body = unpack(payload)?;
    PayBySquareData::deserialize(&body)
}

fn check_iban(iban: &str) -> Result<()> {
    if iban.is_empty() {
        return Err(EncodeError::EmptyIban);
    }

    let invalid = |reason: &str| EncodeError::InvalidIban {
        iban: iban.to_string(),
        reason: reason.to_string(),
    };

    if !(MIN_IBAN_LEN..=MAX_IBAN_LEN).contains(&iban.len()) {
        return Err(invalid("length must be between 15 and 34 characters"));
    }
    if !iban.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
        return Err(invalid("only A-Z and 0-9 are allowed"));
    }
    let bytes = iban.as_bytes();
    if !bytes[..2].iter().all(u8::is_ascii_uppercase) || !bytes[2..4].iter().all(u8::is_ascii_digit)
    {
        return Err(invalid("must start with a country code and two check digits"));
    }

    Ok(())
}

fn pack(body: &[u8]) -> Result<String> {
    pack_with_checksum(crc32fast::hash(body), body)
}

fn pack_with_checksum(checksum: u32, body: &[u8]) -> Result<String> {
    let mut data = Vec::with_capacity(4 + body.len());
    data.extend_from_slice(&checksum.to_le_bytes());
    data.extend_from_slice(body);

    let length = u16::try_from(data.len()).map_err(|_| EncodeError::PayloadTooLarge(data.len()))?;

    let mut compressed = Vec::new();
    lzma_rs::lzma_compress(&mut data.as_slice(), &mut compressed)
        .map_err(|e| EncodeError::Compression(e.to_string()))?;
    let stream = compressed
        .get(LZMA_HEADER_LEN..)
        .ok_or_else(|| EncodeError::Compression("truncated LZMA output".to_string()))?;

    trace!(
        "PAY by square: {} bytes of data compressed to {}",
        data.len(),
        stream.len()
    );

    let mut packed = Vec::with_capacity(4 + stream.len());
    packed.extend_from_slice(&BYSQUARE_HEADER);
    packed.extend_from_slice(&length.to_le_bytes());
    packed.extend_from_slice(stream);

    Ok(BASE32HEX_NOPAD.encode(&packed))
}

fn unpack(payload: &str) -> Result<String> {
    let packed = BASE32HEX_NOPAD
        .decode(payload.trim().as_bytes())
        .map_err(|e| EncodeError::Malformed(format!("not base32hex: {}", e)))?;
    if packed.len() < 4 {
        return Err(EncodeError::Malformed("payload too short".to_string()));
    }
    if packed[0] >> 4 != 0 {
        return Err(EncodeError::Malformed(format!(
            "unsupported by square type {}",
            packed[0] >> 4
        )));
    }
    let length = usize::from(u16::from_le_bytes([packed[2], packed[3]]));

    // Restore the header lzma-rs expects; the unpacked size is left unknown
    // so the decoder reads up to the end marker.
    let mut stream = Vec::with_capacity(LZMA_HEADER_LEN + packed.len() - 4);
    stream.push(LZMA_PROPERTIES);
    stream.extend_from_slice(&LZMA_DICT_SIZE.to_le_bytes());
    stream.extend_from_slice(&u64::MAX.to_le_bytes());
    stream.extend_from_slice(&packed[4..]);

    let mut data = Vec::with_capacity(length);
    let mut reader: &[u8] = &stream;
    lzma_rs::lzma_decompress(&mut reader, &mut data)
        .map_err(|e| EncodeError::Compression(e.to_string()))?;

    if data.len() != length {
        return Err(EncodeError::Malformed(format!(
            "length header says {} bytes, decompressed {}",
            length,
            data.len()
        )));
    }
    if data.len() < 4 {
        return Err(EncodeError::Malformed("missing checksum".to_string()));
    }

    let (checksum, body) = data.split_at(4);
    let expected = u32::from_le_bytes([checksum[0], checksum[1], checksum[2], checksum[3]]);
    let actual = crc32fast::hash(body);
    if expected != actual {
        return Err(EncodeError::Checksum { expected, actual });
    }

    String::from_utf8(body.to_vec())
        .map_err(|_| EncodeError::Malformed("payload is not UTF-8".to_string()))
}
