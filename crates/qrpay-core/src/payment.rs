//! Encoder selection and payload generation for a submitted payment form.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::PaymentError;
use crate::models::payment::{
    PayloadFormat, Payload, PaymentForm, Region, RegionMismatch,
};
use crate::payload::{pay_by_square, qr_platba};

/// Encoder chosen for a submission.
pub type EncoderVariant = PayloadFormat;

/// Outcome of encoder selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Encoder to run, always the one of the selected region.
    pub variant: EncoderVariant,
    /// Set when the IBAN prefix does not fit the selected region.
    pub warning: Option<RegionMismatch>,
}

/// Pick the encoder for the user's region.
///
/// The region is never corrected from the IBAN; a disagreeing prefix only
/// produces a warning.
pub fn select(iban: &str, region: Region) -> Selection {
    let warning = (!region.matches_iban(iban)).then(|| RegionMismatch {
        selected: region,
        iban_prefix: iban.trim_start().chars().take(2).collect(),
    });

    Selection {
        variant: region.payload_format(),
        warning,
    }
}

/// A generated payment payload with the warnings raised on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPayment {
    /// Payload string for the QR renderer.
    pub payload: Payload,
    /// Region the payload was generated for.
    pub region: Region,
    /// Non-fatal warnings.
    pub warnings: Vec<RegionMismatch>,
}

/// Generate the payload for a submitted form.
///
/// An empty IBAN stops generation before any encoder runs.
pub fn generate(form: &PaymentForm) -> Result<GeneratedPayment, PaymentError> {
    if form.iban.trim().is_empty() {
        return Err(PaymentError::MissingIdentifier);
    }

    let selection = select(&form.iban, form.region);
    let mut warnings = Vec::new();
    if let Some(mismatch) = selection.warning {
        warn!("{}", mismatch);
        warnings.push(mismatch);
    }

    info!("Generating {} payload", selection.variant);
    let payload = match selection.variant {
        PayloadFormat::PayBySquare => pay_by_square::encode(form)?,
        PayloadFormat::QrPlatba => qr_platba::encode(form),
    };

    Ok(GeneratedPayment {
        payload,
        region: form.region,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use crate::models::payment::Currency;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_select_matching_region() {
        let selection = select("SK3112000000198742637541", Region::Slovakia);
        assert_eq!(selection.variant, PayloadFormat::PayBySquare);
        assert_eq!(selection.warning, None);

        let selection = select("CZ6508000000192000145399", Region::Czech);
        assert_eq!(selection.variant, PayloadFormat::QrPlatba);
        assert_eq!(selection.warning, None);
    }

    #[test]
    fn test_select_mismatch_keeps_user_choice() {
        let selection = select("SK3112000000198742637541", Region::Czech);
        assert_eq!(selection.variant, PayloadFormat::QrPlatba);
        assert_eq!(
            selection.warning,
            Some(RegionMismatch {
                selected: Region::Czech,
                iban_prefix: "SK".to_string(),
            })
        );
    }

    #[test]
    fn test_generate_mismatch_still_produces_payload() {
        let form = PaymentForm::default()
            .with_iban("SK3112000000198742637541")
            .with_amount(Decimal::new(1000, 2))
            .with_currency(Some(Currency::Eur))
            .with_region(Region::Czech);

        let generated = generate(&form).unwrap();
        assert_eq!(
            generated.payload.as_str(),
            "SPD*1.0*ACC:SK3112000000198742637541*AM:10.00*CC:EUR*"
        );
        assert_eq!(generated.warnings.len(), 1);
    }

    #[test]
    fn test_generate_slovak_payload() {
        let form = PaymentForm::default().with_iban("SK3112000000198742637541");

        let generated = generate(&form).unwrap();
        assert_eq!(generated.payload.format(), PayloadFormat::PayBySquare);
        assert_eq!(generated.region, Region::Slovakia);
        assert!(generated.warnings.is_empty());
    }

    #[test]
    fn test_generate_requires_iban_for_both_regions() {
        for region in Region::ALL {
            let form = PaymentForm::default().with_iban("  ").with_region(region);
            assert_eq!(generate(&form), Err(PaymentError::MissingIdentifier));
        }
    }

    #[test]
    fn test_generate_reports_encoder_errors() {
        let form = PaymentForm::default()
            .with_iban("SK31 lowercase")
            .with_region(Region::Slovakia);

        assert!(matches!(
            generate(&form),
            Err(PaymentError::Encode(EncodeError::InvalidIban { .. }))
        ));
    }
}
