//! Configuration structures for extraction and payload generation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QrPayError, Result};
use crate::models::payment::{Currency, Region};

/// Main configuration for the qrpay pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrPayConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Payment generation configuration.
    pub payment: PaymentConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Parameters for the external QR renderer.
    pub render: RenderConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Skip IBAN candidates that fail the MOD-97 checksum.
    pub validate_iban: bool,

    /// Currency used when the text names none.
    pub default_currency: Currency,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_iban: false,
            default_currency: Currency::Eur,
        }
    }
}

/// Payment generation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Region to use instead of inferring it from the IBAN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_region: Option<Region>,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length for a PDF to count as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 10,
            min_text_length: 1,
        }
    }
}

/// QR rendering parameters handed to the renderer along with the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Error correction level (L, M, Q, H).
    pub error_correction: String,

    /// Quiet zone width in modules.
    pub border: u32,

    /// Size of one module in pixels.
    pub module_size: u32,

    /// Foreground color.
    pub fill_color: String,

    /// Background color.
    pub back_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            error_correction: "M".to_string(),
            border: 4,
            module_size: 10,
            fill_color: "black".to_string(),
            back_color: "white".to_string(),
        }
    }
}

impl QrPayConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| QrPayError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| QrPayError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: QrPayConfig =
            serde_json::from_str(r#"{ "extraction": { "validate_iban": true } }"#).unwrap();

        assert!(config.extraction.validate_iban);
        assert_eq!(config.extraction.default_currency, Currency::Eur);
        assert_eq!(config.render, RenderConfig::default());
        assert_eq!(config.payment.default_region, None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = QrPayConfig::default();
        config.payment.default_region = Some(Region::Czech);
        config.render.border = 2;
        config.save(&path).unwrap();

        let loaded = QrPayConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            QrPayConfig::from_file(&path),
            Err(QrPayError::Config(_))
        ));
    }
}
