//! Subcommands and the input handling they share.

pub mod batch;
pub mod config;
pub mod decode;
pub mod extract;
pub mod generate;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use console::style;
use tracing::debug;

use qrpay_core::models::config::QrPayConfig;
use qrpay_core::pdf::{PdfExtractor, PdfProcessor};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("qrpay")
        .join("config.json")
}

/// Load the configuration from an explicit path, the default location, or
/// fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<QrPayConfig> {
    if let Some(path) = config_path {
        return Ok(QrPayConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(QrPayConfig::from_file(&default_path)?)
    } else {
        Ok(QrPayConfig::default())
    }
}

/// Read invoice text from a PDF, a text file, or stdin (`-`).
pub fn read_input(input: &Path, config: &QrPayConfig) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension == "pdf" {
        let data = fs::read(input)?;
        let mut extractor = PdfExtractor::with_config(&config.pdf);
        extractor.load(&data)?;
        debug!("PDF has {} pages", extractor.page_count());

        let text = extractor.extract_text()?;
        if text.trim().len() < config.pdf.min_text_length {
            anyhow::bail!(
                "No text could be extracted from {}. Scanned invoices need OCR first.",
                input.display()
            );
        }
        Ok(text)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// Write output to a file, or print it to stdout.
pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Print non-fatal warnings to stderr.
pub fn print_warnings<I, W>(warnings: I)
where
    I: IntoIterator<Item = W>,
    W: std::fmt::Display,
{
    for warning in warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }
}
