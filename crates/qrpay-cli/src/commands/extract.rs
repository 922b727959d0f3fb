//! Extract command - read payment fields from a single invoice.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use qrpay_core::invoice::{ExtractionResult, InvoiceParser, PaymentParser};
use qrpay_core::invoice::rules::format_iban;
use qrpay_core::models::payment::{ExtractedFields, Region};

use super::{load_config, print_warnings, read_input, write_output};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or text), `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

#[derive(Serialize)]
struct ExtractReport<'a> {
    #[serde(flatten)]
    fields: &'a ExtractedFields,
    region: Region,
    warnings: &'a [String],
    processing_time_ms: u64,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    info!("Extracting payment fields from {}", args.input.display());
    let text = read_input(&args.input, &config)?;

    let result = PaymentParser::from_config(&config.extraction).parse(&text);
    print_warnings(&result.warnings);

    let output = match args.format {
        OutputFormat::Json => format_json(&result)?,
        OutputFormat::Text => format_text(&result),
    };

    write_output(args.output.as_deref(), &output)
}

fn format_json(result: &ExtractionResult) -> anyhow::Result<String> {
    let report = ExtractReport {
        fields: &result.fields,
        region: result.fields.inferred_region(),
        warnings: &result.warnings,
        processing_time_ms: result.processing_time_ms,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn format_text(result: &ExtractionResult) -> String {
    let fields = &result.fields;
    let mut output = String::new();

    output.push_str(&format!("IBAN:            {}\n", format_iban(&fields.iban)));
    output.push_str(&format!("Amount:          {} {}\n", fields.amount, fields.currency));
    output.push_str(&format!("Variable symbol: {}\n", fields.reference));
    output.push_str(&format!("Region:          {}", fields.inferred_region()));

    output
}
