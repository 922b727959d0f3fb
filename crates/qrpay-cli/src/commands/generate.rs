//! Generate command - build a payment payload from an invoice and form edits.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use qrpay_core::invoice::{InvoiceParser, PaymentParser};
use qrpay_core::models::config::{QrPayConfig, RenderConfig};
use qrpay_core::models::payment::{
    Currency, ExtractedFields, PayloadFormat, PaymentForm, Region,
};
use qrpay_core::payment::{generate, GeneratedPayment};

use super::{load_config, print_warnings, read_input, write_output};

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Input file (PDF or text), `-` for stdin. Omit to fill the form by hand.
    input: Option<PathBuf>,

    /// Beneficiary IBAN
    #[arg(long)]
    iban: Option<String>,

    /// Amount to pay
    #[arg(long)]
    amount: Option<Decimal>,

    /// Currency (EUR or CZK)
    #[arg(long)]
    currency: Option<Currency>,

    /// Variable symbol
    #[arg(long)]
    reference: Option<String>,

    /// Message for the beneficiary
    #[arg(long)]
    note: Option<String>,

    /// Invoice region (slovakia or czech); inferred from the IBAN when omitted
    #[arg(long)]
    region: Option<Region>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    due_date: Option<NaiveDate>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON with the payload, form and renderer settings
    Json,
    /// Plain text summary
    Text,
    /// Payload string only
    Raw,
}

/// Generated payload together with what produced it.
#[derive(Serialize)]
pub struct PaymentReport<'a> {
    pub payload: &'a str,
    pub format: PayloadFormat,
    pub region: Region,
    pub form: &'a PaymentForm,
    pub warnings: Vec<String>,
    pub render: &'a RenderConfig,
}

impl<'a> PaymentReport<'a> {
    pub fn new(
        generated: &'a GeneratedPayment,
        form: &'a PaymentForm,
        render: &'a RenderConfig,
    ) -> Self {
        Self {
            payload: generated.payload.as_str(),
            format: generated.payload.format(),
            region: generated.region,
            form,
            warnings: generated.warnings.iter().map(ToString::to_string).collect(),
            render,
        }
    }
}

pub async fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let fields = match &args.input {
        Some(input) => {
            info!("Extracting payment fields from {}", input.display());
            let text = read_input(input, &config)?;
            PaymentParser::from_config(&config.extraction)
                .parse(&text)
                .fields
        }
        None => ExtractedFields {
            currency: config.extraction.default_currency,
            ..ExtractedFields::default()
        },
    };

    let form = build_form(&fields, &args, &config);
    debug!("Payment form: {:?}", form);

    let generated = generate(&form)?;
    print_warnings(&generated.warnings);

    let output = match args.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&PaymentReport::new(&generated, &form, &config.render))?
        }
        OutputFormat::Text => format_text(&generated),
        OutputFormat::Raw => generated.payload.to_string(),
    };

    write_output(args.output.as_deref(), &output)
}

/// Seed the form from extraction output and apply command-line edits.
///
/// Region precedence: `--region`, then the configured default, then the
/// IBAN prefix of the final form.
fn build_form(fields: &ExtractedFields, args: &GenerateArgs, config: &QrPayConfig) -> PaymentForm {
    let mut form = PaymentForm::from_extracted(fields);

    if let Some(iban) = &args.iban {
        form = form.with_iban(iban.trim());
    }
    if let Some(amount) = args.amount {
        form = form.with_amount(amount);
    }
    if let Some(currency) = args.currency {
        form = form.with_currency(Some(currency));
    }
    if let Some(reference) = &args.reference {
        form = form.with_reference(reference.trim());
    }
    if let Some(note) = &args.note {
        form = form.with_note(note.as_str());
    }

    let region = args
        .region
        .or(config.payment.default_region)
        .unwrap_or_else(|| Region::infer(&form.iban));

    form.with_region(region).with_due_date(args.due_date)
}

fn format_text(generated: &GeneratedPayment) -> String {
    let mut output = String::new();

    output.push_str(&format!("Format:  {}\n", generated.payload.format()));
    output.push_str(&format!("Region:  {}\n", generated.region));
    output.push_str(&format!("Payload: {}", generated.payload));

    output
}
