//! Decode command - read a payment payload back into its fields.

use clap::Args;

use qrpay_core::invoice::rules::format_iban;
use qrpay_core::payload::{decode, DecodedPayload, PayBySquareData, SpaydFields};

/// Arguments for the decode command.
#[derive(Args)]
pub struct DecodeArgs {
    /// Payload string (PAY by square or SPD*...)
    #[arg(required = true)]
    payload: String,

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

pub async fn run(args: DecodeArgs) -> anyhow::Result<()> {
    let decoded = decode(&args.payload)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&decoded)?,
        OutputFormat::Text => match &decoded {
            DecodedPayload::PayBySquare(data) => format_pay_by_square(data),
            DecodedPayload::QrPlatba(spd) => format_spayd(spd),
        },
    };

    println!("{}", output);
    Ok(())
}

fn format_pay_by_square(data: &PayBySquareData) -> String {
    let mut output = String::from("PAY by square\n");

    output.push_str(&format!("  IBAN:            {}\n", format_iban(&data.iban)));
    if let Some(amount) = data.amount {
        output.push_str(&format!("  Amount:          {} {}\n", amount, data.currency));
    }
    if let Some(due_date) = data.due_date {
        output.push_str(&format!("  Due date:        {}\n", due_date));
    }
    if !data.variable_symbol.is_empty() {
        output.push_str(&format!("  Variable symbol: {}\n", data.variable_symbol));
    }
    if !data.note.is_empty() {
        output.push_str(&format!("  Note:            {}\n", data.note));
    }

    output.trim_end().to_string()
}

fn format_spayd(spd: &SpaydFields) -> String {
    let mut output = format!("QR Platba (SPD {})\n", spd.version);
    for (key, value) in &spd.entries {
        output.push_str(&format!("  {}: {}\n", key, value));
    }
    output.trim_end().to_string()
}
