//! Batch command - generate payloads for many invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use qrpay_core::invoice::{InvoiceParser, PaymentParser};
use qrpay_core::models::config::QrPayConfig;
use qrpay_core::models::payment::PaymentForm;
use qrpay_core::payment::{generate, GeneratedPayment};

use super::generate::PaymentReport;
use super::{load_config, read_input};

const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for invoice files (PDF or text)
    #[arg(required = true)]
    pattern: String,

    /// Directory for one JSON report per invoice
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write summary.csv (into the output directory, if given)
    #[arg(long)]
    summary: bool,

    /// Skip files that fail instead of stopping
    #[arg(long)]
    continue_on_error: bool,
}

type Generated = (PaymentForm, GeneratedPayment);

/// What happened to one invoice file.
struct FileOutcome {
    path: PathBuf,
    elapsed_ms: u64,
    result: Result<Generated, String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let started = Instant::now();
    let config = load_config(config_path)?;

    let files = find_invoices(&args.pattern)?;
    eprintln!("{} Found {} invoices", style("ℹ").blue(), files.len());

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let parser = PaymentParser::from_config(&config.extraction);
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        pb.set_message(display_name(&path).to_string());
        let timer = Instant::now();
        let result = process_single_file(&path, &parser, &config);
        let elapsed_ms = timer.elapsed().as_millis() as u64;
        pb.inc(1);

        let result = match result {
            Ok(generated) => {
                for warning in &generated.1.warnings {
                    warn!("{}: {}", path.display(), warning);
                }
                Ok(generated)
            }
            Err(e) if args.continue_on_error => {
                warn!("Skipping {}: {}", path.display(), e);
                Err(e.to_string())
            }
            Err(e) => {
                pb.abandon();
                anyhow::bail!("Processing {} failed: {}", path.display(), e);
            }
        };

        outcomes.push(FileOutcome {
            path,
            elapsed_ms,
            result,
        });
    }

    pb.finish_and_clear();

    for outcome in &outcomes {
        let Ok((form, generated)) = &outcome.result else {
            continue;
        };

        match &args.output_dir {
            Some(dir) => {
                let stem = outcome
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("invoice");
                let report_path = dir.join(format!("{}.json", stem));

                let report = PaymentReport::new(generated, form, &config.render);
                fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
                debug!("Wrote {}", report_path.display());
            }
            None => println!("{}\t{}", outcome.path.display(), generated.payload),
        }
    }

    if args.summary {
        let summary_path = match &args.output_dir {
            Some(dir) => dir.join("summary.csv"),
            None => PathBuf::from("summary.csv"),
        };
        write_summary(&summary_path, &outcomes)?;
        eprintln!("{} Summary: {}", style("✓").green(), summary_path.display());
    }

    print_totals(&outcomes, started.elapsed());
    Ok(())
}

fn find_invoices(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let files: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(Result::ok)
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No invoices (.pdf, .txt) match {}", pattern);
    }
    Ok(files)
}

fn display_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}

fn process_single_file(
    path: &Path,
    parser: &PaymentParser,
    config: &QrPayConfig,
) -> anyhow::Result<Generated> {
    let text = read_input(path, config)?;
    let fields = parser.parse(&text).fields;

    let region = config
        .payment
        .default_region
        .unwrap_or_else(|| fields.inferred_region());
    let form = PaymentForm::from_extracted(&fields).with_region(region);

    let generated = generate(&form)?;
    Ok((form, generated))
}

fn print_totals(outcomes: &[FileOutcome], elapsed: Duration) {
    let failures: Vec<(&Path, &str)> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().err().map(|e| (o.path.as_path(), e.as_str())))
        .collect();

    eprintln!();
    eprintln!(
        "{} {} invoices in {:.2?}: {} successful, {} failed",
        style("✓").green(),
        outcomes.len(),
        elapsed,
        style(outcomes.len() - failures.len()).green(),
        style(failures.len()).red()
    );

    for (path, error) in failures {
        eprintln!("  {} {}: {}", style("✗").red(), path.display(), error);
    }
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "region",
        "iban",
        "amount",
        "currency",
        "variable_symbol",
        "payload",
        "elapsed_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = display_name(&outcome.path);
        let elapsed = outcome.elapsed_ms.to_string();

        match &outcome.result {
            Ok((form, generated)) => {
                let amount = form.amount.to_string();
                let currency = form.currency.map(|c| c.code()).unwrap_or("");
                let record: [&str; 10] = [
                    filename,
                    "ok",
                    generated.region.iban_prefix(),
                    &form.iban,
                    &amount,
                    currency,
                    &form.reference,
                    generated.payload.as_str(),
                    &elapsed,
                    "",
                ];
                wtr.write_record(record)?;
            }
            Err(error) => {
                let record: [&str; 10] =
                    [filename, "failed", "", "", "", "", "", "", &elapsed, error];
                wtr.write_record(record)?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
