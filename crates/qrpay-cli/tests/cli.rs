use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SLOVAK_INVOICE: &str = "\
Faktúra 2024015
IBAN: SK31 1200 0000 1987 4263 7541
Variabilný symbol: 2024015
Spolu k úhrade: 149,90 EUR
";

const CZECH_INVOICE: &str = "\
Faktura 2023001
Číslo účtu: CZ65 0800 0000 1920 0014 5399
VS: 2023001
Celkem: 250,00 Kč
";

/// Command with its configuration directory pointed at a scratch location.
fn qrpay(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("qrpay").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path());
    cmd
}

fn write_invoice(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_extract_json() {
    let home = TempDir::new().unwrap();
    let invoice = write_invoice(home.path(), "invoice.txt", SLOVAK_INVOICE);

    qrpay(&home)
        .args(["extract", &invoice])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""iban": "SK3112000000198742637541""#,
        ))
        .stdout(predicate::str::contains(r#""reference": "2024015""#))
        .stdout(predicate::str::contains(r#""region": "slovakia""#));
}

#[test]
fn test_extract_missing_file() {
    let home = TempDir::new().unwrap();

    qrpay(&home)
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_generate_czech_raw() {
    let home = TempDir::new().unwrap();
    let invoice = write_invoice(home.path(), "faktura.txt", CZECH_INVOICE);

    qrpay(&home)
        .args(["generate", &invoice, "--note", "invoice", "--format", "raw"])
        .assert()
        .success()
        .stdout(
            "SPD*1.0*ACC:CZ6508000000192000145399*AM:250.00*CC:CZK*MSG:INVOICE*X-VS:2023001*\n",
        );
}

#[test]
fn test_generate_from_stdin() {
    let home = TempDir::new().unwrap();

    qrpay(&home)
        .args(["generate", "-", "--format", "raw"])
        .write_stdin(CZECH_INVOICE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "SPD*1.0*ACC:CZ6508000000192000145399*",
        ));
}

#[test]
fn test_generate_region_mismatch_warns() {
    let home = TempDir::new().unwrap();

    qrpay(&home)
        .args([
            "generate",
            "--iban",
            "SK3112000000198742637541",
            "--amount",
            "10",
            "--region",
            "czech",
            "--format",
            "raw",
        ])
        .assert()
        .success()
        .stdout("SPD*1.0*ACC:SK3112000000198742637541*AM:10.00*CC:EUR*\n")
        .stderr(predicate::str::contains("does not start with CZ"));
}

#[test]
fn test_generate_without_iban_fails() {
    let home = TempDir::new().unwrap();

    qrpay(&home)
        .args(["generate", "--amount", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IBAN is required"));
}

#[test]
fn test_generate_invalid_reference_fails() {
    let home = TempDir::new().unwrap();
    let invoice = write_invoice(home.path(), "faktura.txt", SLOVAK_INVOICE);

    qrpay(&home)
        .args(["generate", &invoice, "--reference", "12AB"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid variable symbol"));
}

#[test]
fn test_generate_then_decode() {
    let home = TempDir::new().unwrap();
    let invoice = write_invoice(home.path(), "faktura.txt", SLOVAK_INVOICE);

    let output = qrpay(&home)
        .args(["generate", &invoice, "--note", "test", "--format", "raw"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let payload = String::from_utf8(output.stdout).unwrap();

    qrpay(&home)
        .args(["decode", payload.trim()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""format": "pay_by_square""#))
        .stdout(predicate::str::contains(
            r#""iban": "SK3112000000198742637541""#,
        ))
        .stdout(predicate::str::contains(r#""variable_symbol": "2024015""#));
}

#[test]
fn test_generate_json_carries_render_settings() {
    let home = TempDir::new().unwrap();
    let invoice = write_invoice(home.path(), "faktura.txt", SLOVAK_INVOICE);

    qrpay(&home)
        .args(["generate", &invoice])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""format": "pay_by_square""#))
        .stdout(predicate::str::contains(r#""error_correction": "M""#));
}

#[test]
fn test_decode_spd_text() {
    let home = TempDir::new().unwrap();

    qrpay(&home)
        .args([
            "decode",
            "SPD*1.0*ACC:CZ6508000000192000145399*AM:250.00*",
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("AM: 250.00"));
}

#[test]
fn test_decode_garbage_fails() {
    let home = TempDir::new().unwrap();

    qrpay(&home)
        .args(["decode", "not a payload"])
        .assert()
        .failure();
}

#[test]
fn test_batch_with_summary() {
    let home = TempDir::new().unwrap();
    let invoices = home.path().join("invoices");
    fs::create_dir_all(&invoices).unwrap();
    write_invoice(&invoices, "sk.txt", SLOVAK_INVOICE);
    write_invoice(&invoices, "cz.txt", CZECH_INVOICE);
    let out = home.path().join("out");

    qrpay(&home)
        .args([
            "batch",
            &format!("{}/*.txt", invoices.display()),
            "--output-dir",
            &out.to_string_lossy(),
            "--summary",
        ])
        .assert()
        .success();

    assert!(out.join("sk.json").exists());
    assert!(out.join("cz.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("CZ6508000000192000145399"));
    assert!(summary.contains("SPD*1.0*"));
}

#[test]
fn test_batch_stops_on_error() {
    let home = TempDir::new().unwrap();
    let invoices = home.path().join("invoices");
    fs::create_dir_all(&invoices).unwrap();
    write_invoice(&invoices, "broken.txt", "no payment data here");
    let pattern = format!("{}/*.txt", invoices.display());

    qrpay(&home)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IBAN is required"));

    qrpay(&home)
        .args(["batch", &pattern, "--continue-on-error"])
        .assert()
        .success()
        .stderr(predicate::str::contains("0 successful, 1 failed"));
}

#[test]
fn test_config_init_set_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("qrpay.json");
    let config = config.to_string_lossy();

    qrpay(&home)
        .args(["--config", &config, "config", "init"])
        .assert()
        .success();

    qrpay(&home)
        .args(["--config", &config, "config", "set", "payment.default_region", "czech"])
        .assert()
        .success();

    qrpay(&home)
        .args(["--config", &config, "config", "get", "payment.default_region"])
        .assert()
        .success()
        .stdout("\"czech\"\n");

    qrpay(&home)
        .args(["--config", &config, "config", "set", "render.border", "many"])
        .assert()
        .failure();
}

#[test]
fn test_config_default_region_applies() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("qrpay.json");
    fs::write(&config, r#"{ "payment": { "default_region": "czech" } }"#).unwrap();
    let invoice = write_invoice(home.path(), "faktura.txt", SLOVAK_INVOICE);

    qrpay(&home)
        .args([
            "--config",
            &config.to_string_lossy(),
            "generate",
            &invoice,
            "--format",
            "raw",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("SPD*1.0*ACC:SK3112000000198742637541*"));
}
