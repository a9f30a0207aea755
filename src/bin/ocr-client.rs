//! Submission client binary.
//!
//! Maps CLI flags to `ClientConfig` and runs one submission pass over
//! the input directory, with a spinner while the gateway works.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ocr_bridge::{ClientConfig, OcrClient};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Submit everything in ./demo as one batch, results under ./output
  ocr-client

  # Explicit directories and endpoint
  ocr-client --input-dir ./scans --output-dir ./results \
             --api-url http://ocr.internal:8080/ocr

  # One request per file instead of a single batched call
  ocr-client --no-batch

OUTPUT LAYOUT:
  <output-dir>/<base_name>/<page_name>.md    rendered markdown
  <output-dir>/<base_name>/<page_name>.json  structured layout document

SUPPORTED FORMATS:
  pdf, png, jpg, jpeg, bmp, tiff, webp (extensions matched case-insensitively)
"#;

/// Submit documents to an ocr-bridge gateway and collect results.
#[derive(Parser, Debug)]
#[command(
    name = "ocr-client",
    version,
    about = "Submit documents to an ocr-bridge gateway and save results to disk",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory scanned for supported input files.
    #[arg(short, long, env = "OCR_INPUT_DIR", default_value = "./demo")]
    input_dir: PathBuf,

    /// Directory results are written under, one subdirectory per file.
    #[arg(short, long, env = "OCR_OUTPUT_DIR", default_value = "./output")]
    output_dir: PathBuf,

    /// Single-file endpoint URL; the batch endpoint derives from it.
    #[arg(long, env = "OCR_API_URL", default_value = "http://localhost:8080/ocr")]
    api_url: String,

    /// Per-HTTP-call timeout in seconds.
    #[arg(long, env = "OCR_CLIENT_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Submit files one call at a time instead of one batched call.
    #[arg(long, env = "OCR_NO_BATCH")]
    no_batch: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCR_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCR_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::builder()
        .api_url(cli.api_url)
        .input_dir(cli.input_dir)
        .output_dir(cli.output_dir)
        .timeout_secs(cli.timeout)
        .batch(!cli.no_batch)
        .build()
        .context("invalid client configuration")?;

    let client = OcrClient::new(config).context("failed to build HTTP client")?;

    let spinner = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Submitting documents…");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    };

    let report = client.run().await.context("submission run failed")?;
    spinner.finish_and_clear();

    if report.failed == 0 {
        eprintln!(
            "{} {} file(s) processed, {} result file(s) written",
            green("✔"),
            report.submitted,
            report.artifacts_written
        );
    } else {
        eprintln!(
            "{} {}/{} file(s) failed, {} result file(s) written",
            red("✘"),
            report.failed,
            report.submitted,
            report.artifacts_written
        );
        std::process::exit(1);
    }

    Ok(())
}
