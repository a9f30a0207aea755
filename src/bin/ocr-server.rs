//! Gateway server binary.
//!
//! A thin shim over the library crate: maps CLI flags to
//! `ServerConfig`, wires the recognizer pipeline into the service, and
//! serves the axum router.

use anyhow::{Context, Result};
use clap::Parser;
use ocr_bridge::{router, AppState, CommandPipeline, OcrService, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default port with a recognizer from PATH
  ocr-server --pipeline-cmd paddleocr-vl

  # Explicit recognizer path with fixed arguments
  ocr-server --pipeline-cmd /opt/ocr/bin/recognize \
             --pipeline-arg --layout --pipeline-arg --markdown

  # Bind elsewhere
  OCR_HOST=127.0.0.1 OCR_PORT=9090 ocr-server

ENDPOINTS:
  POST /ocr        multipart field `file`  — one document
  POST /ocr/batch  multipart field `files` — several documents, one pipeline call
  GET  /docs       endpoint summary

PIPELINE CONTRACT:
  The recognizer is invoked once per request with the staged file paths
  as trailing arguments and must print one JSON object per recognised
  page on stdout (newline-delimited), in file order then page order.
"#;

/// Serve an external vision-OCR recognizer over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "ocr-server",
    version,
    about = "HTTP gateway for an external vision-language OCR pipeline",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Bind host.
    #[arg(long, env = "OCR_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Bind port.
    #[arg(short, long, env = "OCR_PORT", default_value_t = 8080)]
    port: u16,

    /// External recognizer program invoked once per request.
    #[arg(long, env = "OCR_PIPELINE_CMD", default_value = "paddleocr-vl")]
    pipeline_cmd: PathBuf,

    /// Extra argument passed to the recognizer before the input paths
    /// (repeatable; the env var is split on spaces).
    #[arg(long = "pipeline-arg", env = "OCR_PIPELINE_ARGS", value_delimiter = ' ')]
    pipeline_args: Vec<String>,

    /// Maximum multipart body size in bytes.
    #[arg(long, env = "OCR_MAX_BODY_BYTES", default_value_t = 256 * 1024 * 1024)]
    max_body_bytes: usize,

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
        .init();

    let config = ServerConfig::builder()
        .host(cli.host)
        .port(cli.port)
        .pipeline_program(cli.pipeline_cmd)
        .pipeline_args(cli.pipeline_args)
        .max_body_bytes(cli.max_body_bytes)
        .build()
        .context("invalid server configuration")?;

    tracing::info!(
        "initializing OCR pipeline: {}",
        config.pipeline_program.display()
    );
    let pipeline = CommandPipeline::new(
        config.pipeline_program.clone(),
        config.pipeline_args.clone(),
    );
    let service = OcrService::new(Box::new(pipeline));
    service
        .initialize()
        .await
        .context("OCR pipeline initialisation failed")?;

    let app = router(Arc::new(AppState { service }), config.max_body_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down...");
}
