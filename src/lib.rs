//! # ocr-bridge
//!
//! HTTP gateway and submission client for an external vision-language
//! OCR pipeline.
//!
//! The recognition pipeline itself (layout detection, OCR, markdown
//! rendering) is an external collaborator — a pre-trained recognizer
//! invoked as a black box. This crate is the orchestration around it:
//! the single/batch upload protocol, the per-request staging lifecycle,
//! the page-name convention that lets a flat batch response be regrouped
//! per source file, and the stable on-disk result layout.
//!
//! ## Request Flow
//!
//! ```text
//! upload(s)
//!  │
//!  ├─ 1. Transport  multipart receipt, extension validation (fail-fast)
//!  ├─ 2. Staging    fresh input/ + output/ pair, destroyed with the request
//!  ├─ 3. Pipeline   one recognizer invocation for all files (serialised)
//!  ├─ 4. Artifacts  per-page json/markdown persisted, then read back
//!  └─ 5. Response   page-name-keyed map; page_count == pages.len()
//!
//! client: parse response ──▶ regroup by source ──▶ <out>/<base>/<page>.{md,json}
//! ```
//!
//! ## Quick Start
//!
//! Run the gateway against a recognizer command:
//!
//! ```bash
//! ocr-server --pipeline-cmd paddleocr-vl --port 8080
//! ```
//!
//! Submit a directory of documents and collect results:
//!
//! ```bash
//! ocr-client --input-dir ./demo --output-dir ./output
//! ```
//!
//! Library use mirrors the binaries:
//!
//! ```rust,no_run
//! use ocr_bridge::{ClientConfig, OcrClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .api_url("http://localhost:8080/ocr")
//!         .input_dir("./demo")
//!         .output_dir("./output")
//!         .build()?;
//!     let report = OcrClient::new(config)?.run().await?;
//!     println!("{} file(s) submitted, {} failed", report.submitted, report.failed);
//!     Ok(())
//! }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod naming;
pub mod persist;
pub mod pipeline;
pub mod regroup;
pub mod server;
pub mod service;
pub mod staging;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{OcrClient, RunReport};
pub use config::{ClientConfig, ServerConfig};
pub use error::{OcrError, PipelineError};
pub use pipeline::command::CommandPipeline;
pub use pipeline::{OcrPipeline, PipelinePage};
pub use server::{router, AppState};
pub use service::OcrService;
pub use types::{BatchOcrResponse, OcrResponse, OcrResultJson, PageData};
