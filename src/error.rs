//! Error types for ocr-bridge.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`PipelineError`] — a fault inside one pipeline invocation (spawn
//!   failure, non-zero exit, unparseable output, artifact write). The
//!   invocation is all-or-nothing, so one of these aborts the whole
//!   request it belongs to.
//!
//! * [`OcrError`] — everything a request or client run can fail with,
//!   including validation and transport. The server maps each variant to
//!   an HTTP status; validation messages are surfaced verbatim to the
//!   caller, processing faults carry their cause.

use std::path::PathBuf;
use thiserror::Error;

/// A fault raised by the external recognition pipeline or while
/// persisting its per-page artifacts.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configured recognizer program could not be found.
    #[error("pipeline program not found: '{program}'")]
    ProgramNotFound { program: PathBuf },

    /// Spawning the recognizer process failed.
    #[error("failed to spawn pipeline '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The recognizer exited unsuccessfully.
    #[error("pipeline exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// A line of pipeline output was not a valid page record.
    #[error("malformed pipeline output at line {line}: {source}")]
    MalformedOutput {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A page artifact could not be written to the staging directory.
    #[error("failed to persist page artifact '{path}': {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All errors surfaced by the gateway and the submission client.
#[derive(Debug, Error)]
pub enum OcrError {
    // ── Validation (HTTP 400) ─────────────────────────────────────────
    /// The uploaded file's extension is not in the allow-set.
    #[error("Unsupported file type '{filename}'. Allowed: pdf, png, jpg, jpeg, bmp, tiff, webp")]
    UnsupportedExtension { filename: String },

    /// A batch request arrived with no files at all.
    #[error("No files provided")]
    NoFiles,

    /// The single-file endpoint saw no `file` field.
    #[error("No file provided in multipart field '{field}'")]
    MissingFile { field: &'static str },

    /// The multipart body itself could not be decoded.
    #[error("Invalid multipart request: {0}")]
    BadMultipart(String),

    // ── Service state (HTTP 503) ──────────────────────────────────────
    /// The pipeline has not finished initialising.
    #[error("OCR pipeline not initialized")]
    NotReady,

    // ── Processing (HTTP 500) ─────────────────────────────────────────
    /// The pipeline invocation failed; no partial results are reported.
    #[error("OCR processing failed: {0}")]
    Processing(#[from] PipelineError),

    /// The staging area could not be created or written.
    #[error("staging area error: {source}")]
    Staging {
        #[source]
        source: std::io::Error,
    },

    /// A persisted artifact could not be read back.
    #[error("failed to read result artifact '{path}': {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read-back structured-data artifact was not valid JSON.
    #[error("invalid result artifact '{path}': {source}")]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── Client side ───────────────────────────────────────────────────
    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The HTTP call itself failed (connect, timeout, decode).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The client's input directory could not be scanned.
    #[error("failed to read input directory '{path}': {source}")]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file queued for submission could not be read.
    #[error("failed to read input file '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a result file under the output root failed.
    #[error("failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config ────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OcrError {
    /// True for errors caused by the caller's input (HTTP 400 class).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            OcrError::UnsupportedExtension { .. }
                | OcrError::NoFiles
                | OcrError::MissingFile { .. }
                | OcrError::BadMultipart(_)
        )
    }
}
