//! The seam between the gateway and the external recognition pipeline.
//!
//! The pipeline is a black box with a narrow contract: given an ordered
//! list of local file paths it produces, in deterministic order (file
//! order, then intra-file page order), one result per page across all
//! inputs. Each result can serialise itself into the request's staging
//! output directory as a structured-data document and/or a markdown
//! document.
//!
//! ## Data flow
//!
//! ```text
//! staged inputs ──▶ OcrPipeline::predict ──▶ [PipelinePage]
//!                                               │ save_to_json / save_to_markdown
//!                                               ▼
//!                                        staging output dir ──▶ aggregate
//! ```
//!
//! [`command::CommandPipeline`] is the production implementation,
//! driving an external recognizer process. Tests substitute their own
//! implementations; the rest of the crate only sees the traits.

pub mod adapter;
pub mod command;

use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One recognised page, ready to be persisted into a staging directory.
///
/// The page knows its own name (see [`crate::naming`]); the artifact file
/// names derive from it. Either save call is a no-op when the pipeline
/// did not produce that representation for the page.
pub trait PipelinePage: Send + Sync {
    /// Unique-within-the-request page name, e.g. `report` or `a_1`.
    fn page_name(&self) -> &str;

    /// Write `<page_name>_res.json` into `dir`, if structured data exists.
    fn save_to_json(&self, dir: &Path) -> Result<(), PipelineError>;

    /// Write `<page_name>.md` into `dir`, if markdown exists.
    fn save_to_markdown(&self, dir: &Path) -> Result<(), PipelineError>;
}

/// The external recognition pipeline.
///
/// `predict` is invoked once per request regardless of how many files the
/// request carries; the batch call is materially cheaper than one call
/// per file. The pipeline offers no thread-safety guarantee beyond what
/// [`crate::service::OcrService`] enforces, which serialises all
/// invocations behind one lock.
#[async_trait]
pub trait OcrPipeline: Send + Sync {
    /// Startup probe. Called once before the service is marked ready.
    async fn warm_up(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Recognise every page of every input, all-or-nothing.
    ///
    /// Callers guarantee each path exists and carries a supported
    /// extension. A fault anywhere fails the whole invocation; no
    /// partial results are reported for files processed before it.
    async fn predict(
        &self,
        inputs: &[PathBuf],
    ) -> Result<Vec<Box<dyn PipelinePage>>, PipelineError>;
}
