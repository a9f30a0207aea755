//! Process-wide owner of the recognition pipeline.
//!
//! The pipeline is constructed once at startup and injected into every
//! request handler through axum state — never looked up globally. It
//! carries no thread-safety guarantee of its own, so all invocations are
//! serialised behind one async lock: upload receipt and response writing
//! overlap freely across requests, pipeline use does not.

use crate::aggregate;
use crate::error::OcrError;
use crate::pipeline::{adapter, OcrPipeline};
use crate::types::PageData;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::info;

/// Singleton service wrapping the external pipeline with a readiness
/// flag and an invocation lock.
pub struct OcrService {
    pipeline: Mutex<Box<dyn OcrPipeline>>,
    ready: AtomicBool,
}

impl OcrService {
    /// Wrap a pipeline. The service starts not-ready; call
    /// [`OcrService::initialize`] (or [`OcrService::mark_ready`] in
    /// tests) before serving requests.
    pub fn new(pipeline: Box<dyn OcrPipeline>) -> Self {
        Self {
            pipeline: Mutex::new(pipeline),
            ready: AtomicBool::new(false),
        }
    }

    /// Run the pipeline's startup probe and mark the service ready.
    pub async fn initialize(&self) -> Result<(), OcrError> {
        self.pipeline.lock().await.warm_up().await?;
        self.mark_ready();
        info!("OCR pipeline ready");
        Ok(())
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether requests may use the pipeline yet.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Recognise all `inputs`, persisting artifacts into `output_dir`
    /// and reading them back as the page map.
    ///
    /// The pipeline lock is held for the whole invoke-and-persist step;
    /// aggregation afterwards only touches the request's own staging
    /// directory and runs unlocked.
    pub async fn recognize(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
    ) -> Result<BTreeMap<String, PageData>, OcrError> {
        if !self.is_ready() {
            return Err(OcrError::NotReady);
        }
        {
            let pipeline = self.pipeline.lock().await;
            adapter::run(pipeline.as_ref(), inputs, output_dir).await?;
        }
        aggregate::collect_pages(output_dir)
    }
}
