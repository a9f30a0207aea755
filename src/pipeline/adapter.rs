//! Pipeline adapter: one invocation per request, artifacts to staging.
//!
//! The adapter never hands pipeline-internal objects downstream. Every
//! page is serialised into the request's staging output directory (a
//! structured-data document and a markdown document, each when present)
//! and read back by [`crate::aggregate`]; from there on the request only
//! works with plain data. A fault during invocation or persistence fails
//! the whole request — no partial results.

use crate::error::PipelineError;
use crate::pipeline::OcrPipeline;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Invoke the pipeline once for all `inputs` and persist every page's
/// artifacts into `output_dir`. Returns the number of pages produced.
///
/// Page ordering follows the pipeline's deterministic output ordering
/// (file order, then intra-file page order), which the artifact naming
/// downstream relies on.
pub async fn run(
    pipeline: &dyn OcrPipeline,
    inputs: &[PathBuf],
    output_dir: &Path,
) -> Result<usize, PipelineError> {
    info!("processing {} staged file(s)", inputs.len());
    let pages = pipeline.predict(inputs).await?;

    for page in &pages {
        page.save_to_json(output_dir)?;
        page.save_to_markdown(output_dir)?;
    }
    debug!(
        "persisted artifacts for {} page(s) to {}",
        pages.len(),
        output_dir.display()
    );
    Ok(pages.len())
}
