//! Recognizer-process pipeline: one external invocation per request.
//!
//! The recognizer is any program that accepts file paths as trailing
//! arguments and emits one JSON object per recognised page on stdout
//! (newline-delimited), in file order then intra-file page order:
//!
//! ```text
//! {"input_path": "…/a.pdf", "page_index": 0, "page_count": 2,
//!  "result": { …structured layout document… }, "markdown": "…"}
//! ```
//!
//! `result` and `markdown` are independently optional. The process is run
//! to completion; there is no mid-invocation cancellation. Any spawn
//! failure, non-zero exit, or unparseable output line fails the whole
//! invocation.

use crate::error::PipelineError;
use crate::naming;
use crate::pipeline::{OcrPipeline, PipelinePage};
use crate::types::OcrResultJson;
use async_trait::async_trait;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Cap on how much recognizer stderr is carried into an error message.
const STDERR_SNIPPET_LEN: usize = 2048;

/// Pipeline implementation shelling out to an external recognizer.
pub struct CommandPipeline {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandPipeline {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Locate the recognizer program: a path with separators must exist
    /// as given, a bare name must resolve through `PATH`.
    fn resolve_program(&self) -> Result<PathBuf, PipelineError> {
        if self.program.components().count() > 1 {
            if self.program.is_file() {
                return Ok(self.program.clone());
            }
            return Err(PipelineError::ProgramNotFound {
                program: self.program.clone(),
            });
        }
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        for dir in std::env::split_paths(&path_var) {
            let candidate = dir.join(&self.program);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(PipelineError::ProgramNotFound {
            program: self.program.clone(),
        })
    }
}

#[async_trait]
impl OcrPipeline for CommandPipeline {
    async fn warm_up(&self) -> Result<(), PipelineError> {
        let resolved = self.resolve_program()?;
        debug!("recognizer resolved to {}", resolved.display());
        Ok(())
    }

    async fn predict(
        &self,
        inputs: &[PathBuf],
    ) -> Result<Vec<Box<dyn PipelinePage>>, PipelineError> {
        info!(
            "invoking recognizer '{}' on {} file(s)",
            self.program.display(),
            inputs.len()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .args(inputs)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PipelineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let snippet: String = stderr.chars().take(STDERR_SNIPPET_LEN).collect();
            warn!("recognizer failed: {} — {}", output.status, snippet);
            return Err(PipelineError::Failed {
                status: output.status.to_string(),
                stderr: snippet,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let batch = inputs.len() > 1;
        let mut pages: Vec<Box<dyn PipelinePage>> = Vec::new();
        for (lineno, line) in stdout.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: PageRecord =
                serde_json::from_str(line).map_err(|source| PipelineError::MalformedOutput {
                    line: lineno + 1,
                    source,
                })?;
            pages.push(Box::new(CommandPage::from_record(record, batch)));
        }
        debug!("recognizer produced {} page(s)", pages.len());
        Ok(pages)
    }
}

/// One stdout line of the recognizer.
#[derive(Debug, Deserialize)]
struct PageRecord {
    input_path: PathBuf,
    #[serde(default)]
    page_index: Option<usize>,
    #[serde(default)]
    page_count: Option<usize>,
    #[serde(default)]
    result: Option<OcrResultJson>,
    #[serde(default)]
    markdown: Option<String>,
}

/// A parsed page result holding plain data only; nothing here refers back
/// to the recognizer process.
struct CommandPage {
    name: String,
    result: Option<OcrResultJson>,
    markdown: Option<String>,
}

impl CommandPage {
    fn from_record(record: PageRecord, batch: bool) -> Self {
        let stem = record
            .input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("page")
            .to_string();
        let index = record.page_index.unwrap_or(0);
        // A lone single-page source keeps its bare stem; batch members
        // and multi-page sources are indexed.
        let indexed = batch || record.page_count.unwrap_or(1) > 1;
        Self {
            name: naming::page_name(&stem, index, indexed),
            result: record.result,
            markdown: record.markdown,
        }
    }
}

impl PipelinePage for CommandPage {
    fn page_name(&self) -> &str {
        &self.name
    }

    fn save_to_json(&self, dir: &Path) -> Result<(), PipelineError> {
        let Some(result) = &self.result else {
            return Ok(());
        };
        let path = dir.join(naming::json_artifact(&self.name));
        let data = serde_json::to_vec_pretty(result).map_err(|e| PipelineError::Artifact {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        std::fs::write(&path, data).map_err(|source| PipelineError::Artifact { path, source })
    }

    fn save_to_markdown(&self, dir: &Path) -> Result<(), PipelineError> {
        let Some(markdown) = &self.markdown else {
            return Ok(());
        };
        let path = dir.join(naming::markdown_artifact(&self.name));
        std::fs::write(&path, markdown).map_err(|source| PipelineError::Artifact { path, source })
    }
}
