//! Shared test fixtures: a deterministic in-memory pipeline and a
//! hand-rolled multipart body builder.

#![allow(dead_code)]

use async_trait::async_trait;
use ocr_bridge::types::{ModelSettings, OcrResultJson};
use ocr_bridge::{naming, OcrPipeline, PipelineError, PipelinePage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A pipeline double producing a configurable number of pages per file
/// stem (default 1), counting invocations, optionally failing.
pub struct FixturePipeline {
    pub calls: Arc<AtomicUsize>,
    pub page_counts: HashMap<String, usize>,
    pub fail: bool,
}

impl FixturePipeline {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            page_counts: HashMap::new(),
            fail: false,
        }
    }

    pub fn with_pages(mut self, stem: &str, count: usize) -> Self {
        self.page_counts.insert(stem.to_string(), count);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl OcrPipeline for FixturePipeline {
    async fn predict(
        &self,
        inputs: &[PathBuf],
    ) -> Result<Vec<Box<dyn PipelinePage>>, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PipelineError::Failed {
                status: "exit status: 1".into(),
                stderr: "recognizer crashed".into(),
            });
        }
        let batch = inputs.len() > 1;
        let mut pages: Vec<Box<dyn PipelinePage>> = Vec::new();
        for input in inputs {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("page")
                .to_string();
            let count = self.page_counts.get(&stem).copied().unwrap_or(1);
            for index in 0..count {
                let indexed = batch || count > 1;
                pages.push(Box::new(FixturePage {
                    name: naming::page_name(&stem, index, indexed),
                    result: sample_result(input, index, count),
                    markdown: format!("# {stem} page {index}\n"),
                }));
            }
        }
        Ok(pages)
    }
}

fn sample_result(input: &Path, index: usize, count: usize) -> OcrResultJson {
    OcrResultJson {
        input_path: input.display().to_string(),
        page_index: Some(index as u32),
        page_count: Some(count as u32),
        width: 1240,
        height: 1754,
        model_settings: ModelSettings::default(),
        parsing_res_list: Vec::new(),
    }
}

struct FixturePage {
    name: String,
    result: OcrResultJson,
    markdown: String,
}

impl PipelinePage for FixturePage {
    fn page_name(&self) -> &str {
        &self.name
    }

    fn save_to_json(&self, dir: &Path) -> Result<(), PipelineError> {
        let path = dir.join(naming::json_artifact(&self.name));
        let data = serde_json::to_vec(&self.result).expect("fixture result serialises");
        std::fs::write(&path, data).map_err(|source| PipelineError::Artifact { path, source })
    }

    fn save_to_markdown(&self, dir: &Path) -> Result<(), PipelineError> {
        let path = dir.join(naming::markdown_artifact(&self.name));
        std::fs::write(&path, &self.markdown)
            .map_err(|source| PipelineError::Artifact { path, source })
    }
}

/// Boundary used by all hand-built multipart bodies.
pub const BOUNDARY: &str = "ocr-bridge-test-boundary";

/// Build a `multipart/form-data` body from `(field, filename, content)`
/// triples.
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Content-Type header value matching [`multipart_body`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
