//! Submission client: discover files, call the gateway, persist results.
//!
//! The client prefers one batched call whenever more than one file is
//! queued and batch mode is on — the server runs the pipeline once for
//! the whole batch, which is materially cheaper than N calls. Otherwise
//! files go up sequentially, one call each. A failed call is logged with
//! its status and body and the file (or batch) is skipped; there is no
//! retry.

use crate::config::ClientConfig;
use crate::error::OcrError;
use crate::naming;
use crate::persist;
use crate::regroup;
use crate::types::{BatchOcrResponse, OcrResponse};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Outcome of one client run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Files handed to the server (whether or not the call succeeded).
    pub submitted: usize,
    /// Files whose call failed and was skipped.
    pub failed: usize,
    /// Result files written under the output root.
    pub artifacts_written: usize,
}

/// HTTP client for the gateway.
pub struct OcrClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl OcrClient {
    /// Build a client with the configured per-call timeout. The timeout
    /// is the only cancellation point — once the server starts a
    /// pipeline invocation it runs to completion regardless.
    pub fn new(config: ClientConfig) -> Result<Self, OcrError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// All supported files directly inside `dir`, sorted by path.
    /// Extension matching is case-insensitive.
    pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
        let entries = std::fs::read_dir(dir).map_err(|source| OcrError::InputDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| OcrError::InputDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let is_match = path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(naming::has_allowed_extension)
                    .unwrap_or(false);
            if is_match {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Process everything in the configured input directory and write
    /// results under the output root.
    pub async fn run(&self) -> Result<RunReport, OcrError> {
        let files = Self::discover_inputs(&self.config.input_dir)?;
        if files.is_empty() {
            warn!(
                "no supported files found in {}",
                self.config.input_dir.display()
            );
            return Ok(RunReport::default());
        }
        info!("found {} file(s) to process", files.len());

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|source| OcrError::OutputWrite {
                path: self.config.output_dir.clone(),
                source,
            })?;

        if self.config.batch && files.len() > 1 {
            self.run_batch(&files).await
        } else {
            self.run_sequential(&files).await
        }
    }

    /// One HTTP call per file, in order; failures are skipped.
    async fn run_sequential(&self, files: &[PathBuf]) -> Result<RunReport, OcrError> {
        let mut report = RunReport::default();
        for path in files {
            report.submitted += 1;
            let display_name = file_name(path);
            info!("processing: {}", display_name);
            match self.submit_single(path).await {
                Ok(response) => {
                    info!(
                        "completed: {} ({} pages)",
                        display_name, response.page_count
                    );
                    let base = naming::base_name(&display_name);
                    report.artifacts_written +=
                        persist::save_group(&self.config.output_dir, &base, &response.pages)
                            .await?;
                }
                Err(e) => {
                    error!("failed: {} — {}", display_name, e);
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }

    /// One batched HTTP call for all files.
    async fn run_batch(&self, files: &[PathBuf]) -> Result<RunReport, OcrError> {
        let mut report = RunReport {
            submitted: files.len(),
            ..RunReport::default()
        };
        info!("processing batch of {} files", files.len());
        match self.submit_batch(files).await {
            Ok(response) => {
                info!("batch completed: {} pages", response.page_count);
                for (base, group) in regroup::by_source(response.pages) {
                    report.artifacts_written +=
                        persist::save_group(&self.config.output_dir, &base, &group).await?;
                }
            }
            Err(e) => {
                error!("batch failed: {}", e);
                report.failed = files.len();
            }
        }
        Ok(report)
    }

    /// Submit one file to `POST /ocr`.
    pub async fn submit_single(&self, path: &Path) -> Result<OcrResponse, OcrError> {
        let form = Form::new().part("file", self.file_part(path).await?);
        let response = self
            .http
            .post(&self.config.api_url)
            .multipart(form)
            .send()
            .await?;
        Self::into_payload(response).await
    }

    /// Submit several files to `POST /ocr/batch` in one call.
    pub async fn submit_batch(&self, paths: &[PathBuf]) -> Result<BatchOcrResponse, OcrError> {
        let mut form = Form::new();
        for path in paths {
            form = form.part("files", self.file_part(path).await?);
        }
        let response = self
            .http
            .post(self.config.batch_url())
            .multipart(form)
            .send()
            .await?;
        Self::into_payload(response).await
    }

    async fn file_part(&self, path: &Path) -> Result<Part, OcrError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| OcrError::InputRead {
                path: path.to_path_buf(),
                source,
            })?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name(path))
            .mime_str(mime.as_ref())?;
        Ok(part)
    }

    async fn into_payload<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, OcrError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn discovery_filters_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["b.PDF", "a.png", "skip.txt", "noext"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let found = OcrClient::discover_inputs(dir.path()).expect("discover");
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.PDF"]);
    }

    #[test]
    fn discovery_of_missing_dir_is_an_error() {
        let err = OcrClient::discover_inputs(Path::new("/no/such/dir")).unwrap_err();
        assert!(matches!(err, OcrError::InputDir { .. }));
    }

    #[tokio::test]
    async fn run_on_empty_dir_reports_nothing() {
        let input = tempfile::tempdir().expect("tempdir");
        let output = tempfile::tempdir().expect("tempdir");
        let config = ClientConfig::builder()
            .input_dir(input.path())
            .output_dir(output.path())
            .build()
            .unwrap();
        let client = OcrClient::new(config).expect("client");
        let report = client.run().await.expect("run");
        assert_eq!(report, RunReport::default());
    }
}
