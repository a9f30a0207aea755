//! Configuration for the gateway server and the submission client.
//!
//! Both configs carry defaults matching the reference deployment and are
//! built through validating builders, so a bad knob fails at startup with
//! an [`OcrError::InvalidConfig`] instead of misbehaving mid-request.

use crate::error::OcrError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default single-file endpoint URL targeted by the client.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/ocr";
/// Default per-call client timeout in seconds. Pipeline invocations are
/// synchronous on the server, so calls can legitimately run for minutes.
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 300;
/// Default cap on the multipart request body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024 * 1024;

/// Gateway server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0".
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// External recognizer program invoked once per request.
    pub pipeline_program: PathBuf,
    /// Extra arguments passed to the recognizer before the input paths.
    pub pipeline_args: Vec<String>,
    /// Maximum accepted multipart body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            pipeline_program: PathBuf::from("paddleocr-vl"),
            pipeline_args: Vec::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: Self::default(),
        }
    }

    /// The socket address string to bind, `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn pipeline_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.pipeline_program = program.into();
        self
    }

    pub fn pipeline_args(mut self, args: Vec<String>) -> Self {
        self.config.pipeline_args = args;
        self
    }

    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    pub fn build(self) -> Result<ServerConfig, OcrError> {
        let c = &self.config;
        if c.host.is_empty() {
            return Err(OcrError::InvalidConfig("host must not be empty".into()));
        }
        if c.pipeline_program.as_os_str().is_empty() {
            return Err(OcrError::InvalidConfig(
                "pipeline program must not be empty".into(),
            ));
        }
        if c.max_body_bytes == 0 {
            return Err(OcrError::InvalidConfig(
                "max body size must be at least 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Submission-client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Single-file endpoint URL; the batch endpoint is derived by
    /// appending `/batch`.
    pub api_url: String,
    /// Directory scanned for supported input files.
    pub input_dir: PathBuf,
    /// Root directory results are written under, one subdirectory per
    /// source file.
    pub output_dir: PathBuf,
    /// Per-HTTP-call timeout in seconds.
    pub timeout_secs: u64,
    /// Submit all queued files in one batched call when more than one is
    /// present. Off means one call per file, sequentially.
    pub batch: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            input_dir: PathBuf::from("./demo"),
            output_dir: PathBuf::from("./output"),
            timeout_secs: DEFAULT_CLIENT_TIMEOUT_SECS,
            batch: true,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// URL of the batch endpoint, derived from [`ClientConfig::api_url`].
    pub fn batch_url(&self) -> String {
        format!("{}/batch", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn batch(mut self, batch: bool) -> Self {
        self.config.batch = batch;
        self
    }

    pub fn build(self) -> Result<ClientConfig, OcrError> {
        let c = &self.config;
        if !c.api_url.starts_with("http://") && !c.api_url.starts_with("https://") {
            return Err(OcrError::InvalidConfig(format!(
                "api_url must be an HTTP(S) URL, got '{}'",
                c.api_url
            )));
        }
        if c.timeout_secs == 0 {
            return Err(OcrError::InvalidConfig("timeout must be ≥ 1s".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr(), "0.0.0.0:8080");
        assert_eq!(c.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn server_builder_rejects_empty_program() {
        let err = ServerConfig::builder()
            .pipeline_program("")
            .build()
            .unwrap_err();
        assert!(matches!(err, OcrError::InvalidConfig(_)));
    }

    #[test]
    fn batch_url_handles_trailing_slash() {
        let c = ClientConfig::builder()
            .api_url("http://localhost:8080/ocr/")
            .build()
            .unwrap();
        assert_eq!(c.batch_url(), "http://localhost:8080/ocr/batch");
    }

    #[test]
    fn client_builder_rejects_non_http_url() {
        let err = ClientConfig::builder()
            .api_url("localhost:8080/ocr")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("HTTP"));
    }
}
