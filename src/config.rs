//! Configuration for talking to the processing service.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The base URL is an explicit value handed to
//! [`crate::pipeline::submit::SubmissionClient::new`]; nothing in the crate
//! reads it from global state.

use crate::error::MasterDocsError;
use crate::progress::ProgressCallback;
use once_cell::sync::Lazy;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

static DEFAULT_URL: Lazy<Url> = Lazy::new(|| Url::parse(DEFAULT_BASE_URL).unwrap());

/// Configuration shared by the submission client and the download resolver.
///
/// # Example
/// ```rust
/// use masterdocs_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://docs.example.com/api")
///     .output_dir("/tmp/out")
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url.as_str(), "https://docs.example.com/api");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Root every operation route is appended to. Default: [`DEFAULT_BASE_URL`].
    pub base_url: Url,

    /// Directory downloaded artifacts are saved into. Default: `.`.
    pub output_dir: PathBuf,

    /// Optional hooks fired around each request.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.clone(),
            output_dir: PathBuf::from("."),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("output_dir", &self.output_dir)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn SubmissionProgressCallback>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            progress_callback: None,
        }
    }

    /// Absolute URL for `route`, preserving any path prefix of the base URL.
    pub fn endpoint(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }
}

/// Builder for [`ClientConfig`].
pub struct ClientConfigBuilder {
    base_url: String,
    output_dir: PathBuf,
    progress_callback: Option<ProgressCallback>,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating the base URL.
    pub fn build(self) -> Result<ClientConfig, MasterDocsError> {
        let raw = self.base_url.trim();
        let base_url = Url::parse(raw).map_err(|e| {
            MasterDocsError::InvalidConfig(format!("base URL '{raw}' is not a valid URL: {e}"))
        })?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(MasterDocsError::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(MasterDocsError::InvalidConfig(
                "output directory must not be empty".into(),
            ));
        }
        Ok(ClientConfig {
            base_url,
            output_dir: self.output_dir,
            progress_callback: self.progress_callback,
        })
    }
}
