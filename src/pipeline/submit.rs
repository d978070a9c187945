//! Submission client: one multipart `POST` per operation.
//!
//! The client is stateless per call. It never retries and sets no timeout of
//! its own; single-flight is enforced by the tool controllers, not here.
//!
//! ## Request shape
//!
//! ```text
//! POST {base_url}{route}
//! Content-Type: multipart/form-data
//!
//!   files | file   one part per staged file, in batch order
//!   <param>        one text part per scalar parameter
//! ```
//!
//! Any non-2xx status becomes [`MasterDocsError::RemoteRejected`] without
//! looking at the body. Connection-level failures become
//! [`MasterDocsError::TransportFailure`].

use crate::config::ClientConfig;
use crate::error::MasterDocsError;
use crate::operation::{FileField, Operation};
use crate::output::Artifact;
use crate::pipeline::input::StagedFile;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tracing::{debug, info, warn};

/// Lowest and highest compression quality the service accepts.
pub const QUALITY_BOUNDS: (f32, f32) = (0.1, 1.0);

/// The message sent to the service.
///
/// Files are borrowed from whoever staged them; payloads are streamed from
/// disk while the request is sent.
#[derive(Debug, Clone)]
pub struct OperationRequest<'a> {
    pub operation: Operation,
    pub files: Vec<&'a StagedFile>,
    pub params: Vec<(&'static str, String)>,
}

impl<'a> OperationRequest<'a> {
    pub fn new(operation: Operation, files: impl IntoIterator<Item = &'a StagedFile>) -> Self {
        Self {
            operation,
            files: files.into_iter().collect(),
            params: Vec::new(),
        }
    }

    /// Attach a scalar parameter.
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Check file count and parameter set against the operation's contract.
    pub fn check(&self) -> Result<(), MasterDocsError> {
        let op = self.operation;
        let n = self.files.len();
        match op.file_field() {
            FileField::Single if n != 1 => {
                return Err(MasterDocsError::validation(format!(
                    "{op} takes exactly one file, got {n}"
                )));
            }
            FileField::Multiple if n < minimum_files(op) => {
                return Err(MasterDocsError::validation(format!(
                    "{op} needs at least {} file(s), got {n}",
                    minimum_files(op)
                )));
            }
            _ => {}
        }

        let names: Vec<&str> = self.params.iter().map(|(k, _)| *k).collect();
        if names != op.param_names() {
            return Err(MasterDocsError::validation(format!(
                "{op} expects parameters {:?}, got {:?}",
                op.param_names(),
                names
            )));
        }

        if op == Operation::Compress {
            let (lo, hi) = QUALITY_BOUNDS;
            let in_bounds = self
                .params
                .iter()
                .find(|(k, _)| *k == "quality")
                .and_then(|(_, v)| v.parse::<f32>().ok())
                .is_some_and(|q| (lo..=hi).contains(&q));
            if !in_bounds {
                return Err(MasterDocsError::validation(format!(
                    "quality must be between {lo} and {hi}"
                )));
            }
        }
        Ok(())
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }
}

/// Smallest batch an operation accepts.
pub fn minimum_files(operation: Operation) -> usize {
    match operation {
        Operation::Merge => 2,
        _ => 1,
    }
}

/// Sends [`OperationRequest`]s to the configured service.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: Client,
    config: ClientConfig,
}

impl SubmissionClient {
    pub fn new(config: &ClientConfig) -> Result<Self, MasterDocsError> {
        let http = Client::builder()
            .build()
            .map_err(|e| MasterDocsError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Dispatch `request` and resolve its body as an opaque artifact.
    pub async fn submit(&self, request: &OperationRequest<'_>) -> Result<Artifact, MasterDocsError> {
        request.check()?;
        let operation = request.operation;
        let data = self.dispatch(request).await?;
        Ok(Artifact { operation, data })
    }

    /// Ask the service how many pages `file` has.
    pub async fn page_count(&self, file: &StagedFile) -> Result<u32, MasterDocsError> {
        let request = OperationRequest::new(Operation::PageCount, [file]);
        request.check()?;
        let body = self.dispatch(&request).await?;
        serde_json::from_slice::<u32>(&body).map_err(|e| MasterDocsError::InvalidResponse {
            operation: Operation::PageCount,
            detail: format!("expected an integer page count: {e}"),
        })
    }

    async fn dispatch(&self, request: &OperationRequest<'_>) -> Result<Vec<u8>, MasterDocsError> {
        let operation = request.operation;
        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_submit_start(operation, request.files.len(), request.total_bytes());
        }

        let result = self.send(request).await;

        match (&result, cb) {
            (Ok(body), Some(cb)) => cb.on_submit_complete(operation, body.len()),
            (Err(e), Some(cb)) => cb.on_submit_error(operation, &e.to_string()),
            _ => {}
        }
        result
    }

    async fn send(&self, request: &OperationRequest<'_>) -> Result<Vec<u8>, MasterDocsError> {
        let operation = request.operation;
        let form = build_form(request).await?;
        let url = self.config.endpoint(operation.route());
        info!(
            "Submitting {} ({} file(s), {} bytes) to {}",
            operation,
            request.files.len(),
            request.total_bytes(),
            url
        );

        let transport = |e: reqwest::Error| MasterDocsError::TransportFailure {
            operation,
            detail: e.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} rejected: HTTP {}", operation, status);
            return Err(MasterDocsError::RemoteRejected {
                operation,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        info!("{} returned {} bytes", operation, body.len());
        Ok(body.to_vec())
    }
}

/// Assemble the multipart body: file parts first, in order, then scalars.
async fn build_form(request: &OperationRequest<'_>) -> Result<Form, MasterDocsError> {
    let field = request.operation.file_field().name();
    let mut form = Form::new();

    for file in &request.files {
        let open_err = |e: std::io::Error| match e.kind() {
            std::io::ErrorKind::PermissionDenied => MasterDocsError::PermissionDenied {
                path: file.payload.clone(),
            },
            _ => MasterDocsError::FileNotFound {
                path: file.payload.clone(),
            },
        };
        // Streamed from disk with a known length, so the body is never buffered
        // whole and the request still carries a Content-Length.
        let handle = tokio::fs::File::open(&file.payload).await.map_err(open_err)?;
        let len = handle.metadata().await.map_err(open_err)?.len();
        debug!("Attaching {} ({} bytes) as '{}'", file.name, len, field);
        let part = Part::stream_with_length(Body::from(handle), len)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|_| {
                MasterDocsError::validation(format!(
                    "'{}' has an invalid media type '{}'",
                    file.name, file.mime_type
                ))
            })?;
        form = form.part(field, part);
    }

    for (name, value) in &request.params {
        form = form.text(*name, value.clone());
    }
    Ok(form)
}
