//! # masterdocs-client
//!
//! Client-side staging and submission for the MasterDocs document service:
//! merge, split, compress, PDF→images and images→PDF.
//!
//! ## Why this crate?
//!
//! The service does all the PDF work. What is left for a client is the part
//! that goes wrong in practice: mixed drops of PDFs and images, half-valid
//! page ranges, double-clicked submit buttons, and a failed upload that
//! silently throws away the user's carefully ordered batch. This crate turns
//! those into explicit types and one state machine per tool so a shell (CLI,
//! GUI, or test) only has to render state and forward events.
//!
//! ## Pipeline Overview
//!
//! ```text
//! picked / dropped files
//!  │
//!  ├─ 1. Input     paths or text/uri-list → StagedFile
//!  ├─ 2. Validate  PDF vs image, range/page grammar
//!  ├─ 3. Batch     ordered, reorderable, type-homogeneous
//!  ├─ 4. Submit    multipart POST to <base>/<route>
//!  └─ 5. Download  response body saved under its fixed filename
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use masterdocs_client::{merge, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Defaults to http://localhost:8080/api and the current directory
//!     let config = ClientConfig::default();
//!     let out = merge(&["a.pdf", "b.pdf"], &config).await?;
//!     println!("saved {}", out.saved.path.display());
//!     Ok(())
//! }
//! ```
//!
//! For interactive shells drive a controller from [`tools`] instead; it keeps
//! the batch, the current message and the in-flight guard between events.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `masterdocs` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! masterdocs-client = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod operation;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod run;
pub mod tools;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::MasterDocsError;
pub use operation::{FileField, Operation};
pub use output::{Artifact, SavedArtifact};
pub use pipeline::batch::{AppendOutcome, Batch, Direction};
pub use pipeline::download::DownloadResolver;
pub use pipeline::input::{format_file_size, stage_paths, stage_uri_list, StagedFile};
pub use pipeline::submit::{OperationRequest, SubmissionClient};
pub use pipeline::validate::{classify, parse_page_list, parse_range_list, FileKind};
pub use progress::{NoopProgressCallback, ProgressCallback, SubmissionProgressCallback};
pub use run::{
    compress, images_to_pdf, merge, page_count, pdf_to_images, run_sync, split, RunOutput,
    SplitRequest,
};
pub use tools::{
    BatchTool, CompressTool, Dpi, ImageFormat, Notice, NoticeLevel, PdfToImageTool, Quality,
    SingleFileTool, SplitMode, SplitTool, ToolState,
};
