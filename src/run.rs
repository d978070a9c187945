//! One-shot entry points: stage paths, drive a tool, save the artifact.
//!
//! Each function builds a fresh tool controller, feeds it the given paths
//! through the same input adapter a picker or drop would use, submits once,
//! and returns where the artifact was written. Use the controllers in
//! [`crate::tools`] directly when you need to reorder, retry, or keep state
//! between submissions.

use crate::config::ClientConfig;
use crate::error::MasterDocsError;
use crate::output::SavedArtifact;
use crate::pipeline::batch::AppendOutcome;
use crate::pipeline::download::DownloadResolver;
use crate::pipeline::input::{stage_paths, StagedFile};
use crate::pipeline::submit::SubmissionClient;
use crate::tools::{
    BatchTool, CompressTool, Dpi, ImageFormat, PdfToImageTool, Quality, SplitMode, SplitTool,
};
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use tracing::info;

/// What a one-shot run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub saved: SavedArtifact,
    /// Set when some inputs were dropped for having the wrong type.
    pub warning: Option<String>,
}

/// How to split a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitRequest {
    /// Range-list text, e.g. `1-3, 5, 7-9`.
    Ranges(String),
    EveryPage,
    /// Page-list text, e.g. `1, 3, 5`.
    Extract(String),
}

fn parts(config: &ClientConfig) -> Result<(SubmissionClient, DownloadResolver), MasterDocsError> {
    Ok((
        SubmissionClient::new(config)?,
        DownloadResolver::new(&config.output_dir),
    ))
}

async fn run_batch<P: AsRef<Path>>(
    mut tool: BatchTool,
    inputs: &[P],
    config: &ClientConfig,
) -> Result<RunOutput, MasterDocsError> {
    let (client, resolver) = parts(config)?;
    let staged = stage_paths(inputs)?;
    let outcome = tool.add_files(staged)?;
    let warning = match outcome {
        AppendOutcome::PartiallyAccepted { .. } => tool.notice().map(|n| n.text.clone()),
        _ => None,
    };
    info!("{}: {} file(s) staged", tool.operation(), tool.files().len());
    let saved = tool.submit(&client, &resolver).await?;
    Ok(RunOutput { saved, warning })
}

/// Merge `inputs` in the given order into `merged.pdf`.
pub async fn merge<P: AsRef<Path>>(
    inputs: &[P],
    config: &ClientConfig,
) -> Result<RunOutput, MasterDocsError> {
    run_batch(BatchTool::merge(), inputs, config).await
}

/// Bind the images in `inputs`, in order, into `images_to_pdf.pdf`.
pub async fn images_to_pdf<P: AsRef<Path>>(
    inputs: &[P],
    config: &ClientConfig,
) -> Result<RunOutput, MasterDocsError> {
    run_batch(BatchTool::images_to_pdf(), inputs, config).await
}

/// Split `input` as requested.
pub async fn split(
    input: impl AsRef<Path>,
    request: SplitRequest,
    config: &ClientConfig,
) -> Result<RunOutput, MasterDocsError> {
    let (client, resolver) = parts(config)?;
    let mut tool = SplitTool::new();
    tool.select(StagedFile::from_path(input)?)?;
    {
        let params = tool.params_mut()?;
        match request {
            SplitRequest::Ranges(text) => {
                params.mode = SplitMode::Ranges;
                params.ranges = text;
            }
            SplitRequest::EveryPage => params.mode = SplitMode::EveryPage,
            SplitRequest::Extract(text) => {
                params.mode = SplitMode::Extract;
                params.pages = text;
            }
        }
    }
    let saved = tool.submit(&client, &resolver).await?;
    Ok(RunOutput {
        saved,
        warning: None,
    })
}

/// Compress `input` at `quality` into `compressed.pdf`.
pub async fn compress(
    input: impl AsRef<Path>,
    quality: Quality,
    config: &ClientConfig,
) -> Result<RunOutput, MasterDocsError> {
    let (client, resolver) = parts(config)?;
    let mut tool = CompressTool::new();
    tool.select(StagedFile::from_path(input)?)?;
    tool.params_mut()?.quality = quality;
    let saved = tool.submit(&client, &resolver).await?;
    Ok(RunOutput {
        saved,
        warning: None,
    })
}

/// Rasterise `input` into `pdf_images.zip`.
pub async fn pdf_to_images(
    input: impl AsRef<Path>,
    format: ImageFormat,
    dpi: Dpi,
    config: &ClientConfig,
) -> Result<RunOutput, MasterDocsError> {
    let (client, resolver) = parts(config)?;
    let mut tool = PdfToImageTool::new();
    tool.select(StagedFile::from_path(input)?)?;
    {
        let params = tool.params_mut()?;
        params.format = format;
        params.dpi = dpi;
    }
    let saved = tool.submit(&client, &resolver).await?;
    Ok(RunOutput {
        saved,
        warning: None,
    })
}

/// Ask the service how many pages `input` has.
pub async fn page_count(
    input: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<u32, MasterDocsError> {
    let client = SubmissionClient::new(config)?;
    let mut tool = SplitTool::new();
    tool.select_and_count(StagedFile::from_path(input)?, &client).await
}

/// Block on any of the async entry points from synchronous code.
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync<T, F>(future: F) -> Result<T, MasterDocsError>
where
    F: Future<Output = Result<T, MasterDocsError>>,
{
    tokio::runtime::Runtime::new()
        .map_err(|e| MasterDocsError::InvalidConfig(format!("Failed to create tokio runtime: {e}")))?
        .block_on(future)
}
