//! Multi-file tools: merge and images→PDF.

use crate::error::MasterDocsError;
use crate::operation::Operation;
use crate::output::{Artifact, SavedArtifact};
use crate::pipeline::batch::{AppendOutcome, Batch, Direction};
use crate::pipeline::download::DownloadResolver;
use crate::pipeline::input::StagedFile;
use crate::pipeline::submit::{minimum_files, OperationRequest, SubmissionClient};
use crate::pipeline::validate::FileKind;
use crate::tools::{not_submitting, Notice, ToolState};
use tracing::{info, warn};

/// Controller for an ordered batch submitted as one request.
#[derive(Debug, Clone)]
pub struct BatchTool {
    operation: Operation,
    batch: Batch,
    state: ToolState,
    notice: Option<Notice>,
}

struct Messages {
    some_rejected: &'static str,
    nothing_usable: &'static str,
    below_minimum: &'static str,
}

impl BatchTool {
    /// Merge two or more PDFs in batch order.
    pub fn merge() -> Self {
        Self::with(Operation::Merge, FileKind::Pdf)
    }

    /// Bind one or more images into a PDF in batch order.
    pub fn images_to_pdf() -> Self {
        Self::with(Operation::ImagesToPdf, FileKind::Image)
    }

    fn with(operation: Operation, kind: FileKind) -> Self {
        Self {
            operation,
            batch: Batch::new(kind),
            state: ToolState::Empty,
            notice: None,
        }
    }

    fn messages(&self) -> Messages {
        match self.batch.kind() {
            FileKind::Pdf => Messages {
                some_rejected: "Only PDF files are allowed",
                nothing_usable: "Please select at least one PDF file",
                below_minimum: "Please select at least 2 PDF files to merge",
            },
            FileKind::Image => Messages {
                some_rejected: "Only image files are allowed",
                nothing_usable: "Please select at least one image file",
                below_minimum: "Please select at least one image file",
            },
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn files(&self) -> &[StagedFile] {
        self.batch.files()
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn minimum_files(&self) -> usize {
        minimum_files(self.operation)
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.is_submitting() && self.batch.meets_minimum(self.minimum_files())
    }

    fn settle(&mut self) {
        self.state = ToolState::idle(!self.batch.is_empty());
    }

    /// Stage one input event (picked or dropped files).
    ///
    /// Wrong-type files are dropped with a single warning. If nothing in the
    /// event is usable the batch is left as it was and an error is returned.
    pub fn add_files(&mut self, files: Vec<StagedFile>) -> Result<AppendOutcome, MasterDocsError> {
        self.state.ensure_idle()?;
        self.notice = None;
        let msgs = self.messages();

        let outcome = self.batch.append(files);
        match outcome {
            AppendOutcome::Accepted { .. } => {}
            AppendOutcome::PartiallyAccepted { .. } => {
                self.notice = Some(Notice::warning(msgs.some_rejected));
            }
            AppendOutcome::NothingUsable { .. } => {
                self.notice = Some(Notice::error(msgs.nothing_usable));
                return Err(MasterDocsError::validation(msgs.nothing_usable));
            }
        }
        self.settle();
        Ok(outcome)
    }

    /// Remove the entry at `index`; stale indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<StagedFile>, MasterDocsError> {
        self.state.ensure_idle()?;
        self.notice = None;
        let removed = self.batch.remove_at(index);
        self.settle();
        Ok(removed)
    }

    /// Swap the entry at `index` with its neighbour; boundary moves do nothing.
    pub fn move_adjacent(&mut self, index: usize, direction: Direction) -> Result<bool, MasterDocsError> {
        self.state.ensure_idle()?;
        Ok(self.batch.move_adjacent(index, direction))
    }

    /// Empty the batch and clear any message.
    pub fn clear(&mut self) -> Result<(), MasterDocsError> {
        self.state.ensure_idle()?;
        self.batch.clear();
        self.notice = None;
        self.settle();
        Ok(())
    }

    /// Enter `Submitting` and build the request for the current batch.
    pub fn begin_submit(&mut self) -> Result<OperationRequest<'_>, MasterDocsError> {
        self.state.ensure_idle()?;
        self.notice = None;

        if !self.batch.meets_minimum(self.minimum_files()) {
            let msg = self.messages().below_minimum;
            self.notice = Some(Notice::error(msg));
            return Err(MasterDocsError::validation(msg));
        }

        self.state = ToolState::Submitting {
            operation: self.operation,
        };
        Ok(OperationRequest::new(self.operation, self.batch.files()))
    }

    /// Leave `Submitting`. On success the artifact is saved and the batch
    /// cleared; on failure the batch is kept and the error shown.
    pub fn finish_submit(
        &mut self,
        result: Result<Artifact, MasterDocsError>,
        resolver: &DownloadResolver,
    ) -> Result<SavedArtifact, MasterDocsError> {
        if !self.state.is_submitting() {
            return Err(not_submitting());
        }

        match result.and_then(|artifact| resolver.save_default(&artifact)) {
            Ok(saved) => {
                info!("{} complete: {}", self.operation, saved.path.display());
                self.batch.clear();
                self.notice = None;
                self.settle();
                Ok(saved)
            }
            Err(e) => {
                warn!("{} failed: {}", self.operation, e);
                self.notice = Some(Notice::error(e.user_message(self.operation)));
                self.settle();
                Err(e)
            }
        }
    }

    /// Run one full submission: validate, send, save.
    pub async fn submit(
        &mut self,
        client: &SubmissionClient,
        resolver: &DownloadResolver,
    ) -> Result<SavedArtifact, MasterDocsError> {
        let result = {
            let request = self.begin_submit()?;
            client.submit(&request).await
        };
        self.finish_submit(result, resolver)
    }
}
