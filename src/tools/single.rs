//! Single-file tools: split, compress and PDF→images.
//!
//! All three hold one selected PDF plus a parameter set, so they share
//! [`SingleFileTool`] and differ only in their [`ToolParams`].

use crate::error::MasterDocsError;
use crate::operation::Operation;
use crate::output::{Artifact, SavedArtifact};
use crate::pipeline::download::DownloadResolver;
use crate::pipeline::input::StagedFile;
use crate::pipeline::submit::{OperationRequest, SubmissionClient};
use crate::pipeline::validate::{classify, parse_page_list, parse_range_list, FileKind};
use crate::tools::params::{CompressParams, PdfToImageParams, SplitMode, SplitParams};
use crate::tools::{not_submitting, Notice, ToolState};
use tracing::{info, warn};

/// Parameters of a single-file operation.
pub trait ToolParams: Default {
    /// The operation the current parameters would run.
    fn operation(&self) -> Operation;

    /// Validate the parameters and build the request for `file`.
    fn request<'a>(&self, file: &'a StagedFile) -> Result<OperationRequest<'a>, MasterDocsError>;

    /// A new file replaced the selection.
    fn file_selected(&mut self) {}

    /// Reset anything derived from the selected file.
    fn file_removed(&mut self) {}
}

impl ToolParams for CompressParams {
    fn operation(&self) -> Operation {
        Operation::Compress
    }

    fn request<'a>(&self, file: &'a StagedFile) -> Result<OperationRequest<'a>, MasterDocsError> {
        Ok(OperationRequest::new(Operation::Compress, [file]).param("quality", self.quality))
    }
}

impl ToolParams for PdfToImageParams {
    fn operation(&self) -> Operation {
        Operation::PdfToImages
    }

    fn request<'a>(&self, file: &'a StagedFile) -> Result<OperationRequest<'a>, MasterDocsError> {
        Ok(OperationRequest::new(Operation::PdfToImages, [file])
            .param("format", self.format)
            .param("dpi", self.dpi.value()))
    }
}

impl ToolParams for SplitParams {
    fn operation(&self) -> Operation {
        match self.mode {
            SplitMode::Ranges => Operation::SplitByRanges,
            SplitMode::EveryPage => Operation::SplitEveryPage,
            SplitMode::Extract => Operation::ExtractPages,
        }
    }

    fn request<'a>(&self, file: &'a StagedFile) -> Result<OperationRequest<'a>, MasterDocsError> {
        let op = self.operation();
        let request = OperationRequest::new(op, [file]);
        Ok(match self.mode {
            SplitMode::Ranges => request.param("ranges", parse_range_list(&self.ranges)?),
            SplitMode::EveryPage => request,
            SplitMode::Extract => request.param("pages", parse_page_list(&self.pages)?),
        })
    }

    fn file_selected(&mut self) {
        self.page_count = None;
    }

    fn file_removed(&mut self) {
        self.page_count = None;
        self.ranges.clear();
        self.pages.clear();
    }
}

/// Controller holding one selected PDF.
#[derive(Debug, Clone, Default)]
pub struct SingleFileTool<P> {
    file: Option<StagedFile>,
    params: P,
    state: ToolState,
    notice: Option<Notice>,
}

pub type SplitTool = SingleFileTool<SplitParams>;
pub type CompressTool = SingleFileTool<CompressParams>;
pub type PdfToImageTool = SingleFileTool<PdfToImageParams>;

const NOT_A_PDF: &str = "Please select a valid PDF file";
const NO_FILE: &str = "Please select a PDF file";

impl<P: ToolParams> SingleFileTool<P> {
    pub fn new() -> Self {
        Self {
            file: None,
            params: P::default(),
            state: ToolState::Empty,
            notice: None,
        }
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn file(&self) -> Option<&StagedFile> {
        self.file.as_ref()
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    /// Edit parameters; refused while a request is in flight.
    pub fn params_mut(&mut self) -> Result<&mut P, MasterDocsError> {
        self.state.ensure_idle()?;
        Ok(&mut self.params)
    }

    /// Whether the submit button is enabled. Parameter text is checked on
    /// submit so the user gets the grammar message.
    pub fn can_submit(&self) -> bool {
        self.state == ToolState::Staged
    }

    fn settle(&mut self) {
        self.state = ToolState::idle(self.file.is_some());
    }

    /// Select `file`, replacing any current selection. A non-PDF leaves the
    /// current selection in place.
    pub fn select(&mut self, file: StagedFile) -> Result<(), MasterDocsError> {
        self.state.ensure_idle()?;
        self.notice = None;
        if !classify(&file, FileKind::Pdf).is_accepted() {
            warn!("Rejected {} ({}): not a PDF", file.name, file.mime_type);
            self.notice = Some(Notice::error(NOT_A_PDF));
            return Err(MasterDocsError::validation(NOT_A_PDF));
        }
        self.file = Some(file);
        self.params.file_selected();
        self.settle();
        Ok(())
    }

    /// Stage one input event; only its first file is considered.
    pub fn add_files(&mut self, files: Vec<StagedFile>) -> Result<(), MasterDocsError> {
        match files.into_iter().next() {
            Some(first) => self.select(first),
            None => Ok(()),
        }
    }

    /// Drop the selection and anything derived from it.
    pub fn remove(&mut self) -> Result<(), MasterDocsError> {
        self.state.ensure_idle()?;
        self.file = None;
        self.params.file_removed();
        self.notice = None;
        self.settle();
        Ok(())
    }

    /// Enter `Submitting` and build the request from the current parameters.
    pub fn begin_submit(&mut self) -> Result<OperationRequest<'_>, MasterDocsError> {
        self.state.ensure_idle()?;
        self.notice = None;

        let Some(file) = self.file.as_ref() else {
            self.notice = Some(Notice::error(NO_FILE));
            return Err(MasterDocsError::validation(NO_FILE));
        };

        let request = match self.params.request(file).and_then(|r| r.check().map(|_| r)) {
            Ok(r) => r,
            Err(e) => {
                self.notice = Some(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        self.state = ToolState::Submitting {
            operation: request.operation,
        };
        Ok(request)
    }

    /// Leave `Submitting`. The selection is kept either way.
    pub fn finish_submit(
        &mut self,
        result: Result<Artifact, MasterDocsError>,
        resolver: &DownloadResolver,
    ) -> Result<SavedArtifact, MasterDocsError> {
        let ToolState::Submitting { operation } = self.state else {
            return Err(not_submitting());
        };

        let outcome = result.and_then(|artifact| resolver.save_default(&artifact));
        self.settle();
        match outcome {
            Ok(saved) => {
                info!("{} complete: {}", operation, saved.path.display());
                Ok(saved)
            }
            Err(e) => {
                warn!("{} failed: {}", operation, e);
                self.notice = Some(Notice::error(e.user_message(operation)));
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

impl SplitTool {
    /// Select `file` and ask the service for its page count.
    ///
    /// If the count cannot be read the selection is dropped again.
    pub async fn select_and_count(
        &mut self,
        file: StagedFile,
        client: &SubmissionClient,
    ) -> Result<u32, MasterDocsError> {
        self.select(file.clone())?;
        match client.page_count(&file).await {
            Ok(count) => {
                info!("{} has {} page(s)", file.name, count);
                self.params.page_count = Some(count);
                Ok(count)
            }
            Err(e) => {
                warn!("Page count failed for {}: {}", file.name, e);
                self.file = None;
                self.params.file_removed();
                // Any failure here, local or remote, reads the same to the user.
                self.notice = Some(Notice::error(Operation::PageCount.failure_message()));
                self.settle();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::params::{Dpi, ImageFormat, Quality};

    fn pdf(name: &str) -> StagedFile {
        StagedFile::new(name, 1, "application/pdf", format!("/tmp/{name}"))
    }

    #[test]
    fn non_pdf_selection_keeps_existing_file() {
        let mut tool = CompressTool::new();
        tool.select(pdf("a.pdf")).unwrap();
        let err = tool
            .select(StagedFile::new("x.png", 1, "image/png", "/tmp/x.png"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select a valid PDF file");
        assert_eq!(tool.file().map(|f| f.name.as_str()), Some("a.pdf"));
        assert_eq!(tool.state(), ToolState::Staged);
    }

    #[test]
    fn submit_without_file() {
        let mut tool = PdfToImageTool::new();
        assert!(!tool.can_submit());
        let err = tool.begin_submit().unwrap_err();
        assert_eq!(err.to_string(), "Please select a PDF file");
        assert_eq!(tool.notice(), Some(&Notice::error("Please select a PDF file")));
    }

    #[test]
    fn compress_request_carries_quality() {
        let mut tool = CompressTool::new();
        tool.add_files(vec![pdf("a.pdf"), pdf("ignored.pdf")]).unwrap();
        tool.params_mut().unwrap().quality = Quality::new(0.05);
        let req = tool.begin_submit().unwrap();
        assert_eq!(req.operation, Operation::Compress);
        assert_eq!(req.files.len(), 1);
        assert_eq!(req.params, vec![("quality", "0.1".to_string())]);
    }

    #[test]
    fn pdf_to_image_defaults() {
        let mut tool = PdfToImageTool::new();
        assert_eq!(tool.params().format, ImageFormat::Png);
        assert_eq!(tool.params().dpi, Dpi::Medium);
        tool.select(pdf("a.pdf")).unwrap();
        let req = tool.begin_submit().unwrap();
        assert_eq!(
            req.params,
            vec![("format", "png".to_string()), ("dpi", "150".to_string())]
        );
    }

    #[test]
    fn split_grammar_errors_block_submission() {
        let mut tool = SplitTool::new();
        tool.select(pdf("a.pdf")).unwrap();
        tool.params_mut().unwrap().ranges = "1-3,,5".into();
        let err = tool.begin_submit().unwrap_err();
        assert_eq!(err.to_string(), "Invalid format. Use: 1-3, 5, 7-9");
        assert_eq!(tool.state(), ToolState::Staged);

        {
            let p = tool.params_mut().unwrap();
            p.mode = SplitMode::Extract;
            p.pages = String::new();
        }
        let err = tool.begin_submit().unwrap_err();
        assert_eq!(err.to_string(), "Please enter page numbers (e.g., 1, 3, 5)");
    }

    #[test]
    fn split_modes_pick_operation() {
        let mut tool = SplitTool::new();
        tool.select(pdf("a.pdf")).unwrap();
        tool.params_mut().unwrap().ranges = " 1-3, 5 ".into();
        let req = tool.begin_submit().unwrap();
        assert_eq!(req.operation, Operation::SplitByRanges);
        assert_eq!(req.params, vec![("ranges", "1-3, 5".to_string())]);

        let dir = tempfile::tempdir().unwrap();
        let resolver = DownloadResolver::new(dir.path());
        let _ = tool.finish_submit(Err(MasterDocsError::Busy), &resolver);

        tool.params_mut().unwrap().mode = SplitMode::EveryPage;
        let req = tool.begin_submit().unwrap();
        assert_eq!(req.operation, Operation::SplitEveryPage);
        assert!(req.params.is_empty());
    }

    #[test]
    fn params_locked_while_submitting() {
        let mut tool = CompressTool::new();
        tool.select(pdf("a.pdf")).unwrap();
        tool.begin_submit().unwrap();
        assert!(matches!(tool.params_mut(), Err(MasterDocsError::Busy)));
        assert!(matches!(tool.remove(), Err(MasterDocsError::Busy)));
        assert!(matches!(tool.select(pdf("b.pdf")), Err(MasterDocsError::Busy)));
        assert!(matches!(tool.begin_submit(), Err(MasterDocsError::Busy)));
    }

    #[test]
    fn success_keeps_selected_file() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = DownloadResolver::new(dir.path());
        let mut tool = CompressTool::new();
        tool.select(pdf("a.pdf")).unwrap();
        tool.begin_submit().unwrap();
        let saved = tool
            .finish_submit(
                Ok(Artifact {
                    operation: Operation::Compress,
                    data: b"%PDF-small".to_vec(),
                }),
                &resolver,
            )
            .unwrap();
        assert_eq!(saved.path, dir.path().join("compressed.pdf"));
        assert_eq!(tool.state(), ToolState::Staged);
        assert!(tool.file().is_some());
        assert!(tool.can_submit());
    }

    #[test]
    fn replacing_split_file_keeps_text_but_not_count() {
        let mut tool = SplitTool::new();
        tool.select(pdf("a.pdf")).unwrap();
        {
            let p = tool.params_mut().unwrap();
            p.ranges = "1-2".into();
            p.page_count = Some(4);
        }
        tool.select(pdf("b.pdf")).unwrap();
        assert_eq!(tool.params().ranges, "1-2");
        assert_eq!(tool.params().page_count, None);
    }

    #[tokio::test]
    async fn vanished_file_fails_page_count_with_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone.pdf");
        let client = SubmissionClient::new(&crate::config::ClientConfig::default()).unwrap();
        let mut tool = SplitTool::new();

        let err = tool
            .select_and_count(StagedFile::new("gone.pdf", 1, "application/pdf", gone), &client)
            .await
            .unwrap_err();

        assert!(matches!(err, MasterDocsError::FileNotFound { .. }));
        assert!(tool.file().is_none());
        assert_eq!(tool.state(), ToolState::Empty);
        assert_eq!(tool.notice(), Some(&Notice::error("Failed to read PDF file")));
    }

    #[test]
    fn remove_resets_split_fields() {
        let mut tool = SplitTool::new();
        tool.select(pdf("a.pdf")).unwrap();
        {
            let p = tool.params_mut().unwrap();
            p.ranges = "1-2".into();
            p.page_count = Some(4);
        }
        tool.remove().unwrap();
        assert_eq!(tool.state(), ToolState::Empty);
        assert_eq!(tool.params().page_count, None);
        assert!(tool.params().ranges.is_empty());
    }
}
