//! Tool controllers: one state machine per operation page.
//!
//! ```text
//!            add files           begin_submit
//!   Empty ───────────────▶ Staged ───────────▶ Submitting
//!     ▲                      ▲  ▲                  │
//!     │   remove / clear     │  └── failure ───────┤
//!     └──────────────────────┘                     │
//!     ▲          success (merge, images→pdf)       │
//!     └────────────────────────────────────────────┘
//!                success (split, compress, pdf→images) ──▶ Staged
//! ```
//!
//! Two shapes share this machine:
//!
//! * [`BatchTool`]: an ordered, reorderable [`crate::pipeline::batch::Batch`]
//!   (merge, images→PDF). Cleared after a successful submit.
//! * [`SingleFileTool`]: one selected PDF plus operation parameters (split,
//!   compress, PDF→images). The file is kept after success so the user can
//!   re-run with different parameters.
//!
//! While `Submitting`, every mutation returns [`MasterDocsError::Busy`].
//! Exactly one [`Notice`] is visible at a time; each new action clears it.

pub mod batch_tool;
pub mod params;
pub mod single;

pub use batch_tool::BatchTool;
pub use params::{CompressParams, Dpi, ImageFormat, PdfToImageParams, Quality, SplitMode, SplitParams};
pub use single::{CompressTool, PdfToImageTool, SingleFileTool, SplitTool, ToolParams};

use crate::error::MasterDocsError;
use crate::operation::Operation;
use serde::Serialize;

/// Where a tool is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ToolState {
    /// Nothing selected; submit disabled.
    #[default]
    Empty,
    /// At least one valid file held; parameters editable.
    Staged,
    /// A request for `operation` is in flight.
    Submitting { operation: Operation },
}

impl ToolState {
    pub fn is_submitting(self) -> bool {
        matches!(self, ToolState::Submitting { .. })
    }

    /// Settle to `Empty`/`Staged` from whether anything is held.
    pub(crate) fn idle(has_files: bool) -> Self {
        if has_files {
            ToolState::Staged
        } else {
            ToolState::Empty
        }
    }

    pub(crate) fn ensure_idle(self) -> Result<(), MasterDocsError> {
        if self.is_submitting() {
            Err(MasterDocsError::Busy)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Something was dropped but the action went through.
    Warning,
    /// The action did not go through.
    Error,
}

/// The single message a tool is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Raised by `finish_submit` when nothing was in flight.
pub(crate) fn not_submitting() -> MasterDocsError {
    MasterDocsError::validation("No submission is in progress")
}
