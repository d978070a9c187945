//! Error types for the masterdocs-client library.
//!
//! A single enum, [`MasterDocsError`], covers every failure the library can
//! report. Its variants fall into three groups:
//!
//! * **Local validation** ([`MasterDocsError::ValidationFailed`]): wrong media
//!   type, empty batch, malformed page grammar. Raised before any network
//!   call; the batch is left untouched.
//!
//! * **Remote**: [`MasterDocsError::RemoteRejected`] (non-success HTTP status)
//!   and [`MasterDocsError::TransportFailure`] (the request never completed).
//!   The user sees the same generic message for both; see
//!   [`MasterDocsError::user_message`].
//!
//! * **Environment**: missing input files, unwritable output directory,
//!   invalid configuration.
//!
//! None of these is fatal to a tool controller: every failure leaves it in a
//! state from which the user can retry or fix the input.

use crate::operation::Operation;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the masterdocs-client library.
#[derive(Debug, Error)]
pub enum MasterDocsError {
    // ── Local validation ──────────────────────────────────────────────────
    /// Input rejected before dispatch. `message` is shown to the user verbatim.
    #[error("{message}")]
    ValidationFailed { message: String },

    /// A mutation or a second submit was attempted while a request is in flight.
    #[error("A request is already in progress; wait for it to finish.")]
    Busy,

    // ── Remote errors ─────────────────────────────────────────────────────
    /// The service answered with a non-success status.
    #[error("{operation} rejected by the service: HTTP {status}")]
    RemoteRejected { operation: Operation, status: u16 },

    /// The request could not be completed (connection refused, reset, DNS…).
    #[error("{operation} request failed: {detail}")]
    TransportFailure { operation: Operation, detail: String },

    /// A success response whose body could not be interpreted (page count only).
    #[error("Unexpected response for {operation}: {detail}")]
    InvalidResponse { operation: Operation, detail: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the downloaded artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MasterDocsError {
    /// Shorthand for a [`MasterDocsError::ValidationFailed`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// True when the error was raised locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. } | Self::Busy)
    }

    /// The single line a user should see for this error.
    ///
    /// Remote rejections and transport failures collapse into the operation's
    /// generic failure message; everything else is shown as-is.
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            Self::RemoteRejected { .. }
            | Self::TransportFailure { .. }
            | Self::InvalidResponse { .. } => operation.failure_message().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_is_verbatim() {
        let e = MasterDocsError::validation("Only PDF files are allowed");
        assert_eq!(e.to_string(), "Only PDF files are allowed");
        assert!(e.is_local());
    }

    #[test]
    fn remote_and_transport_share_user_message() {
        let rejected = MasterDocsError::RemoteRejected {
            operation: Operation::Merge,
            status: 500,
        };
        let transport = MasterDocsError::TransportFailure {
            operation: Operation::Merge,
            detail: "connection refused".into(),
        };
        assert!(rejected.to_string().contains("500"));
        assert_eq!(
            rejected.user_message(Operation::Merge),
            transport.user_message(Operation::Merge)
        );
        assert_eq!(
            rejected.user_message(Operation::Merge),
            "Failed to merge PDFs. Please try again."
        );
        assert!(!rejected.is_local());
    }

    #[test]
    fn validation_user_message_passes_through() {
        let e = MasterDocsError::validation("Invalid format. Use: 1, 3, 5");
        assert_eq!(
            e.user_message(Operation::ExtractPages),
            "Invalid format. Use: 1, 3, 5"
        );
    }
}
