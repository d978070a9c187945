//! Result types produced by a successful submission.

use crate::operation::Operation;
use serde::Serialize;
use std::path::PathBuf;

/// The opaque body returned by a successful operation.
///
/// Its internal format (PDF, ZIP, image) is never inspected.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub operation: Operation,
    pub data: Vec<u8>,
}

impl Artifact {
    /// Filename the artifact is offered under.
    pub fn suggested_filename(&self) -> &'static str {
        self.operation.default_filename()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Receipt for an artifact written to disk by the download resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedArtifact {
    pub operation: Operation,
    pub path: PathBuf,
    pub bytes: u64,
}
