//! Download resolver: persist an artifact under a given filename.
//!
//! Each save writes into a fresh [`tempfile::NamedTempFile`] in the target
//! directory and renames it into place. The temp file is the only transient
//! handle; it is removed on drop if anything fails, so repeated saves never
//! leave stray files behind and readers never see a half-written artifact.

use crate::error::MasterDocsError;
use crate::output::{Artifact, SavedArtifact};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Saves artifacts into one directory.
#[derive(Debug, Clone)]
pub struct DownloadResolver {
    dir: PathBuf,
}

impl DownloadResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `artifact` to `<dir>/<filename>`, replacing any existing file.
    ///
    /// `filename` is used as given; callers pass the operation's default name.
    pub fn save(&self, artifact: &Artifact, filename: &str) -> Result<SavedArtifact, MasterDocsError> {
        let path = self.dir.join(filename);
        let write_err = |source: std::io::Error| MasterDocsError::OutputWriteFailed {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(&artifact.data).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        info!("Saved {} bytes to {}", artifact.len(), path.display());
        Ok(SavedArtifact {
            operation: artifact.operation,
            path,
            bytes: artifact.len() as u64,
        })
    }

    /// Save under the artifact's default filename.
    pub fn save_default(&self, artifact: &Artifact) -> Result<SavedArtifact, MasterDocsError> {
        self.save(artifact, artifact.suggested_filename())
    }
}
