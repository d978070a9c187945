//! Input adapters: turn user-supplied paths into [`StagedFile`]s.
//!
//! Two producers feed the same [`crate::pipeline::batch::Batch::append`]
//! contract:
//!
//! * [`stage_paths`]: an explicit list of paths (the file picker / CLI args)
//! * [`stage_uri_list`]: a `text/uri-list` payload, which is what desktop
//!   drag-and-drop hands over
//!
//! Neither adapter validates media types; that is the batch's job. They only
//! fail when a path cannot be read at all.
//!
//! A [`StagedFile`] holds a handle to the file on disk, not its contents.
//! Bytes are read once, at dispatch time, by the submission client.

use crate::error::MasterDocsError;
use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Media type for PDF documents.
pub const PDF_MIME: &str = "application/pdf";

/// Fallback media type when the extension is unknown.
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// One user-supplied input awaiting submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Display name (the file name component).
    pub name: String,
    pub size_bytes: u64,
    /// Declared media type used for validation.
    pub mime_type: String,
    /// Where the payload lives.
    pub payload: PathBuf,
}

impl StagedFile {
    pub fn new(
        name: impl Into<String>,
        size_bytes: u64,
        mime_type: impl Into<String>,
        payload: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    /// Stat a local file and declare its media type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MasterDocsError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => MasterDocsError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => MasterDocsError::FileNotFound {
                path: path.to_path_buf(),
            },
        })?;
        if !meta.is_file() {
            return Err(MasterDocsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let file = Self::new(name, meta.len(), mime_from_path(path), path);
        debug!(
            "Staged {} ({} bytes, {})",
            file.name, file.size_bytes, file.mime_type
        );
        Ok(file)
    }
}

/// Declared media type for `path`, derived from its extension the way a
/// browser file picker does.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MIME,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => OCTET_STREAM_MIME,
    }
}

/// Stage every path in order. Stops at the first unreadable path.
pub fn stage_paths<I, P>(paths: I) -> Result<Vec<StagedFile>, MasterDocsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().map(StagedFile::from_path).collect()
}

/// Stage the files named by a `text/uri-list` drop payload.
pub fn stage_uri_list(payload: &str) -> Result<Vec<StagedFile>, MasterDocsError> {
    stage_paths(parse_uri_list(payload))
}

/// Extract local paths from a `text/uri-list` payload.
///
/// Blank lines and `#` comments are skipped. `file://` URIs are decoded into
/// local paths; other schemes, and file URIs naming a remote host, are
/// ignored since only local files can be dropped. Lines that are not URIs at
/// all are taken as plain paths.
pub fn parse_uri_list(payload: &str) -> Vec<PathBuf> {
    payload
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|line| match Url::parse(line) {
            Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
            Ok(url) if url.scheme().len() == 1 => {
                // `C:\dir\a.pdf` parses with a one-letter scheme.
                Some(PathBuf::from(line))
            }
            Ok(_) => None,
            Err(_) => Some(PathBuf::from(line)),
        })
        .collect()
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.25 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    let mut i = 0;
    let mut scale = 1u64;
    while i + 1 < UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        i += 1;
    }
    let value = (bytes as f64 / scale as f64 * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_from_path(Path::new("a.PDF")), PDF_MIME);
        assert_eq!(mime_from_path(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("noext")), OCTET_STREAM_MIME);
    }

    #[test]
    fn from_path_reads_size_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.7 body").unwrap();

        let staged = StagedFile::from_path(&path).unwrap();
        assert_eq!(staged.name, "report.pdf");
        assert_eq!(staged.size_bytes, 13);
        assert_eq!(staged.mime_type, PDF_MIME);
        assert_eq!(staged.payload, path);
    }

    #[test]
    fn from_path_missing_file() {
        let err = StagedFile::from_path("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, MasterDocsError::FileNotFound { .. }));
    }

    #[test]
    fn uri_list_decodes_file_uris() {
        let payload = "# dropped\r\nfile:///tmp/My%20Doc.pdf\r\nfile://localhost/tmp/b.png\r\nhttps://example.com/x.pdf\r\n\r\n/tmp/plain.pdf\r\n";
        let paths = parse_uri_list(payload);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/tmp/My Doc.pdf"),
                PathBuf::from("/tmp/b.png"),
                PathBuf::from("/tmp/plain.pdf"),
            ]
        );
    }

    #[test]
    fn uri_list_decodes_multibyte_escapes() {
        let paths = parse_uri_list("file:///tmp/%E4%B8%AD.pdf\nfile:///tmp/a%2\nfile://remote-host/share/c.pdf\n");
        assert_eq!(
            paths,
            vec![PathBuf::from("/tmp/中.pdf"), PathBuf::from("/tmp/a%2")]
        );
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        // GB-sized inputs still render in MB.
        assert_eq!(format_file_size(2 * 1024 * 1024 * 1024), "2048 MB");
    }
}
