//! The remote operations exposed by the processing service.
//!
//! Every route, multipart field name and default download filename is fixed
//! per operation, so they all live on one enum rather than being scattered
//! across the tool controllers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One named backend action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Concatenate two or more PDFs in batch order.
    Merge,
    /// Split into one PDF per range, returned as a ZIP.
    SplitByRanges,
    /// Split into one PDF per page, returned as a ZIP.
    SplitEveryPage,
    /// Extract the listed pages into a single PDF.
    ExtractPages,
    /// Count the pages of a PDF; the body is a JSON integer.
    PageCount,
    /// Re-encode a PDF at a given quality.
    Compress,
    /// Rasterise every page, returned as a ZIP of images.
    PdfToImages,
    /// Bind one or more images into a PDF in batch order.
    ImagesToPdf,
}

/// Multipart field name under which the file payload(s) are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileField {
    /// `files`, repeated once per entry.
    Multiple,
    /// `file`, exactly once.
    Single,
}

impl FileField {
    pub fn name(self) -> &'static str {
        match self {
            FileField::Multiple => "files",
            FileField::Single => "file",
        }
    }
}

impl Operation {
    /// Route relative to the configured base URL.
    pub fn route(self) -> &'static str {
        match self {
            Operation::Merge => "/pdfmerge/merge",
            Operation::SplitByRanges => "/pdfsplit/split-by-ranges",
            Operation::SplitEveryPage => "/pdfsplit/split-every-page",
            Operation::ExtractPages => "/pdfsplit/extract-pages",
            Operation::PageCount => "/pdfsplit/page-count",
            Operation::Compress => "/pdfcompress/compress",
            Operation::PdfToImages => "/pdftoimage/convert",
            Operation::ImagesToPdf => "/imagetopdf/convert",
        }
    }

    pub fn file_field(self) -> FileField {
        match self {
            Operation::Merge | Operation::ImagesToPdf => FileField::Multiple,
            _ => FileField::Single,
        }
    }

    /// Scalar parameter names this operation accepts, in attachment order.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            Operation::SplitByRanges => &["ranges"],
            Operation::ExtractPages => &["pages"],
            Operation::Compress => &["quality"],
            Operation::PdfToImages => &["format", "dpi"],
            _ => &[],
        }
    }

    /// Filename offered for the downloaded artifact.
    pub fn default_filename(self) -> &'static str {
        match self {
            Operation::Merge => "merged.pdf",
            Operation::SplitByRanges => "split_pdfs.zip",
            Operation::SplitEveryPage => "split_pages.zip",
            Operation::ExtractPages => "extracted_pages.pdf",
            Operation::PageCount => "page_count.json",
            Operation::Compress => "compressed.pdf",
            Operation::PdfToImages => "pdf_images.zip",
            Operation::ImagesToPdf => "images_to_pdf.pdf",
        }
    }

    /// Generic message shown when the service rejects the request or the
    /// request cannot complete.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Merge => "Failed to merge PDFs. Please try again.",
            Operation::SplitByRanges | Operation::SplitEveryPage | Operation::ExtractPages => {
                "Failed to split PDF. Please check your input and try again."
            }
            Operation::PageCount => "Failed to read PDF file",
            Operation::Compress => "Failed to compress PDF. Please try again.",
            Operation::PdfToImages => "Failed to convert PDF to images. Please try again.",
            Operation::ImagesToPdf => "Failed to convert images to PDF. Please try again.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Merge => "merge",
            Operation::SplitByRanges => "split-by-ranges",
            Operation::SplitEveryPage => "split-every-page",
            Operation::ExtractPages => "extract-pages",
            Operation::PageCount => "page-count",
            Operation::Compress => "compress",
            Operation::PdfToImages => "pdf-to-images",
            Operation::ImagesToPdf => "images-to-pdf",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_file_operations_use_files_field() {
        assert_eq!(Operation::Merge.file_field().name(), "files");
        assert_eq!(Operation::ImagesToPdf.file_field().name(), "files");
        assert_eq!(Operation::Compress.file_field().name(), "file");
        assert_eq!(Operation::PageCount.file_field().name(), "file");
    }

    #[test]
    fn split_variants_share_a_failure_message() {
        assert_eq!(
            Operation::SplitByRanges.failure_message(),
            Operation::ExtractPages.failure_message()
        );
    }

    #[test]
    fn pdf_to_images_params_in_order() {
        assert_eq!(Operation::PdfToImages.param_names(), &["format", "dpi"]);
        assert!(Operation::Merge.param_names().is_empty());
    }
}
