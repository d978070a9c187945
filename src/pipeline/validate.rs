//! Validation rules: pure predicates applied before anything is staged or sent.
//!
//! Two families:
//!
//! * **Media type**: [`classify`] accepts or rejects a [`StagedFile`] for a
//!   [`FileKind`]. Documents must declare exactly `application/pdf`; images
//!   only need an `image/` prefix.
//! * **Page grammars**: [`parse_range_list`] (`1-3, 5, 7-9`) and
//!   [`parse_page_list`] (`1, 3, 5`). Both trim the whole input, allow
//!   whitespace after each comma, and reject empty or malformed text with the
//!   message the user should see.
//!
//! Page numbers are not checked against the document here; the service owns
//! that decision.

use crate::error::MasterDocsError;
use crate::pipeline::input::{StagedFile, PDF_MIME};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Prefix shared by every image media type.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// What kind of file an operation expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A PDF document.
    Pdf,
    /// Any raster or vector image.
    Image,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accepted,
    Rejected,
}

impl Classification {
    pub fn is_accepted(self) -> bool {
        self == Classification::Accepted
    }
}

/// Accept or reject `file` for `expected`, from its declared media type only.
pub fn classify(file: &StagedFile, expected: FileKind) -> Classification {
    let ok = match expected {
        FileKind::Pdf => file.mime_type == PDF_MIME,
        FileKind::Image => file.mime_type.starts_with(IMAGE_MIME_PREFIX),
    };
    if ok {
        Classification::Accepted
    } else {
        Classification::Rejected
    }
}

// ── Page grammars ────────────────────────────────────────────────────────────

static RE_RANGE_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(-\d+)?)(,\s*\d+(-\d+)?)*$").unwrap());

static RE_PAGE_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(,\s*\d+)*$").unwrap());

/// One token of a range list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageSpan {
    Single(u32),
    /// Inclusive `start-end`, exactly as typed (no ordering check).
    Range(u32, u32),
}

/// A validated range list, e.g. `1-3, 5, 7-9`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeList {
    text: String,
    spans: Vec<PageSpan>,
}

impl RangeList {
    /// The trimmed text as it is sent to the service.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[PageSpan] {
        &self.spans
    }
}

impl fmt::Display for RangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A validated page list, e.g. `1, 3, 5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageList {
    text: String,
    pages: Vec<u32>,
}

impl PageList {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn pages(&self) -> &[u32] {
        &self.pages
    }
}

impl fmt::Display for PageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Validate range-list text.
pub fn parse_range_list(input: &str) -> Result<RangeList, MasterDocsError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(MasterDocsError::validation(
            "Please enter page ranges (e.g., 1-3, 5, 7-9)",
        ));
    }
    let invalid = || MasterDocsError::validation("Invalid format. Use: 1-3, 5, 7-9");
    if !RE_RANGE_LIST.is_match(text) {
        return Err(invalid());
    }

    let spans = text
        .split(',')
        .map(|token| {
            let token = token.trim();
            match token.split_once('-') {
                Some((a, b)) => Ok(PageSpan::Range(parse_number(a)?, parse_number(b)?)),
                None => Ok(PageSpan::Single(parse_number(token)?)),
            }
        })
        .collect::<Result<Vec<_>, ()>>()
        .map_err(|_| invalid())?;

    Ok(RangeList {
        text: text.to_string(),
        spans,
    })
}

/// Validate page-list text.
pub fn parse_page_list(input: &str) -> Result<PageList, MasterDocsError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(MasterDocsError::validation(
            "Please enter page numbers (e.g., 1, 3, 5)",
        ));
    }
    let invalid = || MasterDocsError::validation("Invalid format. Use: 1, 3, 5");
    if !RE_PAGE_LIST.is_match(text) {
        return Err(invalid());
    }

    let pages = text
        .split(',')
        .map(|token| parse_number(token.trim()))
        .collect::<Result<Vec<_>, ()>>()
        .map_err(|_| invalid())?;

    Ok(PageList {
        text: text.to_string(),
        pages,
    })
}

// Digits already matched the grammar; only overflow can fail here.
fn parse_number(s: &str) -> Result<u32, ()> {
    s.parse::<u32>().map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(mime: &str) -> StagedFile {
        StagedFile::new("f", 1, mime, "/tmp/f")
    }

    #[test]
    fn pdf_requires_exact_mime() {
        assert!(classify(&file("application/pdf"), FileKind::Pdf).is_accepted());
        assert!(!classify(&file("application/pdf; charset=x"), FileKind::Pdf).is_accepted());
        assert!(!classify(&file("image/png"), FileKind::Pdf).is_accepted());
    }

    #[test]
    fn image_requires_prefix() {
        assert!(classify(&file("image/png"), FileKind::Image).is_accepted());
        assert!(classify(&file("image/svg+xml"), FileKind::Image).is_accepted());
        assert!(!classify(&file("application/pdf"), FileKind::Image).is_accepted());
        assert!(!classify(&file(""), FileKind::Image).is_accepted());
    }

    #[test]
    fn range_list_accepts_mixed_tokens() {
        let r = parse_range_list("1-3, 5, 7-9").unwrap();
        assert_eq!(r.as_str(), "1-3, 5, 7-9");
        assert_eq!(
            r.spans(),
            &[PageSpan::Range(1, 3), PageSpan::Single(5), PageSpan::Range(7, 9)]
        );
        assert!(parse_range_list("  4  ").is_ok());
        assert!(parse_range_list("1,2,3").is_ok());
    }

    #[test]
    fn range_list_rejections() {
        for bad in ["1-3,,5", "abc", "1 -3", "1-", "-2", "1-3 ,5", "1;2"] {
            let err = parse_range_list(bad).unwrap_err();
            assert_eq!(err.to_string(), "Invalid format. Use: 1-3, 5, 7-9", "input {bad:?}");
        }
        let err = parse_range_list("   ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter page ranges (e.g., 1-3, 5, 7-9)");
        assert!(parse_range_list("").is_err());
    }

    #[test]
    fn page_list_grammar() {
        let p = parse_page_list("1, 3, 5").unwrap();
        assert_eq!(p.pages(), &[1, 3, 5]);
        assert_eq!(
            parse_page_list("1-3").unwrap_err().to_string(),
            "Invalid format. Use: 1, 3, 5"
        );
        assert_eq!(
            parse_page_list("").unwrap_err().to_string(),
            "Please enter page numbers (e.g., 1, 3, 5)"
        );
    }

    #[test]
    fn overflowing_numbers_are_rejected() {
        assert!(parse_page_list("99999999999").is_err());
        assert!(parse_range_list("1-99999999999").is_err());
    }
}
