//! Operation parameters for the single-file tools.
//!
//! Each type only admits values the service accepts, so a request built from
//! them cannot carry an out-of-range scalar.

use crate::error::MasterDocsError;
use crate::pipeline::submit::QUALITY_BOUNDS;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ── Compression quality ──────────────────────────────────────────────────────

/// Compression quality in `[0.1, 1.0]`, in steps of `0.1`. Default: `0.7`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Quality(f32);

impl Quality {
    pub const STEP: f32 = 0.1;

    /// Snap `value` onto the slider: clamp to bounds, round to the step.
    /// NaN falls back to the default.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        let (lo, hi) = QUALITY_BOUNDS;
        let snapped = (value.clamp(lo, hi) / Self::STEP).round() * Self::STEP;
        // Re-round to one decimal so 0.7 prints as "0.7", not "0.70000005".
        Self(((snapped * 10.0).round() / 10.0).clamp(lo, hi))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn label(self) -> &'static str {
        if self.0 >= 0.8 {
            "High Quality (Larger size)"
        } else if self.0 >= 0.5 {
            "Medium Quality (Balanced)"
        } else {
            "Low Quality (Smaller size)"
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.7)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Rasterisation ────────────────────────────────────────────────────────────

/// Rendering resolution preset for PDF→images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Dpi {
    /// 72 DPI, screen preview.
    Low,
    /// 150 DPI (default).
    #[default]
    Medium,
    /// 300 DPI, print.
    High,
}

impl Dpi {
    pub fn value(self) -> u32 {
        match self {
            Dpi::Low => 72,
            Dpi::Medium => 150,
            Dpi::High => 300,
        }
    }
}

impl TryFrom<u32> for Dpi {
    type Error = MasterDocsError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        match v {
            72 => Ok(Dpi::Low),
            150 => Ok(Dpi::Medium),
            300 => Ok(Dpi::High),
            other => Err(MasterDocsError::validation(format!(
                "DPI must be 72, 150 or 300, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Output image format for PDF→images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ImageFormat {
    /// Lossless (default).
    #[default]
    Png,
    Jpg,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = MasterDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            other => Err(MasterDocsError::validation(format!(
                "Image format must be png or jpg, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Per-tool parameter sets ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CompressParams {
    pub quality: Quality,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PdfToImageParams {
    pub format: ImageFormat,
    pub dpi: Dpi,
}

/// Which split the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    /// One output per range in `ranges` (default).
    #[default]
    Ranges,
    /// One output per page.
    EveryPage,
    /// The pages in `pages`, as one document.
    Extract,
}

/// Split settings. Both text fields are kept while the user switches modes;
/// only the one the mode uses is validated and sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitParams {
    pub mode: SplitMode,
    pub ranges: String,
    pub pages: String,
    /// Page count reported by the service for the selected file.
    pub page_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_is_clamped_and_snapped() {
        assert_eq!(Quality::new(0.05).value(), 0.1);
        assert_eq!(Quality::new(1.7).value(), 1.0);
        assert_eq!(Quality::new(0.64).value(), 0.6);
        assert_eq!(Quality::new(f32::NAN), Quality::default());
        assert_eq!(Quality::default().to_string(), "0.7");
        assert_eq!(Quality::new(0.3).to_string(), "0.3");
    }

    #[test]
    fn quality_labels() {
        assert_eq!(Quality::new(0.8).label(), "High Quality (Larger size)");
        assert_eq!(Quality::new(0.5).label(), "Medium Quality (Balanced)");
        assert_eq!(Quality::new(0.4).label(), "Low Quality (Smaller size)");
    }

    #[test]
    fn dpi_presets() {
        assert_eq!(Dpi::default().value(), 150);
        assert_eq!(Dpi::try_from(300).unwrap(), Dpi::High);
        assert!(Dpi::try_from(96).is_err());
    }

    #[test]
    fn image_format_parsing() {
        assert_eq!(ImageFormat::default(), ImageFormat::Png);
        assert_eq!("JPEG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
        assert!("gif".parse::<ImageFormat>().is_err());
    }
}
