//! Rendered-size inputs for layout-dependent decoration.
//!
//! Heading scaling needs to know how tall a heading renders, which only a
//! layout engine can answer. Callers that have one (a headless browser, a
//! text-measurement service) implement [`Measurer`]; without a measurer the
//! scaling pass is skipped.

/// Maximum number of lines a column heading may wrap to.
pub const MAX_HEADING_LINES: u32 = 3;

/// Heading level of an `h1`..`h6` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Level for a tag name such as `h2` or `H2`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            "h5" => Some(Self::H5),
            "h6" => Some(Self::H6),
            _ => None,
        }
    }

    /// Stylesheet font size in px.
    #[must_use]
    pub fn font_size(self) -> f64 {
        match self {
            Self::H1 => 60.0,
            Self::H2 => 45.0,
            Self::H3 => 36.0,
            Self::H4 | Self::H5 | Self::H6 => 28.0,
        }
    }

    /// Stylesheet line height in px.
    #[must_use]
    pub fn line_height(self) -> f64 {
        match self {
            Self::H1 => 63.6,
            Self::H2 => 48.6,
            Self::H3 => 39.96,
            Self::H4 | Self::H5 | Self::H6 => 31.92,
        }
    }
}

/// Computed `height` and `line-height` of a rendered heading, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingMetrics {
    pub height: f64,
    pub line_height: f64,
}

/// Measures rendered headings.
pub trait Measurer {
    /// Rendered metrics of a heading with the given level and text, if known.
    fn measure(&self, level: HeadingLevel, text: &str) -> Option<HeadingMetrics>;
}

impl<F> Measurer for F
where
    F: Fn(HeadingLevel, &str) -> Option<HeadingMetrics>,
{
    fn measure(&self, level: HeadingLevel, text: &str) -> Option<HeadingMetrics> {
        self(level, text)
    }
}

/// Font size and line height to apply to an over-long heading, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledHeading {
    pub font_size: f64,
    pub line_height: f64,
}

impl ScaledHeading {
    /// Inline style declaring the scaled sizes.
    #[must_use]
    pub fn style(&self) -> String {
        format!(
            "font-size: {}px; line-height: {}px;",
            self.font_size, self.line_height
        )
    }
}

/// Sizes that fit a heading into [`MAX_HEADING_LINES`] lines.
///
/// The line count is the whole-pixel height divided by the line height,
/// rounded up. Returns `None` when the heading already fits or the metrics
/// are unusable.
#[must_use]
pub fn scale_heading(level: HeadingLevel, metrics: HeadingMetrics) -> Option<ScaledHeading> {
    if !(metrics.line_height > 0.0) || !metrics.height.is_finite() {
        return None;
    }
    let lines = (metrics.height.trunc() / metrics.line_height).ceil();
    let scale = f64::from(MAX_HEADING_LINES) / lines;
    if scale < 1.0 {
        Some(ScaledHeading {
            font_size: level.font_size() * scale,
            line_height: level.line_height() * scale,
        })
    } else {
        None
    }
}
