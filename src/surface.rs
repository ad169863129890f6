use euclid::{Box2D, Vector2D};

use crate::glyph_storage::GlyphImage;

/// Unit tag for the host surface coordinate system.
///
/// **Y-axis goes down.** Line bounds, marker translations, and bitmap pixels
/// all live in this space.
pub struct SurfaceSpace;

/// Unit tag for the local coordinate system of a decoded glyph image.
pub struct GlyphSpace;

/// Vertical extents of a line of text relative to its baseline.
///
/// Values follow the y-down surface convention: `ascent` and `top` are
/// negative (above the baseline), `descent` and `bottom` are positive.
/// `top`/`bottom` are the extremes any glyph of the font may reach, while
/// `ascent`/`descent` are the recommended line extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub top: f32,
    pub bottom: f32,
}

impl From<fontdue::LineMetrics> for FontMetrics {
    /// Converts fontdue's y-up line metrics into the y-down convention.
    ///
    /// fontdue has no notion of `top`/`bottom`, so the line gap is split
    /// evenly between them.
    fn from(metrics: fontdue::LineMetrics) -> Self {
        let ascent = -metrics.ascent;
        let descent = -metrics.descent;
        let half_gap = metrics.line_gap / 2.0;
        Self {
            ascent,
            descent,
            top: ascent - half_gap,
            bottom: descent + half_gap,
        }
    }
}

/// Paint state active while a line is measured or drawn.
///
/// The host hands one of these to every marker callback; the marker copies
/// the metrics through unchanged so it never disturbs line spacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPaint {
    pub font_metrics: FontMetrics,
}

impl TextPaint {
    pub fn new(font_metrics: FontMetrics) -> Self {
        Self { font_metrics }
    }

    /// Builds a paint from a fontdue font at the given pixel size.
    ///
    /// Returns `None` for fonts without horizontal line metrics (e.g. some
    /// vertical-only CJK faces).
    pub fn from_font(font: &fontdue::Font, px: f32) -> Option<Self> {
        let metrics = font.horizontal_line_metrics(px)?;
        Some(Self::new(metrics.into()))
    }
}

/// Line-bounds capability of the host text surface.
///
/// The surface owns the laid-out lines; markers hold a capability handle to
/// it and query bounds by the line index captured at insertion time. The
/// handle never controls the surface's lifecycle.
pub trait TextSurface: Send + Sync {
    /// Bounding box of the visual line at `line`, in surface coordinates.
    fn line_bounds(&self, line: usize) -> Box2D<f32, SurfaceSpace>;
}

/// Paint-pass sink for marker drawing.
///
/// `offset` is the translation the centering arithmetic produced; the image
/// is painted at its own draw bounds shifted by that offset.
pub trait MarkerCanvas {
    fn draw_glyph(&mut self, image: &GlyphImage, offset: Vector2D<f32, SurfaceSpace>);
}
