use std::{fmt, sync::Arc};

use euclid::Vector2D;
use parking_lot::Mutex;

use crate::{
    glyph_id::GlyphId,
    glyph_storage::{GlyphImage, GlyphProvider},
    surface::{FontMetrics, MarkerCanvas, TextPaint, TextSurface},
};

/// Layout-pass result of [`InlineMarker::measure`].
///
/// `advance` is the horizontal space the marker's placeholder character
/// occupies; `font_metrics` are copied verbatim from the paint so the marker
/// never alters line leading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerSize {
    pub advance: f32,
    pub font_metrics: FontMetrics,
}

/// Inline glyph marker bound to one line of a styled block.
///
/// Created by the builder when a bullet line is added, with the line index
/// captured once at creation time. The host calls [`Self::measure`] during
/// its layout pass and [`Self::draw`] during its paint pass, any number of
/// times and in any order across markers; the only state besides the bound
/// index is the single-slot glyph cache.
///
/// The surface and glyph handles are plain capability references injected at
/// construction; the marker never controls their lifecycle.
pub struct InlineMarker {
    glyph: GlyphId,
    line: usize,
    surface: Arc<dyn TextSurface>,
    glyphs: Arc<dyn GlyphProvider>,
    /// One decoded image at most, never shared with other markers.
    cached: Mutex<Option<Arc<GlyphImage>>>,
}

impl InlineMarker {
    pub fn new(
        glyph: GlyphId,
        line: usize,
        surface: Arc<dyn TextSurface>,
        glyphs: Arc<dyn GlyphProvider>,
    ) -> Self {
        Self {
            glyph,
            line,
            surface,
            glyphs,
            cached: Mutex::new(None),
        }
    }

    /// The line index this marker was created for.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn glyph_id(&self) -> GlyphId {
        self.glyph
    }

    /// Layout-pass query: horizontal advance plus pass-through font metrics.
    ///
    /// The marker only occupies horizontal space; its vertical placement
    /// happens at paint time, so the returned metrics are the paint's own.
    /// A missing glyph resource degrades to a zero advance.
    pub fn measure(&self, paint: &TextPaint) -> MarkerSize {
        let advance = match self.resolve() {
            Some(image) => image.bounds().max.x,
            None => 0.0,
        };

        MarkerSize {
            advance,
            font_metrics: paint.font_metrics,
        }
    }

    /// Paint-pass callback: centers the glyph against the bound line.
    ///
    /// `x`, `top`, `baseline`, and `bottom` describe the slot the host's
    /// paint pass assigned to the placeholder character; only `x` and
    /// `bottom` feed the placement.
    pub fn draw(
        &self,
        canvas: &mut dyn MarkerCanvas,
        x: f32,
        _top: f32,
        _baseline: f32,
        bottom: f32,
        paint: &TextPaint,
    ) {
        let Some(image) = self.resolve() else {
            return;
        };

        let line_bounds = self.surface.line_bounds(self.line);
        let line_height = line_bounds.height();
        let metrics = paint.font_metrics;

        // Line 0 has no preceding line's descent feeding its top padding, so
        // only half the descent is subtracted there.
        let descent = if self.line == 0 {
            metrics.descent / 2.0
        } else {
            metrics.descent
        };

        let translate_y = bottom - line_height - metrics.ascent - descent
            + image.intrinsic_height() / 2.0
            - image.bounds().max.y;

        canvas.draw_glyph(&image, Vector2D::new(x, translate_y));
    }

    /// Empties the cache slot so the next query decodes afresh.
    ///
    /// Hosts call this when they reclaim decoded resources between passes.
    pub fn invalidate_cache(&self) {
        *self.cached.lock() = None;
    }

    /// Resolves the glyph image, filling the cache slot on a miss.
    fn resolve(&self) -> Option<Arc<GlyphImage>> {
        let mut slot = self.cached.lock();
        if let Some(image) = slot.as_ref() {
            return Some(Arc::clone(image));
        }

        match self.glyphs.glyph(self.glyph) {
            Some(image) => {
                *slot = Some(Arc::clone(&image));
                Some(image)
            }
            None => {
                log::error!(
                    "Marker glyph unavailable (id: {:?}, line: {})",
                    self.glyph,
                    self.line
                );
                None
            }
        }
    }
}

impl fmt::Debug for InlineMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineMarker")
            .field("glyph", &self.glyph)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}
