use std::sync::Arc;

use crate::{
    block::data::{Annotation, StyledBuffer},
    glyph_id::GlyphId,
    glyph_storage::GlyphProvider,
    marker::InlineMarker,
    surface::TextSurface,
};

/// Default scale applied to title lines that do not specify their own.
pub const TITLE_RELATIVE_SIZE: f32 = 1.1;

/// Two-character placeholder inserted before every bullet line's text. The
/// marker annotation covers exactly the first character.
const MARKER_INDENT: &str = "  ";

const LINE_SEPARATOR: &str = "\n";

/// Accumulates bullet and title lines into one [`StyledBuffer`].
///
/// Lines are stamped with a running zero-based line counter at insertion
/// time; separators go only between lines, never before the first or after
/// the last. [`Self::build`] moves the finished buffer out and resets the
/// builder to a fresh accumulating state, so one builder can produce any
/// number of blocks.
///
/// The byte ranges alone cannot recover "which visual line is this" once
/// separators are interleaved with variable-length text, so every marker
/// captures the counter value at creation; that index is the handle the
/// host's measure/draw callbacks use to query per-line bounds.
pub struct BulletListBuilder {
    buffer: StyledBuffer,
    current_line: usize,
    title_size_multiplier: f32,
    marker_glyph: GlyphId,
    surface: Arc<dyn TextSurface>,
    glyphs: Arc<dyn GlyphProvider>,
}

impl BulletListBuilder {
    /// Creates a builder whose bullet lines use `marker_glyph`.
    ///
    /// `surface` and `glyphs` are the capability handles injected into every
    /// marker; the builder itself never queries them.
    pub fn new(
        marker_glyph: GlyphId,
        surface: Arc<dyn TextSurface>,
        glyphs: Arc<dyn GlyphProvider>,
    ) -> Self {
        Self {
            buffer: StyledBuffer::new(),
            current_line: 0,
            title_size_multiplier: TITLE_RELATIVE_SIZE,
            marker_glyph,
            surface,
            glyphs,
        }
    }

    /// Overrides the default title scale. Non-positive values are ignored.
    pub fn with_title_size_multiplier(mut self, multiplier: f32) -> Self {
        if multiplier > 0.0 {
            self.title_size_multiplier = multiplier;
        }
        self
    }

    pub fn title_size_multiplier(&self) -> f32 {
        self.title_size_multiplier
    }

    /// Number of lines added since the last [`Self::build`].
    pub fn line_count(&self) -> usize {
        self.current_line
    }

    /// Adds a bullet line.
    ///
    /// Appends the marker placeholder followed by `text` (which may be
    /// empty) and attaches a marker annotation over exactly the first
    /// placeholder character, bound to the current line index.
    pub fn add_line(&mut self, text: &str) {
        if self.current_line != 0 {
            self.buffer.push_str(LINE_SEPARATOR);
        }

        let marker_at = self.buffer.len();
        self.buffer.push_str(MARKER_INDENT);
        self.buffer.push_str(text);

        let marker = InlineMarker::new(
            self.marker_glyph,
            self.current_line,
            Arc::clone(&self.surface),
            Arc::clone(&self.glyphs),
        );
        self.buffer
            .annotate(marker_at..marker_at + 1, Annotation::Marker(Arc::new(marker)));
        self.current_line += 1;
    }

    /// Adds a title line at the configured default scale.
    pub fn add_title_line(&mut self, text: &str) {
        self.add_title_line_sized(text, -1.0);
    }

    /// Adds a title line at an explicit scale.
    ///
    /// `relative_size ≤ 0` falls back to the configured default.
    pub fn add_title_line_sized(&mut self, text: &str, relative_size: f32) {
        if self.current_line != 0 {
            self.buffer.push_str(LINE_SEPARATOR);
        }

        let start = self.buffer.len();
        self.buffer.push_str(text);

        let scale = if relative_size > 0.0 {
            relative_size
        } else {
            self.title_size_multiplier
        };
        self.buffer
            .annotate(start..self.buffer.len(), Annotation::RelativeSize(scale));
        self.current_line += 1;
    }

    /// Finalizes the block, handing the buffer to the caller.
    ///
    /// The builder returns to a fresh accumulating state: a second `build`
    /// without intervening adds yields an empty buffer, and the next added
    /// line is line 0 again.
    pub fn build(&mut self) -> StyledBuffer {
        self.current_line = 0;
        std::mem::take(&mut self.buffer)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use euclid::{Box2D, Point2D};
    use parking_lot::Mutex;

    use super::*;
    use crate::{
        glyph_storage::GlyphImage,
        surface::{FontMetrics, MarkerCanvas, SurfaceSpace, TextPaint},
    };

    /// Surface fixture recording every queried line index.
    struct ProbeSurface {
        queried: Mutex<Vec<usize>>,
    }

    impl ProbeSurface {
        fn new() -> Self {
            Self {
                queried: Mutex::new(Vec::new()),
            }
        }
    }

    impl crate::surface::TextSurface for ProbeSurface {
        fn line_bounds(&self, line: usize) -> Box2D<f32, SurfaceSpace> {
            self.queried.lock().push(line);
            Box2D::new(
                Point2D::new(0.0, line as f32 * 40.0),
                Point2D::new(200.0, (line + 1) as f32 * 40.0),
            )
        }
    }

    struct FixedProvider;

    impl GlyphProvider for FixedProvider {
        fn glyph(&self, _id: GlyphId) -> Option<Arc<GlyphImage>> {
            Some(Arc::new(GlyphImage::new(8, 8, vec![255; 64])))
        }
    }

    struct NullCanvas;

    impl MarkerCanvas for NullCanvas {
        fn draw_glyph(
            &mut self,
            _image: &GlyphImage,
            _offset: euclid::Vector2D<f32, SurfaceSpace>,
        ) {
        }
    }

    fn builder() -> (BulletListBuilder, Arc<ProbeSurface>) {
        let surface = Arc::new(ProbeSurface::new());
        let builder = BulletListBuilder::new(
            GlyphId::new(0),
            Arc::clone(&surface) as Arc<dyn crate::surface::TextSurface>,
            Arc::new(FixedProvider),
        );
        (builder, surface)
    }

    fn scales(buffer: &StyledBuffer) -> Vec<f32> {
        buffer
            .spans()
            .iter()
            .filter_map(|span| match span.annotation {
                Annotation::RelativeSize(scale) => Some(scale),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn separators_go_only_between_lines() {
        let (mut builder, _) = builder();
        builder.add_line("one");
        builder.add_title_line("two");
        builder.add_line("three");

        let buffer = builder.build();
        assert_eq!(buffer.text(), "  one\ntwo\n  three");
        assert_eq!(buffer.text().matches('\n').count(), 2);
        assert!(!buffer.text().starts_with('\n'));
        assert!(!buffer.text().ends_with('\n'));
    }

    #[test]
    fn marker_range_is_one_byte_at_the_indent_start() {
        let (mut builder, _) = builder();
        builder.add_title_line("Übersicht");
        builder.add_line("こんにちは");
        builder.add_line("");

        let buffer = builder.build();
        let ranges: Vec<_> = buffer
            .spans()
            .iter()
            .filter(|span| matches!(span.annotation, Annotation::Marker(_)))
            .map(|span| span.range.clone())
            .collect();

        let first_start = "Übersicht".len() + 1;
        let second_start = first_start + 2 + "こんにちは".len() + 1;
        assert_eq!(ranges, vec![first_start..first_start + 1, second_start..second_start + 1]);

        for range in ranges {
            assert_eq!(&buffer.text()[range.start..range.start + 2], MARKER_INDENT);
        }
    }

    #[test]
    fn non_positive_title_sizes_fall_back_to_the_default() {
        let (mut builder, _) = builder();
        builder.add_title_line("a");
        builder.add_title_line_sized("a", -1.0);
        builder.add_title_line_sized("a", 0.0);
        builder.add_title_line_sized("a", 2.5);

        let buffer = builder.build();
        assert_eq!(
            scales(&buffer),
            vec![TITLE_RELATIVE_SIZE, TITLE_RELATIVE_SIZE, TITLE_RELATIVE_SIZE, 2.5]
        );
    }

    #[test]
    fn configured_multiplier_replaces_the_default() {
        let (raw, _) = builder();
        let mut configured = raw.with_title_size_multiplier(1.4);
        configured.add_title_line("a");

        assert_eq!(scales(&configured.build()), vec![1.4]);

        // non-positive overrides are ignored
        let (raw, _) = builder();
        let ignored = raw.with_title_size_multiplier(0.0);
        assert_eq!(ignored.title_size_multiplier(), TITLE_RELATIVE_SIZE);
    }

    #[test]
    fn title_annotation_covers_the_whole_appended_range() {
        let (mut builder, _) = builder();
        builder.add_line("first");
        builder.add_title_line("heading");

        let buffer = builder.build();
        let title = buffer
            .spans()
            .iter()
            .find(|span| matches!(span.annotation, Annotation::RelativeSize(_)))
            .unwrap();
        assert_eq!(&buffer.text()[title.range.clone()], "heading");
    }

    #[test]
    fn build_resets_to_a_fresh_state() {
        let (mut builder, _) = builder();
        builder.add_line("one");
        builder.add_line("two");

        let first = builder.build();
        assert!(!first.is_empty());
        assert_eq!(builder.line_count(), 0);

        let second = builder.build();
        assert!(second.is_empty());

        // the next cycle starts at line 0 with no leading separator
        builder.add_line("again");
        let third = builder.build();
        assert_eq!(third.text(), "  again");
        assert_eq!(third.markers().next().unwrap().line(), 0);
    }

    #[test]
    fn marker_line_binding_survives_later_adds() {
        let (mut builder, surface) = builder();
        builder.add_title_line("head");
        builder.add_line("first bullet");
        builder.add_line("second bullet");
        let probe = builder.buffer.markers().last().unwrap().clone();
        builder.add_title_line("tail");
        builder.add_line("third bullet");

        assert_eq!(probe.line(), 2);

        let paint = TextPaint::new(FontMetrics {
            ascent: -30.0,
            descent: 8.0,
            top: -35.0,
            bottom: 10.0,
        });
        probe.draw(&mut NullCanvas, 0.0, 80.0, 112.0, 120.0, &paint);
        assert_eq!(*surface.queried.lock(), vec![2]);
    }
}
