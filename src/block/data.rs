use std::{ops::Range, sync::Arc};

use crate::marker::InlineMarker;

/// Style tag bound to a byte range of a [`StyledBuffer`].
#[derive(Clone, Debug)]
pub enum Annotation {
    /// An inline glyph marker occupying the range's placeholder character.
    ///
    /// The marker is shared with the host so it stays callable after the
    /// buffer has been handed over.
    Marker(Arc<InlineMarker>),
    /// A relative font scale applied over the range.
    RelativeSize(f32),
}

/// A half-open byte range of the buffer carrying exactly one annotation.
#[derive(Clone, Debug)]
pub struct Span {
    pub range: Range<usize>,
    pub annotation: Annotation,
}

/// Ordered text with style annotations over byte ranges.
///
/// The builder appends text and annotations in insertion order; the host
/// renderer walks the stored [`Span`] values during its layout and paint
/// passes. Ranges never exceed the buffer bounds and are always complete
/// before the buffer is handed over.
#[derive(Clone, Debug, Default)]
pub struct StyledBuffer {
    text: String,
    spans: Vec<Span>,
}

impl StyledBuffer {
    /// Creates an empty buffer that can receive lines.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.spans.is_empty()
    }

    /// Current text length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Appends raw text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Attaches an annotation over `range`.
    ///
    /// `range` must lie within the current text; empty ranges are allowed
    /// (an empty title line produces one).
    pub fn annotate(&mut self, range: Range<usize>, annotation: Annotation) {
        debug_assert!(range.start <= range.end && range.end <= self.text.len());
        self.spans.push(Span { range, annotation });
    }

    /// All annotations in insertion order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// The marker annotations, in insertion order.
    pub fn markers(&self) -> impl Iterator<Item = &Arc<InlineMarker>> {
        self.spans.iter().filter_map(|span| match &span.annotation {
            Annotation::Marker(marker) => Some(marker),
            Annotation::RelativeSize(_) => None,
        })
    }

    /// Removes all text and annotations so the buffer can be reused.
    pub fn clear(&mut self) {
        self.text.clear();
        self.spans.clear();
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotations_keep_insertion_order() {
        let mut buffer = StyledBuffer::new();
        buffer.push_str("ab");
        buffer.annotate(0..1, Annotation::RelativeSize(1.5));
        buffer.annotate(1..2, Annotation::RelativeSize(2.0));

        let scales: Vec<f32> = buffer
            .spans()
            .iter()
            .map(|span| match span.annotation {
                Annotation::RelativeSize(scale) => scale,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(scales, vec![1.5, 2.0]);
    }

    #[test]
    fn empty_ranges_are_allowed() {
        let mut buffer = StyledBuffer::new();
        buffer.annotate(0..0, Annotation::RelativeSize(1.1));
        assert_eq!(buffer.spans().len(), 1);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn clear_removes_text_and_spans() {
        let mut buffer = StyledBuffer::new();
        buffer.push_str("line");
        buffer.annotate(0..4, Annotation::RelativeSize(1.1));

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.text(), "");
        assert!(buffer.spans().is_empty());
    }
}
