//! # Nakaguro
//!
//! Bulleted text block construction and inline marker alignment for Rust.
//!
//! ## Overview
//!
//! `Nakaguro` builds vertically stacked lists of text lines where bullet
//! lines carry an inline glyph marker and title lines render at a relative
//! scale. The core of the library is the [`BulletListBuilder`], which
//! accumulates lines into a [`StyledBuffer`], and the [`InlineMarker`],
//! which computes the horizontal advance and the vertical centering offset
//! of a marker against the font metrics of its own line.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nakaguro::euclid::{Box2D, Point2D};
//! use nakaguro::{
//!     BulletListBuilder, GlyphImage, GlyphSystem, SurfaceSpace, TextSurface,
//! };
//!
//! // The host text surface exposes per-line bounding boxes.
//! struct HostSurface;
//! impl TextSurface for HostSurface {
//!     fn line_bounds(&self, line: usize) -> Box2D<f32, SurfaceSpace> {
//!         Box2D::new(
//!             Point2D::new(0.0, line as f32 * 40.0),
//!             Point2D::new(320.0, (line + 1) as f32 * 40.0),
//!         )
//!     }
//! }
//!
//! // 1. Register the marker glyph
//! let glyphs = Arc::new(GlyphSystem::new());
//! let dot = glyphs.register(GlyphImage::new(8, 8, vec![255; 64]));
//!
//! // 2. Build a styled block
//! let mut builder = BulletListBuilder::new(dot, Arc::new(HostSurface), glyphs);
//! builder.add_title_line("Shopping");
//! builder.add_line("rice");
//! builder.add_line("miso");
//! let block = builder.build();
//! assert_eq!(block.text(), "Shopping\n  rice\n  miso");
//!
//! // 3. Hand `block` to the host renderer; during its layout and paint
//! //    passes it calls `measure` and `draw` on every marker annotation.
//! ```
//!
//! ## Features
//!
//! *   **Line-true centering**: each marker is centered against the bounds
//!     and font metrics of the line it was inserted at, not a block average.
//! *   **Reusable builder**: `build` hands the finished buffer over and
//!     resets the accumulating state for the next cycle.
//! *   **Bounded retention**: decoded marker images sit in single-slot
//!     caches with explicit invalidation, backed by a shared registry with
//!     lazy decoding and eviction.
//! *   **Thread Safety**: designed with internal locking for safe concurrent
//!     use, though a block is normally driven from the surface's own thread.

pub mod block;
pub mod glyph_id;
pub mod glyph_storage;
pub mod glyph_system;
pub mod marker;
pub mod render;
pub mod surface;

// common re-exports
pub use block::{Annotation, BulletListBuilder, Span, StyledBuffer, TITLE_RELATIVE_SIZE};
pub use glyph_id::GlyphId;
pub use glyph_storage::{GlyphImage, GlyphProvider, GlyphStorage};
pub use glyph_system::GlyphSystem;
pub use marker::{InlineMarker, MarkerSize};
pub use render::Bitmap;
pub use surface::{FontMetrics, GlyphSpace, MarkerCanvas, SurfaceSpace, TextPaint, TextSurface};

// re-export dependencies
pub use euclid;
pub use fontdue;
pub use parking_lot;
