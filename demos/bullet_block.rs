use std::sync::Arc;

use image::{ImageBuffer, Luma};
use nakaguro::{
    Bitmap, BulletListBuilder, FontMetrics, GlyphImage, GlyphSystem, SurfaceSpace, TextPaint,
    TextSurface,
    euclid::{Box2D, Point2D},
};

const LINE_HEIGHT: f32 = 40.0;
const BLOCK_WIDTH: f32 = 320.0;

/// Stand-in for the host text surface: every line is one fixed-height row.
struct RowSurface;

impl TextSurface for RowSurface {
    fn line_bounds(&self, line: usize) -> Box2D<f32, SurfaceSpace> {
        Box2D::new(
            Point2D::new(0.0, line as f32 * LINE_HEIGHT),
            Point2D::new(BLOCK_WIDTH, (line + 1) as f32 * LINE_HEIGHT),
        )
    }
}

/// Rasterizes a filled disc with a one-pixel soft edge.
fn disc_glyph(diameter: usize) -> GlyphImage {
    let radius = diameter as f32 / 2.0;
    let mut coverage = vec![0u8; diameter * diameter];

    for row in 0..diameter {
        for col in 0..diameter {
            let dx = col as f32 + 0.5 - radius;
            let dy = row as f32 + 0.5 - radius;
            let dist = (dx * dx + dy * dy).sqrt();
            let alpha = (radius - dist).clamp(0.0, 1.0);
            coverage[row * diameter + col] = (alpha * 255.0) as u8;
        }
    }

    GlyphImage::new(diameter, diameter, coverage)
}

fn main() {
    let glyphs = Arc::new(GlyphSystem::new());
    let dot = glyphs.register(disc_glyph(14));

    let surface = Arc::new(RowSurface);
    let mut builder = BulletListBuilder::new(dot, surface, glyphs);

    builder.add_title_line("Shopping");
    builder.add_line("rice");
    builder.add_line("miso");
    builder.add_line("green onions");

    let block = builder.build();

    println!(
        "Block: {} bytes, {} spans, {} markers",
        block.len(),
        block.spans().len(),
        block.markers().count()
    );

    let paint = TextPaint::new(FontMetrics {
        ascent: -24.0,
        descent: 6.0,
        top: -27.0,
        bottom: 9.0,
    });

    let bitmap_height = (block.text().lines().count() as f32 * LINE_HEIGHT).ceil() as usize;
    let mut bitmap = Bitmap::new(BLOCK_WIDTH.ceil() as usize, bitmap_height);

    // Drive the layout and paint passes the way a host renderer would: one
    // measure and one draw per marker, keyed by the captured line index.
    for marker in block.markers() {
        let size = marker.measure(&paint);
        let line = marker.line();

        let top = line as f32 * LINE_HEIGHT;
        let bottom = top + LINE_HEIGHT;
        let baseline = bottom - paint.font_metrics.descent;

        marker.draw(&mut bitmap, 8.0, top, baseline, bottom, &paint);
        println!("line {line}: advance {} px", size.advance);
    }

    // Ensure debug directory exists
    std::fs::create_dir_all("debug").expect("failed to create debug directory");

    let img_buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(bitmap.width as u32, bitmap.height as u32, bitmap.pixels)
            .expect("bitmap dimensions must match pixel buffer length");

    img_buffer
        .save("debug/bullet_block.png")
        .expect("failed to save debug image");

    println!("Saved debug image to debug/bullet_block.png");
}
