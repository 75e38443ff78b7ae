//! HUD text rasterization

use rusttype::{Font, Scale, point};

use super::canvas::{Canvas, Color};

/// Rendered width of `text` in pixels
pub fn text_width(font: &Font<'_>, text: &str, size: f32) -> f32 {
    let scale = Scale::uniform(size);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map_or(0.0, |g| {
            g.position().x + g.unpositioned().h_metrics().advance_width
        })
}

/// Draw `text` with its top-left corner at (x, y)
pub fn draw_text(
    canvas: &mut Canvas,
    font: &Font<'_>,
    text: &str,
    size: f32,
    x: f32,
    y: f32,
    color: Color,
) {
    let scale = Scale::uniform(size);
    let ascent = font.v_metrics(scale).ascent;

    for glyph in font.layout(text, scale, point(x, y + ascent)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            if coverage > 0.0 {
                canvas.blend_pixel(bb.min.x + gx as i32, bb.min.y + gy as i32, color, coverage);
            }
        });
    }
}

/// Draw `text` horizontally centered on the canvas, top edge at y
pub fn draw_text_centered(
    canvas: &mut Canvas,
    font: &Font<'_>,
    text: &str,
    size: f32,
    y: f32,
    color: Color,
) {
    let x = canvas.width() as f32 / 2.0 - text_width(font, text, size) / 2.0;
    draw_text(canvas, font, text, size, x, y, color);
}
