//! Software RGBA canvas
//!
//! The whole frame is composed on the CPU at logical resolution, then
//! uploaded once per frame. Every primitive clips to the canvas.

use image::{Rgba, RgbaImage};

use crate::sim::SpriteRect;

/// Opaque RGB color
pub type Color = [u8; 3];

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA8 rows, top to bottom
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn clear(&mut self, color: Color) {
        let [r, g, b] = color;
        for p in self.image.pixels_mut() {
            *p = Rgba([r, g, b, 255]);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };
        let [r, g, b] = color;
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, Rgba([r, g, b, 255]));
            }
        }
    }

    /// Blend `color` over one pixel with coverage `alpha` in 0..=1
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            dst.0[c] = mix(dst.0[c], color[c], a);
        }
        dst.0[3] = 255;
    }

    /// Draw the whole of `src` at its native size
    pub fn blit(&mut self, src: &RgbaImage, x: i32, y: i32) {
        let full = SpriteRect {
            x: 0,
            y: 0,
            width: src.width(),
            height: src.height(),
        };
        self.blit_scaled(src, full, x, y, src.width(), src.height());
    }

    /// Scale the `src_rect` region of `src` to `width`x`height` at (x, y).
    ///
    /// Nearest-neighbor sampling, alpha-blended over the canvas.
    pub fn blit_scaled(
        &mut self,
        src: &RgbaImage,
        src_rect: SpriteRect,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) {
        if src_rect.width == 0 || src_rect.height == 0 {
            return;
        }
        if src_rect.x + src_rect.width > src.width() || src_rect.y + src_rect.height > src.height()
        {
            log::warn!("Sprite source rect {:?} outside {}x{} image", src_rect, src.width(), src.height());
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };

        for py in y0..y1 {
            let dy = (py as i64 - y as i64) as u64;
            let sy = src_rect.y + (dy * src_rect.height as u64 / height as u64) as u32;
            for px in x0..x1 {
                let dx = (px as i64 - x as i64) as u64;
                let sx = src_rect.x + (dx * src_rect.width as u64 / width as u64) as u32;

                let s = src.get_pixel(sx, sy).0;
                if s[3] == 0 {
                    continue;
                }
                let a = s[3] as f32 / 255.0;
                let dst = self.image.get_pixel_mut(px, py);
                for c in 0..3 {
                    dst.0[c] = mix(dst.0[c], s[c], a);
                }
                dst.0[3] = 255;
            }
        }
    }

    /// Intersect a rect with the canvas; `None` when nothing is visible
    fn clip(&self, x: i32, y: i32, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + width as i64).min(self.width() as i64);
        let y1 = (y as i64 + height as i64).min(self.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

#[inline]
fn mix(dst: u8, src: u8, alpha: f32) -> u8 {
    (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8
}
