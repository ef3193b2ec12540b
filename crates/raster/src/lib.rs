#![deny(unsafe_code)]
//! CPU drawing surface for particle-field.
//!
//! [`Pixmap`] implements the core [`Surface`] trait over a premultiplied
//! RGBA buffer with anti-aliased circles and lines, composited source-over
//! the way a browser 2D context does. [`pixel`] converts the buffer to RGBA8
//! and [`snapshot`] writes it as a PNG.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use particle_field_core::error::FieldError;
use particle_field_core::{Srgb, Surface};

/// Premultiplied RGBA pixel buffer that draws in logical coordinates.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    ratio: f64,
    data: Vec<[f32; 4]>,
}

impl Pixmap {
    /// Creates a transparent pixmap of `width x height` device pixels.
    ///
    /// Returns `FieldError::InvalidDimensions` if either dimension is zero or
    /// the pixel count overflows.
    pub fn new(width: u32, height: u32) -> Result<Self, FieldError> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            ratio: 1.0,
            data: vec![[0.0; 4]; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Logical-to-device scale currently applied to drawing calls.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Premultiplied `[r, g, b, a]` of the device pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Read-only access to the row-major premultiplied data.
    pub fn data(&self) -> &[[f32; 4]] {
        &self.data
    }

    /// Composites `color` at `coverage`, scaled by the color's own alpha,
    /// over the device pixel at `(x, y)`.
    fn blend(&mut self, x: u32, y: u32, color: Srgb, coverage: f64) {
        let a = (coverage.min(1.0) * color.a.clamp(0.0, 1.0)) as f32;
        if a <= 0.0 {
            return;
        }
        let dst = &mut self.data[y as usize * self.width as usize + x as usize];
        let keep = 1.0 - a;
        dst[0] = color.r as f32 * a + dst[0] * keep;
        dst[1] = color.g as f32 * a + dst[1] * keep;
        dst[2] = color.b as f32 * a + dst[2] * keep;
        dst[3] = a + dst[3] * keep;
    }

    /// Device-pixel index range covering `[lo, hi]` on an axis of `len` pixels.
    fn span(lo: f64, hi: f64, len: u32) -> std::ops::Range<u32> {
        if !(lo.is_finite() && hi.is_finite()) {
            return 0..0;
        }
        let start = lo.floor().max(0.0).min(len as f64) as u32;
        let end = (hi.ceil() + 1.0).max(0.0).min(len as f64) as u32;
        start..end
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, FieldError> {
    if width == 0 || height == 0 {
        return Err(FieldError::InvalidDimensions);
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(FieldError::InvalidDimensions)
}

impl Surface for Pixmap {
    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<(), FieldError> {
        let len = pixel_count(width, height)?;
        self.width = width;
        self.height = height;
        self.data = vec![[0.0; 4]; len];
        Ok(())
    }

    fn set_transform_scale(&mut self, ratio: f64) {
        self.ratio = ratio;
    }

    fn clear(&mut self) {
        self.data.fill([0.0; 4]);
    }

    fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: Srgb) {
        let (cx, cy, radius) = (x * self.ratio, y * self.ratio, r * self.ratio);
        if radius <= 0.0 {
            return;
        }
        // Sub-pixel circles fade instead of vanishing.
        let density = (2.0 * radius).min(1.0);
        for py in Self::span(cy - radius, cy + radius, self.height) {
            for px in Self::span(cx - radius, cx + radius, self.width) {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0) * density;
                self.blend(px, py, color, coverage);
            }
        }
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Srgb) {
        let (ax, ay) = (from.0 * self.ratio, from.1 * self.ratio);
        let (bx, by) = (to.0 * self.ratio, to.1 * self.ratio);
        let stroke = width * self.ratio;
        let (ex, ey) = (bx - ax, by - ay);
        let len_sq = ex * ex + ey * ey;
        if len_sq == 0.0 || stroke <= 0.0 {
            return;
        }

        // Hairlines are drawn one pixel wide at reduced intensity.
        let half = stroke.max(1.0) / 2.0;
        let intensity = stroke.min(1.0);
        let pad = half + 1.0;
        for py in Self::span(ay.min(by) - pad, ay.max(by) + pad, self.height) {
            for px in Self::span(ax.min(bx) - pad, ax.max(bx) + pad, self.width) {
                let qx = px as f64 + 0.5 - ax;
                let qy = py as f64 + 0.5 - ay;
                let t = (qx * ex + qy * ey) / len_sq;
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let dx = qx - t * ex;
                let dy = qy - t * ey;
                let d = (dx * dx + dy * dy).sqrt();
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0) * intensity;
                self.blend(px, py, color, coverage);
            }
        }
    }
}
