//! Pure-computation conversion from a [`Pixmap`] to an RGBA8 buffer.
//!
//! Always available (no feature gate) so both the PNG snapshot and any
//! in-memory consumer share the same conversion.

use crate::Pixmap;
use particle_field_core::Srgb;

/// Converts the premultiplied pixmap to straight-alpha RGBA8.
///
/// With a `background`, every pixel is composited over that color first; an
/// opaque background yields an opaque image. Without one, transparency is
/// kept. The buffer length is `width * height * 4`.
pub fn pixmap_to_rgba(pixmap: &Pixmap, background: Option<Srgb>) -> Vec<u8> {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    let bg = background.unwrap_or(Srgb::TRANSPARENT);
    let bg_a = bg.a.clamp(0.0, 1.0) as f32;
    let bg_premul = [bg.r as f32 * bg_a, bg.g as f32 * bg_a, bg.b as f32 * bg_a];
    pixmap
        .data()
        .iter()
        .flat_map(|&[r, g, b, a]| {
            let keep = 1.0 - a;
            let out_a = a + bg_a * keep;
            if out_a <= 0.0 {
                return [0, 0, 0, 0];
            }
            let r = r + bg_premul[0] * keep;
            let g = g + bg_premul[1] * keep;
            let b = b + bg_premul[2] * keep;
            [q(r / out_a), q(g / out_a), q(b / out_a), q(out_a)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_field_core::Surface;

    #[test]
    fn pixmap_to_rgba_correct_length() {
        let pixmap = Pixmap::new(8, 4).unwrap();
        assert_eq!(pixmap_to_rgba(&pixmap, None).len(), 8 * 4 * 4);
    }

    #[test]
    fn transparent_pixmap_without_background_stays_transparent() {
        let pixmap = Pixmap::new(2, 2).unwrap();
        assert!(pixmap_to_rgba(&pixmap, None).iter().all(|&b| b == 0));
    }

    #[test]
    fn background_makes_every_pixel_opaque() {
        let pixmap = Pixmap::new(3, 3).unwrap();
        let buf = pixmap_to_rgba(&pixmap, Some(Srgb::BLACK));
        for (i, px) in buf.chunks(4).enumerate() {
            assert_eq!(px, [0, 0, 0, 255], "pixel {i}");
        }
    }

    #[test]
    fn opaque_white_circle_over_black_is_white() {
        let mut pixmap = Pixmap::new(9, 9).unwrap();
        pixmap.fill_circle(4.5, 4.5, 3.0, Srgb::WHITE);
        let buf = pixmap_to_rgba(&pixmap, Some(Srgb::BLACK));
        let center = (4 * 9 + 4) * 4;
        assert_eq!(&buf[center..center + 4], [255, 255, 255, 255]);
    }

    #[test]
    fn translucent_background_keeps_partial_alpha() {
        let pixmap = Pixmap::new(1, 1).unwrap();
        let bg = Srgb::parse("rgba(0, 0, 255, 0.5)").unwrap();
        let buf = pixmap_to_rgba(&pixmap, Some(bg));
        assert_eq!(buf, [0, 0, 255, 128]);
    }

    #[test]
    fn straight_alpha_unpremultiplies() {
        let mut pixmap = Pixmap::new(10, 3).unwrap();
        pixmap.stroke_line((0.0, 1.5), (10.0, 1.5), 0.5, Srgb::WHITE);
        let buf = pixmap_to_rgba(&pixmap, None);
        let px = &buf[(10 + 5) * 4..(10 + 5) * 4 + 4];
        assert_eq!(px, [255, 255, 255, 128]);
    }
}
