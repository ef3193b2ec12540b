//! A single drifting point and the geometry shared by the frame step.

use serde::{Deserialize, Serialize};

/// One particle: position, radius, and per-frame velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub rate_x: f64,
    pub rate_y: f64,
}

impl Point {
    /// Moves the point by its velocity scaled by `rate`.
    pub fn advance(&mut self, rate: f64) {
        self.x += self.rate_x * rate;
        self.y += self.rate_y * rate;
    }

    /// Whether the center lies in `[r, width - r] x [r, height - r]`.
    pub fn inside_band(&self, width: f64, height: f64) -> bool {
        self.x_inside_band(width) && self.y_inside_band(height)
    }

    fn x_inside_band(&self, width: f64) -> bool {
        self.x >= self.r && self.x <= width - self.r
    }

    fn y_inside_band(&self, height: f64) -> bool {
        self.y >= self.r && self.y <= height - self.r
    }

    /// Whether the center lies in `[-r, width + r] x [-r, height + r]`.
    pub fn inside_padded(&self, width: f64, height: f64) -> bool {
        self.x >= -self.r
            && self.x <= width + self.r
            && self.y >= -self.r
            && self.y <= height + self.r
    }

    /// One bounce-mode step.
    ///
    /// Outside the band, each axis whose coordinate is out of band has its
    /// velocity inverted before the move. The reflection therefore lands one
    /// frame after the crossing. Returns whether any axis was reflected.
    pub fn bounce_step(&mut self, width: f64, height: f64, rate: f64) -> bool {
        let mut reflected = false;
        if !self.x_inside_band(width) {
            self.rate_x = -self.rate_x;
            reflected = true;
        }
        if !self.y_inside_band(height) {
            self.rate_y = -self.rate_y;
            reflected = true;
        }
        self.advance(rate);
        reflected
    }
}

/// Euclidean distance between two point centers.
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    (dx * dx + dy * dy).sqrt()
}

/// Stroke width for a connection of length `d` under threshold `threshold`.
///
/// Fades linearly from 1 at distance 0 to 0 at the threshold. A zero
/// threshold only admits coincident points, which get the full width.
pub fn line_width(d: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 1.0;
    }
    (1.0 - d / threshold).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> Point {
        Point {
            x,
            y,
            r: 1.0,
            rate_x: 0.0,
            rate_y: 0.0,
        }
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(&at(0.0, 0.0), &at(3.0, 4.0)), 5.0);
    }

    #[test]
    fn self_distance_is_zero() {
        let p = at(12.5, -3.0);
        assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn line_width_fades_with_distance() {
        assert_eq!(line_width(0.0, 100.0), 1.0);
        assert_eq!(line_width(25.0, 100.0), 0.75);
        assert_eq!(line_width(100.0, 100.0), 0.0);
    }

    #[test]
    fn line_width_zero_threshold_is_full_width() {
        assert_eq!(line_width(0.0, 0.0), 1.0);
    }

    #[test]
    fn advance_scales_velocity_by_rate() {
        let mut p = Point {
            rate_x: 2.0,
            rate_y: -1.0,
            ..at(10.0, 10.0)
        };
        p.advance(0.5);
        assert_eq!((p.x, p.y), (11.0, 9.5));
    }

    #[test]
    fn band_excludes_radius_margin() {
        assert!(at(1.0, 1.0).inside_band(10.0, 10.0));
        assert!(!at(0.5, 5.0).inside_band(10.0, 10.0));
        assert!(!at(5.0, 9.5).inside_band(10.0, 10.0));
    }

    #[test]
    fn padded_bounds_include_radius_margin() {
        assert!(at(-1.0, 11.0).inside_padded(10.0, 10.0));
        assert!(!at(-1.5, 5.0).inside_padded(10.0, 10.0));
    }

    #[test]
    fn bounce_step_inside_band_just_moves() {
        let mut p = Point {
            rate_x: 1.0,
            rate_y: 1.0,
            ..at(5.0, 5.0)
        };
        assert!(!p.bounce_step(10.0, 10.0, 1.0));
        assert_eq!((p.x, p.y, p.rate_x, p.rate_y), (6.0, 6.0, 1.0, 1.0));
    }

    #[test]
    fn bounce_step_reflects_only_the_offending_axis() {
        let mut p = Point {
            rate_x: 1.0,
            rate_y: 1.0,
            ..at(9.5, 5.0)
        };
        assert!(p.bounce_step(10.0, 10.0, 1.0));
        assert_eq!(p.rate_x, -1.0);
        assert_eq!(p.rate_y, 1.0);
        assert_eq!((p.x, p.y), (8.5, 6.0));
    }
}
