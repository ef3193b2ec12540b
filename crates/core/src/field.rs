//! The particle field: point population, per-frame physics, and painting.
//!
//! A [`ParticleField`] owns its drawing surface and all mutable state. Hosts
//! call [`ParticleField::advance_frame`] once per animation tick and forward
//! resize and pointer events between ticks; nothing here blocks or spans
//! frames.

use crate::config::{FieldConfig, MAX_COUNT};
use crate::error::FieldError;
use crate::host::HostElement;
use crate::point::{distance, line_width, Point};
use crate::prng::Xorshift64;
use crate::surface::{scale, Surface};
use serde::Serialize;
use tracing::{debug, info};

/// Last pointer position reported by the host, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    /// Whether `p` lies strictly inside the square of half-size `half` around the pointer.
    fn window_contains(&self, p: &Point, half: f64) -> bool {
        p.x > self.x - half && p.x < self.x + half && p.y > self.y - half && p.y < self.y + half
    }
}

/// Mutable state of a field between frames.
#[derive(Debug, Clone)]
pub struct FieldState {
    width: f64,
    height: f64,
    distance: f64,
    rate: f64,
    points: Vec<Point>,
    pointer: Option<Pointer>,
    pointer_active: bool,
}

/// What one call to [`ParticleField::advance_frame`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Population after the frame.
    pub points: usize,
    /// Points that left the padded bounds and were replaced.
    pub respawned: usize,
    /// Points whose velocity was reflected.
    pub reflected: usize,
    /// Line segments stroked.
    pub lines: usize,
}

/// An animated field of drifting points painted onto a [`Surface`].
pub struct ParticleField<S> {
    config: FieldConfig,
    state: FieldState,
    surface: S,
    rng: Xorshift64,
    frame: u64,
}

impl<S: Surface> ParticleField<S> {
    /// Builds a field sized to `host`, scales `surface` to match, and spawns
    /// `config.count` points from a PRNG seeded with `seed`.
    pub fn new<H: HostElement + ?Sized>(
        host: &H,
        config: FieldConfig,
        mut surface: S,
        seed: u64,
    ) -> Result<Self, FieldError> {
        let (width, height) = host.client_size();
        check_size(width, height)?;
        scale(&mut surface, width, height, config.pixel_ratio)?;
        surface.set_z_index(config.z_index);

        let state = FieldState {
            width,
            height,
            distance: config.distance_for(width),
            rate: config.rate_for(width),
            points: Vec::with_capacity(config.count.min(MAX_COUNT)),
            pointer: None,
            pointer_active: false,
        };
        let mut field = Self {
            config,
            state,
            surface,
            rng: Xorshift64::new(seed),
            frame: 0,
        };
        for _ in 0..field.config.count {
            let point = field.generate_point(None, None);
            field.state.points.push(point);
        }

        info!(
            width,
            height,
            count = field.config.count,
            bounce = field.config.bounce,
            line = field.config.line,
            seed,
            "particle field created"
        );
        Ok(field)
    }

    /// Generates a point with random radius and velocity.
    ///
    /// The position is uniform over the current bounds unless explicit
    /// coordinates are given. The radius is drawn from `[0, radius]`. Each
    /// velocity component is drawn from `[0, bound)` when the direction is
    /// fixed (exactly 0 for a zero bound) and from `[-bound, bound)`
    /// otherwise. Radius and velocities are kept to 4 decimals, so a velocity
    /// may round up onto its bound.
    pub fn generate_point(&mut self, x: Option<f64>, y: Option<f64>) -> Point {
        let rng = &mut self.rng;
        let config = &self.config;
        let x = x.unwrap_or_else(|| rng.next_range(0.0, self.state.width));
        let y = y.unwrap_or_else(|| rng.next_range(0.0, self.state.height));
        let r = round4(rng.next_f64() * config.radius).min(config.radius);
        let mut velocity = |bound: f64| {
            let v = if config.direction_fixed {
                rng.next_range(0.0, bound)
            } else {
                rng.next_signed(bound)
            };
            round4(v)
        };
        let rate_x = velocity(config.rate_x);
        let rate_y = velocity(config.rate_y);
        Point {
            x,
            y,
            r,
            rate_x,
            rate_y,
        }
    }

    /// Runs one animation frame: clear, paint and move every point, then
    /// stroke the connecting lines.
    pub fn advance_frame(&mut self) -> FrameStats {
        self.frame += 1;
        self.surface.clear();

        let (respawned, reflected) = self.paint_and_move_points();
        let lines = self.draw_lines();

        let stats = FrameStats {
            frame: self.frame,
            points: self.state.points.len(),
            respawned,
            reflected,
            lines,
        };
        if respawned > 0 {
            debug!(frame = self.frame, respawned, "points respawned");
        }
        stats
    }

    fn paint_and_move_points(&mut self) -> (usize, usize) {
        let FieldState {
            width,
            height,
            rate,
            ..
        } = self.state;
        let color = self.config.color;
        let bounce = self.config.bounce;

        let mut escaped = Vec::new();
        let mut reflected = 0;
        for (idx, p) in self.state.points.iter_mut().enumerate() {
            self.surface.fill_circle(p.x, p.y, p.r, color);
            if bounce {
                if p.inside_band(width, height) {
                    p.advance(rate);
                } else if p.bounce_step(width, height, rate) {
                    reflected += 1;
                }
            } else if p.inside_padded(width, height) {
                p.advance(rate);
            } else {
                escaped.push(idx);
            }
        }

        // Removal and replacement happen in the same frame, so the
        // population never changes.
        for &idx in escaped.iter().rev() {
            self.state.points.remove(idx);
        }
        for _ in 0..escaped.len() {
            let point = self.generate_point(None, None);
            self.state.points.push(point);
        }
        (escaped.len(), reflected)
    }

    /// Strokes a fading line for every ordered pair within the threshold.
    ///
    /// Pairs are visited `i` ascending and `j` descending, self-pairs
    /// included; a self-pair has distance 0 and is always within the
    /// threshold. While the pointer is active only pairs with both points
    /// inside the pointer window qualify, and each segment starts at the
    /// pointer instead of the first point.
    fn draw_lines(&mut self) -> usize {
        let pointer = self.active_pointer();
        if !self.config.line && pointer.is_none() {
            return 0;
        }

        let points = &self.state.points;
        let threshold = self.state.distance;
        let half = self.config.mouse_field;
        let color = self.config.color;
        let mut stroked = 0;
        for p1 in points.iter() {
            if pointer.is_some_and(|ptr| !ptr.window_contains(p1, half)) {
                continue;
            }
            for p2 in points.iter().rev() {
                if pointer.is_some_and(|ptr| !ptr.window_contains(p2, half)) {
                    continue;
                }
                let d = distance(p1, p2);
                if d <= threshold {
                    let from = pointer.map_or((p1.x, p1.y), |ptr| (ptr.x, ptr.y));
                    self.surface
                        .stroke_line(from, (p2.x, p2.y), line_width(d, threshold), color);
                    stroked += 1;
                }
            }
        }
        stroked
    }

    /// Applies a new host size: recomputes width-relative defaults and
    /// rescales the surface. Points keep their positions and radii. A size
    /// equal to the current one is a no-op, so the surface keeps its contents.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), FieldError> {
        check_size(width, height)?;
        if width == self.state.width && height == self.state.height {
            return Ok(());
        }
        self.state.width = width;
        self.state.height = height;
        self.state.distance = self.config.distance_for(width);
        self.state.rate = self.config.rate_for(width);
        scale(&mut self.surface, width, height, self.config.pixel_ratio)?;
        debug!(
            width,
            height,
            distance = self.state.distance,
            rate = self.state.rate,
            "field resized"
        );
        Ok(())
    }

    /// Re-measures `host` and applies its size.
    pub fn resize_to_host<H: HostElement + ?Sized>(&mut self, host: &H) -> Result<(), FieldError> {
        let (width, height) = host.client_size();
        self.resize(width, height)
    }

    /// Records a pointer position. The pointer takes part in line drawing
    /// only if the configuration enables `mousemove`.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.state.pointer = Some(Pointer { x, y });
        self.state.pointer_active = self.config.mousemove;
    }

    /// The pointer left the surface.
    pub fn pointer_leave(&mut self) {
        self.state.pointer_active = false;
    }

    fn active_pointer(&self) -> Option<Pointer> {
        self.state.pointer.filter(|_| self.state.pointer_active)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn points(&self) -> &[Point] {
        &self.state.points
    }

    pub fn width(&self) -> f64 {
        self.state.width
    }

    pub fn height(&self) -> f64 {
        self.state.height
    }

    /// Current connect threshold.
    pub fn distance(&self) -> f64 {
        self.state.distance
    }

    /// Current motion speed multiplier.
    pub fn rate(&self) -> f64 {
        self.state.rate
    }

    pub fn pointer(&self) -> Option<Pointer> {
        self.state.pointer
    }

    pub fn pointer_active(&self) -> bool {
        self.state.pointer_active
    }

    /// Number of frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Hosts may be empty (a collapsed element) but never negative or NaN.
fn check_size(width: f64, height: f64) -> Result<(), FieldError> {
    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(FieldError::InvalidDimensions)
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}
