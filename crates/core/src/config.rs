//! Field configuration, resolved once from a JSON options object.
//!
//! Option keys keep their camelCase names (`mouseField`, `rateX`,
//! `directionFixed`, ...) so the same object works in the browser host and
//! on the command line. Two defaults are relative to the host width and are
//! kept unresolved here: the connect `distance` (`width / 10`) and the motion
//! `rate` (`width / 10000`). [`FieldConfig::distance_for`] and
//! [`FieldConfig::rate_for`] resolve them, again on every resize.

use crate::color::Srgb;
use crate::params::{
    param_bool, param_f64, param_f64_truthy, param_i64_truthy, param_string_truthy,
    param_usize_truthy,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

/// Default half-size of the square pointer window.
pub const DEFAULT_MOUSE_FIELD: f64 = 100.0;
/// Default maximum point radius.
pub const DEFAULT_RADIUS: f64 = 2.0;
/// Default point population.
pub const DEFAULT_COUNT: usize = 100;
/// Largest population accepted from an options object; larger values clamp.
pub const MAX_COUNT: usize = 100_000;
/// Default stacking order of the drawing surface.
pub const DEFAULT_Z_INDEX: i64 = 1;
/// Default per-axis velocity bound.
pub const DEFAULT_RATE_BOUND: f64 = 2.0;
/// Default resolution multiplier handed to [`scale`](crate::surface::scale).
pub const DEFAULT_PIXEL_RATIO: f64 = 1.0;
/// Unset `distance` resolves to `width / DISTANCE_DIVISOR`.
pub const DISTANCE_DIVISOR: f64 = 10.0;
/// Unset `rate` resolves to `width / RATE_DIVISOR`.
pub const RATE_DIVISOR: f64 = 10_000.0;

/// Immutable configuration snapshot for a [`ParticleField`](crate::field::ParticleField).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Fill color of points and stroke color of lines.
    pub color: Srgb,
    /// Connect threshold; `None` tracks `width / 10`.
    pub distance: Option<f64>,
    /// Half-size of the square window around the pointer.
    pub mouse_field: f64,
    /// Maximum point radius.
    pub radius: f64,
    /// Point population.
    pub count: usize,
    /// Stacking order of the drawing surface inside its host.
    pub z_index: i64,
    /// Motion speed multiplier; `None` tracks `width / 10000`.
    pub rate: Option<f64>,
    /// Velocity bound on the x axis.
    pub rate_x: f64,
    /// Velocity bound on the y axis.
    pub rate_y: f64,
    /// Draw velocities from `[0, bound)` instead of `[-bound, bound)`.
    pub direction_fixed: bool,
    /// Follow host resizes.
    pub resize: bool,
    /// Connect nearby points with fading lines.
    pub line: bool,
    /// Reflect off the edges instead of respawning.
    pub bounce: bool,
    /// Route lines through the pointer while it hovers the surface.
    pub mousemove: bool,
    /// Resolution multiplier for the backing store.
    pub pixel_ratio: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            color: Srgb::WHITE,
            distance: None,
            mouse_field: DEFAULT_MOUSE_FIELD,
            radius: DEFAULT_RADIUS,
            count: DEFAULT_COUNT,
            z_index: DEFAULT_Z_INDEX,
            rate: None,
            rate_x: DEFAULT_RATE_BOUND,
            rate_y: DEFAULT_RATE_BOUND,
            direction_fixed: false,
            resize: true,
            line: true,
            bounce: false,
            mousemove: false,
            pixel_ratio: DEFAULT_PIXEL_RATIO,
        }
    }
}

impl FieldConfig {
    /// Resolves a configuration from a JSON options object.
    ///
    /// `color`, `distance`, `mouseField`, `radius`, `count`, `zIndex`, `rate`
    /// and `pixelRatio` treat `0`, `""` and wrong types as absent. `rateX`,
    /// `rateY` and the boolean flags accept any value of the right type.
    /// Non-positive `radius` and `pixelRatio` values fall back as well, since
    /// neither can be drawn. `count` is capped at [`MAX_COUNT`].
    pub fn from_json(params: &Value) -> Self {
        let color = match param_string_truthy(params, "color") {
            Some(css) => Srgb::parse(&css).unwrap_or_else(|e| {
                warn!(color = %css, error = %e, "unusable color, falling back to white");
                Srgb::WHITE
            }),
            None => Srgb::WHITE,
        };

        Self {
            color,
            distance: param_f64_truthy(params, "distance"),
            mouse_field: param_f64_truthy(params, "mouseField").unwrap_or(DEFAULT_MOUSE_FIELD),
            radius: param_f64_truthy(params, "radius")
                .filter(|r| *r > 0.0)
                .unwrap_or(DEFAULT_RADIUS),
            count: clamp_count(param_usize_truthy(params, "count", DEFAULT_COUNT)),
            z_index: param_i64_truthy(params, "zIndex", DEFAULT_Z_INDEX),
            rate: param_f64_truthy(params, "rate"),
            rate_x: param_f64(params, "rateX", DEFAULT_RATE_BOUND),
            rate_y: param_f64(params, "rateY", DEFAULT_RATE_BOUND),
            direction_fixed: param_bool(params, "directionFixed", false),
            resize: param_bool(params, "resize", true),
            line: param_bool(params, "line", true),
            bounce: param_bool(params, "bounce", false),
            mousemove: param_bool(params, "mousemove", false),
            pixel_ratio: param_f64_truthy(params, "pixelRatio")
                .filter(|r| *r > 0.0)
                .unwrap_or(DEFAULT_PIXEL_RATIO),
        }
    }

    /// Connect threshold for a host of the given width.
    pub fn distance_for(&self, width: f64) -> f64 {
        self.distance.unwrap_or(width / DISTANCE_DIVISOR)
    }

    /// Motion speed multiplier for a host of the given width.
    pub fn rate_for(&self, width: f64) -> f64 {
        self.rate.unwrap_or(width / RATE_DIVISOR)
    }

    /// The configuration as a JSON options object, with the width-relative
    /// defaults resolved against `width`.
    pub fn resolved_json(&self, width: f64) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or_else(|_| json!({}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("distance".into(), json!(self.distance_for(width)));
            obj.insert("rate".into(), json!(self.rate_for(width)));
        }
        value
    }

    /// Schema describing every recognized option, its type, and its default.
    pub fn param_schema() -> Value {
        json!({
            "color": {"type": "string", "default": "#fff", "description": "Point and line color (hex, rgb()/rgba(), or a CSS color name)"},
            "distance": {"type": "number", "default": "width / 10", "description": "Connect threshold between points"},
            "mouseField": {"type": "number", "default": DEFAULT_MOUSE_FIELD, "description": "Half-size of the pointer window"},
            "radius": {"type": "number", "default": DEFAULT_RADIUS, "description": "Maximum point radius"},
            "count": {"type": "integer", "default": DEFAULT_COUNT, "maximum": MAX_COUNT, "description": "Point population"},
            "zIndex": {"type": "integer", "default": DEFAULT_Z_INDEX, "description": "Stacking order of the surface"},
            "rate": {"type": "number", "default": "width / 10000", "description": "Motion speed multiplier"},
            "rateX": {"type": "number", "default": DEFAULT_RATE_BOUND, "description": "Velocity bound on x"},
            "rateY": {"type": "number", "default": DEFAULT_RATE_BOUND, "description": "Velocity bound on y"},
            "directionFixed": {"type": "boolean", "default": false, "description": "Only non-negative velocities"},
            "resize": {"type": "boolean", "default": true, "description": "Follow host resizes"},
            "line": {"type": "boolean", "default": true, "description": "Connect nearby points"},
            "bounce": {"type": "boolean", "default": false, "description": "Reflect off edges instead of respawning"},
            "mousemove": {"type": "boolean", "default": false, "description": "Route lines through the pointer"},
            "pixelRatio": {"type": "number", "default": DEFAULT_PIXEL_RATIO, "description": "Backing store resolution multiplier"}
        })
    }
}

fn clamp_count(count: usize) -> usize {
    if count > MAX_COUNT {
        warn!(count, max = MAX_COUNT, "point count clamped");
        MAX_COUNT
    } else {
        count
    }
}
