//! The drawing surface seam.
//!
//! [`Surface`] is the handful of 2D-context operations a particle field
//! needs. The browser host implements it over a `<canvas>` 2D context, the
//! raster crate over an RGBA pixel buffer, and [`Recorder`] keeps the calls
//! as data.

use crate::color::Srgb;
use crate::error::FieldError;
use serde::Serialize;

/// A 2D drawing target in logical coordinates.
///
/// Coordinates passed to the drawing calls are logical pixels; the surface
/// multiplies them by the ratio given to [`Surface::set_transform_scale`].
pub trait Surface {
    /// Resizes the backing store to `width x height` device pixels.
    ///
    /// Resizing discards the current contents.
    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<(), FieldError>;

    /// Sets the displayed (CSS) size. Surfaces without a display notion ignore it.
    fn set_display_size(&mut self, _width: f64, _height: f64) {}

    /// Sets the logical-to-device scale applied to every drawing call.
    fn set_transform_scale(&mut self, ratio: f64);

    /// Sets the stacking order inside the host. Ignored by off-screen surfaces.
    fn set_z_index(&mut self, _z_index: i64) {}

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    /// Paints a filled circle centered at `(x, y)`.
    fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: Srgb);

    /// Strokes a straight segment with butt caps. Zero-length segments paint nothing.
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Srgb);
}

/// Normalizes a surface to a logical `width x height` at resolution `ratio`.
///
/// The backing store becomes `ceil(width * ratio) x ceil(height * ratio)`
/// device pixels, the display size stays `width x height`, and drawing calls
/// are scaled by `ratio` so callers keep working in logical pixels.
pub fn scale<S: Surface + ?Sized>(
    surface: &mut S,
    width: f64,
    height: f64,
    ratio: f64,
) -> Result<(), FieldError> {
    let device = |logical: f64| (logical * ratio).ceil().max(0.0) as u32;
    surface.set_backing_size(device(width), device(height))?;
    surface.set_display_size(width, height);
    surface.set_transform_scale(ratio);
    Ok(())
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    Circle {
        x: f64,
        y: f64,
        r: f64,
        color: Srgb,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Srgb,
    },
}

/// A [`Surface`] that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
    backing: (u32, u32),
    display: (f64, f64),
    ratio: f64,
    z_index: i64,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            ratio: 1.0,
            ..Self::default()
        }
    }

    /// Every command recorded since the last [`Recorder::take_commands`].
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded line commands as `(from, to, width)`.
    pub fn lines(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64), f64)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, width, .. } => Some((*from, *to, *width)),
            _ => None,
        })
    }

    /// Number of recorded circle commands.
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    pub fn display_size(&self) -> (f64, f64) {
        self.display
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }
}

impl Surface for Recorder {
    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<(), FieldError> {
        self.backing = (width, height);
        Ok(())
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        self.display = (width, height);
    }

    fn set_transform_scale(&mut self, ratio: f64) {
        self.ratio = ratio;
    }

    fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: Srgb) {
        self.commands.push(DrawCommand::Circle { x, y, r, color });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Srgb) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
