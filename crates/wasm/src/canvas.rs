//! `<canvas>` 2D context as a particle-field surface, and DOM elements as hosts.

use particle_field_core::{FieldError, HostElement, Srgb, Surface};
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

/// Draws through a canvas element's 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    ratio: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            ratio: 1.0,
        }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(e) = self.canvas.style().set_property(property, value) {
            warn!(property, error = ?e, "failed to set canvas style");
        }
    }
}

impl Surface for CanvasSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) -> Result<(), FieldError> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        self.set_style("width", &format!("{width}px"));
        self.set_style("height", &format!("{height}px"));
    }

    fn set_transform_scale(&mut self, ratio: f64) {
        self.ratio = ratio;
        if let Err(e) = self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0) {
            warn!(ratio, error = ?e, "failed to set canvas transform");
        }
    }

    fn set_z_index(&mut self, z_index: i64) {
        self.set_style("z-index", &z_index.to_string());
    }

    fn clear(&mut self) {
        let width = f64::from(self.canvas.width()) / self.ratio;
        let height = f64::from(self.canvas.height()) / self.ratio;
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: Srgb) {
        self.ctx.begin_path();
        if self.ctx.arc(x, y, r, 0.0, std::f64::consts::TAU).is_err() {
            return;
        }
        #[allow(deprecated)]
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Srgb) {
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("butt");
        #[allow(deprecated)]
        self.ctx.set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.ctx.stroke();
    }
}

/// A DOM element sized by its content box.
pub struct ElementHost {
    element: Element,
}

impl ElementHost {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl HostElement for ElementHost {
    fn client_size(&self) -> (f64, f64) {
        (
            f64::from(self.element.client_width()),
            f64::from(self.element.client_height()),
        )
    }
}
