//! Browser bindings for the particle-field animation.
//!
//! `init(selector, config)` sizes a field to the matched element, appends
//! its `<canvas>`, starts a `requestAnimationFrame` loop and returns a
//! [`FieldHandle`]. Pointer and window-resize listeners live in
//! [`Subscription`]s owned by the handle; `stop()` cancels the loop and
//! removes every listener.

#![cfg(target_arch = "wasm32")]

mod canvas;

use canvas::{CanvasSurface, ElementHost};
use particle_field_core::{CancellationToken, FieldConfig, FieldError, ParticleField, Subscription};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

type SharedField = Rc<RefCell<ParticleField<CanvasSurface>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

fn js_error(e: FieldError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Reads the options object passed from JavaScript. Anything that is not a
/// JSON object resolves to the defaults.
fn read_config(config: &JsValue) -> Value {
    if config.is_undefined() || config.is_null() {
        return Value::Object(Default::default());
    }
    let parsed = js_sys::JSON::stringify(config)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str::<Value>(&s).ok());
    match parsed {
        Some(value) => value,
        None => {
            warn!("options are not serializable, using defaults");
            Value::Object(Default::default())
        }
    }
}

/// Adds `callback` as a `kind` listener on `target`, removed when the
/// returned subscription is disposed.
fn listen(
    target: &EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
) -> Result<Subscription, JsValue> {
    target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
    let target = target.clone();
    Ok(Subscription::new(kind, move || {
        if let Err(e) = target.remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
            warn!(listener = kind, error = ?e, "failed to remove listener");
        }
    }))
}

/// Forwards pointer movement over the canvas to the field.
fn pointer_subscriptions(target: &EventTarget, field: &SharedField) -> Result<Vec<Subscription>, JsValue> {
    let on_move = {
        let field = Rc::clone(field);
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                field
                    .borrow_mut()
                    .pointer_move(f64::from(mouse.offset_x()), f64::from(mouse.offset_y()));
            }
        })
    };
    let on_leave = {
        let field = Rc::clone(field);
        Closure::<dyn FnMut(Event)>::new(move |_: Event| field.borrow_mut().pointer_leave())
    };
    Ok(vec![
        listen(target, "mousemove", on_move)?,
        listen(target, "mouseleave", on_leave)?,
    ])
}

/// Re-measures the host on window resize. Resizes to the current size are
/// no-ops in the field, so the canvas is only touched when the host changed.
fn resize_subscription(window: &Window, host: Rc<ElementHost>, field: &SharedField) -> Result<Subscription, JsValue> {
    let on_resize = {
        let field = Rc::clone(field);
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            if let Err(e) = field.borrow_mut().resize_to_host(&*host) {
                error!(error = %e, "resize failed");
            }
        })
    };
    listen(window, "resize", on_resize)
}

/// Schedules `advance_frame` on every animation frame until `token` is cancelled.
fn start_animation(
    window: &Window,
    field: SharedField,
    token: CancellationToken,
    frame_id: Rc<Cell<Option<i32>>>,
) -> Result<FrameCallback, JsValue> {
    let tick: FrameCallback = Rc::new(RefCell::new(None));
    let next = Rc::clone(&tick);
    let scheduler = window.clone();
    let ids = Rc::clone(&frame_id);

    *tick.borrow_mut() = Some(Closure::new(move || {
        ids.set(None);
        if token.is_cancelled() {
            return;
        }
        let stats = field.borrow_mut().advance_frame();
        if stats.frame % 600 == 0 {
            debug!(frame = stats.frame, points = stats.points, lines = stats.lines, "frame");
        }
        if let Some(callback) = next.borrow().as_ref() {
            match scheduler.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => ids.set(Some(id)),
                Err(e) => error!(error = ?e, "requestAnimationFrame failed"),
            }
        }
    }));

    if let Some(callback) = tick.borrow().as_ref() {
        frame_id.set(Some(window.request_animation_frame(callback.as_ref().unchecked_ref())?));
    }
    Ok(tick)
}

/// A running particle field in the page. Freeing the handle stops it.
#[wasm_bindgen]
pub struct FieldHandle {
    window: Window,
    field: SharedField,
    token: CancellationToken,
    frame_id: Rc<Cell<Option<i32>>>,
    tick: FrameCallback,
    subscriptions: Vec<Subscription>,
}

#[wasm_bindgen]
impl FieldHandle {
    /// Stops the animation and removes the event listeners. The canvas stays
    /// in the page with its last frame. Calling it again does nothing.
    pub fn stop(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        if let Some(id) = self.frame_id.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                warn!(error = ?e, "cancelAnimationFrame failed");
            }
        }
        self.tick.borrow_mut().take();
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
        info!(frames = self.field.borrow().frame_count(), "particle field stopped");
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> f64 {
        self.field.borrow().frame_count() as f64
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.field.borrow().points().len()
    }
}

impl Drop for FieldHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Creates a particle field inside the first element matching `selector`.
///
/// `config` is a plain options object (`{ color, count, line, bounce, ... }`);
/// missing or invalid keys use their defaults.
#[wasm_bindgen]
pub fn init(selector: &str, config: JsValue) -> Result<FieldHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error(FieldError::Surface("no window".into())))?;
    let document = window
        .document()
        .ok_or_else(|| js_error(FieldError::Surface("no document".into())))?;
    let element = document
        .query_selector(selector)?
        .ok_or_else(|| js_error(FieldError::HostNotFound(selector.to_string())))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| js_error(FieldError::Surface("2d context unavailable".into())))?
        .dyn_into()?;
    // Block layout keeps the canvas from adding a line-box gap under itself.
    canvas.style().set_property("display", "block")?;

    // Measure the host before the canvas joins it.
    let config = FieldConfig::from_json(&read_config(&config));
    let resize = config.resize;
    let host = Rc::new(ElementHost::new(element));
    let seed = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
    let field = ParticleField::new(&*host, config, CanvasSurface::new(canvas.clone(), ctx), seed)
        .map_err(js_error)?;
    host.element().append_child(&canvas)?;
    let field: SharedField = Rc::new(RefCell::new(field));

    let target: EventTarget = field.borrow().surface().canvas().clone().into();
    let mut subscriptions = pointer_subscriptions(&target, &field)?;
    if resize {
        subscriptions.push(resize_subscription(&window, Rc::clone(&host), &field)?);
    }

    let token = CancellationToken::new();
    let frame_id = Rc::new(Cell::new(None));
    let tick = start_animation(&window, Rc::clone(&field), token.clone(), Rc::clone(&frame_id))?;
    info!(selector, resize, "particle field started");

    Ok(FieldHandle {
        window,
        field,
        token,
        frame_id,
        tick,
        subscriptions,
    })
}
