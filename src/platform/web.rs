//! Browser glue for wasm32
//!
//! Raw DOM events are converted to [`PointerEvent`]s and pushed into the
//! [`App`]'s queue; the animation-frame loop drains it once per frame. Every
//! listener and the loop itself are owned by [`AppHandle`], so freeing the
//! handle from JavaScript detaches everything.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlCanvasElement};

use super::{EventScope, FrameClock, POINTER_EVENTS, forwards, needs_active_listener, suppresses_default};
use crate::app::{App, AppEvent, Screen};
use crate::game::{DarePhase, GameEvent};
use crate::input::{PointerEvent, Viewport};
use crate::profile::{DeviceHints, DeviceProfile};
use crate::scene::SceneEvent;
use crate::tuning::{SceneTuning, SmokeTuning};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already set: {err}").into());
    }
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// An event listener that detaches itself when dropped
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        if needs_active_listener(kind) {
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
        } else {
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        }
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// requestAnimationFrame loop; the pending frame is cancelled on drop
pub struct FrameLoop {
    request_id: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let window = window()?;
        let request_id = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let next = callback.clone();
        let id = request_id.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            on_frame(time);
            if let Some(cb) = next.borrow().as_ref() {
                id.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            request_id.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
        }

        Ok(Self {
            request_id,
            callback,
        })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Ok(window)) = (self.request_id.take(), window()) {
            let _ = window.cancel_animation_frame(id);
        }
        // The closure holds a reference to its own cell
        self.callback.borrow_mut().take();
    }
}

fn canvas_viewport(canvas: &HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(rect.width() as f32, rect.height() as f32)
}

/// Client coordinates to canvas-relative CSS pixels
fn canvas_pos(canvas: &HtmlCanvasElement, event: &web_sys::MouseEvent) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        (event.client_x() as f64 - rect.left()) as f32,
        (event.client_y() as f64 - rect.top()) as f32,
    )
}

fn to_pointer_event(canvas: &HtmlCanvasElement, kind: &str, event: &web_sys::Event) -> Option<PointerEvent> {
    if kind == "wheel" {
        let wheel = event.dyn_ref::<web_sys::WheelEvent>()?;
        return Some(PointerEvent::Wheel {
            delta_y: wheel.delta_y() as f32,
            time_ms: event.time_stamp(),
        });
    }
    let mouse = event.dyn_ref::<web_sys::MouseEvent>()?;
    let pos = canvas_pos(canvas, mouse);
    match kind {
        "pointerdown" => Some(PointerEvent::Down { pos }),
        "pointermove" => Some(PointerEvent::Move { pos }),
        "pointerup" => Some(PointerEvent::Up { pos }),
        "pointerleave" | "pointercancel" => Some(PointerEvent::Cancel),
        _ => None,
    }
}

fn event_name(event: &AppEvent) -> &'static str {
    match event {
        AppEvent::Scene(SceneEvent::FlameOn) => "flameOn",
        AppEvent::Scene(SceneEvent::FlameOff) => "flameOff",
        AppEvent::Scene(SceneEvent::Lit) => "lit",
        AppEvent::Reveal => "reveal",
        AppEvent::Smoke(GameEvent::Hit { .. }) => "hit",
        AppEvent::Smoke(GameEvent::LifeLost { .. }) => "lifeLost",
        AppEvent::Smoke(GameEvent::PowerMode) => "powerMode",
        AppEvent::Smoke(GameEvent::GameOver) => "gameOver",
    }
}

fn parse_or_default<T: Default>(json: Option<String>, parse: fn(&str) -> Result<T, serde_json::Error>) -> T {
    match json.as_deref().map(parse) {
        Some(Ok(tuning)) => tuning,
        Some(Err(err)) => {
            log::warn!("Ignoring bad tuning override: {err}");
            T::default()
        }
        None => T::default(),
    }
}

/// The whole app attached to a canvas
#[wasm_bindgen]
pub struct AppHandle {
    app: Rc<RefCell<App>>,
    profile: DeviceProfile,
    on_event: Rc<RefCell<Option<js_sys::Function>>>,
    listeners: Vec<Listener>,
    frame_loop: Option<FrameLoop>,
}

#[wasm_bindgen]
impl AppHandle {
    /// Attach to `canvas`. Tuning overrides are optional JSON objects.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        scene_tuning: Option<String>,
        smoke_tuning: Option<String>,
    ) -> Result<AppHandle, JsValue> {
        let window = window()?;
        let profile = DeviceProfile::detect(&DeviceHints::from_browser());
        let seed = js_sys::Date::now() as u64;

        let app = Rc::new(RefCell::new(App::new(
            parse_or_default(scene_tuning, SceneTuning::from_json),
            parse_or_default(smoke_tuning, SmokeTuning::from_json),
            &profile,
            canvas_viewport(&canvas),
            seed,
        )));
        let on_event: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));

        let mut listeners = Vec::new();
        let canvas_target: &EventTarget = canvas.as_ref();
        let window_target: &EventTarget = window.as_ref();
        for (kind, scope) in POINTER_EVENTS {
            let target = match scope {
                EventScope::Canvas => canvas_target,
                EventScope::Window => window_target,
            };
            let app = app.clone();
            let canvas = canvas.clone();
            listeners.push(Listener::new(target, kind, move |event| {
                let screen = app.borrow().screen();
                if !forwards(kind, screen) {
                    return;
                }
                if let Some(pointer) = to_pointer_event(&canvas, kind, &event) {
                    if suppresses_default(kind, screen) {
                        event.prevent_default();
                    }
                    app.borrow_mut().pointer(pointer);
                }
            })?);
        }

        {
            let app = app.clone();
            let canvas = canvas.clone();
            listeners.push(Listener::new(window.as_ref(), "resize", move |_| {
                app.borrow_mut().set_viewport(canvas_viewport(&canvas));
            })?);
        }

        let frame_loop = {
            let app = app.clone();
            let on_event = on_event.clone();
            let mut clock = FrameClock::new();
            FrameLoop::start(move |time| {
                let dt = clock.tick(time);
                let events = app.borrow_mut().frame(dt);
                if events.is_empty() {
                    return;
                }
                // Clone out so a callback may call back into the handle
                let Some(callback) = on_event.borrow().clone() else {
                    return;
                };
                for event in &events {
                    let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(event_name(event)));
                }
            })?
        };

        log::info!("Attached to canvas ({} listeners)", listeners.len());
        Ok(AppHandle {
            app,
            profile,
            on_event,
            listeners,
            frame_loop: Some(frame_loop),
        })
    }

    /// Register `callback(name)` for frame events
    pub fn on_event(&self, callback: js_sys::Function) {
        *self.on_event.borrow_mut() = Some(callback);
    }

    /// Detach listeners and stop the loop
    pub fn detach(&mut self) {
        self.frame_loop = None;
        self.listeners.clear();
        log::info!("Detached");
    }

    pub fn navigate(&self, screen: &str) -> Result<(), JsValue> {
        let screen = Screen::from_str(screen)
            .ok_or_else(|| JsValue::from_str(&format!("unknown screen: {screen}")))?;
        self.app.borrow_mut().navigate(screen);
        Ok(())
    }

    pub fn screen(&self) -> String {
        self.app.borrow().screen().as_str().to_string()
    }

    pub fn profile_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.profile).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn is_lit(&self) -> bool {
        self.app.borrow().scene().is_lit()
    }

    pub fn is_revealed(&self) -> bool {
        self.app.borrow().is_revealed()
    }

    /// Column-major model matrix of the cigarette
    pub fn cigarette_matrix(&self) -> Vec<f32> {
        self.app.borrow().scene().cigarette_transform().to_cols_array().to_vec()
    }

    pub fn camera_position(&self) -> Vec<f32> {
        self.app.borrow().scene().camera().position.to_array().to_vec()
    }

    pub fn flame_active(&self) -> bool {
        self.app.borrow().scene().flame().phase == crate::scene::FlamePhase::Active
    }

    pub fn flame_position(&self) -> Vec<f32> {
        self.app.borrow().scene().flame().position.to_array().to_vec()
    }

    pub fn flame_light(&self) -> f32 {
        self.app.borrow().scene().flame_effect().light_intensity()
    }

    /// Particle seeds as raw bytes (32 per particle)
    pub fn flame_particles(&self) -> Vec<u8> {
        self.app.borrow().scene().flame_effect().particle_bytes().to_vec()
    }

    /// Flame uniform block as raw bytes
    pub fn flame_uniforms(&self) -> Vec<u8> {
        self.app.borrow().scene().flame_effect().uniform_bytes().to_vec()
    }

    pub fn ember_intensity(&self) -> f32 {
        self.app.borrow().scene().ember_intensity()
    }

    pub fn ember_light_position(&self) -> Vec<f32> {
        self.app.borrow().scene().ember_light_position().to_array().to_vec()
    }

    /// Shooter view, present while the smoke screen is open
    pub fn smoke(&self) -> Option<SmokeHandle> {
        self.app.borrow().smoke().is_some().then(|| SmokeHandle {
            app: self.app.clone(),
        })
    }

    /// Dare picker view, present while the dare screen is open
    pub fn dare(&self) -> Option<DareHandle> {
        self.app.borrow().dare().is_some().then(|| DareHandle {
            app: self.app.clone(),
        })
    }
}

/// Smoke shooter accessors
#[wasm_bindgen]
pub struct SmokeHandle {
    app: Rc<RefCell<App>>,
}

#[wasm_bindgen]
impl SmokeHandle {
    /// Lives, score, phase, power mode and every entity as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let app = self.app.borrow();
        let smoke = app
            .smoke()
            .ok_or_else(|| JsValue::from_str("smoke screen is closed"))?;
        smoke
            .snapshot_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn restart(&self) {
        self.app.borrow_mut().restart_smoke();
    }
}

/// Dare picker accessors and buttons
#[wasm_bindgen]
pub struct DareHandle {
    app: Rc<RefCell<App>>,
}

impl DareHandle {
    fn with<T>(&self, f: impl FnOnce(&mut crate::game::DareState) -> T) -> Option<T> {
        self.app.borrow_mut().dare_mut().map(f)
    }
}

#[wasm_bindgen]
impl DareHandle {
    pub fn phase(&self) -> Option<String> {
        self.with(|d| d.phase.as_str().to_string())
    }

    pub fn dare(&self) -> Option<String> {
        self.with(|d| d.dare.map(str::to_string)).flatten()
    }

    pub fn punishment(&self) -> Option<String> {
        self.with(|d| d.punishment.map(str::to_string)).flatten()
    }

    pub fn skips_label(&self) -> Option<String> {
        self.with(|d| d.skips_label())
    }

    pub fn no_skips_message(&self) -> bool {
        self.with(|d| d.no_skips_message_visible()).unwrap_or(false)
    }

    pub fn revealed(&self) -> bool {
        self.with(|d| d.phase == DarePhase::Revealed).unwrap_or(false)
    }

    pub fn skip(&self) -> bool {
        self.with(|d| d.skip()).unwrap_or(false)
    }

    pub fn accept(&self) -> bool {
        self.with(|d| d.accept()).unwrap_or(false)
    }

    pub fn new_dare(&self) -> bool {
        self.with(|d| d.new_dare()).unwrap_or(false)
    }
}
