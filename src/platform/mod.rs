//! Platform layer
//!
//! Browser glue lives in `web` and only builds for wasm32:
//! - Event listeners with scoped cleanup
//! - The animation-frame loop
//! - Handles exported to the JavaScript renderer

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::app::Screen;

/// Where a DOM event type is listened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Only while the pointer is over the canvas
    Canvas,
    /// Page-wide, so drags keep tracking off the canvas and over overlays
    Window,
}

/// Pointer-ish DOM events the app listens to
pub const POINTER_EVENTS: [(&str, EventScope); 6] = [
    ("pointerdown", EventScope::Canvas),
    ("pointerleave", EventScope::Canvas),
    ("wheel", EventScope::Canvas),
    ("pointermove", EventScope::Window),
    ("pointerup", EventScope::Window),
    ("pointercancel", EventScope::Window),
];

/// Whether an event of `kind` is forwarded to the app on `screen`
pub fn forwards(kind: &str, screen: Screen) -> bool {
    // Leaving the canvas only ends a press in the shooter
    kind != "pointerleave" || screen == Screen::Smoke
}

/// Whether the browser default action must be suppressed
pub fn suppresses_default(kind: &str, screen: Screen) -> bool {
    match kind {
        "wheel" => true,
        "pointerdown" => screen == Screen::Smoke,
        _ => false,
    }
}

/// Listeners that call `preventDefault` must be registered non-passive
pub fn needs_active_listener(kind: &str) -> bool {
    kind == "wheel"
}

/// Frame delta from animation-frame timestamps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Delta used for the very first frame
    pub const FIRST_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest delta handed to the simulation (tab was hidden, debugger, ...)
    pub const MAX_FRAME_MS: f64 = 100.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) => (now_ms - last).clamp(0.0, Self::MAX_FRAME_MS),
            None => Self::FIRST_FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        dt
    }
}
