//! Cig World - interaction core for a 3D cigarette-lighting scene
//!
//! Core modules:
//! - `scene`: Pointer ray projection, flame drag, ignition trigger, inertial rotation
//! - `game`: The smoke shooter and the dare picker mini-games
//! - `app`: Screen routing and the post-ignition reveal
//! - `input`: Pointer events and the per-frame input queue
//! - `profile`: Device class detection and fidelity knobs
//! - `tuning`: Data-driven balance
//! - `platform`: Browser glue (wasm32 only)

pub mod app;
pub mod game;
pub mod input;
pub mod platform;
pub mod profile;
pub mod scene;
pub mod tuning;

pub use app::{App, Screen};
pub use profile::{DeviceHints, DeviceProfile};
pub use scene::{Scene, SceneEvent};
pub use tuning::{SceneTuning, SmokeTuning};

/// Fixed interaction constants
pub mod consts {
    use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

    /// Distance from the camera at which the flame follows the pointer
    pub const FLAME_RAY_DISTANCE: f32 = 2.5;

    /// Flame-to-tip distance that counts as contact
    pub const CONTACT_THRESHOLD: f32 = 0.4;
    /// Sustained contact needed to light (seconds)
    pub const DWELL_SECONDS: f32 = 0.5;

    /// Drag sensitivity (radians per pixel)
    pub const DRAG_SENSITIVITY: f32 = 0.01;
    /// Angular velocity decay per frame after release
    pub const ROTATION_DAMPING: f32 = 0.95;
    /// Easing factor toward target on the X axis
    pub const EASE_X: f32 = 0.10;
    /// Easing factor toward target on the Y axis
    pub const EASE_Y: f32 = 0.15;
    /// Resting orientation (x, y)
    pub const REST_ROTATION: (f32, f32) = (FRAC_PI_6, FRAC_PI_4);
    /// Fixed roll of the cigarette model
    pub const CIGARETTE_ROLL: f32 = std::f32::consts::FRAC_PI_2;

    /// Intro spin duration (seconds)
    pub const INTRO_SPIN_SECONDS: f32 = 1.5;
    /// Exponent of the intro ease-out curve
    pub const INTRO_EASE_POWER: i32 = 5;

    /// Delay between ignition and the follow-up UI (ms)
    pub const REVEAL_DELAY_MS: f64 = 1500.0;

    /// Playfield boundary (percent) past which droplets cost a life
    pub const PLAYFIELD_BOTTOM: f32 = 100.0;
    /// Points per power mode milestone
    pub const POWER_MODE_EVERY: u32 = 50;
    /// Starting lives in the smoke shooter
    pub const LIVES_INITIAL: u8 = 3;
}

/// Ease-out curve used by the intro spin: `1 - (1 - t)^5`
#[inline]
pub fn ease_out(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(consts::INTRO_EASE_POWER)
}

/// Exponential smoothing step: move `current` a fraction of the way to `target`
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_bounds() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert_eq!(ease_out(2.0), 1.0);
        // Front-loaded: more than half done at a quarter of the time
        assert!(ease_out(0.25) > 0.5);
    }

    #[test]
    fn test_approach() {
        assert!((approach(0.0, 10.0, 0.1) - 1.0).abs() < 1e-6);
        assert_eq!(approach(3.0, 3.0, 0.15), 3.0);
    }
}
