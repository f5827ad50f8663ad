//! Data-driven balance
//!
//! Defaults match the shipped feel. A JSON override can replace any subset of
//! fields; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Scene constants that a host may want to tweak
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneTuning {
    /// Camera start position (x, y, z)
    pub camera_position: [f32; 3],
    /// Vertical field of view in degrees
    pub camera_fov_deg: f32,
    /// Cigarette world position
    pub cigarette_position: [f32; 3],
    /// Flame follow distance along the pointer ray
    pub flame_distance: f32,
    /// Contact distance for ignition
    pub contact_threshold: f32,
    /// Dwell time for ignition (seconds)
    pub dwell_seconds: f32,
    /// Intro spin duration (seconds)
    pub intro_spin_seconds: f32,
    /// Skip the intro spin entirely
    pub skip_intro: bool,
    /// Flame visual intensity multiplier
    pub flame_intensity: f32,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            camera_position: [0.0, 0.0, 8.0],
            camera_fov_deg: 50.0,
            cigarette_position: [0.0, 0.6, 5.0],
            flame_distance: FLAME_RAY_DISTANCE,
            contact_threshold: CONTACT_THRESHOLD,
            dwell_seconds: DWELL_SECONDS,
            intro_spin_seconds: INTRO_SPIN_SECONDS,
            skip_intro: false,
            flame_intensity: 0.3,
        }
    }
}

impl SceneTuning {
    /// Parse an override; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Smoke shooter balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeTuning {
    pub lives: u8,
    /// Delay before a held pointer starts auto-firing (ms)
    pub hold_delay_ms: f64,
    /// Auto-fire interval (ms)
    pub hold_interval_ms: f64,
    /// Auto-fire interval in power mode (ms)
    pub hold_interval_power_ms: f64,
    /// Power mode duration (ms)
    pub power_mode_ms: f64,
    /// Power mode banner duration (ms)
    pub power_banner_ms: f64,
    /// Points per power mode milestone
    pub power_every: u32,
    /// Shot rise per frame (percent)
    pub shot_speed: f32,
    /// Shot lifetime (ms)
    pub shot_lifetime_ms: f64,
    /// Shots above this y are culled
    pub shot_cull_y: f32,
    /// Y used for auto-fired shots
    pub shot_locked_y: f32,
    /// Droplet fall per frame at start (percent)
    pub droplet_speed_base: f32,
    /// Droplet fall per frame cap
    pub droplet_speed_max: f32,
    /// Speed gained per point
    pub droplet_speed_per_point: f32,
    /// Speed gained per elapsed second
    pub droplet_speed_per_second: f32,
    /// Spawn interval at start (ms)
    pub spawn_interval_base_ms: f64,
    /// Spawn interval floor (ms)
    pub spawn_interval_min_ms: f64,
    /// Interval shrink per point (ms)
    pub spawn_interval_per_point_ms: f64,
    /// Interval shrink per elapsed second (ms)
    pub spawn_interval_per_second_ms: f64,
    /// Uniform random extra delay (ms)
    pub spawn_jitter_ms: f64,
    /// Delay before the first droplet (ms)
    pub first_spawn_delay_ms: f64,
    /// Droplet x spawn range (percent)
    pub spawn_x_min: f32,
    pub spawn_x_max: f32,
    /// Shot/droplet hit distance (percent)
    pub collision_radius: f32,
}

impl Default for SmokeTuning {
    fn default() -> Self {
        Self {
            lives: LIVES_INITIAL,
            hold_delay_ms: 120.0,
            hold_interval_ms: 400.0,
            hold_interval_power_ms: 30.0,
            power_mode_ms: 10_000.0,
            power_banner_ms: 2_000.0,
            power_every: POWER_MODE_EVERY,
            shot_speed: 0.55,
            shot_lifetime_ms: 3_500.0,
            shot_cull_y: -20.0,
            shot_locked_y: 95.0,
            droplet_speed_base: 0.06,
            droplet_speed_max: 0.22,
            droplet_speed_per_point: 0.0015,
            droplet_speed_per_second: 0.0012,
            spawn_interval_base_ms: 1_400.0,
            spawn_interval_min_ms: 280.0,
            spawn_interval_per_point_ms: 40.0,
            spawn_interval_per_second_ms: 25.0,
            spawn_jitter_ms: 400.0,
            first_spawn_delay_ms: 1_500.0,
            spawn_x_min: 10.0,
            spawn_x_max: 90.0,
            collision_radius: 6.0,
        }
    }
}

impl SmokeTuning {
    /// Parse an override; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Droplet fall per frame for the given score and run time
    pub fn droplet_speed(&self, points: u32, elapsed_secs: f32) -> f32 {
        (self.droplet_speed_base
            + points as f32 * self.droplet_speed_per_point
            + elapsed_secs * self.droplet_speed_per_second)
            .min(self.droplet_speed_max)
    }

    /// Minimum delay before the next droplet (jitter excluded)
    pub fn spawn_interval_ms(&self, points: u32, elapsed_secs: f64) -> f64 {
        (self.spawn_interval_base_ms
            - points as f64 * self.spawn_interval_per_point_ms
            - elapsed_secs * self.spawn_interval_per_second_ms)
            .max(self.spawn_interval_min_ms)
    }

    /// Auto-fire interval for the current power mode state
    pub fn hold_interval(&self, power_mode: bool) -> f64 {
        if power_mode {
            self.hold_interval_power_ms
        } else {
            self.hold_interval_ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = SmokeTuning::from_json(r#"{ "lives": 5, "shot_speed": 0.0 }"#).unwrap();
        assert_eq!(tuning.lives, 5);
        assert_eq!(tuning.shot_speed, 0.0);
        assert_eq!(tuning.collision_radius, 6.0);
        assert_eq!(tuning.hold_delay_ms, 120.0);
    }

    #[test]
    fn test_bad_override_is_an_error() {
        assert!(SceneTuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_difficulty_ramp() {
        let tuning = SmokeTuning::default();
        assert!((tuning.droplet_speed(0, 0.0) - 0.06).abs() < 1e-6);
        assert_eq!(tuning.droplet_speed(1000, 0.0), 0.22);

        assert_eq!(tuning.spawn_interval_ms(0, 0.0), 1400.0);
        assert_eq!(tuning.spawn_interval_ms(10, 4.0), 1400.0 - 400.0 - 100.0);
        assert_eq!(tuning.spawn_interval_ms(100, 100.0), 280.0);
    }

    #[test]
    fn test_hold_interval() {
        let tuning = SmokeTuning::default();
        assert_eq!(tuning.hold_interval(false), 400.0);
        assert_eq!(tuning.hold_interval(true), 30.0);
    }
}
