//! Debounced dwell-time ignition
//!
//! Unlit until the flame has stayed within the contact threshold of the tip
//! for longer than the dwell time. Any frame outside the threshold resets the
//! timer. Lit is terminal.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{CONTACT_THRESHOLD, DWELL_SECONDS};

/// Ignition state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IgnitionPhase {
    #[default]
    Unlit,
    Lit,
}

/// Outcome of one trigger step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Nothing evaluated (already lit)
    Idle,
    /// Within threshold, still accumulating
    Touching,
    /// Outside threshold, timer reset
    Apart,
    /// Dwell satisfied on this frame
    Ignited,
}

#[derive(Debug, Clone)]
pub struct ProximityTrigger {
    pub threshold: f32,
    pub dwell: f32,
    contact_timer: f32,
    phase: IgnitionPhase,
}

impl Default for ProximityTrigger {
    fn default() -> Self {
        Self::new(CONTACT_THRESHOLD, DWELL_SECONDS)
    }
}

impl ProximityTrigger {
    pub fn new(threshold: f32, dwell: f32) -> Self {
        Self {
            threshold,
            dwell,
            contact_timer: 0.0,
            phase: IgnitionPhase::Unlit,
        }
    }

    pub fn contact_timer(&self) -> f32 {
        self.contact_timer
    }

    pub fn phase(&self) -> IgnitionPhase {
        self.phase
    }

    pub fn is_lit(&self) -> bool {
        self.phase == IgnitionPhase::Lit
    }

    /// Clear accumulated contact (flame released)
    pub fn reset_contact(&mut self) {
        self.contact_timer = 0.0;
    }

    /// Advance by one frame of `dt` seconds with the flame at `flame` and the tip at `target`
    pub fn step(&mut self, flame: Vec3, target: Vec3, dt: f32) -> Contact {
        if self.is_lit() {
            return Contact::Idle;
        }

        if flame.distance(target) < self.threshold {
            self.contact_timer += dt;
            if self.contact_timer > self.dwell {
                self.ignite();
                return Contact::Ignited;
            }
            Contact::Touching
        } else {
            self.contact_timer = 0.0;
            Contact::Apart
        }
    }

    /// Force the terminal state. Returns `true` only on the first call.
    pub fn ignite(&mut self) -> bool {
        if self.is_lit() {
            return false;
        }
        self.phase = IgnitionPhase::Lit;
        self.contact_timer = 0.0;
        log::info!("Ignition");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_sustained_contact_ignites_once() {
        let mut trigger = ProximityTrigger::default();
        let tip = Vec3::new(0.0, 1.0, 5.0);
        let flame = tip + Vec3::new(0.1, 0.0, 0.0);

        let mut fired = 0;
        for _ in 0..120 {
            if trigger.step(flame, tip, DT) == Contact::Ignited {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(trigger.is_lit());
        assert_eq!(trigger.step(flame, tip, DT), Contact::Idle);
    }

    #[test]
    fn test_ignites_just_after_dwell() {
        let mut trigger = ProximityTrigger::default();
        // 0.5s exactly is not enough; the threshold is strict
        assert_eq!(trigger.step(Vec3::ZERO, Vec3::ZERO, 0.25), Contact::Touching);
        assert_eq!(trigger.step(Vec3::ZERO, Vec3::ZERO, 0.25), Contact::Touching);
        assert_eq!(trigger.step(Vec3::ZERO, Vec3::ZERO, 0.01), Contact::Ignited);
    }

    #[test]
    fn test_leaving_resets_timer() {
        let mut trigger = ProximityTrigger::default();
        let tip = Vec3::ZERO;
        for _ in 0..20 {
            trigger.step(Vec3::new(0.2, 0.0, 0.0), tip, DT);
        }
        assert!(trigger.contact_timer() > 0.3);

        // Exactly at the threshold counts as apart
        assert_eq!(trigger.step(Vec3::new(0.4, 0.0, 0.0), tip, DT), Contact::Apart);
        assert_eq!(trigger.contact_timer(), 0.0);
    }

    #[test]
    fn test_flicker_never_ignites() {
        // In/out every frame: no hysteresis, the timer never builds up
        let mut trigger = ProximityTrigger::default();
        let tip = Vec3::ZERO;
        for i in 0..600 {
            let x = if i % 2 == 0 { 0.1 } else { 0.5 };
            assert_ne!(trigger.step(Vec3::new(x, 0.0, 0.0), tip, DT), Contact::Ignited);
        }
        assert!(!trigger.is_lit());
    }

    #[test]
    fn test_manual_ignite_is_idempotent() {
        let mut trigger = ProximityTrigger::default();
        assert!(trigger.ignite());
        assert!(!trigger.ignite());
    }
}
