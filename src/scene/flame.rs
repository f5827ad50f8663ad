//! Pointer-driven lighter flame
//!
//! Two states. A press on the interaction surface activates the flame at the
//! projected pointer point; moves anywhere keep it following until release.
//! Velocity is the positional delta between consecutive move events, not a
//! time-normalized rate. The wind bend of the flame visual is tuned against
//! that delta.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Flame drag state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FlamePhase {
    #[default]
    Inactive,
    Active,
}

/// Position, per-event velocity and activity of the flame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlameState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub phase: FlamePhase,
}

impl Default for FlameState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            velocity: Vec3::ZERO,
            phase: FlamePhase::Inactive,
        }
    }
}

/// Owns the flame state and applies pointer transitions to it
#[derive(Debug, Clone, Default)]
pub struct FlameController {
    state: FlameState,
    previous: Vec3,
    /// Bumped on every activation so visuals can restart their fade-in
    generation: u32,
}

impl FlameController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlameState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.phase == FlamePhase::Active
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Pointer pressed on the interaction surface at projected point `point`
    pub fn press(&mut self, point: Vec3) {
        self.state.phase = FlamePhase::Active;
        self.state.position = point;
        self.previous = point;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("Flame on at {:?}", point);
    }

    /// Pointer moved while held; ignored when inactive
    pub fn drag(&mut self, point: Vec3) {
        if !self.is_active() {
            return;
        }
        self.state.velocity = point - self.previous;
        self.state.position = point;
        self.previous = point;
    }

    /// Pointer released or cancelled
    pub fn release(&mut self) {
        if self.is_active() {
            log::debug!("Flame off");
        }
        self.state.phase = FlamePhase::Inactive;
        self.state.velocity = Vec3::ZERO;
    }
}
