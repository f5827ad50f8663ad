//! Drag rotation with inertia and a one-time intro spin
//!
//! Angles are stored as a pair: `x` is pitch, `y` is yaw. Dragging pushes the
//! target; the current angles lag behind it with per-axis exponential
//! smoothing. Releasing always returns the target to the rest pose.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::consts::*;
use crate::{approach, ease_out};

/// Decaying full turn added to the yaw target after mount
#[derive(Debug, Clone)]
pub struct IntroSpin {
    pub duration: f32,
    start: Option<f32>,
    finished: bool,
}

impl IntroSpin {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            start: None,
            finished: false,
        }
    }

    /// Yaw offset for a given progress in `0..=1`
    ///
    /// A full turn at 0, decelerating to exactly 0 at 1.
    pub fn offset_at(progress: f32) -> f32 {
        if progress < 1.0 {
            (1.0 - ease_out(progress)) * TAU
        } else {
            0.0
        }
    }

    /// Offset for the frame at `elapsed` seconds; the first call anchors the start
    ///
    /// Once progress reaches 1 the offset is pinned to 0 for good, so the yaw
    /// never chases a leftover turn backwards.
    pub fn offset(&mut self, elapsed: f32) -> f32 {
        if self.finished {
            return 0.0;
        }
        let start = *self.start.get_or_insert(elapsed);
        let progress = if self.duration > 0.0 {
            ((elapsed - start) / self.duration).min(1.0)
        } else {
            1.0
        };
        if progress >= 1.0 {
            self.finished = true;
            return 0.0;
        }
        Self::offset_at(progress)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[derive(Debug, Clone)]
pub struct RotationController {
    pub rest: Vec2,
    current: Vec2,
    target: Vec2,
    velocity: Vec2,
    dragging: bool,
    last_pointer: Vec2,
    /// Total pointer travel since the last press (pixels)
    travel: f32,
    intro: Option<IntroSpin>,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(Some(IntroSpin::new(INTRO_SPIN_SECONDS)))
    }
}

impl RotationController {
    pub fn new(intro: Option<IntroSpin>) -> Self {
        let rest = Vec2::new(REST_ROTATION.0, REST_ROTATION.1);
        Self {
            rest,
            current: rest,
            target: rest,
            velocity: Vec2::ZERO,
            dragging: false,
            last_pointer: Vec2::ZERO,
            travel: 0.0,
            intro,
        }
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn travel(&self) -> f32 {
        self.travel
    }

    pub fn intro_finished(&self) -> bool {
        self.intro.as_ref().is_none_or(IntroSpin::is_finished)
    }

    /// Begin a drag at screen position `pos`
    pub fn press(&mut self, pos: Vec2) {
        self.dragging = true;
        self.last_pointer = pos;
        self.travel = 0.0;
    }

    /// Pointer moved to `pos`
    pub fn drag(&mut self, pos: Vec2) {
        if !self.dragging {
            return;
        }
        let delta = pos - self.last_pointer;
        self.travel += delta.length();

        self.target.y += delta.x * DRAG_SENSITIVITY;
        self.target.x += delta.y * DRAG_SENSITIVITY;
        self.velocity = Vec2::new(delta.y, delta.x) * DRAG_SENSITIVITY;

        self.last_pointer = pos;
    }

    /// End the drag and head back to the rest pose
    pub fn release(&mut self) {
        self.dragging = false;
        self.target = self.rest;
        self.velocity = Vec2::ZERO;
    }

    /// Per-frame update at `elapsed` seconds since mount
    pub fn step(&mut self, elapsed: f32) {
        let spin = self.intro.as_mut().map_or(0.0, |s| s.offset(elapsed));

        if !self.dragging {
            self.velocity *= ROTATION_DAMPING;
            self.target += self.velocity;
        }

        self.current.x = approach(self.current.x, self.target.x, EASE_X);
        self.current.y = approach(self.current.y, self.target.y + spin, EASE_Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

    #[test]
    fn test_drag_moves_target_and_sets_velocity() {
        let mut rot = RotationController::new(None);
        rot.press(Vec2::new(100.0, 100.0));
        rot.drag(Vec2::new(110.0, 95.0));

        assert!((rot.target().y - (FRAC_PI_4 + 0.1)).abs() < 1e-6);
        assert!((rot.target().x - (FRAC_PI_6 - 0.05)).abs() < 1e-6);
        assert!((rot.velocity() - Vec2::new(-0.05, 0.1)).length() < 1e-6);
    }

    #[test]
    fn test_release_snaps_target_to_rest() {
        let mut rot = RotationController::new(None);
        rot.press(Vec2::ZERO);
        rot.drag(Vec2::new(300.0, -120.0));
        rot.release();
        assert_eq!(rot.target(), Vec2::new(FRAC_PI_6, FRAC_PI_4));
        assert_eq!(rot.velocity(), Vec2::ZERO);

        // Momentum was cleared, so the target stays put
        rot.step(0.0);
        assert_eq!(rot.target(), Vec2::new(FRAC_PI_6, FRAC_PI_4));
    }

    #[test]
    fn test_current_eases_per_axis() {
        let mut rot = RotationController::new(None);
        rot.press(Vec2::ZERO);
        rot.drag(Vec2::new(100.0, 100.0));
        let before = rot.current();
        rot.step(0.0);
        let after = rot.current();
        // One full unit of delta on each axis, eased by 0.10 and 0.15
        assert!((after.x - before.x - 0.1).abs() < 1e-5);
        assert!((after.y - before.y - 0.15).abs() < 1e-5);
    }

    #[test]
    fn test_momentum_decays_when_not_dragging() {
        let mut rot = RotationController::new(None);
        rot.press(Vec2::ZERO);
        rot.drag(Vec2::new(10.0, 0.0));
        // Simulate the pointer lifting without the release handler
        rot.dragging = false;
        let t0 = rot.target().y;
        rot.step(0.0);
        let moved = rot.target().y - t0;
        assert!((moved - 0.1 * ROTATION_DAMPING).abs() < 1e-6);
        assert!((rot.velocity().y - 0.1 * ROTATION_DAMPING).abs() < 1e-6);
    }

    #[test]
    fn test_intro_offset_boundaries() {
        assert!((IntroSpin::offset_at(0.0) - TAU).abs() < 1e-6);
        assert_eq!(IntroSpin::offset_at(1.0), 0.0);
        // Continuous into completion: no jump at the transition
        assert!(IntroSpin::offset_at(0.999) < 1e-6);
        // Monotonic decrease
        let mut last = IntroSpin::offset_at(0.0);
        for i in 1..=100 {
            let o = IntroSpin::offset_at(i as f32 / 100.0);
            assert!(o <= last);
            last = o;
        }
    }

    #[test]
    fn test_intro_spin_runs_once() {
        let mut spin = IntroSpin::new(1.5);
        assert!((spin.offset(10.0) - TAU).abs() < 1e-6);
        assert!(spin.offset(10.75) > 0.0);
        assert_eq!(spin.offset(11.5), 0.0);
        assert!(spin.is_finished());
        // Time never restarts it
        assert_eq!(spin.offset(0.0), 0.0);
    }

    #[test]
    fn test_intro_settles_at_rest_without_reverse_spin() {
        let mut rot = RotationController::default();
        let mut last_y = rot.current().y;
        let mut peak = last_y;
        for frame in 0..600 {
            rot.step(frame as f32 / 60.0);
            peak = peak.max(rot.current().y);
            last_y = rot.current().y;
        }
        assert!(rot.intro_finished());
        assert!(peak > FRAC_PI_4 + 1.0, "the intro should visibly spin");
        assert!((last_y - FRAC_PI_4).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_release_always_returns_rest(
            moves in proptest::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..20)
        ) {
            let mut rot = RotationController::new(None);
            rot.press(Vec2::ZERO);
            for (x, y) in moves {
                rot.drag(Vec2::new(x, y));
                rot.step(0.0);
            }
            rot.release();
            prop_assert_eq!(rot.target(), Vec2::new(FRAC_PI_6, FRAC_PI_4));
        }
    }
}
