//! Pointer events and the per-frame input queue
//!
//! Browser handlers run between frames. They only push into an [`InputQueue`];
//! the frame loop drains it once per tick so every event is applied, in order,
//! before the simulation reads any state.

use std::collections::VecDeque;

use glam::Vec2;

/// A pointer event in canvas-relative CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Vec2 },
    Move { pos: Vec2 },
    Up { pos: Vec2 },
    /// Pointer left the surface or the browser cancelled the gesture
    Cancel,
    /// Wheel scroll; `time_ms` is the event timestamp
    Wheel { delta_y: f32, time_ms: f64 },
}

/// Size of the surface pointer coordinates are relative to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` for a collapsed viewport
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }

    /// Convert a pixel position to normalized device coordinates (-1..1, y up)
    pub fn to_ndc(&self, pos: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            pos.x / self.width * 2.0 - 1.0,
            -(pos.y / self.height) * 2.0 + 1.0,
        ))
    }

    /// Convert a pixel position to playfield percentages (0..100, y down)
    pub fn to_percent(&self, pos: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            pos.x / self.width * 100.0,
            pos.y / self.height * 100.0,
        ))
    }
}

/// Single-consumer FIFO of pointer events
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<PointerEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.events.push_back(event);
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = PointerEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drop pending events (used on teardown)
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(Vec2::new(0.0, 0.0)), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(vp.to_ndc(Vec2::new(400.0, 300.0)), Some(Vec2::ZERO));
    }

    #[test]
    fn test_collapsed_viewport() {
        let vp = Viewport::new(0.0, 600.0);
        assert!(vp.to_ndc(Vec2::ONE).is_none());
        assert!(vp.to_percent(Vec2::ONE).is_none());
        assert!(vp.aspect().is_none());
    }

    #[test]
    fn test_percent() {
        let vp = Viewport::new(200.0, 400.0);
        assert_eq!(vp.to_percent(Vec2::new(100.0, 100.0)), Some(Vec2::new(50.0, 25.0)));
    }

    #[test]
    fn test_queue_preserves_order() {
        let mut queue = InputQueue::new();
        queue.push(PointerEvent::Down { pos: Vec2::ZERO });
        queue.push(PointerEvent::Move { pos: Vec2::ONE });
        queue.push(PointerEvent::Cancel);
        assert_eq!(queue.len(), 3);

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events[0], PointerEvent::Down { pos: Vec2::ZERO });
        assert_eq!(events[2], PointerEvent::Cancel);
        assert!(queue.is_empty());
    }
}
