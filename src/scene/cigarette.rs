//! The cigarette model's transform and derived points
//!
//! The tip is the ignition target. It is never stored: every frame it is
//! re-derived from the current rotation so it tracks drags and the intro spin.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use crate::consts::CIGARETTE_ROLL;

/// Tip of the tobacco end in model space
pub const TIP_LOCAL: Vec3 = Vec3::new(0.0, 0.49, 0.0);
/// Filter end cap in model space
pub const BUTT_LOCAL: Vec3 = Vec3::new(0.0, -0.593, 0.0);
/// Tip end of the picking capsule (slightly past the paper)
pub const PICK_TOP_LOCAL: Vec3 = Vec3::new(0.0, 0.515, 0.0);
/// Picking radius around the body axis
pub const PICK_RADIUS: f32 = 0.06;
/// Ember point light offset in model space
pub const EMBER_LIGHT_LOCAL: Vec3 = Vec3::new(0.0, 0.544, 0.0);

#[derive(Debug, Clone)]
pub struct Cigarette {
    pub position: Vec3,
    /// Fixed roll around Z applied after pitch and yaw
    pub roll: f32,
    lit: bool,
}

impl Cigarette {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            roll: CIGARETTE_ROLL,
            lit: false,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn light(&mut self) {
        self.lit = true;
    }

    /// Model-to-world matrix for a (pitch, yaw) pair
    pub fn transform(&self, rotation: Vec2) -> Mat4 {
        let q = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, self.roll);
        Mat4::from_rotation_translation(q, self.position)
    }

    /// World position of the tip
    pub fn tip(&self, rotation: Vec2) -> Vec3 {
        self.transform(rotation).transform_point3(TIP_LOCAL)
    }

    /// World position of the ember point light, just past the tip
    pub fn ember_light(&self, rotation: Vec2) -> Vec3 {
        self.transform(rotation).transform_point3(EMBER_LIGHT_LOCAL)
    }

    /// World-space picking capsule `(a, b, radius)`
    pub fn pick_capsule(&self, rotation: Vec2) -> (Vec3, Vec3, f32) {
        let m = self.transform(rotation);
        (
            m.transform_point3(BUTT_LOCAL),
            m.transform_point3(PICK_TOP_LOCAL),
            PICK_RADIUS,
        )
    }

    /// Glow of the ember light at `time` seconds; zero when unlit
    pub fn ember_intensity(&self, time: f32) -> f32 {
        if !self.lit {
            return 0.0;
        }
        let flicker = (time * 10.0).sin() * 0.3 + (time * 23.0).sin() * 0.15;
        2.0 + flicker
    }
}
