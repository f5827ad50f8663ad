//! Camera, pointer ray projection and hit tests
//!
//! The flame follows the pointer at a fixed distance along the view ray. The
//! projection is recomputed on every call: zoom moves the camera between
//! pointer events.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Perspective camera looking at a fixed target
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 8.0),
            target: Vec3::ZERO,
            fov_y: 50f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// A world-space ray with unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

impl Camera {
    pub fn new(position: Vec3, fov_y_deg: f32) -> Self {
        Self {
            position,
            fov_y: fov_y_deg.to_radians(),
            ..Default::default()
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    /// World-space ray through a point in normalized device coordinates
    pub fn ray(&self, ndc: Vec2, aspect: f32) -> Ray {
        let inv = (self.projection(aspect) * self.view()).inverse();
        let p = inv * Vec4::new(ndc.x, ndc.y, 0.5, 1.0);
        let p: Vec3 = p.truncate() / p.w;
        Ray {
            origin: self.position,
            dir: (p - self.position).normalize(),
        }
    }

    /// Point at `distance` from the camera along the ray through `ndc`
    pub fn project_pointer(&self, ndc: Vec2, aspect: f32, distance: f32) -> Vec3 {
        self.ray(ndc, aspect).at(distance)
    }
}

/// Intersect a ray with an infinite plane, returning the ray parameter
#[inline]
pub fn ray_plane(ray: &Ray, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = normal.dot(ray.dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (point - ray.origin).dot(normal) / denom;
    (t >= 0.0).then_some(t)
}

/// Invisible rectangle that starts a flame drag when pressed
#[derive(Debug, Clone, Copy)]
pub struct InteractionSurface {
    pub center: Vec3,
    pub half_extent: Vec2,
}

impl Default for InteractionSurface {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 0.0, 5.0),
            half_extent: Vec2::splat(10.0),
        }
    }
}

impl InteractionSurface {
    /// Ray parameter of the hit, if the ray crosses the rectangle
    pub fn hit(&self, ray: &Ray) -> Option<f32> {
        let t = ray_plane(ray, self.center, Vec3::Z)?;
        let local = ray.at(t) - self.center;
        (local.x.abs() <= self.half_extent.x && local.y.abs() <= self.half_extent.y).then_some(t)
    }
}

/// Ray against a capsule (segment `a..b` inflated by `radius`)
///
/// Returns the ray parameter of the closest approach when it lies inside the
/// capsule. Good enough for picking thin objects.
pub fn ray_capsule(ray: &Ray, a: Vec3, b: Vec3, radius: f32) -> Option<f32> {
    let seg = b - a;
    let w0 = ray.origin - a;
    let bb = ray.dir.dot(seg);
    let cc = seg.dot(seg);
    let dd = ray.dir.dot(w0);
    let ee = seg.dot(w0);

    if cc <= f32::EPSILON {
        // Degenerate segment: plain sphere
        let s = (-dd).max(0.0);
        return (ray.at(s).distance(a) <= radius).then_some(s);
    }

    let denom = cc - bb * bb;
    let mut u = if denom.abs() < 1e-6 {
        (ee / cc).clamp(0.0, 1.0)
    } else {
        ((ee - bb * dd) / denom).clamp(0.0, 1.0)
    };
    let s = (u * bb - dd).max(0.0);
    // Refine the segment parameter against the clamped ray point
    u = ((ray.at(s) - a).dot(seg) / cc).clamp(0.0, 1.0);

    let dist = ray.at(s).distance(a + seg * u);
    (dist <= radius).then_some(s)
}

/// Wheel-driven dolly with velocity-based acceleration
#[derive(Debug, Clone)]
pub struct CameraZoom {
    pub target: f32,
    pub current: f32,
    /// Smoothed wheel speed (pixels per second)
    pub velocity: f32,
    pub min: f32,
    pub max: f32,
    last_wheel_ms: Option<f64>,
}

impl CameraZoom {
    pub fn new(start: f32) -> Self {
        Self {
            target: start,
            current: start,
            velocity: 0.0,
            min: start - 0.5,
            max: start + 0.5,
            last_wheel_ms: None,
        }
    }

    /// Apply one wheel event
    pub fn wheel(&mut self, delta_y: f32, time_ms: f64) {
        let instant = match self.last_wheel_ms {
            Some(last) => {
                let dt = ((time_ms - last) / 1000.0).max(0.001) as f32;
                delta_y.abs() / dt
            }
            None => 0.0,
        };
        self.last_wheel_ms = Some(time_ms);

        self.velocity = self.velocity * 0.8 + instant * 0.2;

        let base = delta_y * 0.001;
        let factor = (self.velocity / 1000.0).min(3.0);
        let acceleration = 1.0 + factor.powf(1.5);
        self.target = (self.target + base * acceleration).clamp(self.min, self.max);
    }

    /// Per-frame easing; returns the new camera distance
    pub fn update(&mut self) -> f32 {
        self.current = crate::approach(self.current, self.target, 0.1);
        self.velocity *= 0.95;
        self.current
    }
}
