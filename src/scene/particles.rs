//! Flame particle effect
//!
//! Particles are seeded once; all motion is a closed-form function of time so
//! the GPU can animate them from a static buffer plus a small uniform block.
//! [`sample`] evaluates the same formula on the CPU.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::PI;

/// Fade-in rate (fraction per second)
const FADE_IN_RATE: f32 = 3.0;
/// How far a full wind gust bends the top of the flame
const WIND_BEND: f32 = 8.0;
/// Base light intensity before flicker
const LIGHT_BASE: f32 = 12.0;

/// One particle seed, laid out for a vertex buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlameParticle {
    pub offset: [f32; 3],
    /// Phase in 0..1 so particles are staggered
    pub lifetime: f32,
    pub velocity: [f32; 3],
    pub size: f32,
}

impl FlameParticle {
    pub const STRIDE: usize = std::mem::size_of::<Self>();
}

/// Per-frame uniforms
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FlameUniforms {
    pub time: f32,
    pub intensity: f32,
    pub fade_in: f32,
    pub wind_strength: f32,
    pub wind_direction: [f32; 2],
    pub _pad: [f32; 2],
}

/// Flame lean from the per-event pointer velocity, capped at 1
pub fn wind_strength(velocity: Vec3) -> f32 {
    (velocity.length() * 0.8).min(1.0)
}

/// Unit xz direction of travel, or zero when the flame is barely moving
pub fn wind_direction(velocity: Vec3) -> Vec2 {
    if wind_strength(velocity) < 0.01 {
        return Vec2::ZERO;
    }
    let xz = Vec2::new(velocity.x, velocity.z);
    let len = xz.length();
    if len < 0.001 {
        return Vec2::ZERO;
    }
    xz / len
}

/// Flicker multiplier for the flame's point light
pub fn light_flicker(time: f32) -> f32 {
    (time * 15.0).sin() * 0.15 + (time * 8.0).sin() * 0.1 + (time * 25.0).sin() * 0.05
}

/// Hash noise matching the shader's `fract(sin(dot(...)))`
fn hash_noise(p: Vec3) -> f32 {
    let v = (p.dot(Vec3::new(12.9898, 78.233, 45.164))).sin() * 43758.547;
    v - v.floor()
}

/// A particle evaluated at one instant
#[derive(Debug, Clone, Copy)]
pub struct ParticleSample {
    pub position: Vec3,
    pub color: Vec3,
    pub alpha: f32,
    /// Multiplier on the seed size (0 at birth and death)
    pub size_scale: f32,
}

fn flame_color(life: f32) -> Vec3 {
    let base = Vec3::new(0.4, 0.6, 1.0);
    let white = Vec3::new(1.0, 1.0, 0.95);
    let orange = Vec3::new(1.0, 0.6, 0.15);
    let red = Vec3::new(0.9, 0.25, 0.05);
    let ember = Vec3::new(0.6, 0.1, 0.0);
    if life < 0.15 {
        base.lerp(white, life / 0.15)
    } else if life < 0.45 {
        white.lerp(orange, (life - 0.15) / 0.3)
    } else if life < 0.75 {
        orange.lerp(red, (life - 0.45) / 0.3)
    } else {
        red.lerp(ember, (life - 0.75) / 0.25)
    }
}

/// Evaluate a particle under the given uniforms (flame-local space)
pub fn sample(p: &FlameParticle, u: &FlameUniforms) -> ParticleSample {
    let t = u.time;
    let life = (p.lifetime + t * 0.6).rem_euclid(1.0);

    let mut pos = Vec3::from(p.offset);
    let vel = Vec3::from(p.velocity);
    let sway = t * 4.0 + p.lifetime * 10.0;

    pos.y += life * 0.5;
    pos.x += vel.x * life * 0.2 + sway.sin() * 0.08 * life;
    pos.z += vel.z * life * 0.2 + sway.cos() * 0.08 * life;

    let turbulence = hash_noise(pos * 3.0 + Vec3::splat(t));
    pos.x += (turbulence - 0.5) * 0.12 * life;
    pos.z += (turbulence - 0.5) * 0.12 * life;

    // Higher particles lean further, away from the direction of travel
    let bend = u.wind_strength * life * life * WIND_BEND;
    pos.x -= u.wind_direction[0] * bend;
    pos.z -= u.wind_direction[1] * bend;

    ParticleSample {
        position: pos,
        color: flame_color(life),
        alpha: (1.0 - life.powf(1.8)) * u.intensity * u.fade_in,
        size_scale: (life * PI).sin(),
    }
}

/// The flame visual: particle seeds plus animated uniforms
#[derive(Debug, Clone)]
pub struct FlameEffect {
    particles: Vec<FlameParticle>,
    uniforms: FlameUniforms,
    light_intensity: f32,
    generation: u32,
}

impl FlameEffect {
    /// Seed `count` particles with the given RNG
    pub fn new(count: usize, intensity: f32, rng: &mut impl Rng) -> Self {
        let particles = (0..count)
            .map(|_| {
                let angle = rng.random::<f32>() * PI * 2.0;
                let radius = rng.random::<f32>() * 0.025;
                FlameParticle {
                    offset: [
                        angle.cos() * radius,
                        rng.random::<f32>() * 0.05,
                        angle.sin() * radius,
                    ],
                    lifetime: rng.random::<f32>(),
                    velocity: [
                        (rng.random::<f32>() - 0.5) * 0.4,
                        1.0 + rng.random::<f32>() * 0.6,
                        (rng.random::<f32>() - 0.5) * 0.4,
                    ],
                    size: 0.7 + rng.random::<f32>() * 0.03,
                }
            })
            .collect();

        Self {
            particles,
            uniforms: FlameUniforms {
                intensity,
                ..Default::default()
            },
            light_intensity: 0.0,
            generation: 0,
        }
    }

    pub fn particles(&self) -> &[FlameParticle] {
        &self.particles
    }

    pub fn uniforms(&self) -> &FlameUniforms {
        &self.uniforms
    }

    /// Raw particle buffer for upload
    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }

    /// Raw uniform block for upload
    pub fn uniform_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.uniforms)
    }

    pub fn light_intensity(&self) -> f32 {
        self.light_intensity
    }

    /// Advance one frame. `generation` changes whenever the flame is re-lit so
    /// the fade-in restarts.
    pub fn update(&mut self, dt: f32, time: f32, velocity: Vec3, generation: u32) {
        if generation != self.generation {
            self.generation = generation;
            self.uniforms.fade_in = 0.0;
        }
        if self.uniforms.fade_in < 1.0 {
            self.uniforms.fade_in = (self.uniforms.fade_in + dt * FADE_IN_RATE).min(1.0);
        }

        self.uniforms.time = time;
        self.uniforms.wind_strength = wind_strength(velocity);
        self.uniforms.wind_direction = wind_direction(velocity).to_array();

        self.light_intensity =
            (LIGHT_BASE + light_flicker(time)) * self.uniforms.intensity * self.uniforms.fade_in;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn effect(count: usize) -> FlameEffect {
        let mut rng = Pcg32::seed_from_u64(7);
        FlameEffect::new(count, 0.3, &mut rng)
    }

    #[test]
    fn test_buffers_are_tightly_packed() {
        let fx = effect(500);
        assert_eq!(FlameParticle::STRIDE, 32);
        assert_eq!(fx.particle_bytes().len(), 500 * 32);
        assert_eq!(fx.uniform_bytes().len(), 32);
    }

    #[test]
    fn test_seeds_in_range() {
        let fx = effect(200);
        for p in fx.particles() {
            let r = (p.offset[0].powi(2) + p.offset[2].powi(2)).sqrt();
            assert!(r <= 0.025 + 1e-6);
            assert!((0.0..1.0).contains(&p.lifetime));
            assert!(p.velocity[1] >= 1.0 && p.velocity[1] <= 1.6);
        }
    }

    #[test]
    fn test_fade_in_and_restart() {
        let mut fx = effect(10);
        fx.update(0.1, 0.0, Vec3::ZERO, 1);
        assert!((fx.uniforms().fade_in - 0.3).abs() < 1e-6);
        for _ in 0..10 {
            fx.update(0.1, 0.0, Vec3::ZERO, 1);
        }
        assert_eq!(fx.uniforms().fade_in, 1.0);

        fx.update(0.1, 0.0, Vec3::ZERO, 2);
        assert!((fx.uniforms().fade_in - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_wind() {
        assert_eq!(wind_strength(Vec3::new(10.0, 0.0, 0.0)), 1.0);
        assert_eq!(wind_direction(Vec3::new(0.001, 0.0, 0.0)), Vec2::ZERO);
        // Pure vertical motion has no horizontal lean
        assert_eq!(wind_direction(Vec3::new(0.0, 0.5, 0.0)), Vec2::ZERO);
        let d = wind_direction(Vec3::new(0.3, 0.0, 0.4));
        assert!((d - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_wind_bends_against_motion() {
        let p = FlameParticle {
            offset: [0.0; 3],
            lifetime: 0.5,
            velocity: [0.0, 1.2, 0.0],
            size: 0.7,
        };
        let calm = FlameUniforms {
            time: 0.0,
            intensity: 1.0,
            fade_in: 1.0,
            ..Default::default()
        };
        let windy = FlameUniforms {
            wind_strength: 1.0,
            wind_direction: [1.0, 0.0],
            ..calm
        };
        let a = sample(&p, &calm);
        let b = sample(&p, &windy);
        // life = 0.5 -> bend = 0.25 * 8
        assert!((a.position.x - b.position.x - 2.0).abs() < 1e-4);
        assert!((a.position.z - b.position.z).abs() < 1e-6);
    }

    #[test]
    fn test_sample_life_curve() {
        let p = FlameParticle {
            offset: [0.0; 3],
            lifetime: 0.0,
            velocity: [0.0, 1.0, 0.0],
            size: 0.7,
        };
        let u = FlameUniforms {
            intensity: 1.0,
            fade_in: 1.0,
            ..Default::default()
        };
        let s = sample(&p, &u);
        assert_eq!(s.size_scale, 0.0);
        assert_eq!(s.alpha, 1.0);
        assert_eq!(s.color, Vec3::new(0.4, 0.6, 1.0));
    }

    #[test]
    fn test_light_scales_with_fade() {
        let mut fx = effect(1);
        fx.update(0.0, 0.0, Vec3::ZERO, 1);
        assert_eq!(fx.light_intensity(), 0.0);
        for _ in 0..20 {
            fx.update(0.1, 1.0, Vec3::ZERO, 1);
        }
        let expected = (12.0 + light_flicker(1.0)) * 0.3;
        assert!((fx.light_intensity() - expected).abs() < 1e-4);
    }
}
