//! Shot versus droplet hit detection
//!
//! Everything is a circle of the same radius in playfield percent, so a hit is
//! just a center distance check.

use glam::Vec2;

use super::state::{Droplet, Shot};

/// Indices of entities involved in at least one hit this frame
#[derive(Debug, Clone, Default)]
pub struct Hits {
    /// Per-shot hit flag, same order as the input slice
    pub shots: Vec<bool>,
    /// Per-droplet hit flag, same order as the input slice
    pub droplets: Vec<bool>,
}

impl Hits {
    /// Number of droplets destroyed
    pub fn droplet_count(&self) -> u32 {
        self.droplets.iter().filter(|&&h| h).count() as u32
    }

    pub fn is_empty(&self) -> bool {
        !self.droplets.iter().any(|&h| h)
    }
}

/// Whether two centers are strictly closer than `radius`
#[inline]
pub fn overlaps(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Test every shot against every droplet
///
/// A shot may take out several droplets at once, and a droplet hit by two
/// shots still counts once.
pub fn find_hits(shots: &[Shot], droplets: &[Droplet], radius: f32) -> Hits {
    let mut hits = Hits {
        shots: vec![false; shots.len()],
        droplets: vec![false; droplets.len()],
    };
    for (si, shot) in shots.iter().enumerate() {
        for (di, drop) in droplets.iter().enumerate() {
            if overlaps(shot.pos, drop.pos, radius) {
                hits.shots[si] = true;
                hits.droplets[di] = true;
            }
        }
    }
    hits
}
