//! Smoke shooter state and entity types
//!
//! Coordinates are percentages of the playfield: x grows right, y grows down.
//! Time is an accumulated millisecond clock advanced by each tick, so every
//! timer is just a deadline stored here and dropping the state cancels them.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::tuning::SmokeTuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Playing,
    /// Lives ran out; nothing spawns until restart
    GameOver,
}

/// A cigarette fired upward by the player
#[derive(Debug, Clone, Serialize)]
pub struct Shot {
    pub id: u32,
    pub pos: Vec2,
    /// Clock time the shot was fired (ms)
    pub spawn_ms: f64,
}

/// A falling droplet
#[derive(Debug, Clone, Serialize)]
pub struct Droplet {
    pub id: u32,
    pub pos: Vec2,
}

/// Things the host may want to react to (sounds, banners)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// Droplets destroyed this frame
    Hit { count: u32 },
    /// Droplets that reached the bottom this frame
    LifeLost { count: u32 },
    /// A points milestone started or extended power mode
    PowerMode,
    GameOver,
}

/// Press-and-hold auto-fire timers
#[derive(Debug, Clone, Default)]
pub struct HoldFire {
    /// When the hold delay elapses and auto-fire begins
    pub delay_due_ms: Option<f64>,
    /// When the next auto-fired shot leaves
    pub next_shot_ms: Option<f64>,
    /// Last known pointer x (percent)
    pub last_x: f32,
}

impl HoldFire {
    pub fn is_held(&self) -> bool {
        self.delay_due_ms.is_some() || self.next_shot_ms.is_some()
    }

    pub fn clear(&mut self) {
        self.delay_due_ms = None;
        self.next_shot_ms = None;
    }
}

/// Droplet spawn deadline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnTimer {
    /// Start-of-run grace period; when it ends the first interval is scheduled
    Warmup { until_ms: f64 },
    /// Next droplet drops at this time
    Next { at_ms: f64 },
    Stopped,
}

/// Temporary faster auto-fire
#[derive(Debug, Clone, Default)]
pub struct PowerMode {
    pub until_ms: Option<f64>,
    pub banner_until_ms: Option<f64>,
}

impl PowerMode {
    pub fn is_active(&self) -> bool {
        self.until_ms.is_some()
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_until_ms.is_some()
    }
}

/// Complete shooter state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: SmokeTuning,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub lives: u8,
    pub points: u32,
    /// Best score this session (kept across restarts, never persisted)
    pub high_score: u32,
    pub phase: GamePhase,
    /// Simulation clock (ms)
    pub clock_ms: f64,
    /// Clock time the current run started
    pub start_ms: f64,
    /// Player shots, oldest first
    pub shots: Vec<Shot>,
    /// Droplets, oldest first
    pub droplets: Vec<Droplet>,
    pub spawn: SpawnTimer,
    pub hold: HoldFire,
    pub power: PowerMode,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

/// Serializable view handed to renderers
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub lives: u8,
    pub points: u32,
    pub high_score: u32,
    pub phase: GamePhase,
    pub power_mode: bool,
    pub power_banner: bool,
    pub shots: &'a [Shot],
    pub droplets: &'a [Droplet],
}

impl GameState {
    pub fn new(seed: u64, tuning: SmokeTuning) -> Self {
        let mut state = Self {
            lives: tuning.lives,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            points: 0,
            high_score: 0,
            phase: GamePhase::Playing,
            clock_ms: 0.0,
            start_ms: 0.0,
            shots: Vec::new(),
            droplets: Vec::new(),
            spawn: SpawnTimer::Stopped,
            hold: HoldFire::default(),
            power: PowerMode::default(),
            events: Vec::new(),
            next_id: 1,
        };
        state.schedule_first_droplet();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds since the current run started
    pub fn elapsed_secs(&self) -> f64 {
        (self.clock_ms - self.start_ms) / 1000.0
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Fire a shot at `pos`; no-op after game over
    pub fn spawn_shot(&mut self, pos: Vec2) -> Option<u32> {
        if self.is_game_over() {
            return None;
        }
        let id = self.next_entity_id();
        self.shots.push(Shot {
            id,
            pos,
            spawn_ms: self.clock_ms,
        });
        Some(id)
    }

    /// Drop a droplet at `pos`; no-op after game over
    pub fn spawn_droplet_at(&mut self, pos: Vec2) -> Option<u32> {
        if self.is_game_over() {
            return None;
        }
        let id = self.next_entity_id();
        self.droplets.push(Droplet { id, pos });
        Some(id)
    }

    /// Drop a droplet at a random x along the top edge
    pub fn spawn_droplet(&mut self) -> Option<u32> {
        let (lo, hi) = (self.tuning.spawn_x_min, self.tuning.spawn_x_max);
        let x = if hi > lo {
            self.rng.random_range(lo..hi)
        } else {
            lo
        };
        self.spawn_droplet_at(Vec2::new(x, 0.0))
    }

    pub(crate) fn schedule_first_droplet(&mut self) {
        self.spawn = SpawnTimer::Warmup {
            until_ms: self.clock_ms + self.tuning.first_spawn_delay_ms,
        };
    }

    /// Pick the next droplet deadline from the difficulty ramp, counting
    /// from `from_ms`
    pub(crate) fn schedule_next_droplet(&mut self, from_ms: f64) {
        if self.is_game_over() {
            self.spawn = SpawnTimer::Stopped;
            return;
        }
        let base = self
            .tuning
            .spawn_interval_ms(self.points, (from_ms - self.start_ms) / 1000.0);
        let jitter = self.rng.random::<f64>() * self.tuning.spawn_jitter_ms;
        self.spawn = SpawnTimer::Next {
            at_ms: from_ms + base + jitter,
        };
    }

    /// Start or extend power mode from now
    pub(crate) fn trigger_power_mode(&mut self) {
        let now = self.clock_ms;
        if self.power.is_active() {
            log::debug!("Power mode extended");
        } else {
            log::info!("Power mode!");
        }
        self.power.until_ms = Some(now + self.tuning.power_mode_ms);
        self.power.banner_until_ms = Some(now + self.tuning.power_banner_ms);
        self.events.push(GameEvent::PowerMode);
    }

    /// Enter the terminal state and stop every timer
    pub(crate) fn game_over(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.hold.clear();
        self.spawn = SpawnTimer::Stopped;
        self.events.push(GameEvent::GameOver);
        log::info!("Game over with {} points", self.points);
    }

    /// Start a fresh run, keeping the session high score
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.lives = self.tuning.lives;
        self.points = 0;
        self.shots.clear();
        self.droplets.clear();
        self.hold.clear();
        self.power = PowerMode::default();
        self.start_ms = self.clock_ms;
        self.schedule_first_droplet();
        log::info!("Restart (best this session: {})", self.high_score);
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            lives: self.lives,
            points: self.points,
            high_score: self.high_score,
            phase: self.phase,
            power_mode: self.power.is_active(),
            power_banner: self.power.banner_visible(),
            shots: &self.shots,
            droplets: &self.droplets,
        }
    }

    /// Snapshot as JSON for a JavaScript renderer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }
}
