//! Per-frame shooter update
//!
//! Timers run on the accumulated clock. Positions advance a fixed amount per
//! animation frame, so a 120 Hz display plays faster than a 60 Hz one.

use glam::Vec2;

use super::collision::find_hits;
use super::state::{GameEvent, GameState, SpawnTimer};
use crate::consts::PLAYFIELD_BOTTOM;
use crate::input::{PointerEvent, Viewport};

/// Cap on timer firings per frame after a long stall (background tab)
const MAX_CATCH_UP: usize = 64;

/// What the player did, in playfield percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    Press(Vec2),
    Aim(Vec2),
    /// Pointer lifted, left the field, or was cancelled
    Release,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied in order before the frame advances
    pub actions: Vec<PlayerAction>,
    /// Start a new run
    pub restart: bool,
}

impl TickInput {
    /// Translate raw pointer events into actions
    ///
    /// Positions that cannot be mapped (collapsed viewport) are dropped, but a
    /// release always goes through so a hold can never get stuck.
    pub fn from_pointer(events: impl IntoIterator<Item = PointerEvent>, viewport: Viewport) -> Self {
        let actions = events
            .into_iter()
            .filter_map(|event| match event {
                PointerEvent::Down { pos } => viewport.to_percent(pos).map(PlayerAction::Press),
                PointerEvent::Move { pos } => viewport.to_percent(pos).map(PlayerAction::Aim),
                PointerEvent::Up { .. } | PointerEvent::Cancel => Some(PlayerAction::Release),
                PointerEvent::Wheel { .. } => None,
            })
            .collect();
        Self {
            actions,
            restart: false,
        }
    }
}

/// Advance the game by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    if input.restart {
        state.restart();
    }

    state.clock_ms += dt_ms.max(0.0);

    for &action in &input.actions {
        apply_action(state, action);
    }

    // Frozen until restart
    if state.is_game_over() {
        return;
    }

    run_timers(state);
    step_entities(state);
}

fn apply_action(state: &mut GameState, action: PlayerAction) {
    match action {
        PlayerAction::Press(pos) => {
            if state.is_game_over() {
                return;
            }
            state.hold.last_x = pos.x;
            state.spawn_shot(pos);
            state.hold.next_shot_ms = None;
            state.hold.delay_due_ms = Some(state.clock_ms + state.tuning.hold_delay_ms);
        }
        PlayerAction::Aim(pos) => state.hold.last_x = pos.x,
        PlayerAction::Release => state.hold.clear(),
    }
}

fn run_timers(state: &mut GameState) {
    let now = state.clock_ms;

    if state.power.until_ms.is_some_and(|t| t <= now) {
        state.power.until_ms = None;
        log::debug!("Power mode over");
    }
    if state.power.banner_until_ms.is_some_and(|t| t <= now) {
        state.power.banner_until_ms = None;
    }

    // Hold delay elapsed: the first repeat waits one full interval
    if let Some(due) = state.hold.delay_due_ms.filter(|&t| t <= now) {
        state.hold.delay_due_ms = None;
        let interval = state.tuning.hold_interval(state.power.is_active());
        state.hold.next_shot_ms = Some(due + interval);
    }

    let mut fired = 0;
    while let Some(at) = state.hold.next_shot_ms.filter(|&t| t <= now) {
        let interval = state.tuning.hold_interval(state.power.is_active());
        if fired == MAX_CATCH_UP {
            state.hold.next_shot_ms = Some(now + interval);
            break;
        }
        let pos = Vec2::new(state.hold.last_x, state.tuning.shot_locked_y);
        state.spawn_shot(pos);
        state.hold.next_shot_ms = Some(at + interval);
        fired += 1;
    }

    for _ in 0..MAX_CATCH_UP {
        match state.spawn {
            SpawnTimer::Warmup { until_ms } if until_ms <= now => {
                state.schedule_next_droplet(until_ms);
            }
            SpawnTimer::Next { at_ms } if at_ms <= now => {
                state.spawn_droplet();
                state.schedule_next_droplet(at_ms);
            }
            _ => break,
        }
    }
}

fn step_entities(state: &mut GameState) {
    let now = state.clock_ms;
    let shot_speed = state.tuning.shot_speed;
    let cull_y = state.tuning.shot_cull_y;
    let lifetime = state.tuning.shot_lifetime_ms;
    let radius = state.tuning.collision_radius;
    let power_every = state.tuning.power_every.max(1);
    let fall = state
        .tuning
        .droplet_speed(state.points, state.elapsed_secs() as f32);

    for shot in &mut state.shots {
        shot.pos.y -= shot_speed;
    }
    state
        .shots
        .retain(|s| s.pos.y > cull_y && now - s.spawn_ms < lifetime);

    for drop in &mut state.droplets {
        drop.pos.y += fall;
    }

    // Each droplet past the bottom costs exactly one life
    let before = state.droplets.len();
    state.droplets.retain(|d| d.pos.y <= PLAYFIELD_BOTTOM);
    let passed = (before - state.droplets.len()) as u32;
    if passed > 0 {
        let lost = u8::try_from(passed).unwrap_or(u8::MAX);
        state.lives = state.lives.saturating_sub(lost);
        state.events.push(GameEvent::LifeLost { count: passed });
        log::debug!("{passed} droplet(s) got through, {} lives left", state.lives);
        if state.lives == 0 {
            state.game_over();
        }
    }

    // Only droplets still on screen can be hit
    let hits = find_hits(&state.shots, &state.droplets, radius);
    if hits.is_empty() {
        return;
    }
    let count = hits.droplet_count();

    let prev = state.points;
    let points = prev + count;
    state.high_score = state.high_score.max(points);
    if points / power_every > prev / power_every {
        state.trigger_power_mode();
    }
    state.points = points;
    state.events.push(GameEvent::Hit { count });

    let mut shot_hits = hits.shots.iter();
    state
        .shots
        .retain(|_| !shot_hits.next().copied().unwrap_or(false));
    let mut drop_hits = hits.droplets.iter();
    state
        .droplets
        .retain(|_| !drop_hits.next().copied().unwrap_or(false));
}
