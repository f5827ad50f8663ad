//! Mini-games
//!
//! Both games are plain state machines driven by a millisecond delta:
//! - Seeded RNG only
//! - No timers outside the state, so dropping it cancels everything
//! - No rendering or platform dependencies

pub mod collision;
pub mod dare;
pub mod state;
pub mod tick;

pub use collision::{Hits, find_hits};
pub use dare::{DarePhase, DareState};
pub use state::{Droplet, GameEvent, GamePhase, GameState, Shot, Snapshot, SpawnTimer};
pub use tick::{PlayerAction, TickInput, tick};
