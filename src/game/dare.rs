//! Dare picker
//!
//! A short slot-machine style flow: spin, reveal a dare, optionally skip a few
//! times, accept, then spin again for the group punishment.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub const DARES: [&str; 20] = [
    "Do 20 push-ups while someone holds a beer on your back!",
    "Sing 'I Will Always Love You' at the top of your lungs to a stranger",
    "Take a shot with your hands behind your back",
    "Wear your shirt inside out and backwards for the next hour",
    "Do your best salsa dance with a palm tree for 30 seconds",
    "Challenge someone to a plank contest - loser buys next round!",
    "Speak in a British accent for the next 15 minutes",
    "Take a selfie with 5 strangers and post it to the group chat",
    "Do the worm on the dance floor",
    "Chug a beer while standing on one leg",
    "Compliment 3 people in the most dramatic way possible",
    "Create and perform a 30-second rap about the bachelor",
    "Do 10 burpees right now, right here",
    "Piggyback ride another groomsman to the bar and back",
    "Tell the bartender your most embarrassing story",
    "Dance with a mop or broom like it's your prom date",
    "Attempt to limbo under an imaginary bar",
    "Order your next drink in a made-up language",
    "Do your best impression of the bachelor",
    "Call your mom and tell her you love her (bonus points for tears)",
];

pub const PUNISHMENTS: [&str; 2] = [
    "You all have to do a shot",
    "You all have to shotgun a beer",
];

pub const SKIPS_INITIAL: u8 = 3;
/// Spin time before a dare or punishment is shown (ms)
pub const SPIN_MS: f64 = 5000.0;
/// How long the "no skips left" message stays up (ms)
pub const NO_SKIPS_MESSAGE_MS: f64 = 2500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DarePhase {
    Spinning,
    Revealed,
    /// Dare accepted, punishment spinning
    Punishment,
    PunishmentRevealed,
}

impl DarePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DarePhase::Spinning => "spinning",
            DarePhase::Revealed => "revealed",
            DarePhase::Punishment => "punishment",
            DarePhase::PunishmentRevealed => "punishmentRevealed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DareState {
    pub phase: DarePhase,
    pub dare: Option<&'static str>,
    pub punishment: Option<&'static str>,
    pub skips_remaining: u8,
    clock_ms: f64,
    /// End of the current spin
    spin_until_ms: Option<f64>,
    no_skips_until_ms: Option<f64>,
    rng: Pcg32,
}

impl DareState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: DarePhase::Spinning,
            dare: None,
            punishment: None,
            skips_remaining: SKIPS_INITIAL,
            clock_ms: 0.0,
            spin_until_ms: Some(SPIN_MS),
            no_skips_until_ms: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn no_skips_message_visible(&self) -> bool {
        self.no_skips_until_ms.is_some()
    }

    /// Badge text for the skip counter
    pub fn skips_label(&self) -> String {
        match self.skips_remaining {
            1 => "1 skip left".to_string(),
            n => format!("{n} skips left"),
        }
    }

    fn pick_dare(&mut self) -> &'static str {
        DARES[self.rng.random_range(0..DARES.len())]
    }

    fn pick_punishment(&mut self) -> &'static str {
        PUNISHMENTS[self.rng.random_range(0..PUNISHMENTS.len())]
    }

    fn set_phase(&mut self, phase: DarePhase) {
        log::debug!("Dare phase {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
    }

    /// Advance the clock and finish any spin or message that has run out
    pub fn tick(&mut self, dt_ms: f64) {
        self.clock_ms += dt_ms.max(0.0);
        let now = self.clock_ms;

        if self.no_skips_until_ms.is_some_and(|t| t <= now) {
            self.no_skips_until_ms = None;
        }

        if self.spin_until_ms.is_some_and(|t| t <= now) {
            self.spin_until_ms = None;
            match self.phase {
                DarePhase::Spinning => {
                    self.dare = Some(self.pick_dare());
                    self.set_phase(DarePhase::Revealed);
                }
                DarePhase::Punishment => self.set_phase(DarePhase::PunishmentRevealed),
                DarePhase::Revealed | DarePhase::PunishmentRevealed => {}
            }
        }
    }

    /// Swap the dare for another one; returns false if nothing changed
    ///
    /// With no skips left this only raises the "no skips" message.
    pub fn skip(&mut self) -> bool {
        if self.phase != DarePhase::Revealed {
            return false;
        }
        if self.skips_remaining == 0 {
            self.no_skips_until_ms = Some(self.clock_ms + NO_SKIPS_MESSAGE_MS);
            return false;
        }
        self.skips_remaining -= 1;
        self.dare = Some(self.pick_dare());
        true
    }

    /// Accept the dare and spin for the punishment
    pub fn accept(&mut self) -> bool {
        if self.phase != DarePhase::Revealed {
            return false;
        }
        self.punishment = Some(self.pick_punishment());
        self.spin_until_ms = Some(self.clock_ms + SPIN_MS);
        self.set_phase(DarePhase::Punishment);
        true
    }

    /// Start over with a fresh spin and a full set of skips
    pub fn new_dare(&mut self) -> bool {
        if self.phase != DarePhase::PunishmentRevealed {
            return false;
        }
        self.dare = None;
        self.punishment = None;
        self.skips_remaining = SKIPS_INITIAL;
        self.spin_until_ms = Some(self.clock_ms + SPIN_MS);
        self.set_phase(DarePhase::Spinning);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revealed(seed: u64) -> DareState {
        let mut state = DareState::new(seed);
        state.tick(SPIN_MS);
        state
    }

    #[test]
    fn test_spin_reveals_after_five_seconds() {
        let mut state = DareState::new(1);
        state.tick(4999.0);
        assert_eq!(state.phase, DarePhase::Spinning);
        assert!(state.dare.is_none());
        state.tick(1.0);
        assert_eq!(state.phase, DarePhase::Revealed);
        assert!(DARES.contains(&state.dare.unwrap()));
    }

    #[test]
    fn test_skips_run_out() {
        let mut state = revealed(3);
        for left in (0..SKIPS_INITIAL).rev() {
            assert!(state.skip());
            assert_eq!(state.skips_remaining, left);
        }
        assert_eq!(state.skips_label(), "0 skips left");

        assert!(!state.skip());
        assert!(state.no_skips_message_visible());
        state.tick(2499.0);
        assert!(state.no_skips_message_visible());
        state.tick(1.0);
        assert!(!state.no_skips_message_visible());
    }

    #[test]
    fn test_accept_then_punishment() {
        let mut state = revealed(5);
        assert!(state.accept());
        assert_eq!(state.phase, DarePhase::Punishment);
        assert!(PUNISHMENTS.contains(&state.punishment.unwrap()));
        // No skipping once accepted
        assert!(!state.skip());

        state.tick(SPIN_MS);
        assert_eq!(state.phase, DarePhase::PunishmentRevealed);
    }

    #[test]
    fn test_new_dare_restores_skips() {
        let mut state = revealed(8);
        state.skip();
        state.skip();
        assert_eq!(state.skips_label(), "1 skip left");
        state.accept();
        assert!(!state.new_dare());
        state.tick(SPIN_MS);

        assert!(state.new_dare());
        assert_eq!(state.phase, DarePhase::Spinning);
        assert_eq!(state.skips_remaining, SKIPS_INITIAL);
        assert!(state.dare.is_none() && state.punishment.is_none());
        state.tick(SPIN_MS);
        assert_eq!(state.phase, DarePhase::Revealed);
    }

    #[test]
    fn test_actions_ignored_while_spinning() {
        let mut state = DareState::new(2);
        assert!(!state.skip());
        assert!(!state.accept());
        assert!(!state.new_dare());
        assert_eq!(state.skips_remaining, SKIPS_INITIAL);
        assert!(!state.no_skips_message_visible());
    }
}
