//! Screen routing
//!
//! The lighting scene lives for the whole session. The mini-games are created
//! when their screen is entered and dropped when it is left, which also drops
//! every timer they own.

use crate::consts::REVEAL_DELAY_MS;
use crate::game::{self, DareState, GameEvent, GameState, TickInput};
use crate::input::{InputQueue, PointerEvent, Viewport};
use crate::profile::DeviceProfile;
use crate::scene::{Scene, SceneEvent};
use crate::tuning::{SceneTuning, SmokeTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Dare,
    Smoke,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Dare => "dare",
            Screen::Smoke => "smoke",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "home" => Some(Screen::Home),
            "dare" => Some(Screen::Dare),
            "smoke" => Some(Screen::Smoke),
            _ => None,
        }
    }
}

/// Everything a frame produced, for the host to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Scene(SceneEvent),
    /// The post-ignition reveal is due
    Reveal,
    Smoke(GameEvent),
}

#[derive(Debug)]
pub struct App {
    screen: Screen,
    viewport: Viewport,
    scene: Scene,
    input: InputQueue,
    /// Session clock (ms)
    clock_ms: f64,
    reveal_due_ms: Option<f64>,
    revealed: bool,
    dare: Option<DareState>,
    smoke: Option<GameState>,
    smoke_tuning: SmokeTuning,
    restart_smoke: bool,
    seed: u64,
    visits: u64,
}

impl App {
    pub fn new(
        scene_tuning: SceneTuning,
        smoke_tuning: SmokeTuning,
        profile: &DeviceProfile,
        viewport: Viewport,
        seed: u64,
    ) -> Self {
        Self {
            screen: Screen::Home,
            viewport,
            scene: Scene::new(scene_tuning, profile, viewport, seed),
            input: InputQueue::new(),
            clock_ms: 0.0,
            reveal_due_ms: None,
            revealed: false,
            dare: None,
            smoke: None,
            smoke_tuning,
            restart_smoke: false,
            seed,
            visits: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn dare(&self) -> Option<&DareState> {
        self.dare.as_ref()
    }

    pub fn dare_mut(&mut self) -> Option<&mut DareState> {
        self.dare.as_mut()
    }

    pub fn smoke(&self) -> Option<&GameState> {
        self.smoke.as_ref()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scene.set_viewport(viewport);
    }

    /// Queue a pointer event for the active screen
    pub fn pointer(&mut self, event: PointerEvent) {
        self.input.push(event);
    }

    /// Ask the shooter for a new run on the next frame
    pub fn restart_smoke(&mut self) {
        if self.smoke.is_some() {
            self.restart_smoke = true;
        }
    }

    fn next_seed(&mut self) -> u64 {
        self.visits += 1;
        self.seed.wrapping_add(self.visits)
    }

    /// Switch screens, tearing down the one being left
    pub fn navigate(&mut self, to: Screen) {
        if to == self.screen {
            return;
        }
        log::info!("Screen {} -> {}", self.screen.as_str(), to.as_str());

        // Events queued for the old screen must not leak into the new one
        self.input.clear();
        self.restart_smoke = false;

        match self.screen {
            Screen::Home => self.scene.handle(PointerEvent::Cancel),
            Screen::Dare => self.dare = None,
            Screen::Smoke => self.smoke = None,
        }

        match to {
            Screen::Home => {}
            Screen::Dare => self.dare = Some(DareState::new(self.next_seed())),
            Screen::Smoke => {
                let seed = self.next_seed();
                self.smoke = Some(GameState::new(seed, self.smoke_tuning.clone()));
            }
        }
        self.screen = to;
    }

    /// Advance one animation frame of `dt_ms` milliseconds
    pub fn frame(&mut self, dt_ms: f64) -> Vec<AppEvent> {
        self.clock_ms += dt_ms.max(0.0);
        let mut events = Vec::new();

        match self.screen {
            Screen::Home => {
                let scene_events = self.scene.frame((dt_ms / 1000.0) as f32, &mut self.input);
                for event in scene_events {
                    if event == SceneEvent::Lit && !self.revealed && self.reveal_due_ms.is_none() {
                        self.reveal_due_ms = Some(self.clock_ms + REVEAL_DELAY_MS);
                    }
                    events.push(AppEvent::Scene(event));
                }
            }
            Screen::Dare => {
                // Dare buttons are driven directly, not by raw pointer input
                self.input.clear();
                if let Some(dare) = self.dare.as_mut() {
                    dare.tick(dt_ms);
                }
            }
            Screen::Smoke => {
                let mut input = TickInput::from_pointer(self.input.drain(), self.viewport);
                input.restart = std::mem::take(&mut self.restart_smoke);
                if let Some(smoke) = self.smoke.as_mut() {
                    game::tick(smoke, &input, dt_ms);
                    events.extend(smoke.drain_events().into_iter().map(AppEvent::Smoke));
                }
            }
        }

        if self.reveal_due_ms.is_some_and(|t| t <= self.clock_ms) {
            self.reveal_due_ms = None;
            self.revealed = true;
            log::info!("Reveal");
            events.push(AppEvent::Reveal);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    const FRAME: f64 = 16.0;

    fn app() -> App {
        let scene = SceneTuning {
            skip_intro: true,
            ..Default::default()
        };
        App::new(
            scene,
            SmokeTuning::default(),
            &DeviceProfile::default(),
            Viewport::new(800.0, 600.0),
            5,
        )
    }

    /// Canvas position over the middle of the cigarette
    fn cigarette_on_screen(app: &App) -> Vec2 {
        let camera = app.scene().camera();
        let mid = app.scene().cigarette_transform().transform_point3(Vec3::ZERO);
        let clip = (camera.projection(800.0 / 600.0) * camera.view()).project_point3(mid);
        Vec2::new((clip.x + 1.0) * 400.0, (1.0 - clip.y) * 300.0)
    }

    fn click_cigarette(app: &mut App) -> Vec<AppEvent> {
        app.frame(FRAME);
        let pos = cigarette_on_screen(app);
        app.pointer(PointerEvent::Down { pos });
        app.pointer(PointerEvent::Up { pos });
        app.frame(FRAME)
    }

    #[test]
    fn test_screen_names() {
        for screen in [Screen::Home, Screen::Dare, Screen::Smoke] {
            assert_eq!(Screen::from_str(screen.as_str()), Some(screen));
        }
        assert_eq!(Screen::from_str("lobby"), None);
    }

    #[test]
    fn test_reveal_follows_ignition() {
        let mut app = app();
        let events = click_cigarette(&mut app);
        assert!(events.contains(&AppEvent::Scene(SceneEvent::Lit)));
        assert!(!app.is_revealed());

        // Lit at 32 ms, reveal due at 1532
        let mut reveals = 0;
        for _ in 0..93 {
            reveals += app.frame(FRAME).iter().filter(|e| **e == AppEvent::Reveal).count();
        }
        assert_eq!(reveals, 0);
        for _ in 0..200 {
            reveals += app.frame(FRAME).iter().filter(|e| **e == AppEvent::Reveal).count();
        }
        assert_eq!(reveals, 1);
        assert!(app.is_revealed());
    }

    #[test]
    fn test_no_reveal_without_ignition() {
        let mut app = app();
        for _ in 0..200 {
            assert!(!app.frame(FRAME).contains(&AppEvent::Reveal));
        }
    }

    #[test]
    fn test_smoke_state_dropped_on_leave() {
        let mut app = app();
        app.navigate(Screen::Smoke);
        app.pointer(PointerEvent::Down {
            pos: Vec2::new(400.0, 300.0),
        });
        app.frame(FRAME);
        let smoke = app.smoke().unwrap();
        assert_eq!(smoke.shots.len(), 1);
        assert!(smoke.hold.is_held());

        // Queued input for the shooter never reaches the scene
        app.pointer(PointerEvent::Down {
            pos: Vec2::new(700.0, 500.0),
        });
        app.navigate(Screen::Home);
        assert!(app.smoke().is_none());
        let events = app.frame(FRAME);
        assert!(events.is_empty());

        app.navigate(Screen::Smoke);
        let fresh = app.smoke().unwrap();
        assert!(fresh.shots.is_empty());
        assert!(!fresh.hold.is_held());
    }

    #[test]
    fn test_smoke_restart_request() {
        let mut app = app();
        app.navigate(Screen::Smoke);
        app.pointer(PointerEvent::Down {
            pos: Vec2::new(400.0, 300.0),
        });
        app.frame(FRAME);
        app.restart_smoke();
        app.frame(FRAME);
        let smoke = app.smoke().unwrap();
        assert!(smoke.shots.is_empty());
        assert_eq!(smoke.start_ms, FRAME);
    }

    #[test]
    fn test_dare_runs_only_while_visible() {
        let mut app = app();
        app.navigate(Screen::Dare);
        for _ in 0..320 {
            app.frame(FRAME);
        }
        assert_eq!(app.dare().unwrap().phase, game::DarePhase::Revealed);
        assert!(app.dare_mut().unwrap().skip());

        app.navigate(Screen::Home);
        assert!(app.dare().is_none());
        app.navigate(Screen::Dare);
        let dare = app.dare().unwrap();
        assert_eq!(dare.phase, game::DarePhase::Spinning);
        assert_eq!(dare.skips_remaining, game::dare::SKIPS_INITIAL);
    }

    #[test]
    fn test_leaving_home_drops_the_flame() {
        let mut app = app();
        app.pointer(PointerEvent::Down {
            pos: Vec2::new(700.0, 500.0),
        });
        let events = app.frame(FRAME);
        assert_eq!(events, vec![AppEvent::Scene(SceneEvent::FlameOn)]);

        app.navigate(Screen::Smoke);
        assert_eq!(app.scene().flame().phase, crate::scene::FlamePhase::Inactive);
    }
}
