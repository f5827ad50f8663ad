//! Cig World entry point
//!
//! On the web the library's `start` hook and `AppHandle` do everything. The
//! native binary runs a short headless session so the core can be exercised
//! without a browser.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cig World (native) starting...");
    log::info!("Rendering needs a browser - this runs a headless session");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start hook, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use cig_world::app::{App, AppEvent, Screen};
    use cig_world::game::DarePhase;
    use cig_world::input::{PointerEvent, Viewport};
    use cig_world::{DeviceHints, DeviceProfile, SceneTuning, SmokeTuning};
    use glam::{Vec2, Vec3};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;

    fn to_screen(app: &App, world: Vec3) -> Vec2 {
        let camera = app.scene().camera();
        let clip = (camera.projection(WIDTH / HEIGHT) * camera.view()).project_point3(world);
        Vec2::new((clip.x + 1.0) / 2.0 * WIDTH, (1.0 - clip.y) / 2.0 * HEIGHT)
    }

    pub fn run() {
        let profile = DeviceProfile::detect(&DeviceHints::from_browser());
        let mut app = App::new(
            SceneTuning::default(),
            SmokeTuning::default(),
            &profile,
            Viewport::new(WIDTH, HEIGHT),
            42,
        );

        // Let the intro spin settle
        for _ in 0..120 {
            app.frame(FRAME_MS);
        }

        // Grab the flame and hold it against the tip
        app.pointer(PointerEvent::Down {
            pos: Vec2::new(WIDTH * 0.8, HEIGHT * 0.8),
        });
        app.frame(FRAME_MS);
        let tip = app.scene().tip().unwrap_or(Vec3::ZERO);
        let camera = app.scene().camera().position;
        let flame_at = camera + (tip - camera).normalize_or_zero() * cig_world::consts::FLAME_RAY_DISTANCE;
        app.pointer(PointerEvent::Move {
            pos: to_screen(&app, flame_at),
        });

        let mut frames = 0;
        while !app.is_revealed() && frames < 600 {
            for event in app.frame(FRAME_MS) {
                if let AppEvent::Scene(scene_event) = event {
                    println!("  frame {frames:>3}: {scene_event:?}");
                }
            }
            frames += 1;
        }
        println!(
            "Lit: {}  revealed: {}  after {frames} frames",
            app.scene().is_lit(),
            app.is_revealed()
        );

        // Hold fire in the middle of the shooter for twenty seconds
        app.navigate(Screen::Smoke);
        app.pointer(PointerEvent::Down {
            pos: Vec2::new(WIDTH / 2.0, HEIGHT * 0.9),
        });
        let mut sweep = 0.0f32;
        for _ in 0..1200 {
            sweep += 0.02;
            let x = WIDTH / 2.0 + sweep.sin() * WIDTH * 0.35;
            app.pointer(PointerEvent::Move {
                pos: Vec2::new(x, HEIGHT * 0.9),
            });
            app.frame(FRAME_MS);
        }
        if let Some(smoke) = app.smoke() {
            println!(
                "Smoke: {} points, {} lives, phase {:?}",
                smoke.points, smoke.lives, smoke.phase
            );
        }

        app.navigate(Screen::Dare);
        for _ in 0..320 {
            app.frame(FRAME_MS);
        }
        if let Some(dare) = app.dare_mut() {
            if dare.phase == DarePhase::Revealed {
                println!("Dare: {}", dare.dare.unwrap_or_default());
                dare.accept();
            }
        }
        for _ in 0..320 {
            app.frame(FRAME_MS);
        }
        if let Some(dare) = app.dare() {
            println!("Punishment: {}", dare.punishment.unwrap_or_default());
        }

        app.navigate(Screen::Home);
        log::info!("Session finished");
    }
}
