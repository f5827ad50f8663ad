//! The lighting scene
//!
//! [`Scene`] is the context object for the 3D interaction: it owns the camera,
//! the flame, the ignition trigger, the rotation controller and the cigarette.
//! Input arrives through an [`InputQueue`] drained at the top of each frame,
//! so handlers never race the per-frame update.

pub mod camera;
pub mod cigarette;
pub mod flame;
pub mod ignition;
pub mod particles;
pub mod rotation;

pub use camera::{Camera, CameraZoom, InteractionSurface, Ray, ray_capsule, ray_plane};
pub use cigarette::Cigarette;
pub use flame::{FlameController, FlamePhase, FlameState};
pub use ignition::{Contact, IgnitionPhase, ProximityTrigger};
pub use particles::{FlameEffect, FlameParticle, FlameUniforms};
pub use rotation::{IntroSpin, RotationController};

use glam::{Mat4, Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::input::{InputQueue, PointerEvent, Viewport};
use crate::profile::DeviceProfile;
use crate::tuning::SceneTuning;

/// Pointer travel (px) below which a press-release on the cigarette is a click
pub const CLICK_SLOP: f32 = 4.0;

/// Notifications produced by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    FlameOn,
    FlameOff,
    /// The cigarette was lit (emitted once per scene)
    Lit,
}

/// What the current pointer press is holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Grab {
    #[default]
    Nothing,
    Flame,
    Cigarette,
}

pub struct Scene {
    tuning: SceneTuning,
    camera: Camera,
    zoom: CameraZoom,
    surface: InteractionSurface,
    viewport: Viewport,
    flame: FlameController,
    flame_fx: FlameEffect,
    trigger: ProximityTrigger,
    rotation: RotationController,
    cigarette: Cigarette,
    grab: Grab,
    elapsed: f32,
    tip: Option<Vec3>,
    on_lit: Option<Box<dyn FnMut()>>,
    events: Vec<SceneEvent>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("flame", self.flame.state())
            .field("lit", &self.trigger.is_lit())
            .field("rotation", &self.rotation.current())
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl Scene {
    pub fn new(tuning: SceneTuning, profile: &DeviceProfile, viewport: Viewport, seed: u64) -> Self {
        let camera = Camera::new(Vec3::from(tuning.camera_position), tuning.camera_fov_deg);
        let intro = (!tuning.skip_intro).then(|| IntroSpin::new(tuning.intro_spin_seconds));
        let mut rng = Pcg32::seed_from_u64(seed);

        Self {
            zoom: CameraZoom::new(camera.position.z),
            camera,
            surface: InteractionSurface::default(),
            viewport,
            flame: FlameController::new(),
            flame_fx: FlameEffect::new(profile.particle_count, tuning.flame_intensity, &mut rng),
            trigger: ProximityTrigger::new(tuning.contact_threshold, tuning.dwell_seconds),
            rotation: RotationController::new(intro),
            cigarette: Cigarette::new(Vec3::from(tuning.cigarette_position)),
            grab: Grab::Nothing,
            elapsed: 0.0,
            tip: None,
            on_lit: None,
            events: Vec::new(),
            tuning,
        }
    }

    /// Register the ignition callback (fired at most once)
    pub fn on_lit(&mut self, callback: impl FnMut() + 'static) {
        self.on_lit = Some(Box::new(callback));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn flame(&self) -> &FlameState {
        self.flame.state()
    }

    pub fn flame_effect(&self) -> &FlameEffect {
        &self.flame_fx
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation.current()
    }

    pub fn rotation_controller(&self) -> &RotationController {
        &self.rotation
    }

    pub fn trigger(&self) -> &ProximityTrigger {
        &self.trigger
    }

    pub fn cigarette_transform(&self) -> Mat4 {
        self.cigarette.transform(self.rotation.current())
    }

    /// Tip position computed on the last frame
    pub fn tip(&self) -> Option<Vec3> {
        self.tip
    }

    pub fn is_lit(&self) -> bool {
        self.trigger.is_lit()
    }

    pub fn ember_intensity(&self) -> f32 {
        self.cigarette.ember_intensity(self.elapsed)
    }

    pub fn ember_light_position(&self) -> Vec3 {
        self.cigarette.ember_light(self.rotation.current())
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Project a canvas pixel position onto the flame sphere
    fn project(&self, pos: Vec2) -> Option<Vec3> {
        let ndc = self.viewport.to_ndc(pos)?;
        let aspect = self.viewport.aspect()?;
        Some(
            self.camera
                .project_pointer(ndc, aspect, self.tuning.flame_distance),
        )
    }

    fn ray(&self, pos: Vec2) -> Option<Ray> {
        let ndc = self.viewport.to_ndc(pos)?;
        let aspect = self.viewport.aspect()?;
        Some(self.camera.ray(ndc, aspect))
    }

    /// Apply one pointer event
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { pos } => self.pointer_down(pos),
            PointerEvent::Move { pos } => match self.grab {
                Grab::Flame => {
                    if let Some(point) = self.project(pos) {
                        self.flame.drag(point);
                    }
                }
                Grab::Cigarette => self.rotation.drag(pos),
                Grab::Nothing => {}
            },
            PointerEvent::Up { .. } => self.pointer_up(true),
            PointerEvent::Cancel => self.pointer_up(false),
            PointerEvent::Wheel { delta_y, time_ms } => self.zoom.wheel(delta_y, time_ms),
        }
    }

    fn pointer_down(&mut self, pos: Vec2) {
        // One grab at a time; a second pointer cannot steal it
        if self.grab != Grab::Nothing {
            return;
        }
        let Some(ray) = self.ray(pos) else {
            return;
        };

        let (a, b, radius) = self.cigarette.pick_capsule(self.rotation.current());
        if ray_capsule(&ray, a, b, radius).is_some() {
            self.grab = Grab::Cigarette;
            self.rotation.press(pos);
            return;
        }

        if self.surface.hit(&ray).is_some() {
            self.grab = Grab::Flame;
            self.flame.press(ray.at(self.tuning.flame_distance));
            self.events.push(SceneEvent::FlameOn);
        }
    }

    fn pointer_up(&mut self, allow_click: bool) {
        match self.grab {
            Grab::Flame => {
                self.flame.release();
                self.trigger.reset_contact();
                self.events.push(SceneEvent::FlameOff);
            }
            Grab::Cigarette => {
                let clicked = allow_click && self.rotation.travel() < CLICK_SLOP;
                self.rotation.release();
                if clicked && !self.flame.is_active() && self.trigger.ignite() {
                    self.lit();
                }
            }
            Grab::Nothing => {}
        }
        self.grab = Grab::Nothing;
    }

    fn lit(&mut self) {
        self.cigarette.light();
        if self.flame.is_active() {
            self.flame.release();
            self.events.push(SceneEvent::FlameOff);
        }
        if self.grab == Grab::Flame {
            self.grab = Grab::Nothing;
        }
        self.events.push(SceneEvent::Lit);
        if let Some(callback) = self.on_lit.as_mut() {
            callback();
        }
    }

    /// Advance one animation frame of `dt` seconds
    pub fn frame(&mut self, dt: f32, input: &mut InputQueue) -> Vec<SceneEvent> {
        for event in input.drain() {
            self.handle(event);
        }

        self.elapsed += dt;
        self.camera.position.z = self.zoom.update();

        self.rotation.step(self.elapsed);
        let tip = self.cigarette.tip(self.rotation.current());
        self.tip = Some(tip);

        if self.flame.is_active()
            && self.trigger.step(self.flame.position(), tip, dt) == Contact::Ignited
        {
            self.lit();
        }

        if self.flame.is_active() {
            self.flame_fx.update(
                dt,
                self.elapsed,
                self.flame.velocity(),
                self.flame.generation(),
            );
        }

        std::mem::take(&mut self.events)
    }
}
