//! Frame driver
//!
//! The host calls [`Scheduler::tick`] once per display frame (from
//! `requestAnimationFrame` on the web, from a plain loop in the headless
//! binary). The frame delta is accumulated and the simulation advanced in
//! fixed [`SIM_DT`] substeps, so collisions are tested at the same spacing
//! whatever the host frame rate. A [`ScheduleHandle`] shared with the host
//! suspends or cancels further steps.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{CRAFT_ASSET, MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::platform::InputState;
use crate::renderer::{ModelLoader, Renderer};
use crate::sim::{Command, GameEvent, Simulation, StepOutcome, Viewport};

/// What a scheduler tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// At least one substep ran and the renderer drew the result
    Drawn,
    /// Nothing moved, nothing drawn
    Skipped,
    /// The handle was cancelled; the host should stop calling
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleState {
    #[default]
    Running,
    Suspended,
    Cancelled,
}

/// Shared switch over a [`Scheduler`]
#[derive(Debug, Clone, Default)]
pub struct ScheduleHandle(Rc<Cell<ScheduleState>>);

impl ScheduleHandle {
    pub fn state(&self) -> ScheduleState {
        self.0.get()
    }

    pub fn suspend(&self) {
        if self.state() == ScheduleState::Running {
            self.0.set(ScheduleState::Suspended);
        }
    }

    pub fn resume(&self) {
        if self.state() == ScheduleState::Suspended {
            self.0.set(ScheduleState::Running);
        }
    }

    /// Final; a cancelled schedule never runs again
    pub fn cancel(&self) {
        self.0.set(ScheduleState::Cancelled);
    }
}

const SUBSTEP_EPSILON: f32 = 1e-5;

pub struct Scheduler<R: Renderer, L: ModelLoader> {
    sim: Simulation,
    renderer: R,
    loader: L,
    handle: ScheduleHandle,
    frames: u64,
    /// Host time not yet simulated (seconds)
    accumulator: f32,
    /// One-shot edges waiting for the next substep
    pending_fire: bool,
    pending_pause: bool,
    last_events: Vec<GameEvent>,
}

impl<R: Renderer, L: ModelLoader> Scheduler<R, L> {
    /// Wire up the collaborators and start loading the craft model
    pub fn new(sim: Simulation, mut renderer: R, mut loader: L) -> Self {
        let viewport = sim.viewport();
        renderer.resize(viewport.width as u32, viewport.height as u32);
        loader.request(CRAFT_ASSET);
        log::info!("Requested craft model {}", CRAFT_ASSET);

        Self {
            sim,
            renderer,
            loader,
            handle: ScheduleHandle::default(),
            frames: 0,
            accumulator: 0.0,
            pending_fire: false,
            pending_pause: false,
            last_events: Vec::new(),
        }
    }

    pub fn handle(&self) -> ScheduleHandle {
        self.handle.clone()
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Substeps that reached the simulation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Events produced by the most recent frame, across all its substeps
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn queue_command(&mut self, command: Command) {
        self.sim.queue_command(command);
    }

    /// Ask the loader for the craft model again (e.g. after a failure)
    pub fn reload_model(&mut self) {
        self.loader.request(CRAFT_ASSET);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.sim.set_viewport(Viewport::new(width as f32, height as f32));
        self.renderer.resize(width, height);
    }

    /// Whether the host should keep requesting frames eagerly
    pub fn is_animating(&self) -> bool {
        self.handle.state() == ScheduleState::Running && self.sim.phase().is_simulating()
    }

    /// Run one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32, input: &InputState) -> FrameOutcome {
        match self.handle.state() {
            ScheduleState::Cancelled => return FrameOutcome::Cancelled,
            ScheduleState::Suspended => {
                let events = self.sim.process_commands();
                self.last_events.clear();
                self.forward(events);
                return FrameOutcome::Skipped;
            }
            ScheduleState::Running => {}
        }

        if let Some(result) = self.loader.poll() {
            self.sim.model_loaded(result);
        }

        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;
        self.pending_fire |= input.fire;
        self.pending_pause |= input.pause_toggle;
        self.last_events.clear();

        let mut simulated = false;
        let mut substeps = 0;
        // Tolerate rounding so 0.1 s is exactly six substeps
        while self.accumulator >= SIM_DT - SUBSTEP_EPSILON && substeps < MAX_SUBSTEPS {
            let step_input = InputState {
                fire: std::mem::take(&mut self.pending_fire),
                pause_toggle: std::mem::take(&mut self.pending_pause),
                ..input.clone()
            };
            let report = self.sim.tick(&step_input, SIM_DT);
            self.accumulator = (self.accumulator - SIM_DT).max(0.0);
            self.frames += 1;
            substeps += 1;
            simulated |= report.outcome == StepOutcome::Simulated;
            self.forward(report.events);
        }

        if simulated {
            self.renderer.draw(&self.sim);
            FrameOutcome::Drawn
        } else {
            FrameOutcome::Skipped
        }
    }

    /// Mirror registry changes into the scene graph
    fn forward(&mut self, events: Vec<GameEvent>) {
        for event in &events {
            match *event {
                GameEvent::Spawned { id, kind, pos } => self.renderer.add(id, kind, pos),
                GameEvent::Despawned { id, kind } => self.renderer.remove(id, kind),
                _ => {}
            }
        }
        self.last_events.extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryScoreStore;
    use crate::renderer::{LoadScript, SceneRecorder, StaticModelLoader};
    use crate::settings::{QualityPreset, Settings};
    use crate::sim::{EntityKind, RunPhase};
    use crate::tuning::Tuning;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn scheduler(loader: StaticModelLoader) -> Scheduler<SceneRecorder, StaticModelLoader> {
        let sim = Simulation::new(
            Tuning::default(),
            Settings::from_preset(QualityPreset::Low),
            Box::new(MemoryScoreStore::default()),
            777,
        );
        Scheduler::new(sim, SceneRecorder::new(), loader)
    }

    /// Spawner off, model ready and flown in, driven at `dt`
    fn active_quiet(dt: f32) -> Scheduler<SceneRecorder, StaticModelLoader> {
        let tuning = Tuning {
            base_spawn_interval_ms: 1.0e9,
            min_spawn_interval_ms: 1.0e9,
            ..Tuning::default()
        };
        let sim = Simulation::new(
            tuning,
            Settings::from_preset(QualityPreset::Low),
            Box::new(MemoryScoreStore::default()),
            4242,
        );
        let mut s = Scheduler::new(sim, SceneRecorder::new(), StaticModelLoader::craft());
        s.queue_command(Command::Start);
        while s.sim().phase() != RunPhase::Active {
            s.tick(dt, &InputState::default());
        }
        s
    }

    #[test]
    fn test_slow_frames_do_not_tunnel() {
        let mut s = active_quiet(0.1);
        for k in 0..10 {
            let obstacle = s.sim_mut().inject_obstacle(Vec3::new(0.0, 0.0, -200.0));
            let projectile = s.sim_mut().inject_projectile(Vec3::new(0.0, 0.0, -1.0 - 0.1 * k as f32));
            let score = s.sim().score();

            for _ in 0..200 {
                s.tick(0.1, &InputState::default());
                if s.sim().registry().obstacle(obstacle).is_none() {
                    break;
                }
            }
            assert!(s.sim().registry().obstacle(obstacle).is_none(), "offset {} missed", k);
            assert!(s.sim().registry().projectile(projectile).is_none());
            assert_eq!(s.sim().score(), score + 10);
        }
        assert_eq!(s.sim().score(), 100);
        assert_eq!(s.sim().phase(), RunPhase::Active);
    }

    #[test]
    fn test_slow_frame_runs_fixed_substeps() {
        let mut s = active_quiet(DT);
        let frames = s.frames();
        let draws = s.renderer().draws;
        assert_eq!(s.tick(0.1, &InputState::default()), FrameOutcome::Drawn);
        assert_eq!(s.frames() - frames, 6);
        // One draw per host frame, not per substep
        assert_eq!(s.renderer().draws - draws, 1);
    }

    #[test]
    fn test_fire_edge_used_by_one_substep() {
        let mut s = active_quiet(DT);
        let fire = InputState {
            fire: true,
            ..Default::default()
        };
        s.tick(0.1, &fire);
        assert_eq!(s.sim().registry().projectiles().len(), 1);
    }

    #[test]
    fn test_short_frame_keeps_edges() {
        let mut s = active_quiet(DT);
        let fire = InputState {
            fire: true,
            ..Default::default()
        };
        // Too short to simulate: nothing drawn, shot not lost
        assert_eq!(s.tick(0.004, &fire), FrameOutcome::Skipped);
        assert!(s.sim().registry().projectiles().is_empty());
        s.tick(DT, &InputState::default());
        assert_eq!(s.sim().registry().projectiles().len(), 1);
    }

    #[test]
    fn test_requests_craft_on_construction() {
        let s = scheduler(StaticModelLoader::craft());
        assert_eq!(s.loader().requests, 1);
        assert_eq!(s.renderer().size, (1280, 720));
    }

    #[test]
    fn test_draws_only_when_simulating() {
        let mut s = scheduler(StaticModelLoader::craft());
        assert_eq!(s.tick(DT, &InputState::default()), FrameOutcome::Skipped);
        assert_eq!(s.renderer().draws, 0);

        s.queue_command(Command::Start);
        assert_eq!(s.tick(DT, &InputState::default()), FrameOutcome::Drawn);
        assert_eq!(s.renderer().draws, 1);
        assert_eq!(s.sim().phase(), RunPhase::FlyingIn);
    }

    #[test]
    fn test_model_delivered_through_loader() {
        let mut s = scheduler(StaticModelLoader::craft());
        s.queue_command(Command::Start);
        for _ in 0..5 {
            s.tick(DT, &InputState::default());
        }
        assert!(s.sim().craft().is_ready());
    }

    #[test]
    fn test_failed_model_leaves_craft_without_collision() {
        let mut s = scheduler(StaticModelLoader::new(LoadScript::Fail("missing".into()), 0));
        s.tick(DT, &InputState::default());
        assert!(
            s.last_events()
                .iter()
                .any(|e| matches!(e, GameEvent::CraftModelFailed { .. }))
        );
        assert!(!s.sim().craft().is_ready());
        assert_eq!(s.loader().requests, 1);
    }

    #[test]
    fn test_scene_mirrors_registry() {
        let mut s = scheduler(StaticModelLoader::craft());
        s.queue_command(Command::Start);
        let input = InputState {
            fire: true,
            ..Default::default()
        };
        for _ in 0..400 {
            s.tick(DT, &input);
            if s.sim().phase() == RunPhase::GameOver {
                break;
            }
        }
        let registry = s.sim().registry();
        assert_eq!(s.renderer().live(EntityKind::Obstacle), registry.obstacles().len());
        assert_eq!(s.renderer().live(EntityKind::Projectile), registry.projectiles().len());
        assert!(s.renderer().added > 0);
        assert_eq!(s.renderer().unknown_removals, 0);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut s = scheduler(StaticModelLoader::craft());
        s.queue_command(Command::Start);
        s.tick(5.0, &InputState::default());
        // 0.1 s is six reference frames of fly-in
        assert!((s.sim().craft().pos.z - (-114.0)).abs() < 1e-3);
    }

    #[test]
    fn test_suspend_resume_cancel() {
        let mut s = scheduler(StaticModelLoader::craft());
        let handle = s.handle();
        s.queue_command(Command::Start);
        s.tick(DT, &InputState::default());
        let z = s.sim().craft().pos.z;

        handle.suspend();
        assert_eq!(s.tick(DT, &InputState::default()), FrameOutcome::Skipped);
        assert_eq!(s.sim().craft().pos.z, z);
        assert!(!s.is_animating());

        handle.resume();
        assert_eq!(s.tick(DT, &InputState::default()), FrameOutcome::Drawn);
        assert!(s.is_animating());

        handle.cancel();
        handle.resume();
        assert_eq!(handle.state(), ScheduleState::Cancelled);
        assert_eq!(s.tick(DT, &InputState::default()), FrameOutcome::Cancelled);
    }

    #[test]
    fn test_suspended_still_applies_commands() {
        let mut s = scheduler(StaticModelLoader::craft());
        s.handle().suspend();
        s.queue_command(Command::Start);
        s.tick(DT, &InputState::default());
        assert_eq!(s.sim().phase(), RunPhase::FlyingIn);
        assert_eq!(s.renderer().draws, 0);
    }

    #[test]
    fn test_resize_reaches_sim_and_renderer() {
        let mut s = scheduler(StaticModelLoader::craft());
        s.resize(400, 800);
        assert_eq!(s.renderer().size, (400, 800));
        assert_eq!(s.sim().viewport().width, 400.0);
    }
}
