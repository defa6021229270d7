//! Frame-stepped simulation
//!
//! [`Simulation`] owns every piece of run state and advances it one frame
//! per [`Simulation::tick`]. Lifecycle commands are queued and drained at
//! the top of each tick; gameplay only moves while flying in or active.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};

use super::boundary::{Bounds, Viewport};
use super::collision;
use super::craft::Craft;
use super::difficulty;
use super::machine::{Command, RunStateMachine, Transition};
use super::registry::{EntityRegistry, ObstacleSpawn};
use super::spawner;
use super::starfield::Starfield;
use super::state::{EntityId, GameEvent, Geometry, RunContext, RunPhase, RunSummary, Tint};
use crate::GameError;
use crate::consts::OBSTACLE_SCORE;
use crate::frame_scale;
use crate::highscores::ScoreStore;
use crate::platform::InputState;
use crate::renderer::ModelHandle;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Projectile mesh
const PROJECTILE_SEGMENTS: u32 = 8;

/// Whether a tick advanced the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// World advanced; the frame should be drawn
    Simulated,
    /// Nothing moved (idle, paused or game over)
    Skipped,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub outcome: StepOutcome,
    pub events: Vec<GameEvent>,
}

pub struct Simulation {
    tuning: Tuning,
    settings: Settings,
    viewport: Viewport,
    machine: RunStateMachine,
    run: RunContext,
    craft: Craft,
    registry: EntityRegistry,
    starfield: Starfield,
    store: Box<dyn ScoreStore>,
    high_score: u64,
    /// Simulated seconds since construction
    clock: f64,
    commands: VecDeque<Command>,
    events: Vec<GameEvent>,
    /// Host visibility seen by the previous tick
    host_hidden: bool,
    last_summary: Option<RunSummary>,
}

impl Simulation {
    pub fn new(tuning: Tuning, settings: Settings, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let mut run = RunContext::new(seed);
        let starfield = if settings.starfield_enabled() {
            Starfield::new(settings.star_count(), tuning.star_spread, &mut run.rng)
        } else {
            Starfield::default()
        };
        let high_score = store.get();
        log::info!("Simulation ready (seed {}, high score {})", seed, high_score);

        Self {
            craft: Craft::new(&tuning),
            tuning,
            settings,
            viewport: Viewport::default(),
            machine: RunStateMachine::new(),
            run,
            registry: EntityRegistry::new(),
            starfield,
            store,
            high_score,
            clock: 0.0,
            commands: VecDeque::new(),
            events: Vec::new(),
            host_hidden: false,
            last_summary: None,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.machine.phase()
    }

    pub fn score(&self) -> u64 {
        self.run.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn difficulty(&self) -> f32 {
        self.run.difficulty
    }

    /// Whole seconds since the current run started
    pub fn elapsed_secs(&self) -> u64 {
        self.run.elapsed_secs(self.clock).floor() as u64
    }

    pub fn run(&self) -> &RunContext {
        &self.run
    }

    pub fn craft(&self) -> &Craft {
        &self.craft
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Summary of the most recently finished run
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
    }

    /// Current playable rectangle (never cached: the viewport may change)
    pub fn bounds(&self) -> Bounds {
        Bounds::for_viewport(&self.tuning, &self.viewport)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        // Keep the craft inside a shrunken rectangle right away
        let bounds = self.bounds();
        self.craft.pos = bounds.clamp(self.craft.pos);
    }

    /// Queue a lifecycle command for the next tick
    pub fn queue_command(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Hand over the outcome of a craft model load
    pub fn model_loaded(&mut self, result: Result<ModelHandle, GameError>) {
        match result {
            Ok(handle) => {
                log::info!("Craft model loaded: {}", handle.asset);
                self.craft.attach_model(handle);
            }
            Err(err) => {
                log::error!("Error loading craft model: {}", err);
                let asset = match &err {
                    GameError::AssetLoad { asset, .. } => asset.clone(),
                    _ => String::new(),
                };
                self.events.push(GameEvent::CraftModelFailed { asset });
            }
        }
    }

    /// Advance one frame of `dt` seconds
    pub fn tick(&mut self, input: &InputState, dt: f32) -> StepReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if let Some(radius) = self.craft.commit_transform() {
            log::info!("Craft bounding sphere ready (radius {:.3})", radius);
            self.events.push(GameEvent::CraftReady { radius });
        }

        if input.pause_toggle {
            self.commands.push_back(Command::TogglePause);
        }
        // Visibility is a transition: a Resume while still hidden sticks
        let became_hidden = input.hidden && !self.host_hidden;
        self.host_hidden = input.hidden;
        if became_hidden && self.phase() == RunPhase::Active {
            self.commands.push_back(Command::Hidden);
        }
        self.drain_commands();

        let outcome = if self.phase().is_simulating() {
            self.step(input, dt);
            StepOutcome::Simulated
        } else {
            StepOutcome::Skipped
        };

        StepReport {
            outcome,
            events: std::mem::take(&mut self.events),
        }
    }

    /// Apply queued commands without advancing the world
    pub fn process_commands(&mut self) -> Vec<GameEvent> {
        self.drain_commands();
        std::mem::take(&mut self.events)
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            self.dispatch(command);
        }
    }

    fn dispatch(&mut self, command: Command) -> Option<Transition> {
        match self.machine.apply(command) {
            Ok(transition) => {
                self.enter(transition);
                Some(transition)
            }
            Err(err) => {
                log::debug!("Ignored: {}", err);
                None
            }
        }
    }

    /// Side effects of entering a phase
    fn enter(&mut self, transition: Transition) {
        log::info!("{:?} -> {:?} ({:?})", transition.from, transition.to, transition.command);
        self.events.push(GameEvent::PhaseChanged {
            from: transition.from,
            to: transition.to,
        });
        if transition.starts_run() {
            self.begin_run();
        } else if transition.ends_run() {
            self.finish_run();
        }
    }

    fn begin_run(&mut self) {
        self.run.reset(self.clock);
        self.registry.clear(&mut self.events);
        self.craft.reset(&self.tuning);
        self.starfield.reseed(&mut self.run.rng);
        self.last_summary = None;
    }

    fn finish_run(&mut self) {
        let score = self.run.score;
        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
            if let Err(err) = self.store.set(score) {
                log::warn!("Failed to persist high score: {}", err);
            }
        }
        let summary = RunSummary {
            score,
            elapsed_secs: self.elapsed_secs(),
            high_score: self.high_score,
            new_high_score,
        };
        log::info!(
            "Game over: score {} in {}s (high score {})",
            summary.score,
            summary.elapsed_secs,
            summary.high_score
        );
        self.last_summary = Some(summary);
        self.events.push(GameEvent::GameOver(summary));
    }

    fn step(&mut self, input: &InputState, dt: f32) {
        self.clock += dt as f64;
        let frames = frame_scale(dt);

        if self.phase() == RunPhase::FlyingIn
            && self.craft.fly_in(self.tuning.fly_in_step * frames, self.tuning.craft_rest_z)
        {
            self.dispatch(Command::EntryComplete);
        }

        self.starfield.advance(
            self.tuning.star_speed * self.run.difficulty * frames,
            self.tuning.behind_camera_z(),
            self.tuning.star_reset_z,
            &mut self.run.rng,
        );

        if self.phase() == RunPhase::Active {
            self.step_active(input, dt, frames);
        }
    }

    fn step_active(&mut self, input: &InputState, dt: f32, frames: f32) {
        let tuning = &self.tuning;
        self.run.difficulty = difficulty::multiplier(self.run.elapsed_secs(self.clock), tuning.difficulty_ramp_secs);
        let speed = self.run.difficulty * frames;
        let bounds = Bounds::for_viewport(tuning, &self.viewport);

        // Craft
        let movement = input.movement.clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.craft
            .translate(movement * tuning.craft_speed * speed + input.drag, &bounds);
        self.craft.orient(movement, tuning, frames);

        if input.fire {
            let muzzle = self.craft.pos + Vec3::Z * tuning.muzzle_offset;
            let geometry = Geometry::Sphere {
                radius: tuning.projectile_radius,
                segments: PROJECTILE_SEGMENTS,
            };
            self.registry.spawn_projectile(muzzle, geometry, &mut self.events);
        }

        spawner::advance(
            &mut self.run,
            dt * 1000.0,
            &bounds,
            tuning,
            &mut self.registry,
            &mut self.events,
        );

        // Obstacles
        for obstacle in self.registry.obstacles_mut() {
            obstacle.advance(tuning.obstacle_speed * speed, speed);
        }

        if let Some(player) = self.craft.collision_sphere() {
            if let Some(obstacle) = collision::player_hit(&player, self.registry.obstacles()) {
                log::info!("Collision with obstacle {}", obstacle);
                self.dispatch(Command::Collision);
                return;
            }
        }

        // Projectiles
        for projectile in self.registry.projectiles_mut() {
            projectile.pos.z -= tuning.projectile_speed * speed;
        }

        for hit in collision::projectile_hits(self.registry.projectiles(), self.registry.obstacles()) {
            self.registry.remove_projectile(hit.projectile, &mut self.events);
            self.registry.remove_obstacle(hit.obstacle, &mut self.events);
            self.run.score += OBSTACLE_SCORE;
            self.events.push(GameEvent::ObstacleDestroyed {
                obstacle: hit.obstacle,
                projectile: hit.projectile,
                score: self.run.score,
            });
        }

        let far_z = tuning.projectile_far_z;
        self.registry.retain_projectiles(|p| p.pos.z >= far_z, &mut self.events);
        let behind_z = tuning.behind_camera_z();
        self.registry.retain_obstacles(|o| o.pos.z <= behind_z, &mut self.events);
    }

    /// Place an obstacle directly (scenario setup and tests)
    pub fn inject_obstacle(&mut self, pos: Vec3) -> EntityId {
        let spawn = ObstacleSpawn {
            pos,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            tint: Tint { r: 120, g: 110, b: 100 },
            geometry: Geometry::Dodecahedron {
                radius: self.tuning.obstacle_radius,
            },
        };
        self.registry.spawn_obstacle(spawn, &mut self.events)
    }

    /// Place a projectile directly (scenario setup and tests)
    pub fn inject_projectile(&mut self, pos: Vec3) -> EntityId {
        let geometry = Geometry::Sphere {
            radius: self.tuning.projectile_radius,
            segments: PROJECTILE_SEGMENTS,
        };
        self.registry.spawn_projectile(pos, geometry, &mut self.events)
    }
}
