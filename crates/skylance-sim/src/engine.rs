//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world, processes pilot input, runs
//! all systems and produces `SimSnapshot`s. Completely headless, enabling
//! deterministic testing.
//!
//! Two update rates drive it: [`SimulationEngine::frame`] is the
//! variable-rate update (pilot commands, throttle, seeker timer,
//! presentation) and steps the fixed tick as many times as the frame time
//! allows; [`SimulationEngine::tick`] runs exactly one frame of one fixed
//! tick.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skylance_core::commands::{ControlState, PilotCommand, RadarCommand};
use skylance_core::config::ScenarioConfig;
use skylance_core::enums::SimPhase;
use skylance_core::events::SimEvent;
use skylance_core::state::SimSnapshot;
use skylance_core::types::SimTime;

use crate::spatial::SceneQuery;
use crate::systems;
use crate::world_setup;

/// Slack allowed when comparing accumulated frame time against the tick.
const ACCUMULATOR_EPSILON: f64 = 1e-9;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: ScenarioConfig,
    time: SimTime,
    phase: SimPhase,
    /// Seconds per fixed tick.
    dt: f64,
    rng: ChaCha8Rng,
    player: Option<Entity>,
    controls: ControlState,
    command_queue: VecDeque<PilotCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
    /// Frame time not yet consumed by fixed ticks.
    accumulator: f64,
}

impl SimulationEngine {
    /// Create an engine and populate its world from `config`.
    ///
    /// The config is expected to be validated already
    /// (see `ScenarioConfig::validate`).
    pub fn new(config: ScenarioConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = World::new();
        let player = world_setup::setup_world(&mut world, &config, &mut rng);
        info!(
            "scenario ready: seed {}, {} Hz, {} bandits",
            config.seed, config.tick_rate, config.bandits.count
        );

        Self {
            world,
            dt: config.dt(),
            config,
            time: SimTime::default(),
            phase: SimPhase::Active,
            rng,
            player: Some(player),
            controls: ControlState::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            accumulator: 0.0,
        }
    }

    /// Create an engine with an empty world. Used by tests that place
    /// their own entities.
    pub fn empty(config: ScenarioConfig) -> Self {
        Self {
            world: World::new(),
            dt: config.dt(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            time: SimTime::default(),
            phase: SimPhase::Active,
            player: None,
            controls: ControlState::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            accumulator: 0.0,
        }
    }

    /// Queue a pilot command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: PilotCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PilotCommand>) {
        self.command_queue.extend(commands);
    }

    /// Replace the held controls. Axes are clamped to [-1, 1].
    pub fn set_controls(&mut self, controls: ControlState) {
        self.controls = controls.clamped();
        systems::controls::set_controls(&mut self.world, self.controls);
    }

    /// Variable-rate update of `frame_dt` seconds, followed by as many fixed
    /// ticks as the accumulated frame time covers.
    pub fn frame(&mut self, frame_dt: f64) -> SimSnapshot {
        self.process_commands();

        if self.phase == SimPhase::Active {
            let frame_dt = frame_dt.max(0.0);
            self.update_frame(frame_dt);
            self.accumulator += frame_dt;
            while self.accumulator + ACCUMULATOR_EPSILON >= self.dt {
                self.fixed_step();
                self.accumulator -= self.dt;
            }
            self.accumulator = self.accumulator.max(0.0);
        }

        self.snapshot()
    }

    /// One frame of exactly one fixed tick.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        if self.phase == SimPhase::Active {
            self.update_frame(self.dt);
            self.fixed_step();
        }

        self.snapshot()
    }

    /// Get the current simulation phase.
    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// The player's aircraft, if the world has one.
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the ECS world for scripted scenarios.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Adopt `entity` as the player's aircraft.
    pub fn set_player(&mut self, entity: Entity) {
        self.player = Some(entity);
    }

    /// Random source seeded from the scenario.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single pilot command.
    fn handle_command(&mut self, command: PilotCommand) {
        match command {
            PilotCommand::Pause => {
                if self.phase == SimPhase::Active {
                    info!("simulation paused at tick {}", self.time.tick);
                    self.phase = SimPhase::Paused;
                }
                return;
            }
            PilotCommand::Resume => {
                if self.phase == SimPhase::Paused {
                    info!("simulation resumed at tick {}", self.time.tick);
                    self.phase = SimPhase::Active;
                }
                return;
            }
            _ => {}
        }

        if self.phase == SimPhase::Paused {
            debug!("ignoring {command:?} while paused");
            return;
        }
        let Some(player) = self.player else {
            debug!("ignoring {command:?}: no player aircraft");
            return;
        };

        match command {
            PilotCommand::FlapsDown => {
                systems::controls::step_flaps(&mut self.world, player, true, &mut self.events);
            }
            PilotCommand::FlapsUp => {
                systems::controls::step_flaps(&mut self.world, player, false, &mut self.events);
            }
            PilotCommand::ToggleGear => {
                systems::controls::toggle_gear(&mut self.world, player, &mut self.events);
            }
            PilotCommand::CycleTarget => {
                systems::controls::queue_radar_command(
                    &mut self.world,
                    player,
                    RadarCommand::CycleTarget,
                );
            }
            PilotCommand::ToggleLock => {
                systems::controls::queue_radar_command(
                    &mut self.world,
                    player,
                    RadarCommand::ToggleLock,
                );
            }
            PilotCommand::ToggleScanWidth => {
                systems::controls::queue_radar_command(
                    &mut self.world,
                    player,
                    RadarCommand::ToggleScanWidth,
                );
            }
            PilotCommand::Fire => {
                systems::armament::press_fire(
                    &mut self.world,
                    player,
                    &self.config.missile,
                    &mut self.events,
                );
            }
            PilotCommand::Pause | PilotCommand::Resume => {}
        }
    }

    /// Variable-rate systems.
    fn update_frame(&mut self, frame_dt: f64) {
        // 1. Throttle, engine audio, airbrake panel
        systems::controls::run(&mut self.world, &self.config.aircraft, frame_dt);
        // 2. Seeker warm-up and timeout
        systems::armament::update_seekers(
            &mut self.world,
            &self.config.armament,
            frame_dt,
            &mut self.events,
        );
    }

    /// Run all fixed-tick systems in order.
    fn fixed_step(&mut self) {
        let dt = self.dt;
        let config = &self.config;

        // 1. Bandit patrols
        systems::patrol::run(&mut self.world, dt);
        // 2. Aerodynamic surfaces push lift and flap drag into their owners
        systems::aero_surfaces::run(&mut self.world, config.air_density, dt);
        // 3. Thrust, drag, brakes
        let scene = SceneQuery::from_world(&self.world, config.ground_height);
        systems::propulsion::run(&mut self.world, &scene, &config.aircraft, config.air_density);
        // 4. Missile burn, guidance and fuse
        systems::missile_kinematics::run(
            &mut self.world,
            config.gravity,
            dt,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 5. Integration
        systems::integrator::run(&mut self.world, config.gravity, dt);
        self.time.advance(dt);
        // 6. Cleanup (splashed, finished, out of bounds)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 7. Radar pass against the integrated scene
        let scene = SceneQuery::from_world(&self.world, config.ground_height);
        systems::radar::run(
            &self.world,
            &scene,
            &config.radar,
            self.time.elapsed_secs,
            dt,
            &mut self.events,
        );
    }

    fn snapshot(&mut self) -> SimSnapshot {
        let scene = SceneQuery::new().with_ground(self.config.ground_height);
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            self.player,
            &scene,
            &self.time,
            self.phase,
            events,
        )
    }
}
