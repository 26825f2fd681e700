//! The shooter screen's simulation.
//!
//! `SimulationEngine` owns the hecs world, the meteor spawn timer, and the
//! seeded RNG. Each `tick` runs one frame in a fixed order: timed events and
//! input, movement and animation, collisions, then a snapshot for the
//! front-end. No window or audio dependency; runs are reproducible from
//! the seed.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starfall_core::commands::ControlState;
use starfall_core::components::Ship;
use starfall_core::constants::METEOR_SPAWN_INTERVAL_MS;
use starfall_core::events::AudioEvent;
use starfall_core::mask::SpriteShapes;
use starfall_core::state::FrameSnapshot;
use starfall_core::types::{Playfield, SimTime};

use crate::systems;
use crate::systems::spawner::SpawnTimer;
use crate::world_setup::{self, EntityFactory};

/// Per-run engine options.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed. Equal seeds and inputs replay identically.
    pub seed: u64,
    /// Initial playfield.
    pub playfield: Playfield,
    /// Collision masks and sizes of the sprites.
    pub shapes: SpriteShapes,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            playfield: Playfield::default(),
            shapes: SpriteShapes::default(),
        }
    }
}

/// Owns the world and every piece of per-screen state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    playfield: Playfield,
    rng: ChaCha8Rng,
    factory: EntityFactory,
    spawn_timer: SpawnTimer,
    despawn_buffer: Vec<Entity>,
    audio_events: Vec<AudioEvent>,
}

impl SimulationEngine {
    /// Create a new engine with a freshly populated screen.
    pub fn new(config: SimConfig) -> Self {
        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            playfield: config.playfield,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            factory: EntityFactory::new(config.shapes),
            spawn_timer: SpawnTimer::new(METEOR_SPAWN_INTERVAL_MS, 0),
            despawn_buffer: Vec::new(),
            audio_events: Vec::new(),
        };
        engine.restart(config.playfield, 0);
        engine
    }

    /// Tear down every entity and build a fresh screen for `playfield`:
    /// new stars, a new ship with a zero counter, a restarted spawn timer,
    /// and a music restart cue.
    pub fn restart(&mut self, playfield: Playfield, now_ms: u64) {
        self.world.clear();
        self.playfield = playfield;
        self.time = SimTime::default();
        world_setup::setup_screen(
            &mut self.world,
            &mut self.factory,
            &mut self.rng,
            &self.playfield,
        );
        self.spawn_timer.restart(now_ms);
        self.audio_events.push(AudioEvent::MusicStarted);
        log::debug!(
            "screen restarted at {}x{} ({} entities)",
            playfield.width,
            playfield.height,
            self.world.len()
        );
    }

    /// Advance the simulation by one frame and return the resulting snapshot.
    ///
    /// `dt` is the elapsed simulated time in seconds (negative values are
    /// treated as zero); `now_ms` is the frame clock's wall-clock reading,
    /// used for the spawn cadence and weapon cooldown.
    pub fn tick(&mut self, dt: f32, now_ms: u64, controls: &ControlState) -> FrameSnapshot {
        let dt = dt.max(0.0);

        // 1. Timed events and input
        systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.factory,
            &mut self.spawn_timer,
            &self.playfield,
            now_ms,
        );
        systems::ship_control::run(
            &mut self.world,
            &mut self.factory,
            controls,
            now_ms,
            &mut self.audio_events,
        );

        // 2. Simulation
        systems::movement::run(&mut self.world, dt);
        systems::movement::clamp_to_playfield(&mut self.world, &self.playfield);
        systems::animation::spin(&mut self.world, dt);
        systems::animation::advance_frames(&mut self.world, dt);
        systems::cleanup::run(&mut self.world, &self.playfield, &mut self.despawn_buffer);

        // 3. Collisions
        let hits = systems::collision::run(
            &mut self.world,
            &mut self.factory,
            &mut self.audio_events,
            &mut self.despawn_buffer,
        );
        if hits.meteors_shot > 0 {
            log::trace!("tick {}: {} meteor(s) shot", self.time.tick, hits.meteors_shot);
        }

        self.time.advance(dt);

        let audio_events = std::mem::take(&mut self.audio_events);
        systems::snapshot::build_snapshot(&self.world, &self.time, &self.playfield, audio_events)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current playfield.
    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Meteors destroyed by lasers since the last restart.
    pub fn score(&self) -> u32 {
        self.world
            .query::<&Ship>()
            .iter()
            .next()
            .map_or(0, |(_, ship)| ship.meteors_destroyed)
    }

    /// Read-only world access for inspection.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for test setup.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn a meteor with fixed parameters (for tests needing exact motion).
    #[cfg(test)]
    pub fn spawn_meteor(
        &mut self,
        roll: &systems::spawner::MeteorRoll,
        now_ms: u64,
    ) -> Entity {
        self.factory.spawn_meteor(&mut self.world, roll, now_ms)
    }

    /// Spawn a laser with its bottom edge centred on `mid_bottom`.
    #[cfg(test)]
    pub fn spawn_laser(&mut self, mid_bottom: glam::Vec2) -> Entity {
        self.factory.spawn_laser(&mut self.world, mid_bottom)
    }

    /// Spawn an explosion at `center`.
    #[cfg(test)]
    pub fn spawn_explosion(&mut self, center: glam::Vec2) -> Entity {
        self.factory.spawn_explosion(&mut self.world, center)
    }
}
