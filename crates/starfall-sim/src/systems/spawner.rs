//! Meteor spawning on a fixed wall-clock cadence.
//!
//! The cadence is independent of the simulation's delta time: a virtual
//! scheduled event is checked once per tick against the frame clock's
//! millisecond reading.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;

use starfall_core::constants::*;
use starfall_core::types::Playfield;

use crate::world_setup::EntityFactory;

/// Repeating wall-clock timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTimer {
    pub interval_ms: u64,
    pub last_fire_ms: u64,
}

/// Randomized parameters for one meteor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorRoll {
    /// Spawn x (centre of the meteor's bottom edge).
    pub x: f32,
    /// Unit direction, biased downward.
    pub direction: Vec2,
    pub speed: f32,
    /// Signed spin (deg/s).
    pub spin_deg: f32,
}

impl SpawnTimer {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: now_ms,
        }
    }

    /// Start a fresh interval at `now_ms`.
    pub fn restart(&mut self, now_ms: u64) {
        self.last_fire_ms = now_ms;
    }

    /// Returns true at most once per elapsed interval.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_fire_ms) >= self.interval_ms {
            self.last_fire_ms = now_ms;
            true
        } else {
            false
        }
    }
}

impl Default for SpawnTimer {
    fn default() -> Self {
        Self::new(METEOR_SPAWN_INTERVAL_MS, 0)
    }
}

/// Draw the random parameters for a meteor.
pub fn roll_meteor(rng: &mut impl Rng, playfield: &Playfield) -> MeteorRoll {
    let x = rng.gen_range(0..=playfield.width as u32) as f32;
    let direction = Vec2::new(rng.gen_range(-METEOR_DRIFT..=METEOR_DRIFT), 1.0).normalize();
    let speed = rng.gen_range(METEOR_SPEED_MIN..=METEOR_SPEED_MAX) as f32;
    let spin = rng.gen_range(METEOR_SPIN_MIN..=METEOR_SPIN_MAX) as f32;
    let spin_deg = if rng.gen_bool(0.5) { spin } else { -spin };

    MeteorRoll {
        x,
        direction,
        speed,
        spin_deg,
    }
}

/// Spawn a meteor if the timer is due.
pub fn run(
    world: &mut World,
    rng: &mut impl Rng,
    factory: &mut EntityFactory,
    timer: &mut SpawnTimer,
    playfield: &Playfield,
    now_ms: u64,
) -> Option<Entity> {
    if !timer.poll(now_ms) {
        return None;
    }
    let roll = roll_meteor(rng, playfield);
    log::trace!(
        "meteor at x={:.0} speed={:.0} spin={:.0}",
        roll.x,
        roll.speed,
        roll.spin_deg
    );
    Some(factory.spawn_meteor(world, &roll, now_ms))
}
