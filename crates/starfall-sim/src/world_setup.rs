//! Entity spawn factories.
//!
//! Every entity the simulation creates goes through `EntityFactory`, which
//! attaches the component bundle for its kind and stamps a spawn sequence
//! number used for draw ordering.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfall_core::components::*;
use starfall_core::constants::*;
use starfall_core::enums::SpriteId;
use starfall_core::mask::SpriteShapes;
use starfall_core::types::{Playfield, Position};

use crate::systems::spawner::MeteorRoll;

/// Builds entities with the shapes loaded for this run.
pub struct EntityFactory {
    shapes: SpriteShapes,
    next_seq: u64,
}

impl EntityFactory {
    pub fn new(shapes: SpriteShapes) -> Self {
        Self { shapes, next_seq: 0 }
    }

    fn renderable(&mut self, sprite: SpriteId) -> Renderable {
        let seq = self.next_seq;
        self.next_seq += 1;
        Renderable {
            sprite,
            layer: sprite.layer(),
            seq,
        }
    }

    /// Spawn the player's ship at the centre of the playfield.
    pub fn spawn_ship(&mut self, world: &mut World, playfield: &Playfield) -> Entity {
        let mask = self.shapes.ship.clone();
        let renderable = self.renderable(SpriteId::Ship);
        world.spawn((
            Ship::default(),
            Position(playfield.center()),
            Motion::new(Vec2::ZERO, SHIP_SPEED),
            Weapon::new(SHOOT_COOLDOWN_MS),
            ClampToPlayfield,
            Bounds { size: mask.size() },
            Hitbox { mask },
            renderable,
        ))
    }

    /// Spawn a static star centred on `center`.
    pub fn spawn_star(&mut self, world: &mut World, center: Vec2) -> Entity {
        let size = self.shapes.star_size;
        let renderable = self.renderable(SpriteId::Star);
        world.spawn((Star, Position(center), Bounds { size }, renderable))
    }

    /// Spawn a laser whose bottom edge is centred on `mid_bottom`.
    pub fn spawn_laser(&mut self, world: &mut World, mid_bottom: Vec2) -> Entity {
        let mask = self.shapes.laser.clone();
        let size = mask.size();
        let renderable = self.renderable(SpriteId::Laser);
        world.spawn((
            Laser,
            Position(mid_bottom - Vec2::new(0.0, size.y * 0.5)),
            Motion::new(Vec2::NEG_Y, LASER_SPEED),
            Bounds { size },
            Hitbox { mask },
            renderable,
        ))
    }

    /// Spawn a meteor just above the top edge, as described by `roll`.
    pub fn spawn_meteor(&mut self, world: &mut World, roll: &MeteorRoll, now_ms: u64) -> Entity {
        let mask = self.shapes.meteor.clone();
        let size = mask.size();
        let renderable = self.renderable(SpriteId::Meteor);
        world.spawn((
            Meteor {
                created_at_ms: now_ms,
            },
            Position(Vec2::new(roll.x, -size.y * 0.5)),
            Motion::new(roll.direction, roll.speed),
            Spin {
                angle_deg: 0.0,
                speed_deg: roll.spin_deg,
                source: mask.clone(),
            },
            Bounds { size },
            Hitbox { mask },
            renderable,
        ))
    }

    /// Spawn a one-shot explosion centred on `center`.
    pub fn spawn_explosion(&mut self, world: &mut World, center: Vec2) -> Entity {
        let size = self.shapes.explosion_frame_size;
        let frame_count = self.shapes.explosion_frame_count;
        let renderable = self.renderable(SpriteId::Explosion);
        world.spawn((
            Explosion,
            Position(center),
            FrameAnimation::new(EXPLOSION_FRAME_RATE, frame_count),
            Bounds { size },
            renderable,
        ))
    }
}

/// Populate a fresh screen: the star field, then the ship.
pub fn setup_screen(
    world: &mut World,
    factory: &mut EntityFactory,
    rng: &mut ChaCha8Rng,
    playfield: &Playfield,
) -> Entity {
    for _ in 0..STAR_COUNT {
        let center = Vec2::new(
            rng.gen_range(0..=playfield.width as u32) as f32,
            rng.gen_range(0..=playfield.height as u32) as f32,
        );
        factory.spawn_star(world, center);
    }
    factory.spawn_ship(world, playfield)
}
