//! Collision resolution between entity groups.
//!
//! Both tests are pixel-mask tests with a bounding-rect early out:
//! - lasers vs meteors (many-to-many): both die, an explosion spawns at the
//!   laser's tip, and the ship's counter goes up by one per pair;
//! - ship vs meteors: the meteor dies and a damage cue plays. The ship is
//!   never destroyed.

use std::sync::Arc;

use hecs::{Component, Entity, World};

use starfall_core::components::{Bounds, Hitbox, Laser, Meteor, Ship};
use starfall_core::events::AudioEvent;
use starfall_core::mask::Mask;
use starfall_core::types::{Position, Rect};

use crate::world_setup::EntityFactory;

/// Counts of what was resolved this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Laser/meteor pairs destroyed.
    pub meteors_shot: u32,
    /// Meteors that struck the ship.
    pub meteors_rammed: u32,
}

/// Collision view of one entity, gathered before any mutation.
struct Body {
    entity: Entity,
    rect: Rect,
    mask: Arc<Mask>,
}

fn gather<T: Component>(world: &World) -> Vec<Body> {
    world
        .query::<(&T, &Position, &Bounds, &Hitbox)>()
        .iter()
        .map(|(entity, (_kind, pos, bounds, hitbox))| Body {
            entity,
            rect: Rect::from_center(pos.0, bounds.size),
            mask: hitbox.mask.clone(),
        })
        .collect()
}

fn touching(a: &Body, b: &Body) -> bool {
    if !a.rect.intersects(&b.rect) {
        return false;
    }
    let offset = (b.rect.min - a.rect.min).round().as_ivec2();
    a.mask.overlaps(&b.mask, offset)
}

/// Resolve all collisions for this frame.
pub fn run(
    world: &mut World,
    factory: &mut EntityFactory,
    audio_events: &mut Vec<AudioEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> CollisionResult {
    despawn_buffer.clear();

    let lasers = gather::<Laser>(world);
    let meteors = gather::<Meteor>(world);
    let ships = gather::<Ship>(world);
    let mut consumed = vec![false; meteors.len()];
    let mut blasts = Vec::new();

    // A laser is spent on its first hit, a meteor can only be hit once.
    for laser in &lasers {
        let hit = meteors
            .iter()
            .enumerate()
            .find(|(idx, meteor)| !consumed[*idx] && touching(laser, meteor))
            .map(|(idx, _)| idx);

        if let Some(idx) = hit {
            consumed[idx] = true;
            despawn_buffer.push(laser.entity);
            despawn_buffer.push(meteors[idx].entity);
            blasts.push(laser.rect.mid_top());
        }
    }

    let mut rammed = 0;
    for ship in &ships {
        for (idx, meteor) in meteors.iter().enumerate() {
            if !consumed[idx] && touching(ship, meteor) {
                consumed[idx] = true;
                despawn_buffer.push(meteor.entity);
                rammed += 1;
            }
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    for &center in &blasts {
        factory.spawn_explosion(world, center);
        audio_events.push(AudioEvent::MeteorExploded);
    }

    let shot = blasts.len() as u32;
    if shot > 0 {
        for (_entity, ship) in world.query_mut::<&mut Ship>() {
            ship.meteors_destroyed += shot;
        }
    }

    if rammed > 0 {
        log::debug!("ship struck by {} meteor(s)", rammed);
        audio_events.push(AudioEvent::ShipDamaged);
    }

    CollisionResult {
        meteors_shot: shot,
        meteors_rammed: rammed,
    }
}
