//! Cleanup system: removes entities that left the playfield or expired.

use hecs::{Entity, World};

use starfall_core::components::{Bounds, Explosion, FrameAnimation, Laser, Meteor};
use starfall_core::types::{Playfield, Position, Rect};

/// Despawn meteors below the bottom edge, lasers above the top edge, and
/// explosions that have shown their last frame.
/// Uses a pre-allocated buffer to avoid per-frame allocation.
pub fn run(world: &mut World, playfield: &Playfield, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (pos, bounds, _meteor)) in world.query_mut::<(&Position, &Bounds, &Meteor)>() {
        if Rect::from_center(pos.0, bounds.size).top() >= playfield.height {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (pos, bounds, _laser)) in world.query_mut::<(&Position, &Bounds, &Laser)>() {
        if Rect::from_center(pos.0, bounds.size).bottom() <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (anim, _explosion)) in world.query_mut::<(&FrameAnimation, &Explosion)>() {
        if anim.finished() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
