//! Kinematic integration system.
//!
//! Updates Position from Motion each frame: position += velocity * dt.

use hecs::World;

use starfall_core::components::{Bounds, ClampToPlayfield, Motion};
use starfall_core::types::{Playfield, Position, Rect};

/// Run kinematic integration for all entities with Position + Motion.
pub fn run(world: &mut World, dt: f32) {
    for (_entity, (pos, motion)) in world.query_mut::<(&mut Position, &Motion)>() {
        pos.0 += motion.velocity() * dt;
    }
}

/// Push clamped entities back inside the playfield, one edge at a time.
pub fn clamp_to_playfield(world: &mut World, playfield: &Playfield) {
    for (_entity, (pos, bounds, _clamp)) in
        world.query_mut::<(&mut Position, &Bounds, &ClampToPlayfield)>()
    {
        let mut rect = Rect::from_center(pos.0, bounds.size);
        if rect.top() <= 0.0 {
            rect.min.y = 0.0;
        }
        if rect.bottom() >= playfield.height {
            rect.min.y = playfield.height - rect.size.y;
        }
        if rect.left() <= 0.0 {
            rect.min.x = 0.0;
        }
        if rect.right() >= playfield.width {
            rect.min.x = playfield.width - rect.size.x;
        }
        pos.0 = rect.center();
    }
}
