//! Rotation and frame-cycling systems.

use std::sync::Arc;

use hecs::World;

use starfall_core::components::{Bounds, FrameAnimation, Hitbox, Spin};

/// Accumulate spin and re-derive each spinning entity's hitbox from its
/// unrotated source. Bounds follow the rotated mask; the centre is kept.
pub fn spin(world: &mut World, dt: f32) {
    for (_entity, (spin, hitbox, bounds)) in
        world.query_mut::<(&mut Spin, &mut Hitbox, &mut Bounds)>()
    {
        spin.angle_deg = (spin.angle_deg + spin.speed_deg * dt).rem_euclid(360.0);
        let rotated = spin.source.rotated(spin.angle_deg);
        bounds.size = rotated.size();
        hitbox.mask = Arc::new(rotated);
    }
}

/// Advance every frame animation.
pub fn advance_frames(world: &mut World, dt: f32) {
    for (_entity, anim) in world.query_mut::<&mut FrameAnimation>() {
        anim.frame_index += anim.frame_rate * dt;
    }
}
