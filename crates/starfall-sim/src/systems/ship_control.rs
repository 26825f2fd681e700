//! Ship input handling: steering, cooldown polling, and firing.

use hecs::World;

use starfall_core::commands::ControlState;
use starfall_core::components::{Bounds, Motion, Ship, Weapon};
use starfall_core::events::AudioEvent;
use starfall_core::types::{Position, Rect};

use crate::world_setup::EntityFactory;

/// Apply this frame's controls to every ship.
///
/// The cooldown is polled before the fire check, so a shot is allowed on
/// the first frame the cooldown has elapsed. Lasers spawn at the ship's
/// top centre and move starting this frame.
pub fn run(
    world: &mut World,
    factory: &mut EntityFactory,
    controls: &ControlState,
    now_ms: u64,
    audio_events: &mut Vec<AudioEvent>,
) {
    let mut muzzles = Vec::new();

    for (_entity, (_ship, pos, bounds, motion, weapon)) in
        world.query_mut::<(&Ship, &Position, &Bounds, &mut Motion, &mut Weapon)>()
    {
        weapon.poll(now_ms);
        motion.direction = controls.direction();

        if controls.shoot_pressed && weapon.try_fire(now_ms) {
            muzzles.push(Rect::from_center(pos.0, bounds.size).mid_top());
        }
    }

    for muzzle in muzzles {
        factory.spawn_laser(world, muzzle);
        audio_events.push(AudioEvent::LaserFired);
    }
}
