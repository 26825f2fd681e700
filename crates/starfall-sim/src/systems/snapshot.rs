//! Snapshot system: queries the ECS world and builds a `FrameSnapshot`.
//!
//! Read-only: the world is never modified here.

use hecs::World;

use starfall_core::components::{FrameAnimation, Renderable, Ship, Spin};
use starfall_core::events::AudioEvent;
use starfall_core::state::{FrameSnapshot, SpriteView};
use starfall_core::types::{Playfield, Position, SimTime};

/// Build a complete FrameSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    playfield: &Playfield,
    audio_events: Vec<AudioEvent>,
) -> FrameSnapshot {
    FrameSnapshot {
        time: *time,
        playfield: *playfield,
        sprites: build_sprites(world),
        score: find_score(world),
        audio_events,
    }
}

/// All renderable entities, ordered by layer then spawn order.
fn build_sprites(world: &World) -> Vec<SpriteView> {
    let mut drawn: Vec<(u64, SpriteView)> = world
        .query::<(
            &Position,
            &Renderable,
            Option<&Spin>,
            Option<&FrameAnimation>,
        )>()
        .iter()
        .map(|(_, (pos, renderable, spin, anim))| {
            (
                renderable.seq,
                SpriteView {
                    sprite: renderable.sprite,
                    layer: renderable.layer,
                    center: pos.0,
                    rotation_deg: spin.map_or(0.0, |s| s.angle_deg),
                    frame: anim.map_or(0, |a| a.current_frame()),
                },
            )
        })
        .collect();

    drawn.sort_by_key(|(seq, view)| (view.layer, *seq));
    drawn.into_iter().map(|(_, view)| view).collect()
}

fn find_score(world: &World) -> u32 {
    world
        .query::<&Ship>()
        .iter()
        .next()
        .map_or(0, |(_, ship)| ship.meteors_destroyed)
}
