//! Frame snapshot: everything the renderer and audio need after a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::{DrawLayer, SpriteId};
use crate::events::AudioEvent;
use crate::types::{Playfield, SimTime};

/// Complete visible state produced by each simulation tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub playfield: Playfield,
    /// Live sprites, back to front.
    pub sprites: Vec<SpriteView>,
    /// Meteors destroyed by lasers on this screen.
    pub score: u32,
    /// Cues raised since the previous snapshot.
    pub audio_events: Vec<AudioEvent>,
}

/// One drawable entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub sprite: SpriteId,
    pub layer: DrawLayer,
    /// Centre in playfield space.
    pub center: Vec2,
    /// Counter-clockwise rotation in degrees.
    pub rotation_deg: f32,
    /// Animation frame (0 for static sprites).
    pub frame: usize,
}

impl FrameSnapshot {
    /// Number of live sprites of the given kind.
    pub fn count(&self, sprite: SpriteId) -> usize {
        self.sprites.iter().filter(|s| s.sprite == sprite).count()
    }
}
