//! Events emitted by the simulation for audio feedback.

use serde::{Deserialize, Serialize};

/// One-shot audio cues. The front-end decides how each one sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// The ship fired a laser.
    LaserFired,
    /// A laser destroyed a meteor.
    MeteorExploded,
    /// A meteor struck the ship.
    ShipDamaged,
    /// A screen (re)started; background music should loop from the top.
    MusicStarted,
}
