//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Opaque reference to the image an entity is drawn with.
/// The renderer maps each variant to a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Ship,
    Laser,
    Meteor,
    Star,
    Explosion,
}

/// Draw layer, back to front. Within a layer, older entities draw first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DrawLayer {
    #[default]
    Backdrop,
    Hazard,
    Projectile,
    Player,
    Effect,
}

impl SpriteId {
    /// Layer an entity using this sprite is drawn on.
    pub fn layer(self) -> DrawLayer {
        match self {
            SpriteId::Star => DrawLayer::Backdrop,
            SpriteId::Meteor => DrawLayer::Hazard,
            SpriteId::Laser => DrawLayer::Projectile,
            SpriteId::Ship => DrawLayer::Player,
            SpriteId::Explosion => DrawLayer::Effect,
        }
    }
}
