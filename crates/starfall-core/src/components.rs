//! ECS components for hecs entities.
//!
//! Components are plain data; game logic lives in the sim crate's systems.
//! Kind markers (`Ship`, `Laser`, `Meteor`, `Explosion`, `Star`) double as
//! the entity groups that collision and cleanup queries are scoped to.

use std::sync::Arc;

use glam::Vec2;

use crate::enums::{DrawLayer, SpriteId};
use crate::mask::Mask;

/// The player's ship. Holds the destroyed-meteor counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ship {
    pub meteors_destroyed: u32,
}

/// Marks a laser bolt fired by the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Laser;

/// A falling meteor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meteor {
    /// Wall-clock time of the spawn (ms).
    pub created_at_ms: u64,
}

/// Marks an explosion effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explosion;

/// Marks a static background star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Star;

/// Linear motion: `position += normalize_or_zero(direction) * speed * dt`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    pub direction: Vec2,
    pub speed: f32,
}

/// Keep the entity's rect inside the playfield after every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampToPlayfield;

/// Size of the entity's axis-aligned bounding rect, centred on its position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub size: Vec2,
}

/// Current collision mask, aligned with `Bounds`.
#[derive(Debug, Clone)]
pub struct Hitbox {
    pub mask: Arc<Mask>,
}

/// Continuous rotation. The hitbox is re-derived from `source` each frame.
#[derive(Debug, Clone)]
pub struct Spin {
    /// Accumulated angle (degrees, counter-clockwise on screen).
    pub angle_deg: f32,
    /// Angular speed (deg/s).
    pub speed_deg: f32,
    /// Unrotated mask.
    pub source: Arc<Mask>,
}

/// Frame-cycling animation that plays once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAnimation {
    /// Fractional frame counter.
    pub frame_index: f32,
    /// Frames advanced per second.
    pub frame_rate: f32,
    pub frame_count: usize,
}

/// Weapon cooldown gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weapon {
    pub cooldown_ms: u64,
    pub last_shot_ms: u64,
    pub ready: bool,
}

/// How the entity is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    pub sprite: SpriteId,
    pub layer: DrawLayer,
    /// Spawn sequence number; orders entities within a layer.
    pub seq: u64,
}

impl Motion {
    pub fn new(direction: Vec2, speed: f32) -> Self {
        Self { direction, speed }
    }

    /// Displacement per second. Zero directions are left as-is.
    pub fn velocity(&self) -> Vec2 {
        self.direction.normalize_or_zero() * self.speed
    }
}

impl FrameAnimation {
    pub fn new(frame_rate: f32, frame_count: usize) -> Self {
        Self {
            frame_index: 0.0,
            frame_rate,
            frame_count,
        }
    }

    /// Frame to display.
    pub fn current_frame(&self) -> usize {
        if self.frame_count == 0 {
            return 0;
        }
        (self.frame_index as usize) % self.frame_count
    }

    /// True once every frame has been shown.
    pub fn finished(&self) -> bool {
        self.frame_index as usize >= self.frame_count
    }
}

impl Weapon {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_shot_ms: 0,
            ready: true,
        }
    }

    /// Flip back to ready once the cooldown has elapsed.
    pub fn poll(&mut self, now_ms: u64) {
        if !self.ready && now_ms.saturating_sub(self.last_shot_ms) >= self.cooldown_ms {
            self.ready = true;
        }
    }

    /// Consume the ready state. Returns whether a shot was allowed.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if !self.ready {
            return false;
        }
        self.ready = false;
        self.last_shot_ms = now_ms;
        true
    }
}
