//! Player input delivered to the simulation and loop-level requests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::Resolution;

/// Control state sampled once per frame.
///
/// Directions reflect keys currently held; `shoot_pressed` is true only on
/// the frame the shoot key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot_pressed: bool,
}

impl ControlState {
    /// Raw (unnormalized) movement direction from the held keys.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(
            f32::from(u8::from(self.right)) - f32::from(u8::from(self.left)),
            f32::from(u8::from(self.down)) - f32::from(u8::from(self.up)),
        )
    }
}

/// Requests handled by the game loop rather than the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Close the game.
    Quit,
    /// Switch window resolution; the screen is rebuilt at the end of the frame.
    ChangeResolution { resolution: Resolution },
}
