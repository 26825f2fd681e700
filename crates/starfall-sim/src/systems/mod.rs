//! ECS systems that operate on the simulation world each frame.
//!
//! Systems are free functions over `&mut World` plus the specific
//! collaborators they need. They do not own state; all state lives in
//! components or in the engine.

pub mod animation;
pub mod cleanup;
pub mod collision;
pub mod movement;
pub mod ship_control;
pub mod snapshot;
pub mod spawner;
