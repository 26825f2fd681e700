//! Core types and definitions for the STARFALL simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, pixel masks, player input, render snapshots,
//! audio events, and constants. It has no dependency on a windowing or
//! audio framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod mask;
pub mod state;
pub mod types;
