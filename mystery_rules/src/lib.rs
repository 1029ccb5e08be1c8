//! # Mystery Rules
//!
//! The rules vocabulary for the mystery simulation: identifiers, the game
//! clock, closed enumerations, the archetype table and the NPC psychology
//! state machine. This crate holds no memory or narrative logic.

pub mod clock;
pub mod config;
pub mod entities;
pub mod mechanics;

pub use clock::*;
pub use config::*;
pub use entities::*;
pub use mechanics::*;
