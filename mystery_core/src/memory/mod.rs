//! Memory module - the tri-layer memory model.
//!
//! - **WorldMemory**: objective ground truth, append-only
//! - **CharacterMemory**: one per NPC, private and possibly wrong
//! - **PlayerMemory**: what the protagonist has found and done
//!
//! The [`MemoryBank`] owns all three and is the only path by which a world
//! event becomes known to anyone.

mod bank;
mod character;
mod player;
mod records;
mod world;

pub use bank::*;
pub use character::CharacterMemory;
pub use player::*;
pub use records::*;
pub use world::*;
