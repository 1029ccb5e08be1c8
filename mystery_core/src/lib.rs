//! # Mystery Core
//!
//! The simulation core of a mystery game. It keeps three separate layers of
//! memory (what actually happened, what each NPC believes, and what the
//! player has found), holds the designed truth of the mystery, and decides
//! what NPCs are willing to say.
//!
//! ## Core Components
//!
//! - **memory**: world, character and player memory behind one [`MemoryBank`]
//! - **narrative**: the [`NarrativeSpine`] with its revelation graph and solution check
//! - **dialogue**: pure topic gating and response selection
//! - **generation**: an optional seam for generated NPC text with an offline fallback
//! - **persist**: versioned JSON save files
//!
//! NPC psychology (trust, pressure, cracking, mood) lives in `mystery_rules`.
//!
//! ## Design Philosophy
//!
//! - **Single writer**: every change to memory goes through the bank, so the
//!   layers cannot drift apart
//! - **Deterministic**: ordered collections throughout; the same state always
//!   saves to the same bytes
//! - **Works offline**: nothing here needs a network or a language model

pub mod dialogue;
pub mod error;
pub mod generation;
pub mod memory;
pub mod narrative;
pub mod persist;

pub use dialogue::*;
pub use error::*;
pub use generation::*;
pub use memory::*;
pub use narrative::*;
pub use persist::*;
