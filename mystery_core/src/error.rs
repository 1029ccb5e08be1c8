//! Error types for the mystery core.

use mystery_rules::EntityId;
use thiserror::Error;

/// Structural misuse of the memory layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("Time can only move forward, got {0} minutes")]
    InvalidDuration(i64),

    #[error("Character already registered: {0}")]
    DuplicateCharacter(EntityId),

    #[error("Unknown character: {0}")]
    UnknownCharacter(EntityId),
}

/// Errors from save/load operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Inconsistent save: {0}")]
    Inconsistent(String),
}

/// Authoring errors in a narrative spine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpineError {
    #[error("Revelation defined twice: {0}")]
    DuplicateRevelation(EntityId),

    #[error("Revelation {revelation} requires unknown revelation {prerequisite}")]
    UnknownPrerequisite {
        revelation: EntityId,
        prerequisite: EntityId,
    },

    #[error("Evidence chain references unknown revelation {0}")]
    UnknownEvidence(EntityId),

    #[error("Revealed fact is not a revelation: {0}")]
    UnknownRevealed(EntityId),

    #[error("Revelation {0} has an importance outside 0.0 - 1.0")]
    InvalidImportance(EntityId),
}

/// Failures of the optional text generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("Text generator unavailable")]
    Unavailable,

    #[error("Text generation failed: {0}")]
    Failed(String),
}
