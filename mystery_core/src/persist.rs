//! Save and load.
//!
//! Saves are pretty-printed JSON wrapped in a versioned envelope. Every map
//! in the model is ordered, so saving the same state twice produces the same
//! bytes. Writes go to a temporary sibling file which is then renamed over
//! the target, so an interrupted save never leaves a half-written file.

use mystery_rules::{Character, EntityId, MoralShade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::PersistError;
use crate::memory::MemoryBank;
use crate::narrative::NarrativeSpine;

/// Current save file version.
pub const SAVE_VERSION: u32 = 1;

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

#[derive(Serialize)]
struct BankFileRef<'a> {
    version: u32,
    bank: &'a MemoryBank,
}

#[derive(Deserialize)]
struct BankFile {
    bank: MemoryBank,
}

impl MemoryBank {
    /// Write the whole bank to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(&BankFileRef {
            version: SAVE_VERSION,
            bank: self,
        })?;
        write_atomic(path.as_ref(), &content)?;
        info!(
            path = %path.as_ref().display(),
            events = self.world().event_count(),
            "memory bank saved"
        );
        Ok(())
    }

    /// Read a bank written by [`MemoryBank::save`].
    ///
    /// Fails on missing files, malformed JSON, a different save version,
    /// a character memory filed under the wrong id, suspicions outside
    /// 0.0 - 1.0, or a moral shade vector that is incomplete or does not sum
    /// to one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path.as_ref())?;
        check_version(&content)?;

        let file: BankFile = serde_json::from_str(&content)?;
        file.bank.check_consistency()?;

        info!(
            path = %path.as_ref().display(),
            events = file.bank.world().event_count(),
            "memory bank loaded"
        );
        Ok(file.bank)
    }

    fn check_consistency(&self) -> Result<(), PersistError> {
        for (key, memory) in self.characters() {
            if key != memory.character_id() {
                return Err(PersistError::Inconsistent(format!(
                    "memory for {} filed under {}",
                    memory.character_id(),
                    key
                )));
            }
            check_suspicions(key.as_str(), memory.suspicions())?;
        }

        check_suspicions("player", self.player().suspicions())?;
        check_shades(self.player().shade_scores())
    }
}

/// A complete game: memory, the mystery, and every character's psychology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    /// Save format version for compatibility checking.
    pub version: u32,
    pub bank: MemoryBank,
    pub spine: NarrativeSpine,
    pub characters: BTreeMap<EntityId, Character>,
}

impl SaveGame {
    pub fn new(
        bank: MemoryBank,
        spine: NarrativeSpine,
        characters: impl IntoIterator<Item = Character>,
    ) -> Self {
        Self {
            version: SAVE_VERSION,
            bank,
            spine,
            characters: characters
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
        }
    }

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    pub fn character_mut(&mut self, id: &str) -> Option<&mut Character> {
        self.characters.get_mut(id)
    }

    /// Write the game to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(path.as_ref(), &content)?;
        info!(
            path = %path.as_ref().display(),
            characters = self.characters.len(),
            progress = self.spine.progress(),
            "game saved"
        );
        Ok(())
    }

    /// Read a game written by [`SaveGame::save`], checking that its parts
    /// agree with each other.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path.as_ref())?;
        check_version(&content)?;

        let game: Self = serde_json::from_str(&content)?;
        game.bank.check_consistency()?;
        game.spine
            .validate()
            .map_err(|e| PersistError::Inconsistent(e.to_string()))?;

        for (key, character) in &game.characters {
            if *key != character.id {
                return Err(PersistError::Inconsistent(format!(
                    "character {} filed under {}",
                    character.id, key
                )));
            }
            if !game.bank.is_registered(key.as_str()) {
                return Err(PersistError::Inconsistent(format!(
                    "character {} has no memory",
                    key
                )));
            }
            if let Some(violation) = character.invariant_violation() {
                return Err(PersistError::Inconsistent(format!(
                    "character {}: {}",
                    key, violation
                )));
            }
        }

        info!(
            path = %path.as_ref().display(),
            characters = game.characters.len(),
            "game loaded"
        );
        Ok(game)
    }
}

fn check_suspicions(
    owner: &str,
    suspicions: &BTreeMap<EntityId, f64>,
) -> Result<(), PersistError> {
    match suspicions.iter().find(|(_, s)| !(0.0..=1.0).contains(*s)) {
        Some((target, value)) => Err(PersistError::Inconsistent(format!(
            "{} suspects {} at {}",
            owner, target, value
        ))),
        None => Ok(()),
    }
}

fn check_shades(scores: &BTreeMap<MoralShade, f64>) -> Result<(), PersistError> {
    if let Some(missing) = MoralShade::ALL.iter().find(|s| !scores.contains_key(*s)) {
        return Err(PersistError::Inconsistent(format!(
            "moral shade {:?} missing",
            missing
        )));
    }
    if scores.values().any(|s| !(s.is_finite() && *s >= 0.0)) {
        return Err(PersistError::Inconsistent(
            "moral shade scores out of range".to_string(),
        ));
    }

    let total: f64 = scores.values().sum();
    if (total - 1.0).abs() > 1e-6 {
        return Err(PersistError::Inconsistent(format!(
            "moral shade scores sum to {}",
            total
        )));
    }
    Ok(())
}

fn check_version(content: &str) -> Result<(), PersistError> {
    let header: VersionHeader = serde_json::from_str(content)?;
    if header.version != SAVE_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: SAVE_VERSION,
            found: header.version,
        });
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "save".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_atomic(path: &Path, content: &str) -> Result<(), PersistError> {
    let temp = temp_path(path);
    debug!(temp = %temp.display(), "writing save");

    if let Err(e) = fs::write(&temp, content).and_then(|_| fs::rename(&temp, path)) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }
    Ok(())
}
