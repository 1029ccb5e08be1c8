//! Prompt context - a read-only snapshot of what one character knows.

use mystery_rules::{Character, CharacterSnapshot, MotivationType, WorldTime};
use serde::{Deserialize, Serialize};

use crate::error::MemoryError;
use crate::memory::MemoryBank;

/// Everything a text generator may draw on when voicing one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    pub time: WorldTime,
    pub character: CharacterSnapshot,

    /// The character's strongest drive, lowercase.
    pub dominant_motivation: String,

    pub beliefs: Vec<String>,
    pub suspicions: Vec<(String, f64)>,

    /// Things the player has already learned.
    pub known_discoveries: Vec<String>,

    /// Most recent exchanges with the player, oldest first.
    pub recent_interactions: Vec<String>,
}

impl PromptContext {
    /// Snapshot `character` and their memory from `bank`.
    ///
    /// Keeps at most `recent` player interactions.
    pub fn assemble(
        bank: &MemoryBank,
        character: &Character,
        recent: usize,
    ) -> Result<Self, MemoryError> {
        let memory = bank.character_memory(character.id.as_str())?;

        let dominant_motivation = match character.motivations.dominant() {
            MotivationType::Fear => "fear",
            MotivationType::Guilt => "guilt",
            MotivationType::Pride => "pride",
            MotivationType::Loyalty => "loyalty",
            MotivationType::Greed => "greed",
        };

        Ok(Self {
            time: bank.world_time(),
            character: character.snapshot(),
            dominant_motivation: dominant_motivation.to_string(),
            beliefs: memory
                .beliefs()
                .iter()
                .map(|b| format!("{} ({:?})", b.content, b.confidence))
                .collect(),
            suspicions: memory
                .suspicions()
                .iter()
                .map(|(target, level)| (target.to_string(), *level))
                .collect(),
            known_discoveries: bank
                .player()
                .discoveries()
                .iter()
                .map(|d| d.description.clone())
                .collect(),
            recent_interactions: memory
                .get_recent_interactions(recent)
                .iter()
                .map(|i| format!("[{}] {}: {}", i.timestamp, i.interaction_type, i.description))
                .collect(),
        })
    }

    /// Render as markdown-ish prompt text.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("## Character\n");
        prompt.push_str(&format!(
            "{} ({:?}), mood {:?}, trust {}{}\n",
            self.character.name,
            self.character.archetype,
            self.character.mood,
            self.character.trust,
            if self.character.is_cracked {
                ", has cracked under pressure"
            } else {
                ""
            }
        ));
        prompt.push_str(&format!("Driven mostly by {}.\n", self.dominant_motivation));
        if let Some(location) = &self.character.location {
            prompt.push_str(&format!("Currently at {}.\n", location));
        }
        prompt.push('\n');

        prompt.push_str("## Time\n");
        prompt.push_str(&format!(
            "{}, {}\n\n",
            self.time,
            if self.time.is_night() { "Night" } else { "Day" }
        ));

        if !self.beliefs.is_empty() {
            prompt.push_str("## Beliefs\n");
            for belief in &self.beliefs {
                prompt.push_str(&format!("- {}\n", belief));
            }
            prompt.push('\n');
        }

        if !self.suspicions.is_empty() {
            prompt.push_str("## Suspicions\n");
            for (target, level) in &self.suspicions {
                prompt.push_str(&format!("- {}: {:.0}%\n", target, level * 100.0));
            }
            prompt.push('\n');
        }

        if !self.known_discoveries.is_empty() {
            prompt.push_str("## What the Detective Knows\n");
            for discovery in &self.known_discoveries {
                prompt.push_str(&format!("- {}\n", discovery));
            }
            prompt.push('\n');
        }

        if !self.recent_interactions.is_empty() {
            prompt.push_str("## Recent Conversation\n");
            for line in &self.recent_interactions {
                prompt.push_str(&format!("- {}\n", line));
            }
            prompt.push('\n');
        }

        prompt
    }
}
