//! Offline generator - canned, deterministic text.

use mystery_rules::{Archetype, Mood};

use super::{BehaviorRequest, BehaviorResult, DialogueRequest, TextGenerator};
use crate::error::GeneratorError;

/// Produces text from mood and archetype alone. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl OfflineGenerator {
    pub fn new() -> Self {
        Self
    }

    /// The line a character in this state would say.
    pub fn dialogue_line(&self, request: &DialogueRequest) -> String {
        let character = &request.context.character;
        if !character.is_alive {
            return String::new();
        }

        let line = match character.mood {
            Mood::Scared => "Please... I'll tell you everything. Just stop.",
            Mood::Angry => "Get out of my sight before I do something we both regret.",
            Mood::Hostile => "I have nothing to say to you.",
            Mood::Nervous => "I... I don't know what you mean. Why do you keep asking?",
            Mood::Friendly => "Of course, detective. Ask me anything.",
            Mood::Calm => match character.archetype {
                Archetype::Guilty | Archetype::Accomplice => {
                    "I was where I always am. Ask the others."
                }
                Archetype::TrueBeliever => "Everything that happened here was meant to happen.",
                Archetype::Survivor => "I keep my head down. That's how I've lasted.",
                Archetype::Innocent => "I'll help however I can.",
            },
        };

        match &request.topic {
            Some(topic) => format!("{} ({} says, about {})", line, character.name, topic),
            None => format!("{} ({} says)", line, character.name),
        }
    }

    /// What a character in this state would do.
    pub fn behavior(&self, request: &BehaviorRequest) -> BehaviorResult {
        let character = &request.context.character;
        let name = &character.name;

        let (action, intensity, narrative) = if !character.is_alive {
            ("none", 0.0, format!("{} lies still.", name))
        } else {
            match character.mood {
                Mood::Scared => ("confess", 0.9, format!("{} is trembling, close to tears.", name)),
                Mood::Angry => ("confront", 0.8, format!("{} squares up, fists clenched.", name)),
                Mood::Hostile => ("avoid", 0.6, format!("{} turns away pointedly.", name)),
                Mood::Nervous => match character.archetype {
                    Archetype::Guilty | Archetype::Accomplice => (
                        "hide_evidence",
                        0.7,
                        format!("{} glances toward the door, then away.", name),
                    ),
                    _ => ("fidget", 0.5, format!("{} fidgets with a sleeve.", name)),
                },
                Mood::Friendly => ("assist", 0.4, format!("{} offers a tired smile.", name)),
                Mood::Calm => ("wait", 0.2, format!("{} goes about their business.", name)),
            }
        };

        BehaviorResult {
            action: action.to_string(),
            intensity,
            target: request.target.clone(),
            narrative,
        }
    }
}

impl TextGenerator for OfflineGenerator {
    fn generate_dialogue(&self, request: &DialogueRequest) -> Result<String, GeneratorError> {
        Ok(self.dialogue_line(request))
    }

    fn generate_behavior(&self, request: &BehaviorRequest) -> Result<String, GeneratorError> {
        serde_json::to_string(&self.behavior(request))
            .map_err(|e| GeneratorError::Failed(e.to_string()))
    }
}
