//! Text generation seam.
//!
//! NPC dialogue and behavior text can come from any [`TextGenerator`], for
//! example a language model behind a network call. The core never depends on
//! one being present: [`NarrativeDirector`] falls back to the deterministic
//! [`OfflineGenerator`] whenever the configured generator is missing, fails,
//! or returns something unusable.

mod context;
mod director;
mod offline;

pub use context::*;
pub use director::*;
pub use offline::*;

use mystery_rules::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

/// A source of free-form NPC text.
pub trait TextGenerator: Send + Sync {
    /// A line of dialogue.
    fn generate_dialogue(&self, request: &DialogueRequest) -> Result<String, GeneratorError>;

    /// A behavior decision, as JSON text matching [`BehaviorResult`].
    fn generate_behavior(&self, request: &BehaviorRequest) -> Result<String, GeneratorError>;
}

/// Ask a character to say something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRequest {
    pub context: PromptContext,
    pub player_line: String,
    pub topic: Option<EntityId>,
}

impl DialogueRequest {
    pub fn new(context: PromptContext, player_line: impl Into<String>) -> Self {
        Self {
            context,
            player_line: player_line.into(),
            topic: None,
        }
    }

    pub fn about(mut self, topic: impl Into<EntityId>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Full prompt text for a language model.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = self.context.to_prompt_string();
        if let Some(topic) = &self.topic {
            prompt.push_str(&format!("## Topic\n{}\n\n", topic));
        }
        prompt.push_str(&format!("## The Detective Says\n\"{}\"\n", self.player_line));
        prompt
    }
}

/// Ask a character what they do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorRequest {
    pub context: PromptContext,
    pub situation: String,
    pub target: Option<String>,
}

impl BehaviorRequest {
    pub fn new(context: PromptContext, situation: impl Into<String>) -> Self {
        Self {
            context,
            situation: situation.into(),
            target: None,
        }
    }

    pub fn toward(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn to_prompt_string(&self) -> String {
        let mut prompt = self.context.to_prompt_string();
        prompt.push_str(&format!("## Situation\n{}\n\n", self.situation));
        prompt.push_str(
            "Respond with JSON: {\"action\": string, \"intensity\": 0.0-1.0, \
             \"target\": string or null, \"narrative\": string}\n",
        );
        prompt
    }
}

/// A parsed behavior decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorResult {
    pub action: String,

    /// How strongly the action is carried out, in `[0, 1]`.
    pub intensity: f64,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub narrative: String,
}

impl BehaviorResult {
    /// Parse generator output, tolerating prose around the JSON object.
    pub fn parse(raw: &str) -> Result<Self, GeneratorError> {
        let trimmed = raw.trim();
        let mut result: BehaviorResult = match serde_json::from_str(trimmed) {
            Ok(result) => result,
            Err(_) => {
                let start = trimmed.find('{');
                let end = trimmed.rfind('}');
                match (start, end) {
                    (Some(start), Some(end)) if start < end => {
                        serde_json::from_str(&trimmed[start..=end])
                            .map_err(|e| GeneratorError::Failed(e.to_string()))?
                    }
                    _ => {
                        return Err(GeneratorError::Failed(
                            "no JSON object in behavior output".to_string(),
                        ))
                    }
                }
            }
        };

        if result.action.trim().is_empty() {
            return Err(GeneratorError::Failed("behavior has no action".to_string()));
        }
        result.intensity = if result.intensity.is_finite() {
            result.intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(result)
    }
}
