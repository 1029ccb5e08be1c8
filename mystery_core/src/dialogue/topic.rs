//! Dialogue topics and the responses an NPC can give.

use mystery_rules::EntityId;
use serde::{Deserialize, Serialize};

/// One possible answer to a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TopicResponse {
    pub text: String,

    /// Information the player learns from this answer.
    pub reveals: Option<String>,

    /// Whether `reveals` is actually true.
    #[serde(default = "default_true")]
    pub is_true: bool,

    /// Revelation in the narrative spine this answer unlocks.
    pub revelation: Option<EntityId>,

    #[serde(default)]
    pub trust_change: i32,

    #[serde(default)]
    pub pressure: f64,
}

fn default_true() -> bool {
    true
}

impl TopicResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_true: true,
            ..Self::default()
        }
    }

    /// Tell the player something. Pass `false` for a lie.
    pub fn revealing(mut self, information: impl Into<String>, is_true: bool) -> Self {
        self.reveals = Some(information.into());
        self.is_true = is_true;
        self
    }

    pub fn unlocking(mut self, revelation: impl Into<EntityId>) -> Self {
        self.revelation = Some(revelation.into());
        self
    }

    pub fn with_trust_change(mut self, delta: i32) -> Self {
        self.trust_change = delta;
        self
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }
}

/// Something the player can ask an NPC about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTopic {
    pub id: EntityId,
    pub label: String,

    /// Minimum trust before the NPC will discuss this. Ignored once cracked.
    pub min_trust: Option<i32>,

    /// Discoveries the player must have made before the topic appears.
    #[serde(default)]
    pub required_discoveries: Vec<EntityId>,

    /// Only offered after the NPC has cracked.
    #[serde(default)]
    pub requires_cracked: bool,

    /// Can be raised again after it has been exhausted.
    #[serde(default)]
    pub repeatable: bool,

    /// Answer when the NPC is willing to talk.
    pub cooperative: TopicResponse,

    /// Answer when the NPC is stonewalling.
    pub guarded: TopicResponse,

    /// Answer once the NPC has cracked, if different.
    pub confession: Option<TopicResponse>,
}

impl DialogueTopic {
    pub fn new(
        id: impl Into<EntityId>,
        label: impl Into<String>,
        cooperative: TopicResponse,
        guarded: TopicResponse,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min_trust: None,
            required_discoveries: Vec::new(),
            requires_cracked: false,
            repeatable: false,
            cooperative,
            guarded,
            confession: None,
        }
    }

    pub fn with_min_trust(mut self, trust: i32) -> Self {
        self.min_trust = Some(trust);
        self
    }

    pub fn requiring_discovery(mut self, fact_id: impl Into<EntityId>) -> Self {
        self.required_discoveries.push(fact_id.into());
        self
    }

    pub fn only_when_cracked(mut self) -> Self {
        self.requires_cracked = true;
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn with_confession(mut self, confession: TopicResponse) -> Self {
        self.confession = Some(confession);
        self
    }
}
