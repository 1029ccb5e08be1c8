//! NPC psychology: trust, pressure, mood and cracking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::{EntityId, Motivations};
use crate::config::PsychologyConfig;
use crate::mechanics::{Archetype, Mood};

/// An NPC's psychological state.
///
/// `is_cracked` is a latch: nothing on this type ever clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub archetype: Archetype,
    pub motivations: Motivations,

    trust: i32,
    trust_threshold: i32,
    crack_multiplier: f64,
    pressure_accumulated: f64,
    is_cracked: bool,
    is_alive: bool,

    pub location: Option<EntityId>,
    pub times_talked: u32,
    exhausted_topics: BTreeSet<EntityId>,
}

impl Character {
    /// Create a character with default psychology tuning.
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, archetype: Archetype) -> Self {
        Self::from_config(id, name, archetype, &PsychologyConfig::default())
    }

    /// Create a character using the given psychology tuning.
    pub fn from_config(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        archetype: Archetype,
        config: &PsychologyConfig,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            archetype,
            motivations: archetype.motivations(),
            trust: 0,
            trust_threshold: config.default_trust_threshold.max(1),
            crack_multiplier: config.crack_multiplier,
            pressure_accumulated: 0.0,
            is_cracked: false,
            is_alive: true,
            location: None,
            times_talked: 0,
            exhausted_topics: BTreeSet::new(),
        }
    }

    /// Set a per-character trust threshold (clamped to at least 1).
    pub fn with_trust_threshold(mut self, threshold: i32) -> Self {
        self.trust_threshold = threshold.max(1);
        self
    }

    /// Set the starting trust.
    pub fn with_trust(mut self, trust: i32) -> Self {
        self.trust = trust;
        self
    }

    /// Set the starting location.
    pub fn with_location(mut self, location: impl Into<EntityId>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn trust(&self) -> i32 {
        self.trust
    }

    pub fn trust_threshold(&self) -> i32 {
        self.trust_threshold
    }

    pub fn pressure_accumulated(&self) -> f64 {
        self.pressure_accumulated
    }

    pub fn is_cracked(&self) -> bool {
        self.is_cracked
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    pub fn crack_multiplier(&self) -> f64 {
        self.crack_multiplier
    }

    /// The first psychology invariant this character breaks, if any.
    ///
    /// Constructors never produce such a character; deserialized ones can.
    pub fn invariant_violation(&self) -> Option<&'static str> {
        if self.trust_threshold < 1 {
            Some("trust threshold below 1")
        } else if !(self.crack_multiplier.is_finite() && self.crack_multiplier > 0.0) {
            Some("crack multiplier not positive")
        } else if !(self.pressure_accumulated.is_finite() && self.pressure_accumulated >= 0.0) {
            Some("accumulated pressure negative or not finite")
        } else if !(self.motivations.pressure_multiplier() > 0.0
            && self.motivations.pressure_multiplier().is_finite())
        {
            Some("pressure multiplier not positive")
        } else {
            None
        }
    }

    /// Pressure above which this character cracks.
    pub fn crack_threshold(&self) -> f64 {
        self.trust_threshold as f64 * self.crack_multiplier
    }

    /// Shift trust by `delta`. Mood follows automatically.
    pub fn modify_trust(&mut self, delta: i32) {
        self.trust = self.trust.saturating_add(delta);
        debug!(
            character = %self.id,
            delta,
            trust = self.trust,
            mood = ?self.mood(),
            "trust changed"
        );
    }

    /// Lean on the character. Returns `true` if this call cracked them.
    ///
    /// Negative amounts are ignored; pressure never bleeds off and saturates
    /// at `f64::MAX`.
    pub fn apply_pressure(&mut self, amount: f64) -> bool {
        if !self.is_alive || !amount.is_finite() || amount <= 0.0 {
            return false;
        }

        let added = amount * self.motivations.pressure_multiplier();
        self.pressure_accumulated = (self.pressure_accumulated + added).min(f64::MAX);
        debug!(
            character = %self.id,
            amount,
            pressure = self.pressure_accumulated,
            threshold = self.crack_threshold(),
            "pressure applied"
        );

        if !self.is_cracked && self.pressure_accumulated > self.crack_threshold() {
            self.is_cracked = true;
            info!(character = %self.id, archetype = ?self.archetype, "character cracked");
            return true;
        }
        false
    }

    /// Current mood, derived from trust, pressure and the crack latch.
    pub fn mood(&self) -> Mood {
        let threshold = self.trust_threshold;
        if self.is_cracked {
            Mood::Scared
        } else if self.trust <= threshold.saturating_mul(-2) {
            Mood::Angry
        } else if self.trust <= threshold.saturating_neg() {
            Mood::Hostile
        } else if self.pressure_accumulated * 2.0 >= self.crack_threshold() {
            Mood::Nervous
        } else if self.trust >= threshold {
            Mood::Friendly
        } else {
            Mood::Calm
        }
    }

    /// Whether the character is willing to talk at all.
    pub fn will_cooperate(&self) -> bool {
        if !self.is_alive {
            return false;
        }
        self.is_cracked || self.trust > self.trust_threshold.saturating_neg()
    }

    /// Mark a dialogue topic as used up.
    pub fn exhaust_topic(&mut self, topic: impl Into<EntityId>) {
        self.exhausted_topics.insert(topic.into());
    }

    pub fn is_topic_exhausted(&self, topic: &str) -> bool {
        self.exhausted_topics.contains(topic)
    }

    pub fn exhausted_topics(&self) -> &BTreeSet<EntityId> {
        &self.exhausted_topics
    }

    /// Count a completed conversation.
    pub fn record_conversation(&mut self) {
        self.times_talked = self.times_talked.saturating_add(1);
    }

    pub fn move_to(&mut self, location: impl Into<EntityId>) {
        self.location = Some(location.into());
    }

    pub fn kill(&mut self) {
        self.is_alive = false;
        info!(character = %self.id, "character died");
    }

    /// Read-only view for narrative generation.
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            archetype: self.archetype,
            mood: self.mood(),
            trust: self.trust,
            is_cracked: self.is_cracked,
            is_alive: self.is_alive,
            location: self.location.clone(),
            times_talked: self.times_talked,
        }
    }
}

/// Detached copy of the parts of a character a text generator may see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: EntityId,
    pub name: String,
    pub archetype: Archetype,
    pub mood: Mood,
    pub trust: i32,
    pub is_cracked: bool,
    pub is_alive: bool,
    pub location: Option<EntityId>,
    pub times_talked: u32,
}
