//! Character memory - what one NPC believes, knows and suspects.

use mystery_rules::{Confidence, EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{Belief, PlayerInteraction};

/// Clamp a suspicion score to `[0, 1]`.
pub(crate) fn clamp_suspicion(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Private memory of a single NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterMemory {
    character_id: EntityId,
    beliefs: Vec<Belief>,
    knowledge: BTreeSet<String>,
    suspicions: BTreeMap<EntityId, f64>,
    interactions: Vec<PlayerInteraction>,
}

impl CharacterMemory {
    pub fn new(character_id: impl Into<EntityId>) -> Self {
        Self {
            character_id: character_id.into(),
            beliefs: Vec::new(),
            knowledge: BTreeSet::new(),
            suspicions: BTreeMap::new(),
            interactions: Vec::new(),
        }
    }

    pub fn character_id(&self) -> &EntityId {
        &self.character_id
    }

    /// Append a belief and return it.
    pub fn add_belief(
        &mut self,
        subject: impl Into<EntityId>,
        content: impl Into<String>,
        confidence: Confidence,
        source: impl Into<String>,
        timestamp: Timestamp,
        is_true: bool,
    ) -> &Belief {
        self.push_belief(Belief {
            subject: subject.into(),
            content: content.into(),
            confidence,
            source: source.into(),
            timestamp,
            is_true,
        })
    }

    pub(crate) fn push_belief(&mut self, belief: Belief) -> &Belief {
        self.beliefs.push(belief);
        let last = self.beliefs.len() - 1;
        &self.beliefs[last]
    }

    pub fn beliefs(&self) -> &[Belief] {
        &self.beliefs
    }

    /// Beliefs about `subject`, in the order they were formed.
    pub fn get_beliefs_about(&self, subject: &str) -> Vec<&Belief> {
        self.beliefs
            .iter()
            .filter(|b| b.subject.as_str() == subject)
            .collect()
    }

    /// Beliefs this character holds that are not actually true.
    pub fn false_beliefs(&self) -> Vec<&Belief> {
        self.beliefs.iter().filter(|b| !b.is_true).collect()
    }

    pub fn add_knowledge(&mut self, fact: impl Into<String>) {
        self.knowledge.insert(fact.into());
    }

    pub fn knows(&self, fact: &str) -> bool {
        self.knowledge.contains(fact)
    }

    pub fn knowledge(&self) -> &BTreeSet<String> {
        &self.knowledge
    }

    /// Add to the suspicion held toward `target`, clamped to `[0, 1]`.
    pub fn add_suspicion(&mut self, target: impl Into<EntityId>, delta: f64) -> f64 {
        let score = self.suspicions.entry(target.into()).or_insert(0.0);
        *score = clamp_suspicion(*score + delta);
        *score
    }

    /// Suspicion toward `target`; 0.0 if never suspected.
    pub fn get_suspicion(&self, target: &str) -> f64 {
        self.suspicions.get(target).copied().unwrap_or(0.0)
    }

    pub fn suspicions(&self) -> &BTreeMap<EntityId, f64> {
        &self.suspicions
    }

    /// The most suspected entity, ties going to the smallest id.
    pub fn most_suspected(&self) -> Option<(&EntityId, f64)> {
        let mut best: Option<(&EntityId, f64)> = None;
        for (id, score) in &self.suspicions {
            if best.map_or(true, |(_, top)| *score > top) {
                best = Some((id, *score));
            }
        }
        best
    }

    /// Remember an exchange with the player.
    pub fn record_player_interaction(
        &mut self,
        timestamp: Timestamp,
        interaction_type: impl Into<String>,
        description: impl Into<String>,
        topic: Option<EntityId>,
        trust_change: i32,
    ) -> &PlayerInteraction {
        self.interactions.push(PlayerInteraction {
            timestamp,
            interaction_type: interaction_type.into(),
            description: description.into(),
            topic,
            trust_change,
        });
        let last = self.interactions.len() - 1;
        &self.interactions[last]
    }

    pub fn interactions(&self) -> &[PlayerInteraction] {
        &self.interactions
    }

    /// The last `n` interactions, oldest first.
    pub fn get_recent_interactions(&self, n: usize) -> &[PlayerInteraction] {
        let start = self.interactions.len().saturating_sub(n);
        &self.interactions[start..]
    }

    /// Net trust change across every recorded interaction.
    pub fn total_trust_change(&self) -> i64 {
        self.interactions
            .iter()
            .map(|i| i64::from(i.trust_change))
            .sum()
    }
}
