//! Player memory - what the protagonist has found, suspects and has done.

use mystery_rules::{EntityId, MoralShade, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::character::clamp_suspicion;
use super::{Discovery, MoralAction};

impl Discovery {
    /// Create a discovery with the given fact id and description.
    pub fn new(fact_id: impl Into<EntityId>, description: impl Into<String>) -> Self {
        Self {
            fact_id: fact_id.into(),
            description: description.into(),
            location: None,
            timestamp: Timestamp::ZERO,
            source: "examined".to_string(),
            is_evidence: false,
            is_true: true,
            related_to: BTreeSet::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<EntityId>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Mark whether this discovery counts as evidence.
    pub fn with_evidence(mut self, is_evidence: bool) -> Self {
        self.is_evidence = is_evidence;
        self
    }

    /// Record whether what the player learned is actually true.
    pub fn with_truth(mut self, is_true: bool) -> Self {
        self.is_true = is_true;
        self
    }

    pub fn related_to(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.related_to.extend(ids);
        self
    }
}

fn uniform_shades() -> BTreeMap<MoralShade, f64> {
    let share = 1.0 / MoralShade::ALL.len() as f64;
    MoralShade::ALL.iter().map(|s| (*s, share)).collect()
}

/// Everything the protagonist has learned and done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMemory {
    discoveries: Vec<Discovery>,
    suspicions: BTreeMap<EntityId, f64>,
    relationships: BTreeMap<EntityId, i64>,
    moral_actions: Vec<MoralAction>,
    shade_scores: BTreeMap<MoralShade, f64>,
    visited_locations: BTreeSet<EntityId>,
    talked_to: BTreeSet<EntityId>,
    notes: Vec<String>,
}

impl Default for PlayerMemory {
    fn default() -> Self {
        Self {
            discoveries: Vec::new(),
            suspicions: BTreeMap::new(),
            relationships: BTreeMap::new(),
            moral_actions: Vec::new(),
            shade_scores: uniform_shades(),
            visited_locations: BTreeSet::new(),
            talked_to: BTreeSet::new(),
            notes: Vec::new(),
        }
    }
}

impl PlayerMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a discovery. If the fact id is already known the existing
    /// discovery is returned untouched.
    pub fn add_discovery(&mut self, discovery: Discovery) -> &Discovery {
        let existing = self.position_of(discovery.fact_id.as_str());
        let index = match existing {
            Some(existing) => existing,
            None => {
                debug!(
                    fact = %discovery.fact_id,
                    evidence = discovery.is_evidence,
                    "discovery added"
                );
                self.discoveries.push(discovery);
                self.discoveries.len() - 1
            }
        };
        &self.discoveries[index]
    }

    fn position_of(&self, fact_id: &str) -> Option<usize> {
        self.discoveries
            .iter()
            .position(|d| d.fact_id.as_str() == fact_id)
    }

    pub fn get_discovery(&self, fact_id: &str) -> Option<&Discovery> {
        self.position_of(fact_id).map(|i| &self.discoveries[i])
    }

    pub fn has_discovered(&self, fact_id: &str) -> bool {
        self.position_of(fact_id).is_some()
    }

    /// All discoveries in the order they were made.
    pub fn discoveries(&self) -> &[Discovery] {
        &self.discoveries
    }

    /// Discoveries that count as evidence.
    pub fn get_evidence(&self) -> Vec<&Discovery> {
        self.discoveries.iter().filter(|d| d.is_evidence).collect()
    }

    /// Ids of every discovery.
    pub fn discovered_ids(&self) -> BTreeSet<EntityId> {
        self.discoveries.iter().map(|d| d.fact_id.clone()).collect()
    }

    /// Add to the player's suspicion of `target`, clamped to `[0, 1]`.
    pub fn add_suspicion(&mut self, target: impl Into<EntityId>, delta: f64) -> f64 {
        let score = self.suspicions.entry(target.into()).or_insert(0.0);
        *score = clamp_suspicion(*score + delta);
        *score
    }

    pub fn get_suspicion(&self, target: &str) -> f64 {
        self.suspicions.get(target).copied().unwrap_or(0.0)
    }

    pub fn suspicions(&self) -> &BTreeMap<EntityId, f64> {
        &self.suspicions
    }

    /// Shift the relationship with `other`. Unbounded in both directions.
    pub fn modify_relationship(&mut self, other: impl Into<EntityId>, delta: i64) -> i64 {
        let value = self.relationships.entry(other.into()).or_insert(0);
        *value = value.saturating_add(delta);
        *value
    }

    pub fn get_relationship(&self, other: &str) -> i64 {
        self.relationships.get(other).copied().unwrap_or(0)
    }

    /// Log a moral choice and fold it into the shade vector.
    ///
    /// Each named shade moves by `delta * weight`, scores are floored at zero,
    /// and the vector is renormalized to sum to one. If every score ends up at
    /// zero the vector resets to uniform.
    ///
    /// The stored action keeps only what was applied: a non-finite weight is
    /// recorded as zero and effects that would not yield a finite change are
    /// dropped.
    pub fn record_moral_action(&mut self, mut action: MoralAction) -> &MoralAction {
        if !action.weight.is_finite() {
            debug!(
                action = %action.action_type,
                weight = action.weight,
                "non-finite moral weight ignored"
            );
            action.weight = 0.0;
        }
        let weight = action.weight;
        action.shade_effects.retain(|_, delta| (*delta * weight).is_finite());

        for (shade, delta) in &action.shade_effects {
            if let Some(score) = self.shade_scores.get_mut(shade) {
                *score += delta * weight;
            }
        }

        for score in self.shade_scores.values_mut() {
            *score = score.max(0.0);
        }

        let total: f64 = self.shade_scores.values().sum();
        if total > 0.0 && total.is_finite() {
            for score in self.shade_scores.values_mut() {
                *score /= total;
            }
        } else {
            self.shade_scores = uniform_shades();
        }

        debug!(
            action = %action.action_type,
            dominant = ?self.get_dominant_shade(),
            "moral action recorded"
        );
        self.moral_actions.push(action);
        let last = self.moral_actions.len() - 1;
        &self.moral_actions[last]
    }

    pub fn moral_actions(&self) -> &[MoralAction] {
        &self.moral_actions
    }

    pub fn shade_scores(&self) -> &BTreeMap<MoralShade, f64> {
        &self.shade_scores
    }

    pub fn get_shade_score(&self, shade: MoralShade) -> f64 {
        self.shade_scores.get(&shade).copied().unwrap_or(0.0)
    }

    fn ranked_shade(&self, skip: Option<MoralShade>) -> MoralShade {
        let mut best: Option<MoralShade> = None;
        for shade in MoralShade::ALL {
            if Some(shade) == skip {
                continue;
            }
            let beats = match best {
                None => true,
                Some(current) => self.get_shade_score(shade) > self.get_shade_score(current),
            };
            if beats {
                best = Some(shade);
            }
        }
        best.unwrap_or(MoralShade::ALL[0])
    }

    /// Highest scoring shade; ties go to the earlier shade.
    pub fn get_dominant_shade(&self) -> MoralShade {
        self.ranked_shade(None)
    }

    /// Second highest scoring shade; ties go to the earlier shade.
    pub fn get_secondary_shade(&self) -> MoralShade {
        self.ranked_shade(Some(self.get_dominant_shade()))
    }

    pub fn visit_location(&mut self, location: impl Into<EntityId>) {
        self.visited_locations.insert(location.into());
    }

    pub fn has_visited(&self, location: &str) -> bool {
        self.visited_locations.contains(location)
    }

    pub fn mark_talked_to(&mut self, character: impl Into<EntityId>) {
        self.talked_to.insert(character.into());
    }

    pub fn has_talked_to(&self, character: &str) -> bool {
        self.talked_to.contains(character)
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}
