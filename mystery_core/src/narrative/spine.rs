//! Narrative spine - the mystery's designed truth and its revelation graph.

use mystery_rules::{ConflictType, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::{Revelation, TrueResolution};
use crate::error::SpineError;
use crate::memory::PlayerMemory;

/// Outcome of an accusation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionVerdict {
    pub correct: bool,
    pub message: String,

    /// Required evidence the accusation did not present.
    pub missing_evidence: Vec<EntityId>,
}

/// The designed truth of one mystery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSpine {
    pub conflict_type: ConflictType,
    pub conflict_description: String,
    true_resolution: TrueResolution,
    revelations: Vec<Revelation>,
    revealed_facts: BTreeSet<EntityId>,
}

impl NarrativeSpine {
    /// Build a spine, rejecting broken revelation graphs.
    pub fn new(
        conflict_type: ConflictType,
        conflict_description: impl Into<String>,
        true_resolution: TrueResolution,
        revelations: Vec<Revelation>,
    ) -> Result<Self, SpineError> {
        let spine = Self {
            conflict_type,
            conflict_description: conflict_description.into(),
            true_resolution,
            revelations,
            revealed_facts: BTreeSet::new(),
        };
        spine.validate()?;
        Ok(spine)
    }

    /// Check the structural invariants of the revelation graph.
    ///
    /// Run on construction and after deserializing.
    pub fn validate(&self) -> Result<(), SpineError> {
        let mut seen: BTreeSet<&EntityId> = BTreeSet::new();
        for revelation in &self.revelations {
            if !seen.insert(&revelation.id) {
                return Err(SpineError::DuplicateRevelation(revelation.id.clone()));
            }
            if !(0.0..=1.0).contains(&revelation.importance) {
                return Err(SpineError::InvalidImportance(revelation.id.clone()));
            }
        }

        for revelation in &self.revelations {
            if let Some(prerequisite) = &revelation.prerequisite {
                if !seen.contains(prerequisite) {
                    return Err(SpineError::UnknownPrerequisite {
                        revelation: revelation.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        if let Some(missing) = self
            .true_resolution
            .evidence_chain
            .iter()
            .find(|e| !seen.contains(e))
        {
            return Err(SpineError::UnknownEvidence(missing.clone()));
        }

        if let Some(stray) = self.revealed_facts.iter().find(|r| !seen.contains(r)) {
            return Err(SpineError::UnknownRevealed(stray.clone()));
        }

        Ok(())
    }

    pub fn true_resolution(&self) -> &TrueResolution {
        &self.true_resolution
    }

    /// All revelations in authored order.
    pub fn revelations(&self) -> &[Revelation] {
        &self.revelations
    }

    pub fn revealed_facts(&self) -> &BTreeSet<EntityId> {
        &self.revealed_facts
    }

    pub fn get_revelation(&self, id: &str) -> Option<&Revelation> {
        self.revelations.iter().find(|r| r.id.as_str() == id)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed_facts.contains(id)
    }

    fn is_available(&self, revelation: &Revelation) -> bool {
        !self.revealed_facts.contains(&revelation.id)
            && revelation
                .prerequisite
                .as_ref()
                .map_or(true, |p| self.revealed_facts.contains(p))
    }

    /// Unrevealed revelations whose prerequisite is met, in authored order.
    pub fn get_available_revelations(&self) -> Vec<&Revelation> {
        self.revelations
            .iter()
            .filter(|r| self.is_available(r))
            .collect()
    }

    /// Reveal `id` if it is currently available. Returns `false` and changes
    /// nothing otherwise.
    pub fn make_revelation(&mut self, id: &str) -> bool {
        let available = self
            .get_revelation(id)
            .map_or(false, |r| self.is_available(r));
        if !available {
            debug!(revelation = id, "revelation not available");
            return false;
        }

        self.revealed_facts.insert(EntityId::from(id));
        info!(revelation = id, progress = self.progress(), "revelation made");
        true
    }

    /// Fraction of revelations made, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.revelations.is_empty() {
            return 0.0;
        }
        self.revealed_facts.len() as f64 / self.revelations.len() as f64
    }

    /// Judge an accusation.
    ///
    /// Correct only if the culprit matches and every piece of the evidence
    /// chain was presented.
    pub fn check_solution<I>(&self, culprit_id: &str, evidence_ids: I) -> SolutionVerdict
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let presented: BTreeSet<String> = evidence_ids
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .collect();

        let missing_evidence: Vec<EntityId> = self
            .true_resolution
            .evidence_chain
            .iter()
            .filter(|e| !presented.contains(e.as_str()))
            .cloned()
            .collect();

        let right_culprit = culprit_id == self.true_resolution.culprit_id.as_str();
        let correct = right_culprit && missing_evidence.is_empty();

        let message = if !right_culprit {
            format!(
                "{} is innocent of this. The real culprit was {}.",
                culprit_id, self.true_resolution.culprit_id
            )
        } else if !missing_evidence.is_empty() {
            let names: Vec<&str> = missing_evidence.iter().map(|e| e.as_str()).collect();
            format!(
                "You named the right person, but cannot prove it. Missing evidence: {}.",
                names.join(", ")
            )
        } else {
            format!(
                "Case closed. {} did it. Motive: {}. Method: {}.",
                self.true_resolution.culprit_id,
                self.true_resolution.motive,
                self.true_resolution.method
            )
        };

        info!(culprit = culprit_id, correct, missing = missing_evidence.len(), "solution checked");
        SolutionVerdict {
            correct,
            message,
            missing_evidence,
        }
    }

    /// Judge an accusation using the player's admissible evidence.
    ///
    /// Only discoveries marked as evidence count, and lies the player was
    /// told never do.
    pub fn check_solution_against(
        &self,
        player: &PlayerMemory,
        culprit_id: &str,
    ) -> SolutionVerdict {
        let evidence = player
            .get_evidence()
            .into_iter()
            .filter(|d| d.is_true)
            .map(|d| d.fact_id.as_str());
        self.check_solution(culprit_id, evidence)
    }
}
