//! Revelations and the authored truth of a mystery.

use mystery_rules::EntityId;
use serde::{Deserialize, Serialize};

/// An authored fact that can be revealed once its prerequisite is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revelation {
    pub id: EntityId,
    pub description: String,

    /// Importance score (0.0 - 1.0) for prioritization.
    pub importance: f64,

    /// Who or what reveals this (a character id, an object, a location).
    pub source: String,

    pub prerequisite: Option<EntityId>,
}

impl Revelation {
    /// Create a revelation with no prerequisite.
    pub fn new(id: impl Into<EntityId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            importance: 0.5,
            source: String::new(),
            prerequisite: None,
        }
    }

    /// Set the importance score, clamped to 0.0 - 1.0. NaN keeps the default.
    pub fn with_importance(mut self, importance: f64) -> Self {
        if !importance.is_nan() {
            self.importance = importance.clamp(0.0, 1.0);
        }
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Require another revelation to be made first.
    pub fn requires(mut self, prerequisite: impl Into<EntityId>) -> Self {
        self.prerequisite = Some(prerequisite.into());
        self
    }
}

/// Who did it, why, how, and what proves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrueResolution {
    pub culprit_id: EntityId,
    pub motive: String,
    pub method: String,
    pub opportunity: String,

    /// Revelations the player must present, in narrative order.
    pub evidence_chain: Vec<EntityId>,
}

impl TrueResolution {
    pub fn new(culprit_id: impl Into<EntityId>) -> Self {
        Self {
            culprit_id: culprit_id.into(),
            motive: String::new(),
            method: String::new(),
            opportunity: String::new(),
            evidence_chain: Vec::new(),
        }
    }

    pub fn with_motive(mut self, motive: impl Into<String>) -> Self {
        self.motive = motive.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_opportunity(mut self, opportunity: impl Into<String>) -> Self {
        self.opportunity = opportunity.into();
        self
    }

    /// Append a required piece of evidence.
    pub fn with_evidence(mut self, revelation: impl Into<EntityId>) -> Self {
        self.evidence_chain.push(revelation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revelation_builder() {
        let revelation = Revelation::new("letter_clue", "The letter was forged")
            .with_importance(1.7)
            .with_source("study_desk")
            .requires("torn_envelope");

        assert_eq!(revelation.importance, 1.0);
        assert_eq!(revelation.source, "study_desk");
        assert_eq!(revelation.prerequisite, Some(EntityId::from("torn_envelope")));
    }

    #[test]
    fn test_nan_importance_keeps_default() {
        let revelation = Revelation::new("vial", "An empty vial").with_importance(f64::NAN);
        assert_eq!(revelation.importance, 0.5);

        let low = Revelation::new("vial", "An empty vial").with_importance(f64::NEG_INFINITY);
        assert_eq!(low.importance, 0.0);
    }

    #[test]
    fn test_resolution_keeps_evidence_order() {
        let resolution = TrueResolution::new("butler")
            .with_motive("Inheritance")
            .with_evidence("letter_clue")
            .with_evidence("vial");

        let chain: Vec<_> = resolution.evidence_chain.iter().map(|e| e.as_str()).collect();
        assert_eq!(chain, vec!["letter_clue", "vial"]);
    }
}
