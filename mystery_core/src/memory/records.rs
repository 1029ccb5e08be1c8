//! Record types stored by the memory layers.
//!
//! These are plain data. Every mutation goes through the owning layer.

use mystery_rules::{Confidence, EntityId, EventId, EventType, MoralShade, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Free-form structured details attached to an event.
pub type EventDetails = BTreeMap<String, serde_json::Value>;

/// Arbitrary keyed metadata for a piece of evidence or a location.
pub type StateBag = BTreeMap<String, serde_json::Value>;

/// Something that objectively happened in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub description: String,
    pub location: EntityId,
    pub timestamp: Timestamp,
    pub actors: BTreeSet<EntityId>,
    pub witnesses: BTreeSet<EntityId>,
    pub details: EventDetails,
}

impl Event {
    /// Check if an entity took part in this event.
    pub fn involves(&self, actor: &str) -> bool {
        self.actors.contains(actor)
    }

    /// Check if an entity saw this event happen.
    pub fn was_witnessed_by(&self, witness: &str) -> bool {
        self.witnesses.contains(witness)
    }

    /// The subject a witness files this event under: the first actor, or
    /// the location when nobody acted.
    pub fn subject(&self) -> &EntityId {
        self.actors.iter().next().unwrap_or(&self.location)
    }
}

/// An event that has not been recorded yet.
///
/// Recording stamps it with an id and the current clock value.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub event_type: EventType,
    pub description: String,
    pub location: EntityId,
    pub actors: BTreeSet<EntityId>,
    pub witnesses: BTreeSet<EntityId>,
    pub details: EventDetails,
}

impl EventDraft {
    pub fn new(
        event_type: EventType,
        description: impl Into<String>,
        location: impl Into<EntityId>,
    ) -> Self {
        Self {
            event_type,
            description: description.into(),
            location: location.into(),
            actors: BTreeSet::new(),
            witnesses: BTreeSet::new(),
            details: EventDetails::new(),
        }
    }

    pub fn with_actors<I, T>(mut self, actors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        self.actors.extend(actors.into_iter().map(Into::into));
        self
    }

    pub fn witnessed_by<I, T>(mut self, witnesses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        self.witnesses.extend(witnesses.into_iter().map(Into::into));
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Turn the draft into an event stamped with `timestamp`.
    pub fn into_event(self, timestamp: Timestamp) -> Event {
        Event {
            id: EventId::new(),
            event_type: self.event_type,
            description: self.description,
            location: self.location,
            timestamp,
            actors: self.actors,
            witnesses: self.witnesses,
            details: self.details,
        }
    }
}

/// A character's private, possibly false, record about a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub subject: EntityId,
    pub content: String,
    pub confidence: Confidence,
    pub source: String,
    pub timestamp: Timestamp,
    pub is_true: bool,
}

/// A fact the player has learned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    pub fact_id: EntityId,
    pub description: String,
    pub location: Option<EntityId>,
    pub timestamp: Timestamp,
    pub source: String,

    /// Whether this can be presented as proof in an accusation.
    pub is_evidence: bool,

    /// What the player was told, which may be a lie.
    pub is_true: bool,

    pub related_to: BTreeSet<EntityId>,
}

/// One morally weighted choice the player made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoralAction {
    pub action_type: String,
    pub description: String,
    pub timestamp: Timestamp,
    pub target: Option<EntityId>,
    pub shade_effects: BTreeMap<MoralShade, f64>,
    pub weight: f64,
}

/// One exchange between the player and an NPC, as the NPC remembers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInteraction {
    pub timestamp: Timestamp,
    pub interaction_type: String,
    pub description: String,
    pub topic: Option<EntityId>,
    pub trust_change: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(actors: &[&str]) -> Event {
        EventDraft::new(EventType::Action, "A door slams", "hallway")
            .with_actors(actors.iter().copied())
            .into_event(Timestamp::ZERO)
    }

    #[test]
    fn test_draft_collects_details() {
        let event = EventDraft::new(EventType::Death, "The lord falls", "hall")
            .with_actors(["lord"])
            .witnessed_by(["maid", "cook", "maid"])
            .with_detail("cause", serde_json::json!("poison"))
            .into_event(Timestamp(42));

        assert_eq!(event.timestamp, Timestamp(42));
        assert_eq!(event.witnesses.len(), 2);
        assert_eq!(event.details["cause"], "poison");
    }

    #[test]
    fn test_subject_is_first_actor() {
        let e = event(&["valet", "butler"]);
        assert_eq!(e.subject().as_str(), "butler");
        assert!(e.involves("valet"));
        assert!(!e.involves("maid"));
    }

    #[test]
    fn test_subject_falls_back_to_location() {
        let e = event(&[]);
        assert_eq!(e.subject().as_str(), "hallway");
    }

    #[test]
    fn test_shade_effects_serialize_by_name() {
        let action = MoralAction {
            action_type: "mercy".to_string(),
            description: "Let the thief go".to_string(),
            timestamp: Timestamp(5),
            target: None,
            shade_effects: [(MoralShade::Compassionate, 0.5)].into_iter().collect(),
            weight: 1.0,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["shade_effects"]["COMPASSIONATE"], 0.5);
    }
}
