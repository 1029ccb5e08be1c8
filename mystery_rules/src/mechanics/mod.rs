//! Mystery mechanics: event kinds, belief confidence, moods, archetypes, moral shades.

use serde::{Deserialize, Serialize};

use crate::entities::Motivations;

/// Kinds of events that can be recorded in the world log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Action,
    Dialogue,
    Discovery,
    Death,
    Movement,
    Interaction,
}

impl EventType {
    /// Get the serialized name of this event type.
    pub fn name(&self) -> &'static str {
        match self {
            EventType::Action => "ACTION",
            EventType::Dialogue => "DIALOGUE",
            EventType::Discovery => "DISCOVERY",
            EventType::Death => "DEATH",
            EventType::Movement => "MOVEMENT",
            EventType::Interaction => "INTERACTION",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How strongly a character holds a belief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Uncertain,
    Suspicious,
    Confident,
    Certain,
}

/// Outward emotional state of an NPC.
///
/// Never stored: always derived from trust, pressure and the crack latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mood {
    Calm,
    Friendly,
    Nervous,
    Hostile,
    Angry,
    Scared,
}

impl Mood {
    /// Whether this mood shuts down ordinary conversation.
    pub fn is_antagonistic(&self) -> bool {
        matches!(self, Mood::Hostile | Mood::Angry)
    }
}

/// Closed set of NPC archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Archetype {
    /// Has nothing to hide beyond ordinary embarrassment.
    Innocent,
    /// Committed the crime.
    Guilty,
    /// Lived through something and is hiding what they saw.
    Survivor,
    /// Loyal to a cause or a person past the point of reason.
    TrueBeliever,
    /// Helped the culprit, willingly or not.
    Accomplice,
}

impl Archetype {
    /// Static motivation profile for this archetype.
    pub fn motivations(&self) -> Motivations {
        match self {
            Archetype::Innocent => Motivations {
                fear: 0.3,
                guilt: 0.0,
                pride: 0.4,
                loyalty: 0.5,
                greed: 0.1,
            },
            Archetype::Guilty => Motivations {
                fear: 0.7,
                guilt: 0.9,
                pride: 0.3,
                loyalty: 0.2,
                greed: 0.6,
            },
            Archetype::Survivor => Motivations {
                fear: 0.9,
                guilt: 0.5,
                pride: 0.2,
                loyalty: 0.4,
                greed: 0.2,
            },
            Archetype::TrueBeliever => Motivations {
                fear: 0.1,
                guilt: 0.1,
                pride: 0.9,
                loyalty: 0.9,
                greed: 0.0,
            },
            Archetype::Accomplice => Motivations {
                fear: 0.6,
                guilt: 0.7,
                pride: 0.3,
                loyalty: 0.8,
                greed: 0.4,
            },
        }
    }
}

/// Axes of the player's moral profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoralShade {
    Compassionate,
    Righteous,
    Pragmatic,
    Deceptive,
    Ruthless,
}

impl MoralShade {
    /// All shades in enumeration order.
    pub const ALL: [MoralShade; 5] = [
        MoralShade::Compassionate,
        MoralShade::Righteous,
        MoralShade::Pragmatic,
        MoralShade::Deceptive,
        MoralShade::Ruthless,
    ];

    /// Position in enumeration order, used for tie breaking.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

/// The kind of conflict at the heart of a mystery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    Murder,
    Theft,
    Disappearance,
    Betrayal,
    Conspiracy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_serialize_as_names() {
        assert_eq!(
            serde_json::to_string(&Archetype::TrueBeliever).unwrap(),
            "\"TRUE_BELIEVER\""
        );
        assert_eq!(
            serde_json::to_string(&Confidence::Suspicious).unwrap(),
            "\"SUSPICIOUS\""
        );
        let parsed: EventType = serde_json::from_str("\"DISCOVERY\"").unwrap();
        assert_eq!(parsed, EventType::Discovery);
    }

    #[test]
    fn test_event_type_display_matches_serde() {
        for ty in [EventType::Action, EventType::Death, EventType::Movement] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json.trim_matches('"'), ty.to_string());
        }
    }

    #[test]
    fn test_shade_ordinals_follow_enumeration() {
        for (i, shade) in MoralShade::ALL.iter().enumerate() {
            assert_eq!(shade.ordinal(), i);
        }
    }

    #[test]
    fn test_guilty_archetypes_carry_more_guilt() {
        assert!(Archetype::Guilty.motivations().guilt > Archetype::Innocent.motivations().guilt);
        assert!(
            Archetype::Survivor.motivations().fear > Archetype::TrueBeliever.motivations().fear
        );
    }
}
