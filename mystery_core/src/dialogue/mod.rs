//! Dialogue gating - which topics an NPC will discuss and how they answer.
//!
//! Gating is a pure function of the NPC's psychology and what the player has
//! found. Nothing here mutates state except [`apply_response`], which the
//! dialogue layer calls once the player has picked a topic.

mod topic;

pub use topic::*;

use mystery_rules::{Character, EntityId, Mood};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::MemoryError;
use crate::memory::{Discovery, MemoryBank, PlayerMemory};
use crate::narrative::NarrativeSpine;

/// Read-only view of everything topic gating depends on.
#[derive(Debug, Clone)]
pub struct DialogueState<'a> {
    pub is_alive: bool,
    pub is_cracked: bool,
    pub trust: i32,
    pub trust_threshold: i32,
    pub mood: Mood,
    pub will_cooperate: bool,
    pub discoveries: BTreeSet<&'a str>,
    pub exhausted: &'a BTreeSet<EntityId>,
}

impl<'a> DialogueState<'a> {
    pub fn new(character: &'a Character, player: &'a PlayerMemory) -> Self {
        Self {
            is_alive: character.is_alive(),
            is_cracked: character.is_cracked(),
            trust: character.trust(),
            trust_threshold: character.trust_threshold(),
            mood: character.mood(),
            will_cooperate: character.will_cooperate(),
            discoveries: player.discoveries().iter().map(|d| d.fact_id.as_str()).collect(),
            exhausted: character.exhausted_topics(),
        }
    }

    fn knows(&self, fact_id: &str) -> bool {
        self.discoveries.contains(fact_id)
    }
}

/// Which of a topic's answers was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseKind {
    Cooperative,
    Guarded,
    Confession,
}

/// A selected answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseChoice<'t> {
    pub kind: ResponseKind,
    pub response: &'t TopicResponse,
}

/// Whether the player may raise `topic` right now.
pub fn is_topic_available(topic: &DialogueTopic, state: &DialogueState<'_>) -> bool {
    if !state.is_alive {
        return false;
    }
    if !topic.repeatable && state.exhausted.contains(&topic.id) {
        return false;
    }
    if topic.requires_cracked && !state.is_cracked {
        return false;
    }
    if !topic
        .required_discoveries
        .iter()
        .all(|fact| state.knows(fact.as_str()))
    {
        return false;
    }
    match topic.min_trust {
        Some(min) if !state.is_cracked => state.trust >= min,
        _ => true,
    }
}

/// Topics the player may raise, in the order given.
pub fn available_topics<'t>(
    topics: &'t [DialogueTopic],
    state: &DialogueState<'_>,
) -> Vec<&'t DialogueTopic> {
    topics
        .iter()
        .filter(|t| is_topic_available(t, state))
        .collect()
}

/// Pick the answer the NPC gives to `topic`.
pub fn select_response<'t>(
    topic: &'t DialogueTopic,
    state: &DialogueState<'_>,
) -> ResponseChoice<'t> {
    if state.is_cracked {
        if let Some(confession) = &topic.confession {
            return ResponseChoice {
                kind: ResponseKind::Confession,
                response: confession,
            };
        }
    }

    if state.will_cooperate && !state.mood.is_antagonistic() {
        ResponseChoice {
            kind: ResponseKind::Cooperative,
            response: &topic.cooperative,
        }
    } else {
        ResponseChoice {
            kind: ResponseKind::Guarded,
            response: &topic.guarded,
        }
    }
}

/// What happened when a response was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueOutcome {
    pub kind: ResponseKind,
    pub text: String,
    pub told: Option<EntityId>,
    pub revelation_made: bool,
    pub cracked: bool,
}

/// Carry out the effects of a chosen response.
///
/// Adjusts trust and pressure, exhausts the topic, records what the player
/// was told, and makes the linked revelation if it is available. A revelation
/// made here is handed to the player as evidence. The speaker must be
/// registered in `bank`; otherwise nothing changes.
pub fn apply_response(
    topic: &DialogueTopic,
    kind: ResponseKind,
    character: &mut Character,
    bank: &mut MemoryBank,
    spine: &mut NarrativeSpine,
) -> Result<DialogueOutcome, MemoryError> {
    let response = match kind {
        ResponseKind::Cooperative => &topic.cooperative,
        ResponseKind::Guarded => &topic.guarded,
        ResponseKind::Confession => topic.confession.as_ref().unwrap_or(&topic.cooperative),
    };

    bank.record_interaction(
        character.id.as_str(),
        "dialogue",
        response.text.clone(),
        Some(topic.id.clone()),
        response.trust_change,
    )?;

    let told = match &response.reveals {
        Some(information) => Some(
            bank.character_tells_player(
                character.id.as_str(),
                information.clone(),
                response.is_true,
                topic.id.clone(),
            )?
            .fact_id
            .clone(),
        ),
        None => None,
    };

    character.modify_trust(response.trust_change);
    let cracked = character.apply_pressure(response.pressure);
    character.exhaust_topic(topic.id.clone());
    character.record_conversation();

    let revelation_made = match &response.revelation {
        Some(id) if spine.make_revelation(id.as_str()) => {
            let description = spine
                .get_revelation(id.as_str())
                .map_or_else(|| response.text.clone(), |r| r.description.clone());
            let mut evidence = Discovery::new(id.clone(), description)
                .with_source(character.id.to_string())
                .with_evidence(true);
            if let Some(location) = &character.location {
                evidence = evidence.with_location(location.clone());
            }
            bank.player_discovers(evidence);
            true
        }
        _ => false,
    };

    debug!(
        character = %character.id,
        topic = %topic.id,
        ?kind,
        revelation_made,
        cracked,
        "dialogue response applied"
    );

    Ok(DialogueOutcome {
        kind,
        text: response.text.clone(),
        told,
        revelation_made,
        cracked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::{Revelation, TrueResolution};
    use mystery_rules::{Archetype, ConflictType};

    fn alibi_topic() -> DialogueTopic {
        DialogueTopic::new(
            "alibi",
            "Where were you at midnight?",
            TopicResponse::new("In the kitchen, polishing silver.")
                .revealing("The butler claims he was in the kitchen", false)
                .with_trust_change(1),
            TopicResponse::new("I don't have to answer that.").with_pressure(5.0),
        )
        .with_confession(
            TopicResponse::new("I was in the library. I did it.")
                .revealing("The butler was in the library at midnight", true)
                .unlocking("confession"),
        )
    }

    fn letter_topic() -> DialogueTopic {
        DialogueTopic::new(
            "letter",
            "About this letter...",
            TopicResponse::new("Where did you find that?"),
            TopicResponse::new("I've never seen it."),
        )
        .requiring_discovery("letter_clue")
    }

    fn secret_topic() -> DialogueTopic {
        DialogueTopic::new(
            "secret",
            "Tell me what you're hiding.",
            TopicResponse::new("Fine."),
            TopicResponse::new("Nothing."),
        )
        .with_min_trust(5)
    }

    fn spine() -> NarrativeSpine {
        NarrativeSpine::new(
            ConflictType::Murder,
            "Death in the library",
            TrueResolution::new("butler").with_evidence("confession"),
            vec![Revelation::new("confession", "The butler confesses")],
        )
        .unwrap()
    }

    #[test]
    fn test_discovery_gates_topic() {
        let butler = Character::new("butler", "Hale", Archetype::Guilty);
        let mut player = PlayerMemory::new();

        let topics = vec![alibi_topic(), letter_topic()];
        let state = DialogueState::new(&butler, &player);
        let ids: Vec<_> = available_topics(&topics, &state).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["alibi"]);

        player.add_discovery(Discovery::new("letter_clue", "A letter"));
        let state = DialogueState::new(&butler, &player);
        assert_eq!(available_topics(&topics, &state).len(), 2);
    }

    #[test]
    fn test_trust_gate_lifted_by_cracking() {
        let mut butler = Character::new("butler", "Hale", Archetype::Guilty);
        let player = PlayerMemory::new();
        let topic = secret_topic();

        assert!(!is_topic_available(&topic, &DialogueState::new(&butler, &player)));
        butler.modify_trust(5);
        assert!(is_topic_available(&topic, &DialogueState::new(&butler, &player)));
        butler.modify_trust(-30);
        assert!(!is_topic_available(&topic, &DialogueState::new(&butler, &player)));
        butler.apply_pressure(1000.0);
        assert!(is_topic_available(&topic, &DialogueState::new(&butler, &player)));
    }

    #[test]
    fn test_exhausted_and_cracked_only_topics() {
        let mut butler = Character::new("butler", "Hale", Archetype::Guilty);
        let player = PlayerMemory::new();
        let cracked_only = alibi_topic().only_when_cracked();
        let repeatable = letter_topic().repeatable();

        assert!(!is_topic_available(&cracked_only, &DialogueState::new(&butler, &player)));

        butler.exhaust_topic("alibi");
        butler.apply_pressure(1000.0);
        assert!(!is_topic_available(&cracked_only, &DialogueState::new(&butler, &player)));

        butler.exhaust_topic("letter");
        let mut with_letter = PlayerMemory::new();
        with_letter.add_discovery(Discovery::new("letter_clue", "A letter"));
        assert!(is_topic_available(&repeatable, &DialogueState::new(&butler, &with_letter)));
    }

    #[test]
    fn test_dead_characters_say_nothing() {
        let mut butler = Character::new("butler", "Hale", Archetype::Guilty);
        butler.kill();
        let player = PlayerMemory::new();
        assert!(!is_topic_available(&alibi_topic(), &DialogueState::new(&butler, &player)));
    }

    #[test]
    fn test_select_response_by_state() {
        let mut butler =
            Character::new("butler", "Hale", Archetype::Guilty).with_trust_threshold(4);
        let player = PlayerMemory::new();
        let topic = alibi_topic();

        let choice = select_response(&topic, &DialogueState::new(&butler, &player));
        assert_eq!(choice.kind, ResponseKind::Cooperative);

        butler.modify_trust(-4);
        let choice = select_response(&topic, &DialogueState::new(&butler, &player));
        assert_eq!(choice.kind, ResponseKind::Guarded);
        assert_eq!(choice.response.text, "I don't have to answer that.");

        butler.apply_pressure(1000.0);
        let choice = select_response(&topic, &DialogueState::new(&butler, &player));
        assert_eq!(choice.kind, ResponseKind::Confession);
    }

    #[test]
    fn test_gating_does_not_mutate() {
        let butler = Character::new("butler", "Hale", Archetype::Guilty);
        let player = PlayerMemory::new();
        let before = butler.clone();

        let state = DialogueState::new(&butler, &player);
        let topic = alibi_topic();
        is_topic_available(&topic, &state);
        select_response(&topic, &state);

        assert_eq!(butler, before);
    }

    #[test]
    fn test_apply_cooperative_lie() {
        let mut butler = Character::new("butler", "Hale", Archetype::Guilty);
        let mut bank = MemoryBank::new();
        bank.register_character("butler").unwrap();
        let mut spine = spine();

        let outcome = apply_response(
            &alibi_topic(),
            ResponseKind::Cooperative,
            &mut butler,
            &mut bank,
            &mut spine,
        )
        .unwrap();

        assert_eq!(outcome.told, Some(EntityId::from("butler:alibi")));
        assert!(!outcome.revelation_made);
        assert_eq!(butler.trust(), 1);
        assert!(butler.is_topic_exhausted("alibi"));
        assert_eq!(butler.times_talked, 1);

        let told = bank.player().get_discovery("butler:alibi").unwrap();
        assert!(!told.is_true);

        let memory = bank.character_memory("butler").unwrap();
        assert_eq!(memory.total_trust_change(), 1);
    }

    #[test]
    fn test_apply_confession_unlocks_revelation() {
        let mut butler = Character::new("butler", "Hale", Archetype::Guilty);
        butler.apply_pressure(1000.0);
        let mut bank = MemoryBank::new();
        bank.register_character("butler").unwrap();
        let mut spine = spine();

        let outcome = apply_response(
            &alibi_topic(),
            ResponseKind::Confession,
            &mut butler,
            &mut bank,
            &mut spine,
        )
        .unwrap();

        assert!(outcome.revelation_made);
        assert!(spine.is_revealed("confession"));

        let evidence = bank.player().get_discovery("confession").unwrap();
        assert!(evidence.is_evidence);
        assert!(evidence.is_true);
        assert_eq!(evidence.source, "butler");
        assert_eq!(evidence.description, "The butler confesses");
        assert!(spine.check_solution_against(bank.player(), "butler").correct);
    }

    #[test]
    fn test_repeated_confession_adds_no_evidence() {
        let mut butler = Character::new("butler", "Hale", Archetype::Guilty);
        butler.apply_pressure(1000.0);
        let mut bank = MemoryBank::new();
        bank.register_character("butler").unwrap();
        let mut spine = spine();
        let topic = alibi_topic().repeatable();

        apply_response(&topic, ResponseKind::Confession, &mut butler, &mut bank, &mut spine)
            .unwrap();
        let events = bank.world().events().len();

        let again =
            apply_response(&topic, ResponseKind::Confession, &mut butler, &mut bank, &mut spine)
                .unwrap();
        assert!(!again.revelation_made);
        assert_eq!(bank.world().events().len(), events);
        assert_eq!(bank.player().get_evidence().len(), 1);
    }

    #[test]
    fn test_apply_for_unregistered_speaker_fails_cleanly() {
        let mut butler = Character::new("butler", "Hale", Archetype::Guilty);
        let before = butler.clone();
        let mut bank = MemoryBank::new();
        let mut spine = spine();

        let result = apply_response(
            &alibi_topic(),
            ResponseKind::Guarded,
            &mut butler,
            &mut bank,
            &mut spine,
        );
        assert!(matches!(result, Err(MemoryError::UnknownCharacter(_))));
        assert_eq!(butler, before);
        assert_eq!(bank, MemoryBank::new());
    }
}
