//! Memory bank - the single coordination point for all three memory layers.

use mystery_rules::{Confidence, EntityId, EventType, MoralShade, RulesConfig, Timestamp, WorldTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::{
    Belief, CharacterMemory, Discovery, Event, EventDraft, MoralAction, PlayerInteraction,
    PlayerMemory, WorldMemory,
};
use crate::error::MemoryError;

/// Actor id used for the protagonist in world events.
pub const PLAYER_ID: &str = "player";

/// Source tag on beliefs formed by seeing an event.
pub const WITNESSED_SOURCE: &str = "witnessed";

/// Owns world, player and per-character memory, and the clock.
///
/// Characters are registered once and never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MemoryBank {
    world: WorldMemory,
    player: PlayerMemory,
    characters: BTreeMap<EntityId, CharacterMemory>,
}

impl MemoryBank {
    /// Create an empty bank at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bank whose clock starts at `time`.
    pub fn with_start_time(time: Timestamp) -> Self {
        Self {
            world: WorldMemory::starting_at(time),
            ..Self::default()
        }
    }

    /// Create an empty bank using the clock settings from a rules config.
    pub fn from_config(config: &RulesConfig) -> Self {
        Self::with_start_time(Timestamp::from_minutes(config.clock.start_minutes))
    }

    pub fn world(&self) -> &WorldMemory {
        &self.world
    }

    /// Mutable access to ground truth for state-bag updates.
    pub fn world_mut(&mut self) -> &mut WorldMemory {
        &mut self.world
    }

    pub fn player(&self) -> &PlayerMemory {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerMemory {
        &mut self.player
    }

    pub fn current_time(&self) -> Timestamp {
        self.world.current_time()
    }

    pub fn world_time(&self) -> WorldTime {
        self.world.world_time()
    }

    /// Advance the shared clock.
    pub fn advance_time(&mut self, minutes: i64) -> Result<Timestamp, MemoryError> {
        self.world.advance_time(minutes)
    }

    /// Create memory for a new character.
    pub fn register_character(
        &mut self,
        id: impl Into<EntityId>,
    ) -> Result<&mut CharacterMemory, MemoryError> {
        let id = id.into();
        if self.characters.contains_key(&id) {
            return Err(MemoryError::DuplicateCharacter(id));
        }
        info!(character = %id, "character registered");
        Ok(self
            .characters
            .entry(id.clone())
            .or_insert_with(|| CharacterMemory::new(id)))
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.characters.contains_key(id)
    }

    /// Ids of every registered character, sorted.
    pub fn registered_characters(&self) -> impl Iterator<Item = &EntityId> {
        self.characters.keys()
    }

    pub fn character_memory(&self, id: &str) -> Result<&CharacterMemory, MemoryError> {
        self.characters
            .get(id)
            .ok_or_else(|| MemoryError::UnknownCharacter(EntityId::from(id)))
    }

    pub fn character_memory_mut(&mut self, id: &str) -> Result<&mut CharacterMemory, MemoryError> {
        self.characters
            .get_mut(id)
            .ok_or_else(|| MemoryError::UnknownCharacter(EntityId::from(id)))
    }

    pub(crate) fn characters(&self) -> &BTreeMap<EntityId, CharacterMemory> {
        &self.characters
    }

    /// Record an event and let everyone who saw it learn about it.
    ///
    /// Registered witnesses each form their own belief; unregistered ids are
    /// ignored. If the player saw it, they gain a discovery keyed
    /// `event:<id>`, counted as evidence only for DISCOVERY events. Nothing
    /// is committed until every side effect has been built.
    pub fn record_witnessed_event(&mut self, draft: EventDraft, player_witnessed: bool) -> &Event {
        let event = self.world.stage(draft);

        let beliefs: Vec<(EntityId, Belief)> = event
            .witnesses
            .iter()
            .filter(|w| self.characters.contains_key(*w))
            .map(|w| {
                let belief = Belief {
                    subject: event.subject().clone(),
                    content: event.description.clone(),
                    confidence: Confidence::Suspicious,
                    source: WITNESSED_SOURCE.to_string(),
                    timestamp: event.timestamp,
                    is_true: true,
                };
                (w.clone(), belief)
            })
            .collect();

        let discovery = player_witnessed.then(|| Discovery {
            fact_id: EntityId::new(format!("event:{}", event.id)),
            description: event.description.clone(),
            location: Some(event.location.clone()),
            timestamp: event.timestamp,
            source: WITNESSED_SOURCE.to_string(),
            is_evidence: event.event_type == EventType::Discovery,
            is_true: true,
            related_to: event.actors.clone(),
        });

        debug!(
            event = %event.id,
            witnesses = beliefs.len(),
            player_witnessed,
            "propagating witnessed event"
        );

        let knowledge = event.id.to_string();
        for (witness, belief) in beliefs {
            if let Some(memory) = self.characters.get_mut(&witness) {
                memory.push_belief(belief);
                memory.add_knowledge(knowledge.clone());
            }
        }
        if let Some(discovery) = discovery {
            self.player.add_discovery(discovery);
        }
        self.world.commit(event)
    }

    /// An NPC tells the player something, true or not.
    ///
    /// The player's discovery is keyed `<character>:<topic>` and keeps the
    /// speaker's truthfulness. Fails without side effects if the speaker is
    /// not registered.
    pub fn character_tells_player(
        &mut self,
        character_id: &str,
        information: impl Into<String>,
        is_true: bool,
        topic: impl Into<EntityId>,
    ) -> Result<&Discovery, MemoryError> {
        let now = self.current_time();
        let information = information.into();
        let topic = topic.into();

        let speaker = self.character_memory_mut(character_id)?;
        speaker.record_player_interaction(now, "told", information.clone(), Some(topic.clone()), 0);

        let speaker_id = EntityId::from(character_id);
        self.player.mark_talked_to(speaker_id.clone());

        debug!(character = character_id, topic = %topic, is_true, "character told player");
        let discovery = Discovery::new(format!("{}:{}", character_id, topic), information)
            .with_timestamp(now)
            .with_source(character_id)
            .with_truth(is_true)
            .related_to([speaker_id]);
        Ok(self.player.add_discovery(discovery))
    }

    /// Log a player exchange on an NPC's memory without telling the player anything.
    pub fn record_interaction(
        &mut self,
        character_id: &str,
        interaction_type: impl Into<String>,
        description: impl Into<String>,
        topic: Option<EntityId>,
        trust_change: i32,
    ) -> Result<&PlayerInteraction, MemoryError> {
        let now = self.current_time();
        let memory = self.character_memory_mut(character_id)?;
        Ok(memory.record_player_interaction(
            now,
            interaction_type,
            description,
            topic,
            trust_change,
        ))
    }

    /// The player examines something directly.
    ///
    /// Records a DISCOVERY event in the world and the discovery itself. No
    /// character learns anything. Re-examining a known fact returns the
    /// existing discovery and records nothing new.
    pub fn player_discovers(&mut self, discovery: Discovery) -> &Discovery {
        if self.player.has_discovered(discovery.fact_id.as_str()) {
            return self.player.add_discovery(discovery);
        }

        let now = self.current_time();
        let location = discovery
            .location
            .clone()
            .unwrap_or_else(|| EntityId::from("unknown"));
        let draft = EventDraft::new(EventType::Discovery, discovery.description.clone(), location)
            .with_actors([PLAYER_ID])
            .with_detail("fact_id", serde_json::Value::String(discovery.fact_id.to_string()));
        self.world.record(draft);

        self.player.add_discovery(discovery.with_timestamp(now))
    }

    /// Log a moral choice at the current time.
    pub fn record_moral_action(
        &mut self,
        action_type: impl Into<String>,
        description: impl Into<String>,
        target: Option<EntityId>,
        shade_effects: BTreeMap<MoralShade, f64>,
        weight: f64,
    ) -> &MoralAction {
        let action = MoralAction {
            action_type: action_type.into(),
            description: description.into(),
            timestamp: self.current_time(),
            target,
            shade_effects,
            weight,
        };
        self.player.record_moral_action(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_with(characters: &[&str]) -> MemoryBank {
        let mut bank = MemoryBank::new();
        for id in characters {
            bank.register_character(*id).unwrap();
        }
        bank
    }

    #[test]
    fn test_register_twice_fails() {
        let mut bank = MemoryBank::new();
        bank.register_character("maid").unwrap().add_knowledge("keys");

        let err = bank.register_character("maid").unwrap_err();
        assert_eq!(err, MemoryError::DuplicateCharacter(EntityId::from("maid")));
        // the original memory survives
        assert!(bank.character_memory("maid").unwrap().knows("keys"));
    }

    #[test]
    fn test_unknown_character_lookup() {
        let bank = MemoryBank::new();
        assert!(matches!(
            bank.character_memory("ghost"),
            Err(MemoryError::UnknownCharacter(_))
        ));
    }

    #[test]
    fn test_witnessed_event_fans_out() {
        let mut bank = bank_with(&["maid", "cook", "butler"]);
        bank.advance_time(90).unwrap();

        let event = bank
            .record_witnessed_event(
                EventDraft::new(EventType::Action, "The butler hides a vial", "pantry")
                    .with_actors(["butler"])
                    .witnessed_by(["maid", "cook", "stranger"]),
                true,
            )
            .clone();

        assert_eq!(event.timestamp, Timestamp(90));
        assert_eq!(bank.world().event_count(), 1);

        for witness in ["maid", "cook"] {
            let memory = bank.character_memory(witness).unwrap();
            let beliefs = memory.get_beliefs_about("butler");
            assert_eq!(beliefs.len(), 1);
            assert_eq!(beliefs[0].confidence, Confidence::Suspicious);
            assert_eq!(beliefs[0].source, "witnessed");
            assert!(beliefs[0].is_true);
            assert!(memory.knows(&event.id.to_string()));
        }
        assert!(bank.character_memory("butler").unwrap().beliefs().is_empty());
        assert!(!bank.is_registered("stranger"));

        let discovery = bank
            .player()
            .get_discovery(&format!("event:{}", event.id))
            .unwrap();
        assert!(!discovery.is_evidence);
        assert!(discovery.related_to.contains("butler"));
    }

    #[test]
    fn test_witnessed_discovery_is_evidence() {
        let mut bank = MemoryBank::new();
        let id = bank
            .record_witnessed_event(
                EventDraft::new(EventType::Discovery, "A bloody glove behind the shed", "garden"),
                true,
            )
            .id;

        let discovery = bank.player().get_discovery(&format!("event:{}", id)).unwrap();
        assert!(discovery.is_evidence);
    }

    #[test]
    fn test_unwitnessed_event_teaches_nobody() {
        let mut bank = bank_with(&["maid"]);
        bank.record_witnessed_event(
            EventDraft::new(EventType::Action, "A window is forced", "study"),
            false,
        );

        assert_eq!(bank.world().event_count(), 1);
        assert!(bank.player().discoveries().is_empty());
        assert!(bank.character_memory("maid").unwrap().beliefs().is_empty());
    }

    #[test]
    fn test_character_tells_player_copies_truth() {
        let mut bank = bank_with(&["gardener"]);
        let discovery = bank
            .character_tells_player("gardener", "I was asleep all night", false, "alibi")
            .unwrap();

        assert_eq!(discovery.fact_id.as_str(), "gardener:alibi");
        assert!(!discovery.is_true);
        assert_eq!(discovery.source, "gardener");

        let memory = bank.character_memory("gardener").unwrap();
        assert_eq!(memory.interactions().len(), 1);
        assert_eq!(memory.interactions()[0].interaction_type, "told");
        assert!(bank.player().has_talked_to("gardener"));
    }

    #[test]
    fn test_unknown_speaker_changes_nothing() {
        let mut bank = MemoryBank::new();
        let before = bank.clone();

        let result = bank.character_tells_player("ghost", "Boo", true, "haunting");
        assert!(matches!(result, Err(MemoryError::UnknownCharacter(_))));
        assert_eq!(bank, before);
    }

    #[test]
    fn test_player_discovers_records_world_event_once() {
        let mut bank = bank_with(&["maid"]);
        bank.advance_time(5).unwrap();

        let discovery = bank
            .player_discovers(
                Discovery::new("letter_clue", "A letter signed with the butler's initials")
                    .with_location("study")
                    .with_evidence(true),
            )
            .clone();
        assert_eq!(discovery.timestamp, Timestamp(5));

        bank.player_discovers(Discovery::new("letter_clue", "Same letter again"));

        let events = bank.world().events_by_type(EventType::Discovery);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].location.as_str(), "study");
        assert!(events[0].involves(PLAYER_ID));
        assert_eq!(bank.player().discoveries().len(), 1);
        assert!(bank.character_memory("maid").unwrap().beliefs().is_empty());
    }

    #[test]
    fn test_clock_is_shared() {
        let mut bank = MemoryBank::with_start_time(Timestamp(100));
        assert_eq!(bank.advance_time(-5), Err(MemoryError::InvalidDuration(-5)));
        bank.advance_time(20).unwrap();

        bank.record_moral_action(
            "mercy",
            "Spared the thief",
            Some(EntityId::from("thief")),
            [(MoralShade::Compassionate, 0.3)].into_iter().collect(),
            1.0,
        );
        assert_eq!(bank.player().moral_actions()[0].timestamp, Timestamp(120));
        assert_eq!(bank.current_time(), Timestamp(120));
    }
}
