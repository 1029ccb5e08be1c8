//! World memory - the objective, append-only record of what happened.

use mystery_rules::{EntityId, EventId, EventType, Timestamp, WorldTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{Event, EventDraft, StateBag};
use crate::error::MemoryError;

/// Ground truth: every event in recording order plus mutable state bags.
///
/// Events are never removed or edited once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldMemory {
    events: Vec<Event>,
    current_time: Timestamp,
    evidence_state: BTreeMap<EntityId, StateBag>,
    location_state: BTreeMap<EntityId, StateBag>,
}

impl WorldMemory {
    /// Create an empty world memory at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world memory starting at the given time.
    pub fn starting_at(time: Timestamp) -> Self {
        Self {
            current_time: time,
            ..Self::default()
        }
    }

    pub fn current_time(&self) -> Timestamp {
        self.current_time
    }

    pub fn world_time(&self) -> WorldTime {
        self.current_time.to_world_time()
    }

    /// Move the clock forward by `minutes`. Zero is a no-op.
    pub fn advance_time(&mut self, minutes: i64) -> Result<Timestamp, MemoryError> {
        let forward = u64::try_from(minutes).map_err(|_| MemoryError::InvalidDuration(minutes))?;
        self.current_time = self.current_time.advanced_by(forward);
        Ok(self.current_time)
    }

    /// Stamp a draft with the current time without recording it.
    pub(crate) fn stage(&self, draft: EventDraft) -> Event {
        draft.into_event(self.current_time)
    }

    /// Append a staged event.
    pub(crate) fn commit(&mut self, event: Event) -> &Event {
        debug!(
            event = %event.id,
            kind = %event.event_type,
            location = %event.location,
            at = %event.timestamp,
            "event recorded"
        );
        self.events.push(event);
        let last = self.events.len() - 1;
        &self.events[last]
    }

    /// Record an event at the current time.
    ///
    /// This only touches ground truth; use the memory bank to let
    /// witnesses and the player learn about it.
    pub fn record(&mut self, draft: EventDraft) -> &Event {
        let event = self.stage(draft);
        self.commit(event)
    }

    /// All events in recording order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Get event by ID.
    pub fn get_event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Find events matching a predicate, in recording order.
    pub fn find_events<F>(&self, predicate: F) -> Vec<&Event>
    where
        F: Fn(&Event) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).collect()
    }

    pub fn events_at_location(&self, location: &str) -> Vec<&Event> {
        self.find_events(|e| e.location.as_str() == location)
    }

    pub fn events_involving(&self, actor: &str) -> Vec<&Event> {
        self.find_events(|e| e.involves(actor))
    }

    pub fn events_witnessed_by(&self, witness: &str) -> Vec<&Event> {
        self.find_events(|e| e.was_witnessed_by(witness))
    }

    /// Events with `timestamp >= since`.
    pub fn events_since(&self, since: Timestamp) -> Vec<&Event> {
        self.find_events(|e| e.timestamp >= since)
    }

    pub fn events_by_type(&self, event_type: EventType) -> Vec<&Event> {
        self.find_events(|e| e.event_type == event_type)
    }

    /// Replace the state bag for a piece of evidence.
    pub fn set_evidence_state(&mut self, evidence: impl Into<EntityId>, state: StateBag) {
        self.evidence_state.insert(evidence.into(), state);
    }

    /// Set a single key in an evidence state bag, creating the bag if needed.
    pub fn update_evidence_state(
        &mut self,
        evidence: impl Into<EntityId>,
        key: impl Into<String>,
        value: serde_json::Value,
    ) {
        self.evidence_state
            .entry(evidence.into())
            .or_default()
            .insert(key.into(), value);
    }

    pub fn get_evidence_state(&self, evidence: &str) -> Option<&StateBag> {
        self.evidence_state.get(evidence)
    }

    /// Replace the state bag for a location.
    pub fn set_location_state(&mut self, location: impl Into<EntityId>, state: StateBag) {
        self.location_state.insert(location.into(), state);
    }

    /// Set a single key in a location state bag, creating the bag if needed.
    pub fn update_location_state(
        &mut self,
        location: impl Into<EntityId>,
        key: impl Into<String>,
        value: serde_json::Value,
    ) {
        self.location_state
            .entry(location.into())
            .or_default()
            .insert(key.into(), value);
    }

    pub fn get_location_state(&self, location: &str) -> Option<&StateBag> {
        self.location_state.get(location)
    }
}
