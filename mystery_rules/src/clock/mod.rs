//! Simulation clock - the single source of game time.

use serde::{Deserialize, Serialize};

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// A point in game time, in whole minutes since the start of day 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_minutes(minutes: u64) -> Self {
        Self(minutes)
    }

    pub fn minutes(&self) -> u64 {
        self.0
    }

    /// Move forward by `minutes`, saturating at the end of representable time.
    pub fn advanced_by(&self, minutes: u64) -> Self {
        Self(self.0.saturating_add(minutes))
    }

    /// Day/hour/minute view of this timestamp.
    pub fn to_world_time(&self) -> WorldTime {
        WorldTime {
            day: self.0 / MINUTES_PER_DAY,
            hour: ((self.0 % MINUTES_PER_DAY) / MINUTES_PER_HOUR) as u8,
            minute: (self.0 % MINUTES_PER_HOUR) as u8,
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_world_time())
    }
}

/// Calendar view of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorldTime {
    pub day: u64,
    pub hour: u8,
    pub minute: u8,
}

impl WorldTime {
    /// Create a new world time.
    pub fn new(day: u64, hour: u8, minute: u8) -> Self {
        Self { day, hour, minute }
    }

    /// Convert back to a timestamp.
    pub fn to_timestamp(&self) -> Timestamp {
        Timestamp(
            self.day * MINUTES_PER_DAY + self.hour as u64 * MINUTES_PER_HOUR + self.minute as u64,
        )
    }

    /// Check if it's currently night.
    pub fn is_night(&self) -> bool {
        self.hour < 6 || self.hour >= 20
    }
}

impl std::fmt::Display for WorldTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Day {} {:02}:{:02}", self.day, self.hour, self.minute)
    }
}
