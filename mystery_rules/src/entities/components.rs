//! Component definitions for NPCs.

use serde::{Deserialize, Serialize};

/// Scalar drives seeded from an archetype.
///
/// Every field is in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motivations {
    pub fear: f64,
    pub guilt: f64,
    pub pride: f64,
    pub loyalty: f64,
    pub greed: f64,
}

impl Default for Motivations {
    fn default() -> Self {
        Self {
            fear: 0.0,
            guilt: 0.0,
            pride: 0.0,
            loyalty: 0.0,
            greed: 0.0,
        }
    }
}

/// Motivation types for lookups by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotivationType {
    Fear,
    Guilt,
    Pride,
    Loyalty,
    Greed,
}

impl Motivations {
    /// Get the value of a single motivation.
    pub fn get(&self, motivation: MotivationType) -> f64 {
        match motivation {
            MotivationType::Fear => self.fear,
            MotivationType::Guilt => self.guilt,
            MotivationType::Pride => self.pride,
            MotivationType::Loyalty => self.loyalty,
            MotivationType::Greed => self.greed,
        }
    }

    /// Multiplier applied to raw interrogation pressure.
    ///
    /// Frightened or guilt-ridden characters feel pressure more keenly.
    pub fn pressure_multiplier(&self) -> f64 {
        1.0 + (self.fear + self.guilt) / 2.0
    }

    /// The strongest drive, ties resolved in declaration order.
    pub fn dominant(&self) -> MotivationType {
        let ordered = [
            MotivationType::Fear,
            MotivationType::Guilt,
            MotivationType::Pride,
            MotivationType::Loyalty,
            MotivationType::Greed,
        ];
        let mut best = ordered[0];
        for motivation in ordered.into_iter().skip(1) {
            if self.get(motivation) > self.get(best) {
                best = motivation;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::Archetype;

    #[test]
    fn test_pressure_multiplier() {
        let motivations = Motivations {
            fear: 0.5,
            guilt: 0.5,
            ..Default::default()
        };
        assert!((motivations.pressure_multiplier() - 1.5).abs() < 1e-9);
        assert!((Motivations::default().pressure_multiplier() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_archetype_multiplier_ordering() {
        let innocent = Archetype::Innocent.motivations().pressure_multiplier();
        let believer = Archetype::TrueBeliever.motivations().pressure_multiplier();
        let guilty = Archetype::Guilty.motivations().pressure_multiplier();
        let survivor = Archetype::Survivor.motivations().pressure_multiplier();

        assert!(guilty > innocent);
        assert!(guilty > believer);
        assert!(survivor > innocent);
        assert!(survivor > believer);
    }

    #[test]
    fn test_dominant_motivation() {
        assert_eq!(Archetype::Guilty.motivations().dominant(), MotivationType::Guilt);
        assert_eq!(Archetype::Survivor.motivations().dominant(), MotivationType::Fear);
        // pride and loyalty tie at 0.9; pride is declared first
        assert_eq!(Archetype::TrueBeliever.motivations().dominant(), MotivationType::Pride);
    }
}
