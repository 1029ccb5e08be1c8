//! Narrative director - picks between a live generator and the offline one.

use tracing::{debug, warn};

use super::{BehaviorRequest, BehaviorResult, DialogueRequest, OfflineGenerator, TextGenerator};

/// Routes generation requests, always producing something usable.
#[derive(Default)]
pub struct NarrativeDirector {
    generator: Option<Box<dyn TextGenerator>>,
    fallback: OfflineGenerator,
}

impl NarrativeDirector {
    /// A director with no live generator; everything is offline.
    pub fn offline() -> Self {
        Self::default()
    }

    /// A director that tries `generator` first.
    pub fn with_generator(generator: impl TextGenerator + 'static) -> Self {
        Self {
            generator: Some(Box::new(generator)),
            fallback: OfflineGenerator::new(),
        }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// A line of dialogue for `request`.
    pub fn dialogue(&self, request: &DialogueRequest) -> String {
        let character = &request.context.character.id;
        if let Some(generator) = &self.generator {
            match generator.generate_dialogue(request) {
                Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
                Ok(_) => warn!(%character, "generator returned empty dialogue, using offline text"),
                Err(e) => {
                    warn!(%character, error = %e, "dialogue generation failed, using offline text")
                }
            }
        } else {
            debug!(%character, "no generator configured, using offline dialogue");
        }
        self.fallback.dialogue_line(request)
    }

    /// A behavior decision for `request`.
    pub fn behavior(&self, request: &BehaviorRequest) -> BehaviorResult {
        let character = &request.context.character.id;
        if let Some(generator) = &self.generator {
            match generator
                .generate_behavior(request)
                .and_then(|raw| BehaviorResult::parse(&raw))
            {
                Ok(result) => return result,
                Err(e) => warn!(
                    %character,
                    error = %e,
                    "behavior generation failed, using offline behavior"
                ),
            }
        } else {
            debug!(%character, "no generator configured, using offline behavior");
        }
        self.fallback.behavior(request)
    }
}

impl std::fmt::Debug for NarrativeDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeDirector")
            .field("has_generator", &self.has_generator())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use crate::generation::PromptContext;
    use crate::memory::MemoryBank;
    use mystery_rules::{Archetype, Character};

    struct Scripted {
        dialogue: Result<String, GeneratorError>,
        behavior: Result<String, GeneratorError>,
    }

    impl TextGenerator for Scripted {
        fn generate_dialogue(&self, _: &DialogueRequest) -> Result<String, GeneratorError> {
            self.dialogue.clone()
        }

        fn generate_behavior(&self, _: &BehaviorRequest) -> Result<String, GeneratorError> {
            self.behavior.clone()
        }
    }

    fn context() -> PromptContext {
        let mut bank = MemoryBank::new();
        bank.register_character("maid").unwrap();
        let maid = Character::new("maid", "Mary", Archetype::Innocent);
        PromptContext::assemble(&bank, &maid, 3).unwrap()
    }

    #[test]
    fn test_uses_live_generator() {
        let director = NarrativeDirector::with_generator(Scripted {
            dialogue: Ok("  I saw a shadow on the stairs.  ".to_string()),
            behavior: Ok(
                r#"{"action": "point", "intensity": 0.5, "narrative": "She points."}"#.to_string(),
            ),
        });

        let line = director.dialogue(&DialogueRequest::new(context(), "What did you see?"));
        assert_eq!(line, "I saw a shadow on the stairs.");

        let behavior = director.behavior(&BehaviorRequest::new(context(), "A scream"));
        assert_eq!(behavior.action, "point");
    }

    #[test]
    fn test_falls_back_on_failure() {
        let director = NarrativeDirector::with_generator(Scripted {
            dialogue: Err(GeneratorError::Unavailable),
            behavior: Err(GeneratorError::Failed("timeout".to_string())),
        });
        let offline = OfflineGenerator::new();
        let request = DialogueRequest::new(context(), "Hello");

        assert_eq!(director.dialogue(&request), offline.dialogue_line(&request));

        let request = BehaviorRequest::new(context(), "A scream");
        assert_eq!(director.behavior(&request), offline.behavior(&request));
    }

    #[test]
    fn test_falls_back_on_unusable_output() {
        let director = NarrativeDirector::with_generator(Scripted {
            dialogue: Ok("   ".to_string()),
            behavior: Ok("She just stands there, I think.".to_string()),
        });
        let offline = OfflineGenerator::new();

        let request = DialogueRequest::new(context(), "Hello");
        assert_eq!(director.dialogue(&request), offline.dialogue_line(&request));

        let request = BehaviorRequest::new(context(), "A scream");
        assert_eq!(director.behavior(&request).action, "wait");
    }

    #[test]
    fn test_offline_director() {
        let director = NarrativeDirector::offline();
        assert!(!director.has_generator());
        assert!(!director.dialogue(&DialogueRequest::new(context(), "Hello")).is_empty());
    }
}
