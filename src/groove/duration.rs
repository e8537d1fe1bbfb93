// Duration vocabulary
// Maps duration classes to the numeric tokens the notation uses

use serde::{Deserialize, Serialize};

use crate::events::DurationClass;

/// One supported duration and its notation token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationEntry {
    pub class: DurationClass,
    pub token: String,
}

/// The set of durations a conversion may produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationVocabulary {
    entries: Vec<DurationEntry>,
}

impl Default for DurationVocabulary {
    fn default() -> Self {
        DurationVocabulary::new(vec![
            (DurationClass::Quarter, "4"),
            (DurationClass::Eighth, "8"),
            (DurationClass::Sixteenth, "16"),
        ])
    }
}

impl DurationVocabulary {
    pub fn new<S: Into<String>>(entries: Vec<(DurationClass, S)>) -> Self {
        DurationVocabulary {
            entries: entries
                .into_iter()
                .map(|(class, token)| DurationEntry {
                    class,
                    token: token.into(),
                })
                .collect(),
        }
    }

    /// Default set plus thirty-second notes
    pub fn with_thirty_seconds() -> Self {
        let mut vocabulary = Self::default();
        vocabulary.entries.push(DurationEntry {
            class: DurationClass::ThirtySecond,
            token: "32".to_string(),
        });
        vocabulary
    }

    pub fn entries(&self) -> &[DurationEntry] {
        &self.entries
    }

    pub fn token(&self, class: DurationClass) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.class == class)
            .map(|e| e.token.as_str())
    }

    /// Supported class whose ratio equals `ratio`
    pub fn class_for_ratio(&self, ratio: u64) -> Option<DurationClass> {
        self.entries
            .iter()
            .map(|e| e.class)
            .find(|c| c.ticks_ratio() == ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tokens() {
        let vocabulary = DurationVocabulary::default();
        assert_eq!(vocabulary.token(DurationClass::Quarter), Some("4"));
        assert_eq!(vocabulary.token(DurationClass::Eighth), Some("8"));
        assert_eq!(vocabulary.token(DurationClass::Sixteenth), Some("16"));
        assert_eq!(vocabulary.token(DurationClass::ThirtySecond), None);
    }

    #[test]
    fn test_class_for_ratio_respects_vocabulary() {
        let vocabulary = DurationVocabulary::default();
        assert_eq!(vocabulary.class_for_ratio(4), Some(DurationClass::Sixteenth));
        assert_eq!(vocabulary.class_for_ratio(8), None);

        let extended = DurationVocabulary::with_thirty_seconds();
        assert_eq!(extended.class_for_ratio(8), Some(DurationClass::ThirtySecond));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(DurationVocabulary::default()).unwrap();
        assert_eq!(json[0]["class"], "quarter");
        assert_eq!(json[2]["token"], "16");
    }
}
