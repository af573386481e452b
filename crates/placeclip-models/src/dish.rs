//! Dishes seen or named in a video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One dish record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DishEntry {
    pub dish_name: String,

    /// Named in speech or captions
    #[serde(default)]
    pub mentioned: bool,

    /// Visible on screen
    #[serde(default)]
    pub shown: bool,

    /// Taste, texture, plating remarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl DishEntry {
    pub fn new(dish_name: impl Into<String>) -> Self {
        Self {
            dish_name: dish_name.into(),
            mentioned: false,
            shown: false,
            feedback: None,
        }
    }

    pub fn mentioned(mut self) -> Self {
        self.mentioned = true;
        self
    }

    pub fn shown(mut self) -> Self {
        self.shown = true;
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// Dishes split into the two buckets downstream consumers read.
///
/// An entry may sit in both buckets, one, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DishesInfo {
    pub explicitly_mentioned: Vec<DishEntry>,
    pub visually_shown: Vec<DishEntry>,
}

impl DishesInfo {
    /// Bucket a flat list by each entry's `mentioned` and `shown` flags.
    pub fn from_flat(entries: Vec<DishEntry>) -> Self {
        let explicitly_mentioned = entries.iter().filter(|d| d.mentioned).cloned().collect();
        let visually_shown = entries.into_iter().filter(|d| d.shown).collect();
        Self {
            explicitly_mentioned,
            visually_shown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.explicitly_mentioned.is_empty() && self.visually_shown.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_buckets_by_flags() {
        let dishes = DishesInfo::from_flat(vec![
            DishEntry::new("Carbonara").mentioned(),
            DishEntry::new("Tiramisu").shown(),
            DishEntry::new("Burrata").mentioned().shown(),
            DishEntry::new("Bread"),
        ]);

        let mentioned: Vec<_> = dishes
            .explicitly_mentioned
            .iter()
            .map(|d| d.dish_name.as_str())
            .collect();
        let shown: Vec<_> = dishes
            .visually_shown
            .iter()
            .map(|d| d.dish_name.as_str())
            .collect();

        assert_eq!(mentioned, vec!["Carbonara", "Burrata"]);
        assert_eq!(shown, vec!["Tiramisu", "Burrata"]);
    }

    #[test]
    fn test_feedback_omitted_when_absent() {
        let json = serde_json::to_value(DishEntry::new("Ramen")).unwrap();
        assert!(json.get("feedback").is_none());
        assert_eq!(json["mentioned"], false);
    }
}
