//! Per-field confidence scores.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The fields the extractor scores.
pub const CONFIDENCE_FIELDS: [&str; 8] = [
    "place_name",
    "genre",
    "cuisine",
    "vibes",
    "activities",
    "availability",
    "ratings_feedback",
    "dishes",
];

/// Confidence in [0.0, 1.0] for each scored field, 0.0 when unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfidenceScores {
    pub place_name: f64,
    pub genre: f64,
    pub cuisine: f64,
    pub vibes: f64,
    pub activities: f64,
    pub availability: f64,
    pub ratings_feedback: f64,
    pub dishes: f64,
}

impl ConfidenceScores {
    /// Look up a score by field name.
    pub fn get(&self, field: &str) -> Option<f64> {
        match field {
            "place_name" => Some(self.place_name),
            "genre" => Some(self.genre),
            "cuisine" => Some(self.cuisine),
            "vibes" => Some(self.vibes),
            "activities" => Some(self.activities),
            "availability" => Some(self.availability),
            "ratings_feedback" => Some(self.ratings_feedback),
            "dishes" => Some(self.dishes),
            _ => None,
        }
    }

    /// Set a score by field name. Returns false for an unknown field.
    pub fn set(&mut self, field: &str, score: f64) -> bool {
        let slot = match field {
            "place_name" => &mut self.place_name,
            "genre" => &mut self.genre,
            "cuisine" => &mut self.cuisine,
            "vibes" => &mut self.vibes,
            "activities" => &mut self.activities,
            "availability" => &mut self.availability,
            "ratings_feedback" => &mut self.ratings_feedback,
            "dishes" => &mut self.dishes,
            _ => return false,
        };
        *slot = score;
        true
    }
}
