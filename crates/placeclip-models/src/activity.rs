//! A single extracted place or activity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Availability, ConfidenceScores, DishesInfo, RatingsFeedback};

/// Alternate category keys the generator uses instead of `cuisine`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CategoryHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl CategoryHints {
    /// Keys carried by this struct.
    pub const KEYS: [&'static str; 6] = [
        "category_detail",
        "cuisine_type",
        "cuisine_style",
        "activity_type",
        "activity_subtype",
        "subtype",
    ];

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "category_detail" => self.category_detail.as_deref(),
            "cuisine_type" => self.cuisine_type.as_deref(),
            "cuisine_style" => self.cuisine_style.as_deref(),
            "activity_type" => self.activity_type.as_deref(),
            "activity_subtype" => self.activity_subtype.as_deref(),
            "subtype" => self.subtype.as_deref(),
            _ => None,
        }
    }

    /// Set a hint by key. Returns false for a key this struct does not carry.
    pub fn set(&mut self, key: &str, value: Option<String>) -> bool {
        let slot = match key {
            "category_detail" => &mut self.category_detail,
            "cuisine_type" => &mut self.cuisine_type,
            "cuisine_style" => &mut self.cuisine_style,
            "activity_type" => &mut self.activity_type,
            "activity_subtype" => &mut self.activity_subtype,
            "subtype" => &mut self.subtype,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// One venue or event mentioned in a video, in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActivityRecord {
    pub place_name: String,

    /// restaurant, cafe, bar, museum, hike, event, ...
    pub genre: String,

    #[serde(default)]
    pub cuisine: Option<String>,

    #[serde(default)]
    pub vibes: Option<String>,

    /// Specific sub-activities (hiking, spa, concert)
    #[serde(default)]
    pub activities: Vec<String>,

    #[serde(default)]
    pub key_takeaways: Vec<String>,

    #[serde(default)]
    pub availability: Availability,

    /// speech, OCR, captions
    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub ratings_feedback: RatingsFeedback,

    #[serde(default)]
    pub dishes: DishesInfo,

    #[serde(default)]
    pub confidence: ConfidenceScores,

    #[serde(flatten, default)]
    pub category_hints: CategoryHints,
}

impl ActivityRecord {
    /// Create a record with only the required fields set.
    pub fn new(place_name: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            place_name: place_name.into(),
            genre: genre.into(),
            cuisine: None,
            vibes: None,
            activities: Vec::new(),
            key_takeaways: Vec::new(),
            availability: Availability::default(),
            sources: Vec::new(),
            ratings_feedback: RatingsFeedback::default(),
            dishes: DishesInfo::default(),
            confidence: ConfidenceScores::default(),
            category_hints: CategoryHints::default(),
        }
    }

    /// Value of a category key, including `cuisine`.
    pub fn category_value(&self, key: &str) -> Option<&str> {
        match key {
            "cuisine" => self.cuisine.as_deref(),
            other => self.category_hints.get(other),
        }
    }
}
