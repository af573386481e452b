//! Lean summary view persisted and served to clients.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condensed projection of one activity.
///
/// Serialized keys are exactly `place_name`, `genre`, `category_detail`,
/// `address` and `key_takeaways`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryRecord {
    pub place_name: String,
    pub genre: String,
    /// Cuisine for food places, sub-type for everything else
    pub category_detail: String,
    pub address: String,
    pub key_takeaways: Vec<String>,
}

/// The persisted artifact: `{"activities": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryDocument {
    pub activities: Vec<SummaryRecord>,
}

impl SummaryDocument {
    pub fn new(activities: Vec<SummaryRecord>) -> Self {
        Self { activities }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
