//! Creator reactions grouped by topic.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Feedback tied to a single dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpecificDishFeedback {
    pub dish_name: String,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Ratings and feedback for one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RatingsFeedback {
    /// Staff quality, speed, attentiveness
    pub service_feedback: Option<String>,
    /// Food in general, not tied to a dish
    pub food_feedback: Option<String>,
    /// Decor, noise, crowd
    pub vibes_feedback: Option<String>,
    pub miscellaneous_feedback: Option<String>,
    pub specific_dish_feedback: Vec<SpecificDishFeedback>,
}

impl RatingsFeedback {
    /// The four free-text buckets in display order.
    pub fn general(&self) -> [Option<&str>; 4] {
        [
            self.service_feedback.as_deref(),
            self.food_feedback.as_deref(),
            self.vibes_feedback.as_deref(),
            self.miscellaneous_feedback.as_deref(),
        ]
    }
}
