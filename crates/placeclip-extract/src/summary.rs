//! Lean summary projection.

use placeclip_models::{
    ActivityRecord, CompilationResult, RatingsFeedback, SummaryDocument, SummaryRecord,
};

/// Keys probed for `category_detail`, restaurant vocabulary first.
pub const CATEGORY_PRIORITY: [&str; 7] = [
    "category_detail",
    "cuisine",
    "cuisine_type",
    "cuisine_style",
    "activity_type",
    "activity_subtype",
    "subtype",
];

/// Project every activity of a compilation.
pub fn summarize(result: &CompilationResult) -> SummaryDocument {
    SummaryDocument::new(result.activities.iter().map(summarize_activity).collect())
}

pub fn summarize_activity(activity: &ActivityRecord) -> SummaryRecord {
    summarize_activity_with(activity, activity.key_takeaways.clone())
}

/// Project an activity with takeaways chosen by the caller.
pub fn summarize_activity_with(
    activity: &ActivityRecord,
    key_takeaways: Vec<String>,
) -> SummaryRecord {
    SummaryRecord {
        place_name: activity.place_name.clone(),
        genre: activity.genre.clone(),
        category_detail: category_detail(activity),
        address: activity.availability.one_line(),
        key_takeaways,
    }
}

/// First value among [`CATEGORY_PRIORITY`] that is non-empty after trimming,
/// returned trimmed, or "".
pub fn category_detail(activity: &ActivityRecord) -> String {
    CATEGORY_PRIORITY
        .iter()
        .filter_map(|key| activity.category_value(key))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Flatten feedback into takeaway lines.
///
/// The four general buckets come first, then `"{dish}: {feedback}"` for
/// every dish with feedback text.
pub fn feedback_takeaways(ratings: &RatingsFeedback) -> Vec<String> {
    let mut takeaways: Vec<String> = ratings
        .general()
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect();

    for dish in &ratings.specific_dish_feedback {
        let Some(feedback) = dish.feedback.as_deref().map(str::trim) else {
            continue;
        };
        if feedback.is_empty() {
            continue;
        }
        let name = match dish.dish_name.trim() {
            "" => "Dish",
            name => name,
        };
        takeaways.push(format!("{name}: {feedback}"));
    }

    takeaways
}
