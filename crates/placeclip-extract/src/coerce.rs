//! Shape repair over the normalized generic tree.
//!
//! Every step here only adds missing keys or rewraps values into the form
//! the typed builder expects. A value that is already present is never
//! replaced, so well-formed and broken activities can sit side by side in
//! one response.

use serde_json::{json, Map, Value};
use tracing::debug;

use placeclip_models::{AVAILABILITY_FIELDS, CONFIDENCE_FIELDS, DEFAULT_CONTENT_TYPE};

/// Repair one compilation's worth of normalized output.
pub fn coerce_compilation(mut root: Map<String, Value>) -> Map<String, Value> {
    resolve_content_type(&mut root);

    let fallback_takeaways = takeaway_pool(root.get("key_takeaways"));

    resolve_activities(&mut root);

    if let Some(Value::Array(activities)) = root.get_mut("activities") {
        for (index, activity) in activities.iter_mut().enumerate() {
            match activity {
                Value::Object(fields) => coerce_activity(index, fields, &fallback_takeaways),
                other => debug!(index, kind = kind_of(other), "Skipping non-object activity"),
            }
        }
    }

    root
}

fn resolve_content_type(root: &mut Map<String, Value>) {
    if root.contains_key("content_type") {
        return;
    }
    let content_type = match root.remove("primary_content_type") {
        Some(alias) => {
            debug!("Renamed primary_content_type to content_type");
            alias
        }
        None => Value::String(DEFAULT_CONTENT_TYPE.to_string()),
    };
    root.insert("content_type".to_string(), content_type);
}

/// Top-level takeaways, offered to activities that have none of their own.
fn takeaway_pool(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => json!([s]),
        Some(Value::Array(items)) => Value::Array(items.clone()),
        _ => json!([]),
    }
}

fn resolve_activities(root: &mut Map<String, Value>) {
    if !matches!(root.get("activities"), None | Some(Value::Null)) {
        return;
    }

    let activities = if root.contains_key("place_name") {
        debug!("Wrapping single-activity response into activities");
        let mut single = root.clone();
        single.remove("activities");
        json!([single])
    } else {
        json!([])
    };
    root.insert("activities".to_string(), activities);
}

fn coerce_activity(index: usize, activity: &mut Map<String, Value>, fallback: &Value) {
    let takeaways = match activity.get("key_takeaways") {
        None => Some(fallback.clone()),
        Some(value) if is_falsy(value) => {
            debug!(index, "Replacing empty key_takeaways with top-level pool");
            Some(fallback.clone())
        }
        Some(Value::String(s)) => Some(json!([s])),
        Some(_) => None,
    };
    if let Some(takeaways) = takeaways {
        activity.insert("key_takeaways".to_string(), takeaways);
    }

    fill_defaults(activity, "availability", &AVAILABILITY_FIELDS, || json!(""));
    fill_defaults(activity, "confidence", &CONFIDENCE_FIELDS, || json!(0.0));

    if matches!(activity.get("ratings_feedback"), None | Some(Value::Null)) {
        debug!(index, "Synthesizing empty ratings_feedback");
        activity.insert(
            "ratings_feedback".to_string(),
            json!({
                "service_feedback": null,
                "food_feedback": null,
                "specific_dish_feedback": [],
                "vibes_feedback": null,
                "miscellaneous_feedback": null,
            }),
        );
    }
}

/// Ensure `activity[section]` is an object holding every key in `fields`.
///
/// A missing or null section becomes an empty object first. Any other
/// non-object value is left for the builder to reject.
fn fill_defaults(
    activity: &mut Map<String, Value>,
    section: &str,
    fields: &[&str],
    default: impl Fn() -> Value,
) {
    let entry = activity
        .entry(section.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if entry.is_null() {
        *entry = Value::Object(Map::new());
    }

    if let Value::Object(map) = entry {
        for field in fields {
            if !map.contains_key(*field) {
                map.insert(field.to_string(), default());
            }
        }
    }
}

/// Python-style truthiness: null, false, zero, and empty containers are falsy.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce(value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(coerce_compilation(map)),
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn test_content_type_defaults_to_compilation() {
        let out = coerce(json!({}));
        assert_eq!(out["content_type"], "Compilation");
        assert_eq!(out["activities"], json!([]));
    }

    #[test]
    fn test_primary_content_type_is_renamed() {
        let out = coerce(json!({"primary_content_type": "Restaurant Visit"}));
        assert_eq!(out["content_type"], "Restaurant Visit");
        assert!(out.get("primary_content_type").is_none());
    }

    #[test]
    fn test_existing_content_type_kept() {
        let out = coerce(json!({"content_type": "Food Tour", "primary_content_type": "Other"}));
        assert_eq!(out["content_type"], "Food Tour");
    }

    #[test]
    fn test_single_activity_is_wrapped() {
        let out = coerce(json!({
            "place_name": "Joe's Pizza",
            "genre": "restaurant",
            "availability": {"city": "NYC"}
        }));

        let activities = out["activities"].as_array().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0]["place_name"], "Joe's Pizza");
        assert_eq!(activities[0]["availability"]["city"], "NYC");
        assert_eq!(activities[0]["availability"]["street_address"], "");
    }

    #[test]
    fn test_availability_present_values_not_overwritten() {
        let out = coerce(json!({
            "activities": [{
                "place_name": "Louvre",
                "genre": "museum",
                "availability": {"city": "Paris", "country": ""}
            }]
        }));

        let avail = &out["activities"][0]["availability"];
        assert_eq!(avail["city"], "Paris");
        assert_eq!(avail["country"], "");
        for field in AVAILABILITY_FIELDS {
            assert!(avail.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn test_confidence_filled_without_overwrite() {
        let out = coerce(json!({
            "activities": [{"place_name": "A", "genre": "bar", "confidence": {"genre": 0.9}}]
        }));

        let conf = out["activities"][0]["confidence"].as_object().unwrap();
        assert_eq!(conf.len(), 8);
        assert_eq!(conf["genre"], 0.9);
        assert_eq!(conf["dishes"], 0.0);
    }

    #[test]
    fn test_ratings_feedback_synthesized() {
        let out = coerce(json!({"activities": [{"place_name": "A", "genre": "bar"}]}));
        assert_eq!(
            out["activities"][0]["ratings_feedback"],
            json!({
                "service_feedback": null,
                "food_feedback": null,
                "specific_dish_feedback": [],
                "vibes_feedback": null,
                "miscellaneous_feedback": null
            })
        );
    }

    #[test]
    fn test_takeaways_fall_back_to_top_level_pool() {
        let out = coerce(json!({
            "key_takeaways": "Go early",
            "activities": [
                {"place_name": "A", "genre": "cafe"},
                {"place_name": "B", "genre": "cafe", "key_takeaways": []},
                {"place_name": "C", "genre": "cafe", "key_takeaways": "Order the latte"},
                {"place_name": "D", "genre": "cafe", "key_takeaways": ["Sit outside"]}
            ]
        }));

        let acts = &out["activities"];
        assert_eq!(acts[0]["key_takeaways"], json!(["Go early"]));
        assert_eq!(acts[1]["key_takeaways"], json!(["Go early"]));
        assert_eq!(acts[2]["key_takeaways"], json!(["Order the latte"]));
        assert_eq!(acts[3]["key_takeaways"], json!(["Sit outside"]));
    }

    #[test]
    fn test_mixed_shape_activities_repaired_per_element() {
        let out = coerce(json!({
            "activities": [
                {
                    "place_name": "Full",
                    "genre": "park",
                    "key_takeaways": ["Bring water"],
                    "availability": {
                        "street_address": "1 Park Rd", "city": "X", "county": "",
                        "state": "Y", "country": "Z", "region": ""
                    },
                    "ratings_feedback": {"vibes_feedback": "Calm"}
                },
                {"place_name": "Bare", "genre": "park"},
                "not an activity"
            ]
        }));

        let acts = out["activities"].as_array().unwrap();
        assert_eq!(acts[0]["availability"]["street_address"], "1 Park Rd");
        assert_eq!(acts[0]["ratings_feedback"], json!({"vibes_feedback": "Calm"}));
        assert_eq!(acts[1]["availability"]["city"], "");
        assert_eq!(acts[2], "not an activity");
    }

    #[test]
    fn test_non_array_activities_left_for_builder() {
        let out = coerce(json!({"activities": "Joe's Pizza"}));
        assert_eq!(out["activities"], "Joe's Pizza");
    }
}
