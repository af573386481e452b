//! Typed model construction from the coerced tree.
//!
//! This is the one place where upstream shape variance is absorbed. Inputs
//! it cannot coerce become [`ExtractError::StructuralMismatch`] carrying the
//! path of the offending value.

use serde_json::{Map, Value};

use placeclip_models::{
    ActivityRecord, Availability, CategoryHints, CompilationResult, ConfidenceScores, DishEntry,
    DishesInfo, RatingsFeedback, SpecificDishFeedback, CONFIDENCE_FIELDS, DEFAULT_CONTENT_TYPE,
};

use crate::coerce::kind_of;
use crate::error::{ExtractError, ExtractResult};

/// Build the canonical [`CompilationResult`] from a coerced tree.
pub fn build_compilation(root: &Map<String, Value>) -> ExtractResult<CompilationResult> {
    let fields = Fields::new(root, "");

    let content_type = fields
        .optional_string("content_type")?
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let activities = match fields.get("activities") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let path = format!("activities[{index}]");
                match item {
                    Value::Object(map) => build_activity(&Fields::new(map, path)),
                    other => Err(expected(&path, "object", other)),
                }
            })
            .collect::<ExtractResult<Vec<_>>>()?,
        Some(other) => return Err(expected("activities", "array", other)),
    };

    Ok(CompilationResult::new(content_type, activities))
}

fn build_activity(fields: &Fields<'_>) -> ExtractResult<ActivityRecord> {
    let mut category_hints = CategoryHints::default();
    for key in CategoryHints::KEYS {
        category_hints.set(key, fields.lenient_string(key));
    }

    Ok(ActivityRecord {
        place_name: fields.required_string("place_name")?,
        genre: fields.required_string("genre")?,
        cuisine: fields.optional_string("cuisine")?,
        vibes: fields.optional_string("vibes")?,
        activities: fields.string_list("activities")?,
        key_takeaways: fields.string_list("key_takeaways")?,
        availability: build_availability(fields)?,
        sources: fields.string_list("sources")?,
        ratings_feedback: build_ratings_feedback(fields)?,
        dishes: RawDishes::classify(fields, "dishes")?.resolve()?,
        confidence: build_confidence(fields.get("confidence")),
        category_hints,
    })
}

fn build_availability(fields: &Fields<'_>) -> ExtractResult<Availability> {
    let Some(avail) = fields.object("availability")? else {
        return Ok(Availability::default());
    };

    Ok(Availability {
        street_address: avail.string_or_empty("street_address")?,
        city: avail.string_or_empty("city")?,
        county: avail.string_or_empty("county")?,
        state: avail.string_or_empty("state")?,
        country: avail.string_or_empty("country")?,
        region: avail.string_or_empty("region")?,
    })
}

fn build_ratings_feedback(fields: &Fields<'_>) -> ExtractResult<RatingsFeedback> {
    let Some(ratings) = fields.object("ratings_feedback")? else {
        return Ok(RatingsFeedback::default());
    };

    let specific_dish_feedback = ratings
        .objects("specific_dish_feedback")?
        .iter()
        .map(|dish| -> ExtractResult<SpecificDishFeedback> {
            Ok(SpecificDishFeedback {
                dish_name: dish.required_string("dish_name")?,
                feedback: dish.optional_string("feedback")?,
            })
        })
        .collect::<ExtractResult<Vec<_>>>()?;

    Ok(RatingsFeedback {
        service_feedback: ratings.optional_string("service_feedback")?,
        food_feedback: ratings.optional_string("food_feedback")?,
        vibes_feedback: ratings.optional_string("vibes_feedback")?,
        miscellaneous_feedback: ratings.optional_string("miscellaneous_feedback")?,
        specific_dish_feedback,
    })
}

/// Confidence values are clamped into [0.0, 1.0]; anything that is not a
/// finite number (or numeric string) scores 0.0.
fn build_confidence(value: Option<&Value>) -> ConfidenceScores {
    let mut scores = ConfidenceScores::default();
    let Some(Value::Object(map)) = value else {
        return scores;
    };

    for field in CONFIDENCE_FIELDS {
        let score = map.get(field).map(coerce_score).unwrap_or(0.0);
        scores.set(field, score);
    }
    scores
}

fn coerce_score(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// The two dish representations the generator emits.
///
/// Resolved once here; only [`DishesInfo`] leaves this module.
enum RawDishes<'a> {
    Bucketed(Fields<'a>),
    Flat { path: String, entries: &'a [Value] },
    Missing,
}

impl<'a> RawDishes<'a> {
    fn classify(fields: &Fields<'a>, key: &str) -> ExtractResult<Self> {
        let path = fields.at(key);
        match fields.get(key) {
            None => Ok(Self::Missing),
            Some(Value::Array(entries)) => Ok(Self::Flat { path, entries }),
            Some(Value::Object(map)) => Ok(Self::Bucketed(Fields::new(map, path))),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(Self::Missing),
            Some(Value::Bool(false)) => Ok(Self::Missing),
            Some(other) => Err(expected(&path, "dish list or buckets", other)),
        }
    }

    fn resolve(self) -> ExtractResult<DishesInfo> {
        match self {
            Self::Missing => Ok(DishesInfo::default()),
            Self::Flat { path, entries } => {
                let mut dishes = Vec::with_capacity(entries.len());
                for (index, entry) in entries.iter().enumerate() {
                    let Value::Object(map) = entry else {
                        continue;
                    };
                    let fields = Fields::new(map, format!("{path}[{index}]"));
                    // Entries in neither bucket are dropped unvalidated.
                    if !fields.flag("mentioned")? && !fields.flag("shown")? {
                        continue;
                    }
                    dishes.push(dish_entry(&fields)?);
                }
                Ok(DishesInfo::from_flat(dishes))
            }
            Self::Bucketed(buckets) => Ok(DishesInfo {
                explicitly_mentioned: bucket(&buckets, "explicitly_mentioned")?,
                visually_shown: bucket(&buckets, "visually_shown")?,
            }),
        }
    }
}

fn bucket(buckets: &Fields<'_>, key: &str) -> ExtractResult<Vec<DishEntry>> {
    buckets.objects(key)?.iter().map(dish_entry).collect()
}

fn dish_entry(fields: &Fields<'_>) -> ExtractResult<DishEntry> {
    Ok(DishEntry {
        dish_name: fields.required_string("dish_name")?,
        mentioned: fields.flag("mentioned")?,
        shown: fields.flag("shown")?,
        feedback: fields.optional_string("feedback")?,
    })
}

fn expected(path: &str, wanted: &str, found: &Value) -> ExtractError {
    ExtractError::mismatch(format!("{path}: expected {wanted}, found {}", kind_of(found)))
}

/// Text for a scalar; numbers and booleans are rendered, containers have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Typed accessors over one object, remembering its path for errors.
///
/// A `null` value reads the same as a missing key.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Fields<'a> {
    fn new(map: &'a Map<String, Value>, path: impl Into<String>) -> Self {
        Self {
            map,
            path: path.into(),
        }
    }

    fn at(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn required_string(&self, key: &str) -> ExtractResult<String> {
        match self.get(key) {
            Some(value) => scalar_text(value).ok_or_else(|| expected(&self.at(key), "string", value)),
            None => Err(ExtractError::mismatch(format!(
                "{}: required field missing",
                self.at(key)
            ))),
        }
    }

    fn optional_string(&self, key: &str) -> ExtractResult<Option<String>> {
        self.get(key)
            .map(|value| scalar_text(value).ok_or_else(|| expected(&self.at(key), "string", value)))
            .transpose()
    }

    fn string_or_empty(&self, key: &str) -> ExtractResult<String> {
        Ok(self.optional_string(key)?.unwrap_or_default())
    }

    /// Like `optional_string`, but values of the wrong kind read as absent.
    fn lenient_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    /// A bare string, even a blank one, becomes a one-element list.
    fn string_list(&self, key: &str) -> ExtractResult<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::Null => {}
                        other => out.push(scalar_text(other).ok_or_else(|| {
                            expected(&format!("{}[{index}]", self.at(key)), "string", other)
                        })?),
                    }
                }
                Ok(out)
            }
            Some(other) => Err(expected(&self.at(key), "string or list of strings", other)),
        }
    }

    fn flag(&self, key: &str) -> ExtractResult<bool> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(true),
                "false" | "no" | "n" | "0" | "" => Ok(false),
                _ => Err(ExtractError::mismatch(format!(
                    "{}: expected boolean, found \"{s}\"",
                    self.at(key)
                ))),
            },
            Some(other) => Err(expected(&self.at(key), "boolean", other)),
        }
    }

    fn object(&self, key: &str) -> ExtractResult<Option<Fields<'a>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Fields::new(map, self.at(key)))),
            Some(other) => Err(expected(&self.at(key), "object", other)),
        }
    }

    /// A list whose elements must all be objects.
    fn objects(&self, key: &str) -> ExtractResult<Vec<Fields<'a>>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let path = format!("{}[{index}]", self.at(key));
                    match item {
                        Value::Object(map) => Ok(Fields::new(map, path)),
                        other => Err(expected(&path, "object", other)),
                    }
                })
                .collect(),
            Some(other) => Err(expected(&self.at(key), "array", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn build(value: Value) -> ExtractResult<CompilationResult> {
        match value {
            Value::Object(map) => build_compilation(&map),
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    fn single(activity: Value) -> ActivityRecord {
        let mut result = build(json!({"activities": [activity]})).unwrap();
        result.activities.remove(0)
    }

    #[test]
    fn test_minimal_activity_gets_defaults() {
        let record = single(json!({"place_name": "Joe's Pizza", "genre": "restaurant"}));

        assert_eq!(record.place_name, "Joe's Pizza");
        assert!(record.key_takeaways.is_empty());
        assert!(record.sources.is_empty());
        assert_eq!(record.availability, Availability::default());
        assert_eq!(record.confidence, ConfidenceScores::default());
        assert!(record.dishes.is_empty());
    }

    #[test]
    fn test_content_type_defaults() {
        let result = build(json!({})).unwrap();
        assert_eq!(result.content_type, "Compilation");
        assert!(result.activities.is_empty());
    }

    #[test]
    fn test_scalar_activities_is_mismatch() {
        let err = build(json!({"activities": "Joe's Pizza"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
        assert!(err.detail().contains("activities"));
    }

    #[test]
    fn test_non_object_activity_is_mismatch() {
        let err = build(json!({"activities": [42]})).unwrap_err();
        assert_eq!(err.detail(), "activities[0]: expected object, found number");
    }

    #[test]
    fn test_missing_place_name_is_mismatch() {
        let err = build(json!({"activities": [{"genre": "bar"}]})).unwrap_err();
        assert_eq!(err.detail(), "activities[0].place_name: required field missing");
    }

    #[test]
    fn test_string_fields_wrap_into_lists() {
        let record = single(json!({
            "place_name": "Spa Town",
            "genre": "wellness",
            "sources": "captions",
            "activities": "massage",
            "key_takeaways": null
        }));

        assert_eq!(record.sources, vec!["captions"]);
        assert_eq!(record.activities, vec!["massage"]);
        assert!(record.key_takeaways.is_empty());
    }

    #[test]
    fn test_flat_dishes_are_bucketed() {
        let record = single(json!({
            "place_name": "Trattoria",
            "genre": "restaurant",
            "dishes": [
                {"dish_name": "Carbonara", "mentioned": true, "shown": false, "feedback": "Creamy"},
                {"dish_name": "Tiramisu", "mentioned": false, "shown": true},
                {"dish_name": "Burrata", "mentioned": true, "shown": true},
                {"dish_name": "Bread"},
                "stray text"
            ]
        }));

        let mentioned: Vec<_> = record
            .dishes
            .explicitly_mentioned
            .iter()
            .map(|d| d.dish_name.as_str())
            .collect();
        let shown: Vec<_> = record
            .dishes
            .visually_shown
            .iter()
            .map(|d| d.dish_name.as_str())
            .collect();

        assert_eq!(mentioned, vec!["Carbonara", "Burrata"]);
        assert_eq!(shown, vec!["Tiramisu", "Burrata"]);
        assert_eq!(
            record.dishes.explicitly_mentioned[0].feedback.as_deref(),
            Some("Creamy")
        );
    }

    #[test]
    fn test_bucketed_dishes_pass_through() {
        let record = single(json!({
            "place_name": "Izakaya",
            "genre": "bar",
            "dishes": {
                "explicitly_mentioned": [{"dish_name": "Karaage", "mentioned": true}],
                "visually_shown": null
            }
        }));

        assert_eq!(record.dishes.explicitly_mentioned.len(), 1);
        assert!(record.dishes.visually_shown.is_empty());
    }

    #[test]
    fn test_string_flags_are_coerced() {
        let record = single(json!({
            "place_name": "Diner",
            "genre": "restaurant",
            "dishes": [{"dish_name": "Pie", "mentioned": "yes", "shown": "false"}]
        }));
        assert_eq!(record.dishes.explicitly_mentioned.len(), 1);
        assert!(record.dishes.visually_shown.is_empty());
    }

    #[test]
    fn test_confidence_is_clamped_and_defaulted() {
        let record = single(json!({
            "place_name": "A",
            "genre": "park",
            "confidence": {
                "place_name": 1.7,
                "genre": -0.2,
                "cuisine": "0.4",
                "vibes": "high",
                "activities": null,
                "dishes": true,
                "unknown_field": 0.9
            }
        }));

        let c = record.confidence;
        assert_eq!(c.place_name, 1.0);
        assert_eq!(c.genre, 0.0);
        assert_eq!(c.cuisine, 0.4);
        assert_eq!(c.vibes, 0.0);
        assert_eq!(c.activities, 0.0);
        assert_eq!(c.availability, 0.0);
        assert_eq!(c.dishes, 0.0);
    }

    #[test]
    fn test_availability_nulls_become_empty() {
        let record = single(json!({
            "place_name": "A",
            "genre": "park",
            "availability": {"city": "Paris", "state": null}
        }));
        assert_eq!(record.availability.city, "Paris");
        assert_eq!(record.availability.state, "");
    }

    #[test]
    fn test_ratings_feedback_parsed() {
        let record = single(json!({
            "place_name": "A",
            "genre": "restaurant",
            "ratings_feedback": {
                "service_feedback": "Friendly staff",
                "specific_dish_feedback": [{"dish_name": "Ramen", "feedback": "Rich broth"}]
            }
        }));
        let ratings = record.ratings_feedback;
        assert_eq!(ratings.service_feedback.as_deref(), Some("Friendly staff"));
        assert_eq!(ratings.food_feedback, None);
        assert_eq!(ratings.specific_dish_feedback[0].dish_name, "Ramen");
    }

    #[test]
    fn test_category_hints_captured() {
        let record = single(json!({
            "place_name": "Skyline",
            "genre": "experience",
            "activity_type": "Tour",
            "subtype": ["not", "a", "string"]
        }));
        assert_eq!(record.category_hints.activity_type.as_deref(), Some("Tour"));
        assert_eq!(record.category_hints.subtype, None);
    }

    #[test]
    fn test_numeric_place_name_is_rendered() {
        let record = single(json!({"place_name": 1881, "genre": "bar"}));
        assert_eq!(record.place_name, "1881");
    }

    #[test]
    fn test_boolean_string_fields_are_rendered() {
        let record = single(json!({
            "place_name": "Spot",
            "genre": "bar",
            "vibes": true,
            "sources": [false, "captions"]
        }));
        assert_eq!(record.vibes.as_deref(), Some("true"));
        assert_eq!(record.sources, vec!["false", "captions"]);
    }

    #[test]
    fn test_blank_string_still_wraps_into_list() {
        let record = single(json!({
            "place_name": "Spot",
            "genre": "bar",
            "sources": "",
            "activities": " "
        }));
        assert_eq!(record.sources, vec![""]);
        assert_eq!(record.activities, vec![" "]);
    }

    #[test]
    fn test_unflagged_flat_dish_is_not_validated() {
        let record = single(json!({
            "place_name": "Osteria",
            "genre": "restaurant",
            "dishes": [
                {"dish_name": "Pasta", "mentioned": true},
                {"feedback": "nice plating"}
            ]
        }));
        assert_eq!(record.dishes.explicitly_mentioned.len(), 1);
        assert_eq!(record.dishes.explicitly_mentioned[0].dish_name, "Pasta");
        assert!(record.dishes.visually_shown.is_empty());
    }

    #[test]
    fn test_flagged_flat_dish_without_name_is_mismatch() {
        let err = build(json!({"activities": [{
            "place_name": "Osteria",
            "genre": "restaurant",
            "dishes": [{"shown": true}]
        }]}))
        .unwrap_err();
        assert_eq!(
            err.detail(),
            "activities[0].dishes[0].dish_name: required field missing"
        );
    }
}
