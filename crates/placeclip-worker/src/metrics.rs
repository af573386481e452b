//! Worker metrics.
//!
//! Counters only; exporting them is left to whoever installs a recorder.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Extraction jobs by outcome.
    pub const JOBS_TOTAL: &str = "placeclip_jobs_total";

    /// Activities produced by successful extractions.
    pub const ACTIVITIES_EXTRACTED_TOTAL: &str = "placeclip_activities_extracted_total";

    /// Geocoding lookups by outcome.
    pub const GEOCODE_LOOKUPS_TOTAL: &str = "placeclip_geocode_lookups_total";

    /// Generator calls by model and outcome.
    pub const GENERATOR_CALLS_TOTAL: &str = "placeclip_generator_calls_total";

    /// Collaborator retry attempts by operation.
    pub const RETRIES_TOTAL: &str = "placeclip_retries_total";
}

pub fn record_job(outcome: &str) {
    counter!(names::JOBS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

pub fn record_activities(count: usize) {
    counter!(names::ACTIVITIES_EXTRACTED_TOTAL).increment(count as u64);
}

pub fn record_geocode_lookup(outcome: &str) {
    counter!(names::GEOCODE_LOOKUPS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

pub fn record_generator_call(model: &str, outcome: &str) {
    counter!(
        names::GENERATOR_CALLS_TOTAL,
        "model" => model.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_retry(operation: &str) {
    counter!(names::RETRIES_TOTAL, "operation" => operation.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::JOBS_TOTAL.starts_with("placeclip_"));
        assert!(names::GEOCODE_LOOKUPS_TOTAL.contains("geocode"));
        assert!(names::GENERATOR_CALLS_TOTAL.contains("generator"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_job("extracted");
        record_activities(3);
        record_geocode_lookup("merged");
        record_generator_call("gemini-2.5-flash", "success");
        record_retry("generate");
    }
}
