//! Reconciliation of model-generated place extractions.
//!
//! Raw generator text flows through:
//! - [`decode`]: fence stripping and JSON decoding
//! - [`normalize`]: recursive key lowercasing
//! - [`coerce`]: additive shape repair on the generic tree
//! - [`builder`]: strict typed model construction
//! - [`enrich`]: fill-if-empty geocoding merge
//! - [`summary`]: lean summary projection
//!
//! [`keywords`] is a standalone fallback for callers that find no takeaways.

pub mod builder;
pub mod coerce;
pub mod decode;
pub mod enrich;
pub mod error;
pub mod keywords;
pub mod normalize;
pub mod summary;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use placeclip_models::CompilationResult;

pub use builder::build_compilation;
pub use coerce::coerce_compilation;
pub use decode::{decode_response, strip_code_fence};
pub use enrich::{
    enrich_activity, enrich_compilation, merge_geo_match, needs_enrichment, EnrichmentOutcome,
    EnrichmentReport, GeoMatch, GeocodeQuery, Geocoder, NoopGeocoder,
};
pub use error::{ErrorKind, ExtractError, ExtractResult, GeocodeError};
pub use keywords::{fallback_takeaways, DEFAULT_KEYWORD_COUNT};
pub use normalize::{normalize_keys, normalize_map};
pub use summary::{
    category_detail, feedback_takeaways, summarize, summarize_activity, summarize_activity_with,
};

/// Parse generator text, reporting why nothing could be extracted.
pub fn try_parse(text: &str) -> ExtractResult<CompilationResult> {
    let raw = decode_response(text)?;
    reconcile(raw)
}

/// Reconcile an already decoded object.
pub fn reconcile(raw: Map<String, Value>) -> ExtractResult<CompilationResult> {
    let coerced = coerce_compilation(normalize_map(raw));
    let result = build_compilation(&coerced)?;
    debug!(
        content_type = %result.content_type,
        activity_count = result.activities.len(),
        "Reconciled extraction"
    );
    Ok(result)
}

/// Parse generator text, degrading to the error envelope on any failure.
pub fn parse(text: &str) -> CompilationResult {
    try_parse(text).unwrap_or_else(|e| degrade(&e))
}

/// The error envelope for a failed extraction.
pub fn degrade(error: &ExtractError) -> CompilationResult {
    warn!(kind = error.kind().as_str(), "Extraction degraded: {}", error);
    CompilationResult::failed(error.to_string())
}
