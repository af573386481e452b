//! Best-effort geocoding enrichment.
//!
//! Lookups fill address parts that are still empty and never overwrite
//! known data. A failed or empty lookup leaves the record as it was.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use placeclip_models::{ActivityRecord, Availability, CompilationResult};

use crate::error::GeocodeError;

/// What the geocoder is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub place_name: String,
    pub genre: Option<String>,
    /// Locality hint, taken from the record's city
    pub hint: Option<String>,
}

impl GeocodeQuery {
    pub fn for_activity(activity: &ActivityRecord) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        Self {
            place_name: activity.place_name.clone(),
            genre: non_empty(&activity.genre),
            hint: non_empty(&activity.availability.city),
        }
    }

    /// Free-text query: name, genre and hint joined by single spaces.
    pub fn query_text(&self) -> String {
        [
            Some(self.place_name.as_str()),
            self.genre.as_deref(),
            self.hint.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// A geocoder hit. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub display_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Geocoding collaborator.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up a place. `Ok(None)` means no match.
    async fn lookup(&self, query: &GeocodeQuery) -> Result<Option<GeoMatch>, GeocodeError>;
}

/// Geocoder that never finds anything; used when geocoding is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGeocoder;

#[async_trait]
impl Geocoder for NoopGeocoder {
    async fn lookup(&self, _query: &GeocodeQuery) -> Result<Option<GeoMatch>, GeocodeError> {
        Ok(None)
    }
}

/// True when the record has a name to search for and no street address yet.
pub fn needs_enrichment(activity: &ActivityRecord) -> bool {
    !activity.place_name.trim().is_empty() && activity.availability.street_address.is_empty()
}

/// Fill empty address parts from a geocoder hit.
///
/// `street_address` takes the hit's display address. Populated parts are
/// left alone. Returns how many parts were filled.
pub fn merge_geo_match(availability: &mut Availability, geo: &GeoMatch) -> usize {
    let pairs = [
        (&mut availability.street_address, &geo.display_address),
        (&mut availability.city, &geo.city),
        (&mut availability.state, &geo.state),
        (&mut availability.country, &geo.country),
        (&mut availability.region, &geo.region),
    ];

    let mut filled = 0;
    for (slot, candidate) in pairs {
        if let Some(value) = candidate.as_deref().map(str::trim) {
            if slot.is_empty() && !value.is_empty() {
                *slot = value.to_string();
                filled += 1;
            }
        }
    }
    filled
}

/// Result of enriching one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Nothing to look up
    Skipped,
    /// Lookup found a match; holds the number of parts filled
    Merged(usize),
    NoMatch,
    Failed,
}

/// Totals over one compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub skipped: usize,
    pub looked_up: usize,
    pub merged: usize,
    pub no_match: usize,
    pub failed: usize,
    pub fields_filled: usize,
}

impl EnrichmentReport {
    fn record(&mut self, outcome: EnrichmentOutcome) {
        match outcome {
            EnrichmentOutcome::Skipped => self.skipped += 1,
            EnrichmentOutcome::Merged(filled) => {
                self.looked_up += 1;
                self.merged += 1;
                self.fields_filled += filled;
            }
            EnrichmentOutcome::NoMatch => {
                self.looked_up += 1;
                self.no_match += 1;
            }
            EnrichmentOutcome::Failed => {
                self.looked_up += 1;
                self.failed += 1;
            }
        }
    }
}

/// Enrich one activity with at most one lookup.
pub async fn enrich_activity(
    activity: &mut ActivityRecord,
    geocoder: &dyn Geocoder,
) -> EnrichmentOutcome {
    if !needs_enrichment(activity) {
        return EnrichmentOutcome::Skipped;
    }

    let query = GeocodeQuery::for_activity(activity);
    match geocoder.lookup(&query).await {
        Ok(Some(geo)) => {
            let filled = merge_geo_match(&mut activity.availability, &geo);
            debug!(place_name = %activity.place_name, filled, "Merged geocoding result");
            EnrichmentOutcome::Merged(filled)
        }
        Ok(None) => {
            debug!(query = %query.query_text(), "No geocoding match");
            EnrichmentOutcome::NoMatch
        }
        Err(e) => {
            warn!(place_name = %activity.place_name, "Geocoding failed: {}", e);
            EnrichmentOutcome::Failed
        }
    }
}

/// Enrich every activity in order.
pub async fn enrich_compilation(
    result: &mut CompilationResult,
    geocoder: &dyn Geocoder,
) -> EnrichmentReport {
    let mut report = EnrichmentReport::default();
    for activity in result.activities.iter_mut() {
        let outcome = enrich_activity(activity, geocoder).await;
        report.record(outcome);
    }
    report
}
