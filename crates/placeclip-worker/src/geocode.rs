//! Google Places text search geocoder.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use placeclip_extract::{GeoMatch, GeocodeError, GeocodeQuery, Geocoder, NoopGeocoder};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::metrics;
use crate::retry::{retry_async, RetryConfig};

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl From<PlaceResult> for GeoMatch {
    fn from(place: PlaceResult) -> Self {
        let location = place.geometry.map(|g| g.location);
        GeoMatch {
            display_address: place.formatted_address,
            lat: location.as_ref().map(|l| l.lat),
            lon: location.as_ref().map(|l| l.lng),
            ..GeoMatch::default()
        }
    }
}

/// Geocoder backed by the Places API text search endpoint.
pub struct GooglePlacesGeocoder {
    api_key: String,
    base_url: String,
    client: Client,
    retry: RetryConfig,
}

impl GooglePlacesGeocoder {
    pub fn new(config: &WorkerConfig) -> WorkerResult<Self> {
        let api_key = config
            .google_api_key
            .clone()
            .ok_or_else(|| WorkerError::config_error("GOOGLE_API_KEY not set"))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("placeclip-worker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WorkerError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: config.geocode_base_url.trim_end_matches('/').to_string(),
            client,
            retry: RetryConfig::new("geocode").with_max_retries(config.max_retries),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The key rides in the query string, so errors are reported without their URL.
    async fn text_search(&self, query: &str) -> Result<Option<GeoMatch>, GeocodeError> {
        let url = format!("{}/maps/api/place/textsearch/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Api {
                status: status.as_u16().to_string(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::decode(e.without_url().to_string()))?;

        match body.status.as_str() {
            "OK" => Ok(body.results.into_iter().next().map(GeoMatch::from)),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(GeocodeError::Api {
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl Geocoder for GooglePlacesGeocoder {
    async fn lookup(&self, query: &GeocodeQuery) -> Result<Option<GeoMatch>, GeocodeError> {
        let text = query.query_text();
        debug!(query = %text, "Geocoding lookup");

        let result = retry_async(
            &self.retry,
            || self.text_search(&text),
            GeocodeError::is_retryable,
        )
        .await;

        let outcome = match &result {
            Ok(Some(_)) => "match",
            Ok(None) => "no_match",
            Err(_) => "error",
        };
        metrics::record_geocode_lookup(outcome);
        result
    }
}

/// The geocoder the configuration asks for; a no-op when disabled or unkeyed.
pub fn geocoder_from_config(config: &WorkerConfig) -> WorkerResult<Box<dyn Geocoder>> {
    if !config.geocoding_active() {
        debug!("Geocoding disabled");
        return Ok(Box::new(NoopGeocoder));
    }
    Ok(Box::new(GooglePlacesGeocoder::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/maps/api/place/textsearch/json";

    fn geocoder_for(server: &MockServer) -> GooglePlacesGeocoder {
        let config = WorkerConfig {
            google_api_key: Some("maps-key".into()),
            geocode_base_url: server.uri(),
            ..WorkerConfig::default()
        };
        GooglePlacesGeocoder::new(&config)
            .unwrap()
            .with_retry(RetryConfig::new("geocode").with_base_delay(Duration::from_millis(1)))
    }

    fn query() -> GeocodeQuery {
        GeocodeQuery {
            place_name: "Joe's Pizza".into(),
            genre: Some("restaurant".into()),
            hint: Some("NYC".into()),
        }
    }

    #[tokio::test]
    async fn test_first_result_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("query", "Joe's Pizza restaurant NYC"))
            .and(query_param("key", "maps-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [
                    {
                        "formatted_address": "7 Carmine St, New York, NY 10014, USA",
                        "geometry": {"location": {"lat": 40.7305, "lng": -74.0021}}
                    },
                    {"formatted_address": "somewhere else"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let found = geocoder_for(&server).lookup(&query()).await.unwrap().unwrap();

        assert_eq!(
            found.display_address.as_deref(),
            Some("7 Carmine St, New York, NY 10014, USA")
        );
        assert_eq!(found.lat, Some(40.7305));
        assert_eq!(found.lon, Some(-74.0021));
        assert!(found.city.is_none());
    }

    #[tokio::test]
    async fn test_zero_results_is_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
            )
            .mount(&server)
            .await;

        assert!(geocoder_for(&server).lookup(&query()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_denied_request_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = geocoder_for(&server).lookup(&query()).await.unwrap_err();
        assert_eq!(
            err,
            GeocodeError::Api {
                status: "REQUEST_DENIED".into(),
                message: "The provided API key is invalid.".into()
            }
        );
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(502))
            .expect(3)
            .mount(&server)
            .await;

        let err = geocoder_for(&server).lookup(&query()).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_key() {
        let config = WorkerConfig {
            google_api_key: Some("SECRET-KEY-123".into()),
            geocode_base_url: "http://127.0.0.1:1".into(),
            ..WorkerConfig::default()
        };
        let geocoder = GooglePlacesGeocoder::new(&config)
            .unwrap()
            .with_retry(RetryConfig::new("geocode").with_max_retries(0));

        let err = geocoder.lookup(&query()).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Transport(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn test_undecodable_body_does_not_leak_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = geocoder_for(&server).lookup(&query()).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Decode(_)));
        assert!(!err.to_string().contains("maps-key"));
    }

    #[test]
    fn test_geocoder_from_config_without_key_is_noop() {
        let config = WorkerConfig::default();
        assert!(GooglePlacesGeocoder::new(&config).is_err());

        let geocoder = geocoder_from_config(&config).unwrap();
        let found = tokio_test::block_on(geocoder.lookup(&query())).unwrap();
        assert!(found.is_none());
    }
}
