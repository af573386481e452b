//! Generative-model client for place extraction.
//!
//! The generator turns fused video text into JSON-shaped text. It does not
//! validate that text; reconciliation happens in `placeclip-extract`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use placeclip_extract::strip_code_fence;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::metrics;
use crate::retry::{retry_async, RetryConfig};

/// Instructions sent with every extraction request.
pub const SYSTEM_PROMPT: &str = r#"You extract structured place information from short-form travel and food videos.

The input mixes speech transcription (SPEECH), on-screen text (OCR TEXT) and the post caption (CAPTION). Prefer the caption when sources disagree.

1. Decide the primary content type of the video (for example a single restaurant visit, an event, a hike, or a compilation of several places).
2. Produce one activity per distinct place or activity featured. A single-place video has exactly one activity.
3. For each activity extract:
   - place_name: name of the place or event
   - genre: one of restaurant, cafe, bar, bakery, museum, landmark, park, hike, hotel, shopping, event, nightlife, wellness, transportation, experience, other
   - cuisine: cuisine type for food places
   - vibes: short description of the atmosphere
   - activities: specific things to do that are mentioned
   - availability: street_address, city, county, state, country, region; only what is stated
   - sources: which inputs the information came from (speech, ocr, caption)
   - ratings_feedback: service_feedback, food_feedback, vibes_feedback, miscellaneous_feedback, and specific_dish_feedback as a list of {dish_name, feedback}
   - dishes: a list of {dish_name, mentioned, shown, feedback} where mentioned and shown are booleans
   - confidence: a score from 0.0 to 1.0 for place_name, genre, cuisine, vibes, activities, availability, ratings_feedback, dishes
   - key_takeaways: 3 to 6 short, practical tips for someone planning to visit
4. Do not repeat dish-specific feedback in food_feedback.

Return only a single JSON object of the form:
{"content_type": "...", "activities": [ { ...fields above... } ]}"#;

/// Sampling temperature for extraction requests.
const TEMPERATURE: f32 = 0.2;

/// Header carrying the API key, so it never appears in a request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Text generation collaborator.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Return the model's answer with any surrounding code fence removed.
    async fn generate(&self, system: &str, user: &str) -> WorkerResult<String>;
}

/// Truncate to at most `max_chars` characters without splitting one.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Gemini generateContent request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini client walking a model fallback chain.
pub struct GeminiGenerator {
    api_key: String,
    base_url: String,
    models: Vec<String>,
    client: Client,
    retry: RetryConfig,
}

impl GeminiGenerator {
    pub fn new(config: &WorkerConfig) -> WorkerResult<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| WorkerError::config_error("GEMINI_API_KEY not set"))?;

        if config.gemini_models.is_empty() {
            return Err(WorkerError::config_error("No Gemini models configured"));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("placeclip-worker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WorkerError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            models: config.gemini_models.clone(),
            client,
            retry: RetryConfig::new("generate").with_max_retries(config.max_retries),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn call_model(&self, model: &str, system: &str, user: &str) -> WorkerResult<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: user }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                WorkerError::generator_failed(format!("request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let msg = format!("{} returned {}: {}", model, status, body);
            return Err(if is_transient(status) {
                WorkerError::generator_failed(msg)
            } else {
                WorkerError::generator_unavailable(msg)
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            WorkerError::generator_unavailable(format!(
                "failed to decode {} response: {}",
                model,
                e.without_url()
            ))
        })?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(WorkerError::generator_unavailable(format!(
                "{} returned no content",
                model
            )));
        }

        Ok(strip_code_fence(&text).to_string())
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, system: &str, user: &str) -> WorkerResult<String> {
        let mut last_error = None;

        for model in &self.models {
            info!(model = %model, "Calling generator");
            let result = retry_async(
                &self.retry,
                || self.call_model(model, system, user),
                WorkerError::is_retryable,
            )
            .await;

            match result {
                Ok(text) => {
                    metrics::record_generator_call(model, "success");
                    return Ok(text);
                }
                Err(e) => {
                    metrics::record_generator_call(model, "failure");
                    warn!(model = %model, "Generator model failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| WorkerError::generator_failed("All Gemini models failed")))
    }
}
