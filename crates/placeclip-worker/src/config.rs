//! Worker configuration.

use std::time::Duration;

use placeclip_extract::DEFAULT_KEYWORD_COUNT;

pub const DEFAULT_GEMINI_MODELS: &[&str] =
    &["gemini-2.5-flash", "gemini-2.5-flash-lite", "gemini-2.5-pro"];
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com";

/// Worker configuration.
#[derive(Clone)]
pub struct WorkerConfig {
    /// Gemini API key; required only when the generator is called
    pub gemini_api_key: Option<String>,
    /// Model fallback chain, tried in order
    pub gemini_models: Vec<String>,
    pub gemini_base_url: String,
    /// Google API key; geocoding is a no-op without it
    pub google_api_key: Option<String>,
    pub geocode_base_url: String,
    /// Character budget for the fused model input
    pub max_input_chars: usize,
    pub geocode_enabled: bool,
    /// Fill empty summary takeaways from feedback or keywords
    pub fallback_takeaways: bool,
    pub fallback_k: usize,
    pub request_timeout: Duration,
    /// Retries per collaborator call (not counting the first attempt)
    pub max_retries: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_models: DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            google_api_key: None,
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
            max_input_chars: 8000,
            geocode_enabled: true,
            fallback_takeaways: true,
            fallback_k: DEFAULT_KEYWORD_COUNT,
            request_timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

// API keys stay out of logs.
impl std::fmt::Debug for WorkerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<set>"))
            .field("gemini_models", &self.gemini_models)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("google_api_key", &self.google_api_key.as_ref().map(|_| "<set>"))
            .field("geocode_base_url", &self.geocode_base_url)
            .field("max_input_chars", &self.max_input_chars)
            .field("geocode_enabled", &self.geocode_enabled)
            .field("fallback_takeaways", &self.fallback_takeaways)
            .field("fallback_k", &self.fallback_k)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_models: non_empty("GEMINI_MODELS")
                .map(|s| parse_list(&s))
                .filter(|models| !models.is_empty())
                .unwrap_or(defaults.gemini_models),
            gemini_base_url: non_empty("GEMINI_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_base_url),
            google_api_key: non_empty("GOOGLE_API_KEY"),
            geocode_base_url: non_empty("GEOCODE_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.geocode_base_url),
            max_input_chars: lookup("PLACECLIP_MAX_INPUT_CHARS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_input_chars),
            geocode_enabled: lookup("PLACECLIP_GEOCODE")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.geocode_enabled),
            fallback_takeaways: lookup("PLACECLIP_FALLBACK_TAKEAWAYS")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.fallback_takeaways),
            fallback_k: lookup("PLACECLIP_FALLBACK_K")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.fallback_k),
            request_timeout: Duration::from_secs(
                lookup("PLACECLIP_REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.request_timeout.as_secs()),
            ),
            max_retries: lookup("PLACECLIP_MAX_RETRIES")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_retries),
        }
    }

    /// Whether enrichment will actually call out.
    pub fn geocoding_active(&self) -> bool {
        self.geocode_enabled && self.google_api_key.is_some()
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
