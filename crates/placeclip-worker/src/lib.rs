//! Place extraction worker.
//!
//! This crate provides:
//! - Configuration from the environment
//! - The Gemini generator and Google Places geocoder collaborators
//! - The extraction job pipeline and its served output
//! - Structured job logging and metrics

pub mod config;
pub mod error;
pub mod generator;
pub mod geocode;
pub mod input;
pub mod job;
pub mod logging;
pub mod metrics;
pub mod retry;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use generator::{GeminiGenerator, Generator, SYSTEM_PROMPT};
pub use geocode::{geocoder_from_config, GooglePlacesGeocoder};
pub use input::FusedInput;
pub use job::{reconcile_response, summarize_for_serving, ExtractionJob, JobOutput};
pub use logging::JobLogger;
