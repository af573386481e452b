//! Shared data models for PlaceClip.
//!
//! This crate provides Serde-serializable types for:
//! - Extracted activities and their nested records
//! - Compilation results, including the error envelope
//! - The lean summary document
//! - Job identifiers

pub mod activity;
pub mod availability;
pub mod compilation;
pub mod confidence;
pub mod dish;
pub mod feedback;
pub mod job;
pub mod summary;

// Re-export common types
pub use activity::{ActivityRecord, CategoryHints};
pub use availability::{Availability, AVAILABILITY_FIELDS};
pub use compilation::{CompilationResult, DEFAULT_CONTENT_TYPE, ERROR_CONTENT_TYPE};
pub use confidence::{ConfidenceScores, CONFIDENCE_FIELDS};
pub use dish::{DishEntry, DishesInfo};
pub use feedback::{RatingsFeedback, SpecificDishFeedback};
pub use job::{JobId, JobOutcome};
pub use summary::{SummaryDocument, SummaryRecord};
