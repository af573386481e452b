//! Extraction result for one video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ActivityRecord;

/// Content type used when the generator does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "Compilation";

/// Content type marking a degraded, nothing-extracted result.
pub const ERROR_CONTENT_TYPE: &str = "Error";

/// Every activity extracted from one video.
///
/// A failed extraction is still a well-formed value: `content_type` is
/// `"Error"`, `activities` is empty and `error` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompilationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default = "default_content_type")]
    pub content_type: String,

    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

impl Default for CompilationResult {
    fn default() -> Self {
        Self {
            error: None,
            content_type: default_content_type(),
            activities: Vec::new(),
        }
    }
}

impl CompilationResult {
    pub fn new(content_type: impl Into<String>, activities: Vec<ActivityRecord>) -> Self {
        Self {
            error: None,
            content_type: content_type.into(),
            activities,
        }
    }

    /// The error envelope: `{error, content_type: "Error", activities: []}`.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            content_type: ERROR_CONTENT_TYPE.to_string(),
            activities: Vec::new(),
        }
    }

    /// True when extraction degraded to the error envelope.
    pub fn is_error(&self) -> bool {
        self.content_type == ERROR_CONTENT_TYPE
    }
}
