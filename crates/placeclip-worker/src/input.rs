//! Fusion of the three text sources extracted from a video.

use serde::{Deserialize, Serialize};

/// Speech transcript, on-screen text and caption of one video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusedInput {
    #[serde(default)]
    pub speech: String,
    #[serde(default)]
    pub ocr: String,
    #[serde(default)]
    pub caption: String,
    /// Text that was fused elsewhere; appended unlabelled
    #[serde(default)]
    pub extra: String,
}

impl FusedInput {
    pub fn new(
        speech: impl Into<String>,
        ocr: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            speech: speech.into(),
            ocr: ocr.into(),
            caption: caption.into(),
            extra: String::new(),
        }
    }

    /// Input that is already fused text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            extra: text.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        [&self.speech, &self.ocr, &self.caption, &self.extra]
            .iter()
            .all(|part| part.trim().is_empty())
    }

    /// Labelled lines for each non-empty source, newline separated.
    pub fn fused_text(&self) -> String {
        let mut lines: Vec<String> = [
            ("SPEECH", &self.speech),
            ("OCR TEXT", &self.ocr),
            ("CAPTION", &self.caption),
        ]
        .iter()
        .filter_map(|(label, text)| {
            let text = text.trim();
            (!text.is_empty()).then(|| format!("{}: {}", label, text))
        })
        .collect();

        let extra = self.extra.trim();
        if !extra.is_empty() {
            lines.push(extra.to_string());
        }
        lines.join("\n")
    }
}
