//! Extraction job: fused text in, rich result and served summary out.

use std::path::Path;

use tracing::{info, Instrument};

use placeclip_extract::{
    degrade, enrich_compilation, fallback_takeaways, feedback_takeaways, summarize_activity_with,
    try_parse, EnrichmentReport, ExtractError, Geocoder,
};
use placeclip_models::{CompilationResult, JobId, JobOutcome, SummaryDocument};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::generator::{truncate_chars, GeminiGenerator, Generator, SYSTEM_PROMPT};
use crate::geocode::geocoder_from_config;
use crate::input::FusedInput;
use crate::logging::JobLogger;
use crate::metrics;

/// Everything one job produced.
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub job_id: JobId,
    pub outcome: JobOutcome,
    /// Full reconciled result, or the error envelope
    pub rich: CompilationResult,
    pub summary: SummaryDocument,
    /// The text the generator was given
    pub fused_text: String,
    pub enrichment: Option<EnrichmentReport>,
}

impl JobOutput {
    /// Pretty JSON for downstream consumers: the summary document, or the
    /// error envelope when extraction failed.
    pub fn served_json(&self) -> serde_json::Result<String> {
        if self.rich.is_error() {
            serde_json::to_string_pretty(&self.rich)
        } else {
            self.summary.to_pretty_json()
        }
    }

    pub fn rich_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rich)
    }

    /// Write the served JSON to `out` and, if asked, the rich result to `rich_out`.
    pub fn write_to(&self, out: &Path, rich_out: Option<&Path>) -> WorkerResult<()> {
        std::fs::write(out, self.served_json()?)?;
        if let Some(path) = rich_out {
            std::fs::write(path, self.rich_json()?)?;
        }

        info!(
            job_id = %self.job_id,
            outcome = self.outcome.as_str(),
            out = %out.display(),
            "Wrote job output"
        );
        Ok(())
    }
}

/// Runs extraction jobs against a generator and a geocoder.
pub struct ExtractionJob {
    config: WorkerConfig,
    generator: Box<dyn Generator>,
    geocoder: Box<dyn Geocoder>,
}

impl ExtractionJob {
    pub fn new(
        config: WorkerConfig,
        generator: Box<dyn Generator>,
        geocoder: Box<dyn Geocoder>,
    ) -> Self {
        Self {
            config,
            generator,
            geocoder,
        }
    }

    /// Wire up the Gemini generator and the configured geocoder.
    pub fn from_config(config: WorkerConfig) -> WorkerResult<Self> {
        let generator = Box::new(GeminiGenerator::new(&config)?);
        let geocoder = geocoder_from_config(&config)?;
        Ok(Self::new(config, generator, geocoder))
    }

    /// Run one job. Never fails: every failure ends in the error envelope.
    pub async fn run(&self, input: &FusedInput) -> JobOutput {
        let job_id = JobId::new();
        let logger = JobLogger::new(&job_id, "extract");
        let span = logger.create_span();
        self.run_inner(job_id, logger, input).instrument(span).await
    }

    async fn run_inner(
        &self,
        job_id: JobId,
        logger: JobLogger,
        input: &FusedInput,
    ) -> JobOutput {
        let fused = input.fused_text();
        let fused_text = truncate_chars(&fused, self.config.max_input_chars).to_string();
        logger.log_start(&format!("{} chars of fused text", fused_text.chars().count()));

        let parsed = match self.generator.generate(SYSTEM_PROMPT, &fused_text).await {
            Ok(response) => {
                logger.log_progress("generator responded");
                try_parse(&response)
            }
            Err(e) => Err(ExtractError::from(e)),
        };

        let mut rich = match parsed {
            Ok(result) => result,
            Err(e) => {
                logger.log_error(&e.to_string());
                degrade(&e)
            }
        };

        let enrichment = if self.config.geocode_enabled && !rich.is_error() {
            let report = enrich_compilation(&mut rich, self.geocoder.as_ref()).await;
            logger.log_progress(&format!(
                "enriched {} of {} looked up ({} failed)",
                report.merged, report.looked_up, report.failed
            ));
            if report.failed > 0 {
                logger.log_warning(&format!(
                    "{} geocode lookups failed; those activities are unenriched",
                    report.failed
                ));
            }
            Some(report)
        } else {
            None
        };

        let summary = summarize_for_serving(&rich, &fused_text, &self.config);
        finish(job_id, &logger, rich, summary, fused_text, enrichment)
    }
}

/// Reconcile a saved generator response without any network calls.
pub fn reconcile_response(response: &str, config: &WorkerConfig) -> JobOutput {
    let job_id = JobId::new();
    let logger = JobLogger::new(&job_id, "reconcile");
    let _guard = logger.create_span().entered();
    logger.log_start(&format!("{} chars of saved response", response.len()));

    let rich = try_parse(response).unwrap_or_else(|e| degrade(&e));
    let summary = summarize_for_serving(&rich, "", config);
    finish(job_id, &logger, rich, summary, String::new(), None)
}

fn finish(
    job_id: JobId,
    logger: &JobLogger,
    rich: CompilationResult,
    summary: SummaryDocument,
    fused_text: String,
    enrichment: Option<EnrichmentReport>,
) -> JobOutput {
    let outcome = outcome_of(&rich);
    metrics::record_job(outcome.as_str());
    metrics::record_activities(rich.activities.len());
    logger.log_completion(outcome, rich.activities.len());

    JobOutput {
        job_id,
        outcome,
        rich,
        summary,
        fused_text,
        enrichment,
    }
}

fn outcome_of(result: &CompilationResult) -> JobOutcome {
    if result.is_error() {
        JobOutcome::Degraded
    } else if result.activities.is_empty() {
        JobOutcome::Empty
    } else {
        JobOutcome::Extracted
    }
}

/// Summarize, filling empty takeaways from feedback and then from keywords
/// of the fused text when the configuration allows it.
///
/// Only the summary records get the fallback; `result` is left as is.
pub fn summarize_for_serving(
    result: &CompilationResult,
    fused_text: &str,
    config: &WorkerConfig,
) -> SummaryDocument {
    let records = result
        .activities
        .iter()
        .map(|activity| {
            let mut takeaways = activity.key_takeaways.clone();
            if config.fallback_takeaways && takeaways.is_empty() {
                takeaways = feedback_takeaways(&activity.ratings_feedback);
                if takeaways.is_empty() {
                    takeaways = fallback_takeaways(fused_text, config.fallback_k);
                }
            }
            summarize_activity_with(activity, takeaways)
        })
        .collect();

    SummaryDocument::new(records)
}
