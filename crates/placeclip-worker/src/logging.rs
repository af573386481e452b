//! Structured job logging.

use tracing::{error, info, warn, Span};

use placeclip_models::{JobId, JobOutcome};

/// Logs the lifecycle of one extraction job with its id and operation attached.
///
/// Every event carries `job_id` and `operation` fields, so one job's lines
/// can be filtered out of interleaved worker output.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    operation: String,
}

impl JobLogger {
    /// Create a logger for one job step.
    ///
    /// # Arguments
    /// * `job_id` - the job being run
    /// * `operation` - the step being run, e.g. "extract" or "reconcile"
    pub fn new(job_id: &JobId, operation: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of a job step.
    pub fn log_start(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job started: {}", message
        );
    }

    /// Log a progress update while the job runs.
    pub fn log_progress(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job progress: {}", message
        );
    }

    /// Log a recoverable problem; the job carries on.
    pub fn log_warning(&self, message: &str) {
        warn!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job warning: {}", message
        );
    }

    /// Log an error during the job.
    pub fn log_error(&self, message: &str) {
        error!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job error: {}", message
        );
    }

    /// Log how the job ended. Degraded jobs are warnings, not errors.
    pub fn log_completion(&self, outcome: JobOutcome, activity_count: usize) {
        match outcome {
            JobOutcome::Degraded => warn!(
                job_id = %self.job_id,
                operation = %self.operation,
                outcome = outcome.as_str(),
                "Job completed with error envelope"
            ),
            _ => info!(
                job_id = %self.job_id,
                operation = %self.operation,
                outcome = outcome.as_str(),
                activity_count,
                "Job completed"
            ),
        }
    }

    /// The job id attached to every event.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// The operation attached to every event.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// A span carrying the job id, for instrumenting the job's futures.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "job",
            job_id = %self.job_id,
            operation = %self.operation
        )
    }
}
