use thiserror::Error;

/// Conditions that stop the pipeline for the current interaction.
///
/// Unparsable dates never appear here; they degrade to
/// [`ServiceDate::Missing`](crate::dates::ServiceDate::Missing) per record.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Sheet source unavailable: {reason}")]
    SourceUnavailable { reason: String },
    #[error("Sheet source returned no rows")]
    EmptySource,
    #[error("Required column(s) not found: {}", .missing.join(", "))]
    MissingRequiredColumn { missing: Vec<String> },
}

impl PipelineError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        PipelineError::SourceUnavailable {
            reason: err.to_string(),
        }
    }

    /// Empty sources are warnings rather than failures.
    pub fn is_warning(&self) -> bool {
        matches!(self, PipelineError::EmptySource)
    }
}
