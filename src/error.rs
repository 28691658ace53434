//! Error taxonomy for loading, normalizing and aggregating benchmark runs.
//!
//! Every variant is terminal for the current invocation. Inputs are static
//! files, so a retry would reproduce the same failure, and no variant is ever
//! downgraded to a default value: a missing field or run must never be read as
//! zero.

use std::path::Path;
use thiserror::Error;

/// Errors produced by the loader, normalizer and aggregator
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input could not be decoded, is empty, or violates a run invariant
    #[error("malformed input {source_name}: {reason}")]
    MalformedInput { source_name: String, reason: String },

    /// A required field is absent from a record
    #[error("missing field `{field}` in record {index}")]
    MissingField { field: String, index: usize },

    /// A configured run size has no corresponding run
    #[error("missing run for run size {run_size} of system `{system}`")]
    MissingRun { run_size: u32, system: String },
}

impl AnalysisError {
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_path(path: &Path, reason: impl Into<String>) -> Self {
        Self::malformed(path.display().to_string(), reason)
    }

    pub fn missing_field(field: impl Into<String>, index: usize) -> Self {
        Self::MissingField {
            field: field.into(),
            index,
        }
    }

    pub fn missing_run(run_size: u32, system: impl Into<String>) -> Self {
        Self::MissingRun {
            run_size,
            system: system.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_culprit() {
        let err = AnalysisError::missing_field("memory_usage_mb", 3);
        assert_eq!(err.to_string(), "missing field `memory_usage_mb` in record 3");

        let err = AnalysisError::missing_run(64, "zasper");
        assert_eq!(
            err.to_string(),
            "missing run for run size 64 of system `zasper`"
        );

        let err = AnalysisError::malformed_path(Path::new("data/a.json"), "empty run");
        assert_eq!(err.to_string(), "malformed input data/a.json: empty run");
    }
}
