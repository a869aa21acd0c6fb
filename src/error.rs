/// Failure modes of the analytics engine.
///
/// Only `Validation` ever reaches a caller as a request failure. The other two
/// are absorbed by the pattern path, which degrades to an empty report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("record {record}: {field} {reason}")]
    Validation {
        record: String,
        field: &'static str,
        reason: String,
    },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("computation error: {0}")]
    Computation(String),
}

impl AnalysisError {
    pub fn validation(record: impl Into<String>, field: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::Validation {
            record: record.into(),
            field,
            reason: reason.into(),
        }
    }

    /// True for errors the pattern path recovers from locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::InsufficientData(_) | AnalysisError::Computation(_)
        )
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
