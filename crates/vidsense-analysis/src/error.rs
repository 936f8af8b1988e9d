use std::time::Duration;

use thiserror::Error;
use vidsense_store::StoreError;

/// Terminal outcomes of a single analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The requested video id is absent from the store.
    #[error("video not found")]
    NotFound,

    /// A keyword search matched no documents at all.
    #[error("no documents matched the keyword")]
    NoMatches,

    /// Documents were found but yielded no usable comment text.
    #[error("no usable comment text")]
    NoComments,

    /// The document store failed for any reason other than a missing document.
    #[error("document store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Transport failure, timeout, or non-2xx status from the scoring backend.
    #[error("scoring backend unavailable: {0}")]
    ScoringUnavailable(#[source] reqwest::Error),

    /// The scoring backend answered 2xx without a usable `prediction`.
    #[error("scoring backend returned a malformed response: {0}")]
    ScoringResponseMalformed(String),

    #[error("analysis did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("invalid scoring endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl From<StoreError> for AnalysisError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AnalysisError::NotFound,
            other => AnalysisError::StoreUnavailable(other),
        }
    }
}

impl AnalysisError {
    /// `true` for failures a bounded retry could plausibly clear.
    ///
    /// Only store and scoring transport failures qualify.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            AnalysisError::StoreUnavailable(e) => e.is_transient(),
            AnalysisError::ScoringUnavailable(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            AnalysisError::NotFound
            | AnalysisError::NoMatches
            | AnalysisError::NoComments
            | AnalysisError::ScoringResponseMalformed(_)
            | AnalysisError::DeadlineExceeded(_)
            | AnalysisError::InvalidEndpoint { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_becomes_not_found() {
        assert!(matches!(
            AnalysisError::from(StoreError::NotFound),
            AnalysisError::NotFound
        ));
    }

    #[test]
    fn other_store_errors_become_store_unavailable() {
        let err = AnalysisError::from(StoreError::Rejected {
            status: 400,
            body: "bad query".to_owned(),
        });
        assert!(matches!(err, AnalysisError::StoreUnavailable(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn terminal_outcomes_are_not_transient() {
        assert!(!AnalysisError::NoComments.is_transient());
        assert!(!AnalysisError::NoMatches.is_transient());
        assert!(!AnalysisError::ScoringResponseMalformed("x".to_owned()).is_transient());
    }
}
