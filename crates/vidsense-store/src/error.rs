use thiserror::Error;

/// Errors returned by the document store gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no document with the requested id.
    #[error("document not found")]
    NotFound,

    /// Transport failure, timeout, or a 5xx from the store.
    #[error("document store unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The store answered with a non-2xx status other than 404 or 5xx.
    #[error("document store rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid document store URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl StoreError {
    /// `true` when retrying the same request later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Unavailable(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_none_or(|s| s.is_server_error())
            }
            StoreError::NotFound
            | StoreError::Rejected { .. }
            | StoreError::Deserialize { .. }
            | StoreError::InvalidUrl { .. } => false,
        }
    }
}
