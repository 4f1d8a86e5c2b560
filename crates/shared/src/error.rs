use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The generation endpoint answered with a non-success status. Carries the
/// server-supplied message verbatim.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EndpointRejection {
    pub message: String,
}

impl EndpointRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
