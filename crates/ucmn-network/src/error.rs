//! Request errors

use thiserror::Error;
use ucmn_http::HttpError;

/// Terminal failure of a single request invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request's own validation rejected it; nothing was sent
    #[error("Validation failed")]
    Validation,
    /// The transport failed before producing a response
    #[error(transparent)]
    Transport(#[from] HttpError),
}

impl RequestError {
    /// Whether the failure came from validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation)
    }
}
