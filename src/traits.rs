use axum::http::HeaderName;

use crate::error::ErrorVerbosity;

pub trait ErrorVerbosityProvider {
    /// Returns the error verbosity.
    fn error_verbosity(&self) -> ErrorVerbosity;
}

pub trait ApiKeyProvider {
    /// Returns the API key header name.
    fn header_name(&self) -> &HeaderName;

    /// Validates the API key.
    fn validate(&self, key: &str) -> bool;
}
