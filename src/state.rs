use std::{ops::Deref, sync::Arc};

use axum::http::HeaderName;
use derivative::Derivative;
use subtle::ConstantTimeEq;

use crate::{
    error::ErrorVerbosity,
    store::BookStore,
    traits::{ApiKeyProvider, ErrorVerbosityProvider},
    utils::mask_fmt,
};

#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    pub fn new(
        error_verbosity: ErrorVerbosity,
        api_key_header_name: HeaderName,
        api_key: String,
        store: BookStore,
    ) -> Self {
        Self {
            inner: Arc::new(ApiStateInner {
                error_verbosity,
                api_key_header_name,
                api_key,
                store,
            }),
        }
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct ApiStateInner {
    error_verbosity: ErrorVerbosity,
    api_key_header_name: HeaderName,
    #[derivative(Debug(format_with = "mask_fmt"))]
    api_key: String,
    store: BookStore,
}

impl ApiStateInner {
    pub fn store(&self) -> &BookStore {
        &self.store
    }
}

impl ErrorVerbosityProvider for ApiState {
    fn error_verbosity(&self) -> ErrorVerbosity {
        self.error_verbosity
    }
}

impl ApiKeyProvider for ApiState {
    fn header_name(&self) -> &HeaderName {
        &self.api_key_header_name
    }

    /// Exact, case-sensitive comparison in constant time.
    fn validate(&self, key: &str) -> bool {
        key.as_bytes().ct_eq(self.api_key.as_bytes()).into()
    }
}
