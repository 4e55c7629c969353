use std::fmt::Debug;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, QueryError},
    traits::ErrorVerbosityProvider,
};

use super::{expected_schema, Extractor};

/// Query string that rejects with an [`ApiError`].
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "query_extractor", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let rejection = match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(query)) => {
                tracing::trace!(?query, "Extracted");

                return Ok(ApiQuery(query));
            }
            Err(rejection) => rejection,
        };

        tracing::warn!(?rejection, "Rejection");

        let verbosity = state.error_verbosity();

        Err(QueryError::new(
            verbosity,
            rejection.body_text(),
            expected_schema::<T>(verbosity)?,
        )
        .into())
    }
}

impl<T> Extractor for ApiQuery<T> {
    type Extracted = T;

    fn extracted(&self) -> &Self::Extracted {
        &self.0
    }
}
