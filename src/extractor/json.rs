use std::fmt::Debug;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Json, Request},
    http::StatusCode,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, BodyError},
    traits::ErrorVerbosityProvider,
};

use super::{expected_schema, Extractor};

/// JSON body that rejects with an [`ApiError`].
///
/// A request without a JSON content type is answered with `415`, any other body problem with `422`.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "json_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let rejection = match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => {
                tracing::trace!(?body, "Extracted");

                return Ok(ApiJson(body));
            }
            Err(rejection) => rejection,
        };

        tracing::warn!(?rejection, "Rejection");

        let verbosity = state.error_verbosity();

        let status_code = if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };

        Err(BodyError::new(
            verbosity,
            status_code,
            rejection.body_text(),
            expected_schema::<T>(verbosity)?,
        )
        .into())
    }
}

impl<T> Extractor for ApiJson<T> {
    type Extracted = T;

    fn extracted(&self) -> &Self::Extracted {
        &self.0
    }
}
