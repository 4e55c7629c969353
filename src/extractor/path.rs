use std::fmt::Debug;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, PathError},
    traits::ErrorVerbosityProvider,
};

/// Path parameters that reject with an [`ApiError`], e.g. a book id that is not an integer.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "path_extractor", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(path)| {
                tracing::trace!(?path, "Extracted");

                ApiPath(path)
            })
            .map_err(|rejection| {
                tracing::warn!(?rejection, "Rejection");

                PathError::new(state.error_verbosity(), rejection.body_text()).into()
            })
    }
}
