use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use validator::Validate;

use crate::{
    error::{ApiError, ValidationError},
    traits::ErrorVerbosityProvider,
};

use super::Extractor;

fn validate<X, S>(inner: X, state: &S) -> Result<X, ApiError>
where
    X: Extractor,
    X::Extracted: Validate,
    S: ErrorVerbosityProvider,
{
    if let Err(errors) = inner.extracted().validate() {
        tracing::warn!(?errors, "Validation errors");

        return Err(ValidationError::from_validation_errors(state.error_verbosity(), errors).into());
    }

    tracing::trace!("Validated");

    Ok(inner)
}

/// Runs [`Validate`] on whatever `X` extracted from the request parts.
pub struct ValidatedFromRequestParts<X>(pub X);

#[async_trait]
impl<X, S> FromRequestParts<S> for ValidatedFromRequestParts<X>
where
    X: FromRequestParts<S, Rejection = ApiError> + Extractor,
    X::Extracted: Validate,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "validated_extractor", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let inner = X::from_request_parts(parts, state).await?;

        validate(inner, state).map(ValidatedFromRequestParts)
    }
}

/// Runs [`Validate`] on whatever `X` extracted from the body.
pub struct ValidatedFromRequest<X>(pub X);

#[async_trait]
impl<X, S> FromRequest<S> for ValidatedFromRequest<X>
where
    X: FromRequest<S, Rejection = ApiError> + Extractor,
    X::Extracted: Validate,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "validated_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let inner = X::from_request(req, state).await?;

        validate(inner, state).map(ValidatedFromRequest)
    }
}
