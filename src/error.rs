use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// How much an error response tells the client.
///
/// The status code and the human-readable message are always sent. Verbosity only decides how
/// much of the error details accompanies them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns only the message with the appropriate status code.
    Message,
    /// Server returns the message, the error type with cleared error content and the appropriate status code.
    Type,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    #[default]
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        *self == ErrorVerbosity::Full
    }

    /// Keeps `reason` only when the client is allowed to see it.
    fn reveal<T>(&self, reason: impl FnOnce() -> T) -> Option<T> {
        self.should_generate_error_reason().then(reason)
    }
}

/// Maps any error into an [`InternalServerError`] using the verbosity of the given state.
///
/// ```ignore
/// session.commit().await.map_err(server_error!(state))?;
/// ```
#[macro_export]
macro_rules! server_error {
    ($state:expr) => {
        |err| {
            $crate::error::InternalServerError::from_generic_error(
                $crate::traits::ErrorVerbosityProvider::error_verbosity(&$state),
                err,
            )
        }
    };
}

/// Shared by every concrete error carried in [`ApiError`].
trait ErrorKind {
    const MESSAGE: &'static str;

    fn verbosity(&self) -> ErrorVerbosity;

    fn status_code(&self) -> StatusCode;
}

macro_rules! error_kind {
    ($ty:ty, $message:literal, $status:expr) => {
        impl ErrorKind for $ty {
            const MESSAGE: &'static str = $message;

            fn verbosity(&self) -> ErrorVerbosity {
                self.verbosity
            }

            fn status_code(&self) -> StatusCode {
                $status
            }
        }
    };
}

error_kind!(
    InternalServerError,
    "An internal server error has occurred",
    StatusCode::INTERNAL_SERVER_ERROR
);
error_kind!(
    QueryError,
    "Failed to parse query parameters",
    StatusCode::UNPROCESSABLE_ENTITY
);
error_kind!(
    PathError,
    "Failed to parse path parameters",
    StatusCode::UNPROCESSABLE_ENTITY
);
error_kind!(
    ValidationError,
    "Validation failed",
    StatusCode::UNPROCESSABLE_ENTITY
);
error_kind!(
    MethodNotAllowedError,
    "Method not allowed",
    StatusCode::METHOD_NOT_ALLOWED
);
error_kind!(
    NotFoundError,
    "The requested resource was not found",
    StatusCode::NOT_FOUND
);
// Missing and wrong keys share one status.
error_kind!(ApiKeyError, "Invalid API Key", StatusCode::UNAUTHORIZED);
error_kind!(BookNotFoundError, "Book not found", StatusCode::NOT_FOUND);

impl ErrorKind for BodyError {
    const MESSAGE: &'static str = "Failed to parse request body";

    fn verbosity(&self) -> ErrorVerbosity {
        self.verbosity
    }

    fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    #[serde(flatten)]
    error: ApiError,
    message: &'static str,
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        let (_, message, _) = error.describe();

        ApiErrorResponse { error, message }
    }
}

#[derive(Serialize)]
struct MessageOnly {
    message: &'static str,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let (verbosity, _, status_code) = self.error.describe();

        match verbosity {
            ErrorVerbosity::Message => (
                status_code,
                Json(MessageOnly {
                    message: self.message,
                }),
            )
                .into_response(),
            ErrorVerbosity::Type | ErrorVerbosity::Full => {
                (status_code, Json(self)).into_response()
            }
        }
    }
}

/// Every error the API answers with.
///
/// Serialized as `{"error_type": <variant>, "error": <details>, "message": ...}`.
#[derive(Debug, From, Serialize)]
#[serde(tag = "error_type", content = "error")]
pub enum ApiError {
    /// The store failed or something else unexpected happened.
    InternalServerError(InternalServerError),
    /// Query string could not be deserialized.
    Query(QueryError),
    /// Body is not JSON or does not match the expected shape.
    Body(BodyError),
    /// Path segment could not be deserialized, e.g. a non-integer book id.
    Path(PathError),
    /// Well-formed input that breaks a field rule.
    Validation(ValidationError),
    MethodNotAllowed(MethodNotAllowedError),
    /// No route matches.
    NotFound(NotFoundError),
    /// Key header missing, unreadable or wrong.
    ApiKey(ApiKeyError),
    /// The addressed book does not exist.
    BookNotFound(BookNotFoundError),
}

impl ApiError {
    fn describe(&self) -> (ErrorVerbosity, &'static str, StatusCode) {
        fn parts<E: ErrorKind>(err: &E) -> (ErrorVerbosity, &'static str, StatusCode) {
            (err.verbosity(), E::MESSAGE, err.status_code())
        }

        match self {
            ApiError::InternalServerError(err) => parts(err),
            ApiError::Query(err) => parts(err),
            ApiError::Body(err) => parts(err),
            ApiError::Path(err) => parts(err),
            ApiError::Validation(err) => parts(err),
            ApiError::MethodNotAllowed(err) => parts(err),
            ApiError::NotFound(err) => parts(err),
            ApiError::ApiKey(err) => parts(err),
            ApiError::BookNotFound(err) => parts(err),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.describe().2
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiErrorResponse::from(self).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        InternalServerError {
            verbosity,
            internal_server_error: verbosity.reveal(|| err),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    query_error_reason: Option<String>,
    query_expected_schema: Option<String>,
}

impl QueryError {
    pub fn new(
        verbosity: ErrorVerbosity,
        query_error_reason: String,
        query_expected_schema: String,
    ) -> Self {
        QueryError {
            verbosity,
            query_error_reason: verbosity.reveal(|| query_error_reason),
            query_expected_schema: verbosity.reveal(|| query_expected_schema),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    #[serde(skip)]
    status_code: StatusCode,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    /// `status_code` is expected to be [`StatusCode::UNPROCESSABLE_ENTITY`] for malformed bodies
    /// and [`StatusCode::UNSUPPORTED_MEDIA_TYPE`] if the body is not declared as JSON.
    pub fn new(
        verbosity: ErrorVerbosity,
        status_code: StatusCode,
        body_error_reason: String,
        body_expected_schema: String,
    ) -> Self {
        BodyError {
            verbosity,
            status_code,
            body_error_reason: verbosity.reveal(|| body_error_reason),
            body_expected_schema: verbosity.reveal(|| body_expected_schema),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PathError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        PathError {
            verbosity,
            path_error_reason: verbosity.reveal(|| path_error_reason),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    validation_errors: Option<ValidationErrors>,
}

impl ValidationError {
    pub fn from_validation_errors(verbosity: ErrorVerbosity, errors: ValidationErrors) -> Self {
        ValidationError {
            verbosity,
            validation_errors: verbosity.reveal(|| errors),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub enum ApiKeyErrorType {
    Missing,
    InvalidChars {
        #[serde(skip)]
        reason: String,
    },
    Invalid,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    api_key_error_type: ApiKeyErrorType,
    api_key_error_reason: Option<Cow<'static, str>>,
}

impl ApiKeyError {
    pub fn new(verbosity: ErrorVerbosity, api_key_error_type: ApiKeyErrorType) -> Self {
        let api_key_error_reason = verbosity.reveal(|| Self::reason(&api_key_error_type));

        ApiKeyError {
            verbosity,
            api_key_error_type,
            api_key_error_reason,
        }
    }

    fn reason(api_key_error_type: &ApiKeyErrorType) -> Cow<'static, str> {
        match api_key_error_type {
            ApiKeyErrorType::Missing => Cow::Borrowed("API key is missing"),
            ApiKeyErrorType::InvalidChars { reason } => {
                Cow::Owned(format!("API key contains invalid characters: {reason}"))
            }
            ApiKeyErrorType::Invalid => Cow::Borrowed("API key invalid"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookNotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    book_not_found_reason: Option<String>,
}

impl BookNotFoundError {
    pub fn new(verbosity: ErrorVerbosity, id: i64) -> Self {
        BookNotFoundError {
            verbosity,
            book_not_found_reason: verbosity.reveal(|| format!("Book with id {id} not found")),
        }
    }
}
