use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use common::types::Message;
use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// User-facing error: a status plus the `{"message": ...}` payload every
/// failure response carries. Internal failures are logged here and mapped
/// to a generic message so details never leak to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not authorized")
    }

    fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    }
}

/// `Json` body extractor whose rejections carry the same `{"message": ...}`
/// payload as every other failure. Axum's stock extractor answers malformed
/// or incomplete bodies with a plain-text 422, which no client of this API
/// expects.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Message::new(self.message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::Validation(msg) => Self::bad_request(msg.clone()),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, err.to_string()),
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            AuthError::InvalidCredentials | AuthError::EmailNotVerified => {
                Self::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            AuthError::Unauthorized | AuthError::Token(_) => Self::unauthorized(),
            AuthError::AlreadyVerified => Self::bad_request(err.to_string()),
            AuthError::Hash(_) | AuthError::Mail(_) | AuthError::Repository(_) => {
                Self::internal(err)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::NotFound(_) => Self::not_found(),
            ServiceError::Storage(_) => Self::internal(err),
            ServiceError::Model(e) => Self::bad_request(e.to_string()),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        Self::bad_request(err.to_string())
    }
}
