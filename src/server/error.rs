use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Every failure a handler can produce. The optional message replaces the
/// default text of its status in the rendered envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest(Option<String>),
    #[error("resource not found")]
    NotFound(Option<String>),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable")]
    Unprocessable(Option<String>),
    #[error("internal server error")]
    Internal(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Some(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Some(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let message = match self {
            ApiError::BadRequest(Some(message))
            | ApiError::NotFound(Some(message))
            | ApiError::Unprocessable(Some(message)) => message.clone(),
            // database details never leave the process
            _ => self.to_string(),
        };
        ErrorEnvelope {
            success: false,
            error: self.status().as_u16(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            tracing::error!("Unexpected database error: {err:#}");
        }
        (self.status(), Json(self.envelope())).into_response()
    }
}
