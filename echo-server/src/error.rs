use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Reasons a submission could not be decoded.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] multer::Error),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
}

impl IntoResponse for InspectError {
    fn into_response(self) -> Response {
        let status = match self {
            InspectError::Multipart(_) => StatusCode::BAD_REQUEST,
            InspectError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        };
        tracing::warn!(%status, error = %self, "rejecting submission");
        (status, self.to_string()).into_response()
    }
}
