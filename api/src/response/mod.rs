use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde::Serialize;
use services::ServiceError;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// Every endpoint answers with the same structure:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Empty payload for responses that carry no data.
#[derive(Serialize, Default)]
pub struct Empty;

/// Maps a domain failure onto the HTTP surface.
///
/// InvalidInput/InvalidState -> 400, Forbidden -> 403, NotFound -> 404,
/// Conflict -> 409. Database failures are logged and masked as 500.
pub fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::InvalidInput(_) | ServiceError::InvalidState(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Database(e) => {
            tracing::error!(error = %e, "database failure while handling request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Internal server error")),
            )
                .into_response();
        }
    };

    (status, Json(ApiResponse::<Empty>::error(err.to_string()))).into_response()
}
