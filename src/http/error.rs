use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// The only error shape that crosses the HTTP boundary. Internal failure
/// detail stays in the logs; callers get a fixed generic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    detail: &'static str,
}

impl ApiError {
    pub fn image_analysis() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "Error analyzing image. Please ensure the image is clear.",
        }
    }

    pub fn text_analysis() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "Error analyzing issue text. Please try rephrasing the report.",
        }
    }

    pub fn missing_upload() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: "Expected a multipart image upload.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}
