use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;

/// Framework-agnostic `{statusCode, body}` envelope returned by the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    #[serde(serialize_with = "status_as_u16")]
    pub status_code: StatusCode,
    pub body: Value,
}

fn status_as_u16<S: serde::Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

impl HttpResponse {
    pub fn new(status_code: StatusCode, body: Value) -> Self {
        Self { status_code, body }
    }

    pub fn ok_200(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn created_201(body: Value) -> Self {
        Self::new(StatusCode::CREATED, body)
    }

    pub fn no_content_204() -> Self {
        Self::new(StatusCode::NO_CONTENT, Value::Null)
    }

    pub fn bad_request_400(body: Value) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// Only the error's display message reaches the body.
    pub fn server_error_500(error: &dyn std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": error.to_string() }),
        )
    }

    pub fn message(message: &str) -> Value {
        json!({ "message": message })
    }
}

impl From<AppError> for HttpResponse {
    fn from(e: AppError) -> Self {
        match &e {
            AppError::BadRequest(m) => HttpResponse::bad_request_400(HttpResponse::message(m)),
            AppError::Internal(_) => HttpResponse::server_error_500(&e),
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        if self.status_code == StatusCode::NO_CONTENT {
            return self.status_code.into_response();
        }
        (self.status_code, Json(self.body)).into_response()
    }
}
