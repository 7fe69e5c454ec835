use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors of the web layer itself. Remote API failures never reach this
/// type; they settle into `FetchState::Error` instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message): (StatusCode, String) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Route ids must be positive integers.
pub fn parse_movie_id(raw: &str) -> Result<i64, AppError> {
    let id: i64 = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid movie id: {}", raw)))?;
    if id <= 0 {
        return Err(AppError::NotFound);
    }
    Ok(id)
}
