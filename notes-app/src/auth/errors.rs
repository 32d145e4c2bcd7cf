use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tower_sessions::session;

use crate::db;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    DB(#[from] db::Error),

    #[error(transparent)]
    Session(#[from] session::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    pub error: String,
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: String, message: Option<String>) -> Self {
        Self { error, message }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{self:?}");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("unexpected".into(), Some("Unexpected error".into()))),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_failure_is_server_error() {
        let res = Error::Unexpected(anyhow::anyhow!("argon2 worker panicked")).into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
