use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::{auth, db, shared::forms::FormErrors};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),
    #[error("unauthorized")]
    Unauthorized,

    // validation
    #[error("duplicate_slug")]
    DuplicateSlug(String),

    #[error(transparent)]
    DB(db::Error),
    #[error(transparent)]
    Auth(#[from] auth::Error),
    #[error("config")]
    Config(#[from] envy::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unexpected")]
    Unexpected(String),
}

impl Error {
    pub fn not_found_message(self, message: impl Into<String>) -> Self {
        if matches!(self, Self::NotFound(_)) {
            return Self::NotFound(message.into());
        }
        self
    }
}

impl From<db::Error> for Error {
    fn from(error: db::Error) -> Self {
        match error {
            db::Error::NotFound(msg) => Self::NotFound(msg),
            error => Self::DB(error),
        }
    }
}

/// crate::Error <--> tokio_rusqlite::Error, so handlers can fail with an
/// application error from inside a `db.call` closure.
pub mod db_mappers {
    use super::*;
    use crate::db::tokio_rusqlite;

    impl From<tokio_rusqlite::Error> for Error {
        fn from(error: tokio_rusqlite::Error) -> Self {
            match error {
                tokio_rusqlite::Error::Other(err) => match err.downcast::<Error>() {
                    Ok(err) => *err,
                    Err(err) => Error::from(db::Error::from(tokio_rusqlite::Error::Other(err))),
                },
                error => Error::from(db::Error::from(error)),
            }
        }
    }

    impl From<Error> for tokio_rusqlite::Error {
        fn from(error: Error) -> Self {
            tokio_rusqlite::Error::Other(error.into())
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ErrorResponse {
    NotFound { message: String },
    Unauthorized { message: String },
    Validation { message: String, details: FormErrors },
    Unexpected { message: String },
}

impl From<Error> for ErrorResponse {
    fn from(error: Error) -> Self {
        match error {
            Error::NotFound(message) => Self::NotFound { message },
            Error::Unauthorized => Self::Unauthorized {
                message: "Unauthorized".into(),
            },
            Error::DuplicateSlug(slug) => Self::Validation {
                message: "Validation error".into(),
                details: FormErrors::duplicate_slug(&slug),
            },
            Error::Unexpected(message) => {
                tracing::error!("{message}");
                Self::Unexpected { message }
            }
            error => {
                tracing::error!("{:?}", error);
                Self::Unexpected {
                    message: "Unexpected error".into(),
                }
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::DuplicateSlug(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let mut res = axum::Json(ErrorResponse::from(self)).into_response();
        *res.status_mut() = status;
        res
    }
}
