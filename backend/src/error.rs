//! HTTP-facing error taxonomy.
//!
//! Every variant renders as `{"message": "..."}` with the matching status code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::MessageResponse;
use std::error::Error as StdError;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("School name and uniform combination are required.")]
    MissingRequiredFields,
    #[error("{0}")]
    BadRequest(String),
    #[error("Uniform not found")]
    NotFound,
    #[error("Upload exceeds the limit of {limit} bytes.")]
    PayloadTooLarge { limit: usize },
    #[error("Server error while {action}.")]
    Internal {
        action: &'static str,
        #[source]
        source: BoxError,
    },
}

impl ApiError {
    pub fn internal(action: &'static str, source: impl Into<BoxError>) -> Self {
        ApiError::Internal {
            action,
            source: source.into(),
        }
    }

    /// Logs the error at a level matching its status.
    pub fn log(&self) {
        match self {
            ApiError::Internal { source, .. } => {
                log::error!("{}: {}", self, source_chain(&**source))
            }
            other => log::debug!("request rejected: {}", other),
        }
    }
}

fn source_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        current = cause.source();
    }
    out
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingRequiredFields | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(MessageResponse::new(self.to_string()))
    }
}
