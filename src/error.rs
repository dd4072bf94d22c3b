// src/error.rs
use actix_web::{HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single upstream A2S round-trip.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("unexpected packet header {0:#010X}")]
    UnexpectedHeader(i32),
    #[error("split packet where a whole reply was expected")]
    SplitPacket,
    #[error("compressed split replies are not supported")]
    Compressed,
    #[error("unsupported response type 0x{0:02X}")]
    UnsupportedResponse(u8),
    #[error("server kept answering with challenges")]
    ChallengeLoop,
}

/// The query client could not be set up. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("failed to resolve {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} did not resolve to any address")]
    NoAddress(String),
}

/// Request-scoped failure of the status endpoint.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("error getting server info: {0}")]
    Query(#[from] QueryError),
    #[error("error encoding status: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ResponseError for StatusError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body("500 Internal Server Error")
    }
}
