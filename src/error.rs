//! Error types with HTTP status code mapping.

use hyper::StatusCode;

use crate::response::{self, HttpResponse};

/// Error type for canary operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("OpenSSL error: {0}")]
    Ssl(#[from] openssl::error::ErrorStack),

    // Watch errors
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    // System errors
    #[error("Invalid address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map error to HTTP status code. Fixtures accept any request, so every
    /// failure is on the server side.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Convert error into HTTP response. Details are logged, never sent.
    pub fn into_response(self) -> HttpResponse {
        tracing::error!("Internal error: {self}");
        response::error(self.status_code(), "Internal server error")
    }
}

/// Result type alias using canary's Error.
pub type Result<T> = std::result::Result<T, Error>;
