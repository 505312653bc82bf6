//! HTTP response builders.
//!
//! The fixtures speak plain text; JSON is only used for error bodies.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// Response body type used throughout canary.
pub type Body = Full<Bytes>;

/// Full response type used throughout canary.
pub type HttpResponse = Response<Body>;

/// Build a `text/plain` response with the given status code and body.
pub fn text(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(body.into()))
        .unwrap()
}

/// Build a 200 OK `text/plain` response.
pub fn ok_text(body: impl Into<Bytes>) -> HttpResponse {
    text(StatusCode::OK, body)
}

/// Build a 200 OK response without a `Content-Type` header.
pub fn ok_raw(body: impl Into<Bytes>) -> HttpResponse {
    Response::builder()
        .status(StatusCode::OK)
        .body(Full::new(body.into()))
        .unwrap()
}

/// Build a JSON error response with the given status code.
pub fn error(status: StatusCode, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message });
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
