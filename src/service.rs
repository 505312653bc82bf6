//! Service trait for fixture handlers.
//!
//! Every fixture answers any method on any path, so a server hosts exactly one
//! [`Service`] instead of a route table.
//!
//! # Example
//!
//! ```ignore
//! use canary::service::{BoxFuture, Context, Service};
//! use canary::response::{self, HttpResponse};
//!
//! pub struct Pong;
//!
//! impl Service for Pong {
//!     fn name(&self) -> &'static str {
//!         "pong"
//!     }
//!
//!     fn call(&self, _ctx: Context) -> BoxFuture<'static, canary::Result<HttpResponse>> {
//!         Box::pin(async { Ok(response::ok_text("pong")) })
//!     }
//! }
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;

use bytes::Bytes;
use hyper::{Method, Version};

use crate::config::SharedConfig;
use crate::params::Params;
use crate::response::HttpResponse;

/// Boxed future for async handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handler context passed to services.
pub struct Context {
    /// The HTTP method.
    pub method: Method,
    /// The request URI.
    pub uri: hyper::Uri,
    /// The negotiated HTTP version.
    pub version: Version,
    /// The request headers.
    pub headers: hyper::http::HeaderMap,
    /// The request body, pre-read as bytes.
    pub body: Bytes,
    /// Peer address of the connection.
    pub remote_addr: SocketAddr,
    /// Server configuration.
    pub config: SharedConfig,
}

impl Context {
    /// Get a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Host the client addressed: the `Host` header, or the URI authority
    /// (HTTP/2 `:authority`).
    pub fn host(&self) -> Option<&str> {
        self.header("host")
            .or_else(|| self.uri.authority().map(|a| a.as_str()))
    }

    /// Decompose the query string.
    pub fn query(&self) -> Params {
        Params::parse(self.uri.query().unwrap_or("").as_bytes())
    }

    /// Decompose the body as URL-encoded form data.
    pub fn form(&self) -> Params {
        Params::parse(&self.body)
    }
}

/// A fixture request handler.
///
/// Services hold their own state; the server shares one instance across all
/// connections.
pub trait Service: Send + Sync {
    /// Service name for identification and logging.
    fn name(&self) -> &'static str;

    /// Handle one request.
    fn call(&self, ctx: Context) -> BoxFuture<'static, crate::Result<HttpResponse>>;
}
