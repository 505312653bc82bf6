//! Canary - disposable fixture services for validating deployment pipelines.
//!
//! Each fixture runs as its own process and answers every method on every
//! path:
//!
//! - **Echo**: reflects headers, query string and form body, plus host facts
//! - **Hello**: a fixed `Hello World!`
//! - **FIPS**: a cryptographic capability probe gated on the FIPS mode flag
//! - **Sync**: a file-watch task runner that shells out to a remote copy
//!
//! The shared plumbing is small:
//!
//! - **Config**: Layered configuration (file → env → CLI)
//! - **Server**: Hyper-based HTTP server hosting one [`Service`]
//! - **Service**: Trait for fixture handlers
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use canary::{ConfigLoader, HelloService, Overrides};
//!
//! #[tokio::main]
//! async fn main() -> canary::Result<()> {
//!     let config = ConfigLoader::default().load(None, &Overrides::default())?;
//!     canary::server::run(config, Arc::new(HelloService)).await
//! }
//! ```

pub mod config;
pub mod echo;
pub mod error;
pub mod fips;
pub mod hello;
pub mod host;
pub mod params;
pub mod response;
pub mod server;
pub mod service;
pub mod sync;

// Re-export main types at crate root
pub use config::{Config, ConfigLoader, FipsMode, Overrides};
pub use echo::EchoService;
pub use error::{Error, Result};
pub use fips::{FipsService, OnViolation, SystemProvider};
pub use hello::HelloService;
pub use host::HostFacts;
pub use params::Params;
pub use service::{Context, Service};
pub use sync::{Runner, Trigger};
