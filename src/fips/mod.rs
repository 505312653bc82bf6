//! FIPS capability probe service.
//!
//! Every request samples the provider's mode flag, runs the [`probe`] and
//! answers with the confirmation lines. A [`Violation`] is fatal: the process
//! logs the diagnostic and exits with status 1.

pub mod probe;
pub mod provider;

use std::sync::Arc;

use hyper::StatusCode;
use tracing::error;

use crate::response::{self, HttpResponse};
use crate::service::{BoxFuture, Context, Service};

pub use probe::{CIPHER_VERIFIED, HASH_VERIFIED, Report, Violation};
pub use provider::{CipherAlgorithm, HashAlgorithm, ModeSource, Provider, SystemProvider};

/// What the service does when a request's probe finds a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnViolation {
    /// Terminate the process with status 1.
    #[default]
    Exit,
    /// Answer 500 with the partial output and the diagnostic.
    Respond,
}

/// FIPS probe fixture.
pub struct FipsService {
    provider: Arc<dyn Provider>,
    on_violation: OnViolation,
}

impl FipsService {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            on_violation: OnViolation::default(),
        }
    }

    pub fn on_violation(mut self, policy: OnViolation) -> Self {
        self.on_violation = policy;
        self
    }
}

impl Service for FipsService {
    fn name(&self) -> &'static str {
        "fips"
    }

    fn call(&self, _ctx: Context) -> BoxFuture<'static, crate::Result<HttpResponse>> {
        let provider = Arc::clone(&self.provider);
        let policy = self.on_violation;
        Box::pin(async move {
            let mut body = String::new();
            match probe::run(provider.as_ref(), &mut body) {
                Ok(_) => {
                    body.push('\n');
                    Ok(response::ok_text(body))
                }
                Err(violation) => match policy {
                    OnViolation::Exit => fatal(&violation),
                    OnViolation::Respond => {
                        error!(algorithm = violation.algorithm(), "Error: {violation}");
                        body.push_str(&format!("Error: {violation}\n"));
                        Ok(response::text(StatusCode::INTERNAL_SERVER_ERROR, body))
                    }
                },
            }
        })
    }
}

/// Log a violation and terminate the process with status 1.
pub fn fatal(violation: &Violation) -> ! {
    error!(algorithm = violation.algorithm(), "Error: {violation}");
    std::process::exit(1)
}
