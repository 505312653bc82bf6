//! Echo service: reflects the request back as plain text, followed by host
//! diagnostics.

use std::fmt;

use hyper::http::HeaderMap;
use indexmap::IndexMap;

use crate::host::HostFacts;
use crate::response::{self, HttpResponse};
use crate::service::{BoxFuture, Context, Service};

/// Echo fixture.
#[derive(Debug, Default)]
pub struct EchoService;

impl EchoService {
    pub fn new() -> Self {
        Self
    }
}

impl Service for EchoService {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn call(&self, ctx: Context) -> BoxFuture<'static, crate::Result<HttpResponse>> {
        Box::pin(async move {
            // sysinfo reads /proc synchronously.
            let facts = tokio::task::spawn_blocking(HostFacts::collect)
                .await
                .map_err(|e| crate::Error::Internal(format!("host facts task failed: {e}")))?;
            Ok(response::ok_text(render(&ctx, &facts)))
        })
    }
}

/// Build the echo report for one request.
pub fn render(ctx: &Context, facts: &HostFacts) -> String {
    Report { ctx, facts }.to_string()
}

/// The echo report: request first, host facts last.
struct Report<'a> {
    ctx: &'a Context,
    facts: &'a HostFacts,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = self.ctx;
        let production = if ctx.config.app.is_production() {
            "yes"
        } else {
            "no"
        };

        writeln!(f, "This is an echo service")?;
        writeln!(f, "Host: {}", ctx.host().unwrap_or("-"))?;
        writeln!(f)?;
        writeln!(f, "Production Mode: {production}")?;
        writeln!(f)?;
        writeln!(f, "{:?}", ctx.version)?;
        writeln!(f, "Request headers:")?;
        writeln!(f, "{}", render_headers(&ctx.headers))?;
        writeln!(f, "Request query:")?;
        writeln!(f, "{}", ctx.query().render())?;
        writeln!(f, "Request body:")?;
        writeln!(f, "{}", ctx.form().render())?;
        writeln!(f)?;
        write!(f, "{}", self.facts)?;
        writeln!(f)
    }
}

/// Headers as a pretty-printed JSON object in arrival order. Repeated headers
/// are joined with `", "`; non-UTF-8 values are replaced lossily.
pub fn render_headers(headers: &HeaderMap) -> String {
    let mut map: IndexMap<&str, String> = IndexMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        map.entry(name.as_str())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
}
