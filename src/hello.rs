//! Hello service: a fixed `Hello World!` on every request.

use crate::response::{self, HttpResponse};
use crate::service::{BoxFuture, Context, Service};

pub const GREETING: &str = "Hello World!";

#[derive(Debug, Default)]
pub struct HelloService;

impl Service for HelloService {
    fn name(&self) -> &'static str {
        "hello"
    }

    fn call(&self, _ctx: Context) -> BoxFuture<'static, crate::Result<HttpResponse>> {
        Box::pin(async { Ok(response::ok_raw(GREETING)) })
    }
}
