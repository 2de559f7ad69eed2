mod http;
mod status;

pub use http::HttpTransport;
pub use status::{Code, Status};

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// A remote operation on one of the Go2 services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Method {
    /// Fully qualified service name, e.g. `links.v1.LinkService`
    pub service: &'static str,
    /// Operation name, e.g. `ListLinks`
    pub name: &'static str,
}

impl Method {
    pub const fn new(service: &'static str, name: &'static str) -> Self {
        Self { service, name }
    }

    pub fn path(&self) -> String {
        format!("/{}/{}", self.service, self.name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.name)
    }
}

/// The connection shared by every service wrapper.
///
/// Implementations issue exactly one unary call per `unary` invocation and
/// never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request message and wait for its response message
    async fn unary(&self, method: Method, request: Value) -> Result<Value, Status>;

    /// Release the connection. Pending and later calls fail with `CANCELLED`.
    /// Calling this more than once has no further effect.
    fn close(&self);

    fn is_closed(&self) -> bool;
}
