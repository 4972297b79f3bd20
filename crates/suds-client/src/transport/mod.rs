//! Request/response exchange with the service.
//!
//! The gateway never talks HTTP itself: it hands a target URL and a flat
//! payload to a [`Transport`] and receives the decoded JSON body. Errors are
//! returned to the caller unchanged.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::TransportError;

/// Parameters of a single call, sent as-is to the endpoint.
pub type Payload = Map<String, Value>;

/// Performs one request/response exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Call `target` with `payload` and return the decoded response body.
    ///
    /// An empty body decodes to `Value::Null`.
    async fn call(&self, target: &str, payload: &Payload) -> Result<Value, TransportError>;
}
