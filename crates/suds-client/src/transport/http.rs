use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use suds_config::HttpSettings;
use tracing::{debug, trace};

use super::{Payload, Transport};
use crate::error::TransportError;

/// [`Transport`] issuing cross-origin friendly GET requests with the payload
/// encoded in the query string.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(settings: &HttpSettings) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an already configured client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, target: &str, payload: &Payload) -> Result<Value, TransportError> {
        let query = encode_query(payload);
        trace!(url = target, params = query.len(), "SUDS request");

        let resp = self
            .http
            .get(target)
            .query(&query)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        handle_response(target, resp).await
    }
}

async fn handle_response(target: &str, resp: reqwest::Response) -> Result<Value, TransportError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        debug!(url = target, status = status.as_u16(), "SUDS request failed");
        return Err(TransportError::status(status.as_u16(), body));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Flatten a payload into query pairs.
///
/// Arrays are joined with commas, nested objects are sent as JSON and nulls
/// are dropped.
fn encode_query(payload: &Payload) -> Vec<(String, String)> {
    payload
        .iter()
        .filter_map(|(key, value)| {
            let encoded = match value {
                Value::Null => return None,
                Value::Array(items) => items
                    .iter()
                    .map(scalar_to_string)
                    .collect::<Vec<_>>()
                    .join(","),
                other => scalar_to_string(other),
            };
            Some((key.clone(), encoded))
        })
        .collect()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
