//! HTTP transport used for upstream fetches and subscriber notifications

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::fmt::Display;
use std::time::Duration;

/// Transport-level failures
#[derive(Debug)]
pub enum UpstreamError {
    /// Upstream answered with a status other than 200
    Status(u16),

    /// Body parsed as JSON but is not an array of records
    NotArray,
}

impl std::error::Error for UpstreamError {}

impl Display for UpstreamError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UpstreamError::Status(status) => write!(fmt, "unexpected status {}", status),
            UpstreamError::NotArray => "response body is not a JSON array".fmt(fmt),
        }
    }
}

/// Minimal HTTP client surface
///
/// Implementations must be cheap to share between tasks; the cache fetches
/// three collections concurrently through the same client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and decode the body as JSON
    async fn get_json(&self, url: &str) -> crate::Result<Value>;

    /// POST `body` as JSON to `url` and return the response status.
    ///
    /// Non-2xx statuses are returned as `Ok(status)`; only transport
    /// failures are errors.
    async fn post_json(&self, url: &str, body: &Value) -> crate::Result<u16>;
}

/// Blocking `ureq` agent driven from the blocking thread pool
#[derive(Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

#[async_trait]
impl HttpClient for UreqClient {
    async fn get_json(&self, url: &str) -> crate::Result<Value> {
        let agent = self.agent.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || -> crate::Result<Value> {
            let response = agent.get(&url).call()?;
            let status = response.status();
            if status != 200 {
                return Err(UpstreamError::Status(status).into());
            }
            let body = response.into_string()?;
            Ok(serde_json::from_str(&body)?)
        })
        .await?
    }

    async fn post_json(&self, url: &str, body: &Value) -> crate::Result<u16> {
        let agent = self.agent.clone();
        let url = url.to_string();
        let json_data = serde_json::to_string(body)?;

        tokio::task::spawn_blocking(move || -> crate::Result<u16> {
            let request = agent.post(&url).set("Content-Type", "application/json");
            match request.send_string(&json_data) {
                Ok(response) => Ok(response.status()),
                Err(ureq::Error::Status(status, _)) => Ok(status),
                Err(e) => Err(e.into()),
            }
        })
        .await?
    }
}
