//! Upstream data source
//!
//! Fetches the three record collections (launches, rockets, launch sites)
//! from the remote API. Every fetch is retried with backoff and, once the
//! attempts are exhausted, degrades to an empty collection instead of an
//! error: the cache treats "fetch failed" and "fetch returned nothing" alike.

pub mod models;
pub mod retry;
pub mod transport;

use crate::cache::Snapshot;
use async_trait::async_trait;
use models::{Launch, Rocket, Site};
use retry::{Backoff, retry};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use transport::{HttpClient, UpstreamError};

pub const LAUNCHES_ENDPOINT: &str = "launches";
pub const ROCKETS_ENDPOINT: &str = "rockets";
pub const SITES_ENDPOINT: &str = "launchpads";

/// Source of the three collections making up a snapshot
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch_launches(&self) -> Vec<Launch>;
    async fn fetch_rockets(&self) -> Vec<Rocket>;
    async fn fetch_sites(&self) -> Vec<Site>;

    /// Fetch all three collections concurrently.
    ///
    /// Latency is bounded by the slowest of the three calls.
    async fn fetch_snapshot(&self) -> Snapshot {
        let (launches, rockets, sites) =
            tokio::join!(self.fetch_launches(), self.fetch_rockets(), self.fetch_sites());
        Snapshot {
            launches,
            rockets,
            sites,
        }
    }
}

/// HTTP-backed upstream
pub struct Fetcher {
    client: Arc<dyn HttpClient>,
    base_url: String,
    backoff: Backoff,
}

impl Fetcher {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>, backoff: Backoff) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            backoff,
        }
    }

    /// Fetch the raw records behind `endpoint`.
    ///
    /// Never fails: returns an empty vector once every attempt has failed.
    pub async fn fetch_collection(&self, endpoint: &str) -> Vec<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::info!("Fetching data from: {}", url);

        let operation = format!("GET {}", url);
        let client = self.client.as_ref();
        let url = url.as_str();
        retry(&operation, &self.backoff, move || get_records(client, url))
            .await
            .unwrap_or_default()
    }

    /// Fetch `endpoint` and project each record onto `T`
    async fn fetch_projected<T: DeserializeOwned>(&self, endpoint: &str) -> Vec<T> {
        self.fetch_collection(endpoint)
            .await
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<T>(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} record: {}", endpoint, e);
                    None
                }
            })
            .collect()
    }
}

async fn get_records(client: &dyn HttpClient, url: &str) -> crate::Result<Vec<Value>> {
    match client.get_json(url).await? {
        Value::Array(records) => Ok(records),
        _ => Err(UpstreamError::NotArray.into()),
    }
}

#[async_trait]
impl Upstream for Fetcher {
    async fn fetch_launches(&self) -> Vec<Launch> {
        self.fetch_projected(LAUNCHES_ENDPOINT).await
    }

    async fn fetch_rockets(&self) -> Vec<Rocket> {
        self.fetch_projected(ROCKETS_ENDPOINT).await
    }

    async fn fetch_sites(&self) -> Vec<Site> {
        self.fetch_projected(SITES_ENDPOINT).await
    }
}
