//! Subscriber registry and "new data" fan-out
//!
//! Notifications are best effort: each subscriber gets a bounded number of
//! attempts, independent of every other subscriber, and nothing is reported
//! back to the request that triggered the dispatch.

use crate::upstream::retry::{Backoff, retry};
use crate::upstream::transport::{HttpClient, UpstreamError};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tokio::task::JoinSet;

pub const NOTIFICATION_MESSAGE: &str = "New data is available!";

/// Registered subscriber URLs
pub struct SubscriberSet {
    urls: RwLock<HashSet<String>>,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self {
            urls: RwLock::new(HashSet::new()),
        }
    }

    /// Register `url`; returns false if it was already registered
    pub fn register(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        let inserted = self
            .urls
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.clone());
        if inserted {
            tracing::info!("Registered subscriber {}", url);
        } else {
            tracing::debug!("Subscriber {} already registered", url);
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.urls.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current set, so delivery never holds the lock
    pub fn snapshot(&self) -> Vec<String> {
        self.urls
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for SubscriberSet {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Notifier {
    client: Arc<dyn HttpClient>,
    backoff: Backoff,
}

impl Notifier {
    pub fn new(client: Arc<dyn HttpClient>, backoff: Backoff) -> Self {
        Self { client, backoff }
    }

    pub fn payload() -> Value {
        json!({ "message": NOTIFICATION_MESSAGE })
    }

    /// Notify every subscriber concurrently and wait for all deliveries to
    /// finish or give up.
    pub async fn notify(&self, subscribers: Vec<String>) {
        let mut deliveries = JoinSet::new();
        for url in subscribers {
            let client = self.client.clone();
            let backoff = self.backoff.clone();
            deliveries.spawn(async move {
                deliver(client.as_ref(), &backoff, &url).await;
            });
        }

        while let Some(result) = deliveries.join_next().await {
            if let Err(e) = result {
                tracing::error!("Notification task failed: {}", e);
            }
        }
    }

    /// Start `notify` as a detached task; the caller never waits on it.
    pub fn dispatch(self: &Arc<Self>, subscribers: Vec<String>) {
        if subscribers.is_empty() {
            return;
        }
        tracing::info!("Dispatching notifications to {} subscribers", subscribers.len());
        let notifier = self.clone();
        tokio::spawn(async move {
            notifier.notify(subscribers).await;
        });
    }
}

/// Deliver one notification, stopping at the first 200 response
async fn deliver(client: &dyn HttpClient, backoff: &Backoff, url: &str) -> bool {
    tracing::info!("Sending notification to {}", url);
    let payload = Notifier::payload();
    let operation = format!("notify {}", url);
    let payload = &payload;

    retry(&operation, backoff, move || post_once(client, url, payload))
        .await
        .is_some()
}

/// A delivery counts only when the subscriber answers 200
async fn post_once(client: &dyn HttpClient, url: &str, payload: &Value) -> crate::Result<()> {
    match client.post_json(url, payload).await? {
        200 => Ok(()),
        status => Err(UpstreamError::Status(status).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let subscribers = SubscriberSet::new();
        assert!(subscribers.is_empty());
        assert!(subscribers.register("http://localhost:9000/hook"));
        assert!(!subscribers.register("http://localhost:9000/hook"));
        assert_eq!(subscribers.len(), 1);

        subscribers.register("http://localhost:9001/hook");
        let mut urls = subscribers.snapshot();
        urls.sort();
        assert_eq!(
            urls,
            vec!["http://localhost:9000/hook", "http://localhost:9001/hook"]
        );
    }

    #[test]
    fn test_payload() {
        assert_eq!(
            Notifier::payload(),
            serde_json::json!({ "message": "New data is available!" })
        );
    }
}
