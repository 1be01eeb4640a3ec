//! In-memory fakes shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use rocketwatch::upstream::Upstream;
use rocketwatch::upstream::models::{Launch, Rocket, Site};
use rocketwatch::upstream::transport::HttpClient;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted reply to a single request
#[derive(Clone, Debug)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Fail,
}

/// HTTP client answering from per-URL scripts. The last reply of a script
/// repeats once the script runs out.
#[derive(Default)]
pub struct FakeHttp {
    scripts: Mutex<HashMap<String, Vec<Reply>>>,
    calls: Mutex<Vec<(String, String, Option<Value>)>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: &str, replies: Vec<Reply>) {
        self.scripts.lock().unwrap().insert(url.to_string(), replies);
    }

    pub fn calls_to(&self, method: &str, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, u, _)| m == method && u == url)
            .count()
    }

    pub fn bodies_to(&self, url: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, u, _)| u == url)
            .filter_map(|(_, _, body)| body.clone())
            .collect()
    }

    fn next_reply(&self, method: &str, url: &str, body: Option<Value>) -> Reply {
        let mut calls = self.calls.lock().unwrap();
        let seen = calls
            .iter()
            .filter(|(m, u, _)| m == method && u == url)
            .count();
        calls.push((method.to_string(), url.to_string(), body));

        let scripts = self.scripts.lock().unwrap();
        match scripts.get(url) {
            Some(replies) if !replies.is_empty() => {
                replies[seen.min(replies.len() - 1)].clone()
            }
            _ => Reply::Fail,
        }
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get_json(&self, url: &str) -> rocketwatch::Result<Value> {
        match self.next_reply("GET", url, None) {
            Reply::Json(value) => Ok(value),
            Reply::Status(status) => Err(format!("unexpected status {}", status).into()),
            Reply::Fail => Err("connection refused".into()),
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> rocketwatch::Result<u16> {
        match self.next_reply("POST", url, Some(body.clone())) {
            Reply::Status(status) => Ok(status),
            Reply::Json(_) => Ok(200),
            Reply::Fail => Err("connection refused".into()),
        }
    }
}

/// Upstream serving queued collections, one entry per refresh cycle.
/// An exhausted queue behaves like a failed fetch.
#[derive(Default)]
pub struct ScriptedUpstream {
    launches: Mutex<VecDeque<Vec<Launch>>>,
    rockets: Mutex<VecDeque<Vec<Rocket>>>,
    sites: Mutex<VecDeque<Vec<Site>>>,
    pub launch_calls: AtomicUsize,
    pub rocket_calls: AtomicUsize,
    pub site_calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn push(&self, launches: Vec<Launch>, rockets: Vec<Rocket>, sites: Vec<Site>) {
        self.launches.lock().unwrap().push_back(launches);
        self.rockets.lock().unwrap().push_back(rockets);
        self.sites.lock().unwrap().push_back(sites);
    }

    /// Number of full three-way fetches performed
    pub fn fetches(&self) -> usize {
        let launches = self.launch_calls.load(Ordering::SeqCst);
        assert_eq!(launches, self.rocket_calls.load(Ordering::SeqCst));
        assert_eq!(launches, self.site_calls.load(Ordering::SeqCst));
        launches
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn fetch_launches(&self) -> Vec<Launch> {
        self.launch_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.launches.lock().unwrap().pop_front().unwrap_or_default()
    }

    async fn fetch_rockets(&self) -> Vec<Rocket> {
        self.rocket_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.rockets.lock().unwrap().pop_front().unwrap_or_default()
    }

    async fn fetch_sites(&self) -> Vec<Site> {
        self.site_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.sites.lock().unwrap().pop_front().unwrap_or_default()
    }
}

pub fn launch(id: &str, date: &str, rocket: &str, pad: &str, success: Option<bool>) -> Launch {
    Launch {
        id: id.to_string(),
        name: format!("Mission {}", id),
        launchpad: Some(pad.to_string()),
        date_utc: Some(date.to_string()),
        success,
        rocket: Some(rocket.to_string()),
    }
}

pub fn launches(ids: &[&str]) -> Vec<Launch> {
    ids.iter()
        .map(|id| launch(id, "2020-01-01T00:00:00.000Z", "R1", "LP1", Some(true)))
        .collect()
}

pub fn rocket(id: &str, name: &str) -> Rocket {
    Rocket {
        id: id.to_string(),
        name: name.to_string(),
        active: Some(true),
    }
}

pub fn site(id: &str, name: &str) -> Site {
    Site {
        id: id.to_string(),
        name: name.to_string(),
        status: Some("active".to_string()),
        ..Default::default()
    }
}
