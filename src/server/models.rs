//! HTTP API request and response models

use crate::cache::Snapshot;
use crate::query::{LaunchFilter, resolve_rocket_name, resolve_site_name};
use crate::query::date::parse_bound;
use crate::upstream::models::Launch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Launch with rocket and launchpad ids resolved to names
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LaunchView {
    /// Omitted from exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub launchpad: String,
    pub date_utc: Option<String>,
    pub success: Option<bool>,
    pub rocket: String,
}

impl LaunchView {
    pub fn resolve(snapshot: &Snapshot, launch: &Launch) -> Self {
        Self {
            id: Some(launch.id.clone()),
            name: launch.name.clone(),
            launchpad: resolve_site_name(snapshot, launch.launchpad.as_deref()).to_string(),
            date_utc: launch.date_utc.clone(),
            success: launch.success,
            rocket: resolve_rocket_name(snapshot, launch.rocket.as_deref()).to_string(),
        }
    }

    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }
}

/// One page of the launch list
#[derive(Serialize, Debug, Clone)]
pub struct LaunchPage {
    pub launches: Vec<LaunchView>,
    /// All rocket names, for filter pick-lists
    pub rockets: Vec<String>,
    /// All launchpad names, for filter pick-lists
    pub launchpads: Vec<String>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RocketStats {
    pub name: String,
    pub success_rate: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SiteStats {
    pub name: String,
    pub launches: usize,
}

/// Aggregate statistics over the whole snapshot
#[derive(Serialize, Debug, Clone)]
pub struct StatsResponse {
    pub total_launches: usize,
    /// Rockets with at least one launch
    pub success_rates: Vec<RocketStats>,
    pub launches_by_site: Vec<SiteStats>,
    pub monthly: BTreeMap<String, usize>,
    pub yearly: BTreeMap<String, usize>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Filter and paging parameters from the query string.
///
/// `rocket` and `launchpad` may repeat, so these are built from raw pairs
/// instead of a derived struct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub rockets: Vec<String>,
    pub launchpads: Vec<String>,
    pub success: Option<bool>,
    pub page: usize,
}

impl ListParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = ListParams {
            page: 1,
            ..Default::default()
        };

        for (key, value) in pairs {
            match key.as_str() {
                "start_date" => params.start_date = Some(value.clone()),
                "end_date" => params.end_date = Some(value.clone()),
                "rocket" => params.rockets.push(value.clone()),
                "launchpad" => params.launchpads.push(value.clone()),
                "success" if !value.is_empty() => {
                    params.success = Some(value.eq_ignore_ascii_case("true"))
                }
                "page" => params.page = value.trim().parse::<usize>().unwrap_or(1).max(1),
                _ => {}
            }
        }

        params
    }

    pub fn filter(&self) -> LaunchFilter {
        let mut filter = LaunchFilter::new()
            .rockets(self.rockets.iter().cloned())
            .sites(self.launchpads.iter().cloned());
        if let Some(start) = self.start_date.as_deref().and_then(parse_bound) {
            filter = filter.start(start);
        }
        if let Some(end) = self.end_date.as_deref().and_then(parse_bound) {
            filter = filter.end(end);
        }
        if let Some(success) = self.success {
            filter = filter.success(success);
        }
        filter
    }
}
