//! Read-only queries over a snapshot
//!
//! Nothing here mutates the snapshot or performs I/O. Foreign keys from
//! launches into the rocket and site collections are resolved by linear
//! lookup.

pub mod date;

use crate::cache::Snapshot;
use crate::upstream::models::{Launch, Rocket, Site};
use date::parse_date;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Name reported for a foreign key missing from its reference collection
pub const UNKNOWN: &str = "Unknown";

/// Launch filter criteria. Empty name lists and `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct LaunchFilter {
    /// Inclusive lower bound
    pub start: Option<OffsetDateTime>,
    /// Inclusive upper bound
    pub end: Option<OffsetDateTime>,
    /// Rocket names, any of which may match
    pub rockets: Vec<String>,
    pub success: Option<bool>,
    /// Site names, any of which may match
    pub sites: Vec<String>,
}

impl LaunchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: OffsetDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: OffsetDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn rocket(mut self, name: impl Into<String>) -> Self {
        self.rockets.push(name.into());
        self
    }

    pub fn rockets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rockets.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    pub fn site(mut self, name: impl Into<String>) -> Self {
        self.sites.push(name.into());
        self
    }

    pub fn sites<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sites.extend(names.into_iter().map(Into::into));
        self
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalize_all(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| normalize(name))
        .filter(|name| !name.is_empty())
        .collect()
}

pub fn find_rocket<'a>(snapshot: &'a Snapshot, id: &str) -> Option<&'a Rocket> {
    snapshot.rockets.iter().find(|rocket| rocket.id == id)
}

pub fn find_site<'a>(snapshot: &'a Snapshot, id: &str) -> Option<&'a Site> {
    snapshot.sites.iter().find(|site| site.id == id)
}

/// Rocket name for `id`, or [`UNKNOWN`]
pub fn resolve_rocket_name<'a>(snapshot: &'a Snapshot, id: Option<&str>) -> &'a str {
    id.and_then(|id| find_rocket(snapshot, id))
        .map(|rocket| rocket.name.as_str())
        .unwrap_or(UNKNOWN)
}

/// Site name for `id`, or [`UNKNOWN`]
pub fn resolve_site_name<'a>(snapshot: &'a Snapshot, id: Option<&str>) -> &'a str {
    id.and_then(|id| find_site(snapshot, id))
        .map(|site| site.name.as_str())
        .unwrap_or(UNKNOWN)
}

pub fn rocket_names(snapshot: &Snapshot) -> Vec<String> {
    snapshot.rockets.iter().map(|rocket| rocket.name.clone()).collect()
}

pub fn site_names(snapshot: &Snapshot) -> Vec<String> {
    snapshot.sites.iter().map(|site| site.name.clone()).collect()
}

/// Launches matching every criterion in `criteria`, in snapshot order.
///
/// Launches whose date cannot be parsed never match. A reversed date range
/// is swapped rather than treated as empty.
pub fn filter<'a>(snapshot: &'a Snapshot, criteria: &LaunchFilter) -> Vec<&'a Launch> {
    let (start, end) = match (criteria.start, criteria.end) {
        (Some(start), Some(end)) if start > end => {
            tracing::warn!(
                "Invalid date range, start {} is after end {}, swapping",
                start,
                end
            );
            (Some(end), Some(start))
        }
        bounds => bounds,
    };
    let rockets = normalize_all(&criteria.rockets);
    let sites = normalize_all(&criteria.sites);

    snapshot
        .launches
        .iter()
        .filter(|launch| {
            let Some(launch_date) = launch.date_utc.as_deref().and_then(parse_date) else {
                tracing::warn!("Skipping launch {} - invalid date format", launch.id);
                return false;
            };

            if start.is_some_and(|start| launch_date < start) {
                return false;
            }
            if end.is_some_and(|end| launch_date > end) {
                return false;
            }

            if let Some(success) = criteria.success {
                if launch.success != Some(success) {
                    return false;
                }
            }

            if !rockets.is_empty() {
                let name = normalize(resolve_rocket_name(snapshot, launch.rocket.as_deref()));
                if !rockets.contains(&name) {
                    return false;
                }
            }

            if !sites.is_empty() {
                let name = normalize(resolve_site_name(snapshot, launch.launchpad.as_deref()));
                if !sites.contains(&name) {
                    return false;
                }
            }

            true
        })
        .collect()
}

/// Percentage of `rocket_name`'s launches that succeeded.
///
/// `None` when the rocket has no launches; that is not the same as 0%.
pub fn success_rate(snapshot: &Snapshot, rocket_name: &str) -> Option<f64> {
    let launches = filter(snapshot, &LaunchFilter::new().rocket(rocket_name));
    if launches.is_empty() {
        return None;
    }
    let succeeded = launches
        .iter()
        .filter(|launch| launch.success == Some(true))
        .count();
    Some(succeeded as f64 / launches.len() as f64 * 100.0)
}

/// Number of launches from any of `site_names`
pub fn launches_by_site<I, S>(snapshot: &Snapshot, site_names: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    filter(snapshot, &LaunchFilter::new().sites(site_names)).len()
}

/// Bucket size for [`launch_frequency`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Keyed by month of year, "01" to "12"
    Monthly,
    /// Keyed by four digit year
    Yearly,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(Granularity::Monthly),
            "yearly" | "year" => Ok(Granularity::Yearly),
            other => Err(format!("unknown granularity: {}", other)),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Monthly => f.write_str("monthly"),
            Granularity::Yearly => f.write_str("yearly"),
        }
    }
}

/// Launch counts grouped by month or year.
///
/// Launches with a missing or unparseable date are left out.
pub fn launch_frequency(snapshot: &Snapshot, granularity: Granularity) -> BTreeMap<String, usize> {
    let mut frequency = BTreeMap::new();
    for launch in &snapshot.launches {
        let Some(date) = launch.date_utc.as_deref().and_then(parse_date) else {
            continue;
        };
        let key = match granularity {
            Granularity::Monthly => format!("{:02}", u8::from(date.month())),
            Granularity::Yearly => format!("{:04}", date.year()),
        };
        *frequency.entry(key).or_insert(0) += 1;
    }
    frequency
}

/// Slice out page `page` (1-based) and report the total page count.
///
/// Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> (&[T], usize) {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return (&[], total_pages);
    }
    let end = (start + page_size).min(items.len());
    (&items[start..end], total_pages)
}
