//! HTTP request handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use crate::cache::{RefreshCache, Snapshot};
use crate::notifier::{Notifier, SubscriberSet};
use crate::query::{self, Granularity};
use super::models::{
    LaunchPage, LaunchView, ListParams, RocketStats, SiteStats, StatsResponse, SubscribeRequest,
};

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RefreshCache>,
    pub subscribers: Arc<SubscriberSet>,
    pub notifier: Arc<Notifier>,
    pub page_size: usize,
    /// Last refresh generation subscribers were notified about
    notified: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(cache: Arc<RefreshCache>, notifier: Arc<Notifier>, page_size: usize) -> Self {
        Self {
            cache,
            subscribers: Arc::new(SubscriberSet::new()),
            notifier,
            page_size,
            notified: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current snapshot; kicks off subscriber notification in the
    /// background when the refresh behind it changed the data.
    ///
    /// Every request that waited on the same refresh sees `changed`, but
    /// only the first to claim its generation dispatches.
    async fn snapshot(&self) -> Arc<Snapshot> {
        let refresh = self.cache.get_snapshot().await;
        if refresh.changed
            && self.notified.fetch_max(refresh.generation, Ordering::AcqRel) < refresh.generation
        {
            self.notifier.dispatch(self.subscribers.snapshot());
        }
        refresh.snapshot
    }
}

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rocketwatch"
    }))
}

/// Paginated, filtered launch list
pub async fn launches(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<LaunchPage> {
    let snapshot = state.snapshot().await;
    let params = ListParams::from_pairs(&pairs);

    let filtered = query::filter(&snapshot, &params.filter());
    let (page, total_pages) = query::paginate(&filtered, params.page, state.page_size);
    tracing::debug!("Serving {} of {} launches", page.len(), filtered.len());

    Json(LaunchPage {
        launches: page
            .iter()
            .map(|launch| LaunchView::resolve(&snapshot, launch))
            .collect(),
        rockets: query::rocket_names(&snapshot),
        launchpads: query::site_names(&snapshot),
        page: params.page,
        total_pages,
        total: filtered.len(),
    })
}

/// Every filtered launch, names resolved and ids dropped
pub async fn export(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<LaunchView>> {
    let snapshot = state.snapshot().await;
    let params = ListParams::from_pairs(&pairs);

    Json(
        query::filter(&snapshot, &params.filter())
            .into_iter()
            .map(|launch| LaunchView::resolve(&snapshot, launch).without_id())
            .collect(),
    )
}

/// Success rates, per-site counts and launch frequency
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.snapshot().await;

    let success_rates = query::rocket_names(&snapshot)
        .into_iter()
        .filter_map(|name| {
            query::success_rate(&snapshot, &name).map(|success_rate| RocketStats {
                name,
                success_rate,
            })
        })
        .collect();

    let launches_by_site = query::site_names(&snapshot)
        .into_iter()
        .map(|name| SiteStats {
            launches: query::launches_by_site(&snapshot, [name.as_str()]),
            name,
        })
        .collect();

    Json(StatsResponse {
        total_launches: snapshot.launches.len(),
        success_rates,
        launches_by_site,
        monthly: query::launch_frequency(&snapshot, Granularity::Monthly),
        yearly: query::launch_frequency(&snapshot, Granularity::Yearly),
    })
}

/// Register a webhook to be told when new data arrives
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> (StatusCode, &'static str) {
    match request.url.filter(|url| !url.trim().is_empty()) {
        Some(url) => {
            state.subscribers.register(url.trim());
            (StatusCode::OK, "Subscribed successfully!")
        }
        None => (StatusCode::BAD_REQUEST, "No url"),
    }
}
