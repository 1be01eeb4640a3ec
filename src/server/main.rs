use clap::Parser;
use std::sync::Arc;
use crate::cache::RefreshCache;
use crate::config;
use crate::notifier::Notifier;
use crate::server::Args;
use crate::server::handlers::AppState;
use crate::server::server;
use crate::upstream::Fetcher;
use crate::upstream::transport::UreqClient;
use crate::utils;

pub async fn run_server() {
    let args = Args::parse();

    if let Err(e) = utils::init_tracing() {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    let mut cfg = match config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return;
        }
    };
    if let Some(listen) = args.listen {
        cfg.server_config.listen_addr = listen;
    }
    tracing::debug!("config: {:?}", cfg);

    let upstream = &cfg.upstream_config;
    tracing::info!("Upstream: {}", upstream.base_url);
    tracing::info!("Cache expiry: {}s", upstream.cache_expiry);

    let fetch_client = Arc::new(UreqClient::new(upstream.request_timeout()));
    let fetcher = Fetcher::new(fetch_client, upstream.base_url.clone(), upstream.backoff());
    let cache = Arc::new(RefreshCache::new(Arc::new(fetcher), upstream.expiry()));

    let notify_client = Arc::new(UreqClient::new(cfg.notify_config.timeout()));
    let notifier = Arc::new(Notifier::new(notify_client, upstream.backoff()));

    let app_state = AppState::new(cache, notifier, cfg.server_config.page_size);
    if let Err(e) = server::start(&cfg.server_config.listen_addr, app_state).await {
        tracing::error!("Server error: {}", e);
    }
}
