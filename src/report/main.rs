use clap::Parser;
use std::sync::Arc;
use crate::cache::RefreshCache;
use crate::config::UpstreamConfig;
use crate::query::LaunchFilter;
use crate::query::date::parse_bound;
use crate::report::Args;
use crate::report::prettylog::{log_banner, log_report};
use crate::upstream::Fetcher;
use crate::upstream::transport::UreqClient;
use crate::utils;

pub async fn run_report() {
    let args = Args::parse();

    if let Err(e) = utils::init_tracing() {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    let upstream = UpstreamConfig {
        base_url: args.base_url.clone(),
        ..Default::default()
    };
    log_banner(&upstream.base_url);

    let client = Arc::new(UreqClient::new(upstream.request_timeout()));
    let fetcher = Fetcher::new(client, upstream.base_url.clone(), upstream.backoff());
    let cache = RefreshCache::new(Arc::new(fetcher), upstream.expiry());

    let snapshot = cache.get_snapshot().await.snapshot;
    if snapshot.is_empty() {
        tracing::error!("No data fetched from {}", upstream.base_url);
        return;
    }

    log_report(&snapshot, &build_filter(&args));
}

fn build_filter(args: &Args) -> LaunchFilter {
    let mut filter = LaunchFilter::new();
    if let Some(start) = args.start_date.as_deref().and_then(parse_bound) {
        filter = filter.start(start);
    }
    if let Some(end) = args.end_date.as_deref().and_then(parse_bound) {
        filter = filter.end(end);
    }
    if let Some(rocket) = &args.rocket {
        filter = filter.rocket(rocket.as_str());
    }
    if let Some(success) = &args.success {
        filter = filter.success(success == "true");
    }
    if let Some(site) = &args.site {
        filter = filter.site(site.as_str());
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_build_filter() {
        let args = Args::parse_from([
            "rocketwatch-report",
            "--start-date",
            "2020-01-01",
            "--rocket",
            "Falcon 9",
            "--success",
            "false",
            "--base-url",
            "http://localhost:9000/v4",
        ]);
        let filter = build_filter(&args);
        assert_eq!(filter.start, Some(datetime!(2020-01-01 00:00:00 UTC)));
        assert_eq!(filter.end, None);
        assert_eq!(filter.rockets, vec!["Falcon 9"]);
        assert_eq!(filter.success, Some(false));
        assert!(filter.sites.is_empty());
    }

    #[test]
    fn test_rejects_bad_success_flag() {
        let result = Args::try_parse_from(["rocketwatch-report", "--success", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_defaults_to_config() {
        if std::env::var_os(crate::config::ENV_BASE_URL).is_some() {
            return;
        }
        let args = Args::parse_from(["rocketwatch-report"]);
        assert_eq!(args.base_url, crate::config::UpstreamConfig::default().base_url);
    }
}
