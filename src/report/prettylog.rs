// ============================================================================
// Report Output Functions
// ============================================================================

use crate::cache::Snapshot;
use crate::query::{self, Granularity, LaunchFilter};

pub fn log_banner(base_url: &str) {
    println!("====================================");
    println!("  Rocketwatch Launch Report");
    println!("====================================");
    println!("Source: {}", base_url);
    println!("------------------------------------");
}

pub fn log_report(snapshot: &Snapshot, filter: &LaunchFilter) {
    let filtered = query::filter(snapshot, filter);
    println!("Total Launches: {}", snapshot.launches.len());
    println!("Total Launches after filtering: {}", filtered.len());

    println!("\nSuccess Rate by Rocket:");
    for rocket in query::rocket_names(snapshot) {
        if let Some(rate) = query::success_rate(snapshot, &rocket) {
            println!("  {}: {:.2}%", rocket, rate);
        }
    }

    println!("\nLaunches by Site:");
    for site in query::site_names(snapshot) {
        let count = query::launches_by_site(snapshot, [site.as_str()]);
        println!("  {}: {}", site, count);
    }

    println!("\nMonthly Launch Frequency:");
    for (month, count) in query::launch_frequency(snapshot, Granularity::Monthly) {
        println!("  {}: {}", month, count);
    }

    println!("\nYearly Launch Frequency:");
    for (year, count) in query::launch_frequency(snapshot, Granularity::Yearly) {
        println!("  {}: {}", year, count);
    }
}
