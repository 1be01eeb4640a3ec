use crate::config::DEFAULT_BASE_URL;
use clap::Parser;

pub mod main;
mod prettylog;

/// Rocketwatch launch report
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Start date in YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,

    /// End date in YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,

    /// Rocket name to filter
    #[arg(long)]
    pub rocket: Option<String>,

    /// Filter by launch success
    #[arg(long, value_parser = ["true", "false"])]
    pub success: Option<String>,

    /// Launch site name to filter
    #[arg(long)]
    pub site: Option<String>,

    /// Launch data API
    #[arg(long, env = "SPACEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}
