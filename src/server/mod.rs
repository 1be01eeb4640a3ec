use clap::Parser;

pub mod main;
pub mod models;
pub mod handlers;
pub mod server;

/// Rocketwatch HTTP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen address, overrides the configuration file (e.g. 0.0.0.0:5000)
    #[arg(short, long)]
    pub listen: Option<String>,
}
