pub mod cache;
pub mod config;
pub mod notifier;
pub mod query;
pub mod report;
pub mod server;
pub mod upstream;
mod utils;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
