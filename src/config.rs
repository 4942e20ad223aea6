//! Process configuration from environment variables.
//!
//! A `.env` file in the working directory is honored when present. The
//! connection string is required; everything else has a default.

use anyhow::{Context, Result};
use std::env;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string (`MONGODB_URL`, required).
    pub mongodb_url: String,
    /// Logical database holding the orders collection (`MONGODB_DATABASE`).
    pub database: String,
    /// HTTP listen port (`PORT`, defaults to 5000).
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        if dotenvy::dotenv().is_err() {
            debug!("no .env file found, reading environment directly");
        }

        let mongodb_url = env::var("MONGODB_URL").context("MONGODB_URL is not set")?;
        let database = env_or("MONGODB_DATABASE", "restaurant");
        let port = env_or("PORT", "5000")
            .parse()
            .context("PORT is not a valid port number")?;

        Ok(Self {
            mongodb_url,
            database,
            port,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}
