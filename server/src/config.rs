// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use common::calendar::DEFAULT_JURISDICTION;
use tokio::time::Duration;

const DEFAULT_DB_URL: &str = "sqlite://database/counsel.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 5 * 60;

/// Runtime settings, read once at startup.
///
/// | Variable | Default |
/// |---|---|
/// | `COUNSEL_DATABASE_URL` | `sqlite://database/counsel.db` |
/// | `COUNSEL_BIND_ADDR` | `0.0.0.0:3000` |
/// | `COUNSEL_JURISDICTION` | `us-federal` |
/// | `COUNSEL_REMINDER_INTERVAL_SECS` | `300` |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jurisdiction: String,
    pub reminder_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("COUNSEL_DATABASE_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string());

        let bind_addr = lookup("COUNSEL_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("COUNSEL_BIND_ADDR is not a valid socket address")?;

        let jurisdiction =
            lookup("COUNSEL_JURISDICTION").unwrap_or_else(|| DEFAULT_JURISDICTION.to_string());

        let interval_secs = match lookup("COUNSEL_REMINDER_INTERVAL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("COUNSEL_REMINDER_INTERVAL_SECS must be a whole number of seconds")?,
            None => DEFAULT_REMINDER_INTERVAL_SECS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            jurisdiction,
            reminder_interval: Duration::from_secs(interval_secs.max(1)),
        })
    }
}
