//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter (`info`, `debug`, ...).
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    /// `memory` or a path to the sqlite file.
    pub database: String,
}

/// External FX provider. Without this section the app runs on the built-in
/// default-rate table.
#[derive(Debug, Deserialize)]
pub struct Fx {
    pub url: String,
    pub timeout_secs: Option<u64>,
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LedgerSettings {
    pub currency: Option<String>,
    pub max_amount_minor: Option<i64>,
    pub withdrawal_fee_minor: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub fx: Option<Fx>,
    pub ledger: Option<LedgerSettings>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
