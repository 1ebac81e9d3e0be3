// src/config.rs

use std::env;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,

    /// CORS allow-list. A single `*` entry allows any origin, acceptable
    /// only outside production.
    pub allowed_origins: Vec<String>,

    /// Per-fingerprint submission ceiling within one window.
    pub rate_limit_max: u32,

    /// Rate-limit window length in seconds.
    pub rate_limit_window_secs: u64,

    /// Sender address for confirmation notifications, if any.
    pub notification_sender: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let rate_limit_max = env::var("RATE_LIMIT_MAX")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .expect("RATE_LIMIT_MAX must be a number");

        let rate_limit_window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .expect("RATE_LIMIT_WINDOW_SECS must be a number");

        let notification_sender = env::var("NOTIFICATION_SENDER").ok();

        Self {
            database_url,
            rust_log,
            allowed_origins,
            rate_limit_max,
            rate_limit_window_secs,
            notification_sender,
        }
    }
}
