use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::notify::Notifier;
use crate::ratelimit::RateLimiter;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub limiter: Arc<RateLimiter>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Config,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
