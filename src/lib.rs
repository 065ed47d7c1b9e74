pub mod activity;
pub mod config;
pub mod session;
pub mod web;

use std::sync::Arc;

use activity::ActivityLogger;
use config::Config;
use session::{SessionStore, Sessions};

pub struct AppState {
    pub config: Config,
    pub sessions: Sessions,
    pub activity: ActivityLogger,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn SessionStore>, activity: ActivityLogger) -> Self {
        let sessions = Sessions::new(store, config.session.cookie_name.clone());
        Self {
            config,
            sessions,
            activity,
        }
    }
}
