// Application state module
// Owns the course store and the values every connection reads

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::types::Config;
use crate::store::CourseStore;

/// Application state
///
/// Built once at startup and shared by every connection through an `Arc`.
pub struct AppState {
    pub config: Config,
    pub store: RwLock<CourseStore>,

    // Cached config values for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config, store: CourseStore) -> Self {
        Self {
            config: config.clone(),
            store: RwLock::new(store),
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}
