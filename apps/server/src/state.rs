use std::sync::Arc;

use pinger::Scheduler;

/// Shared state behind every route
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    /// File name offered for log downloads
    pub download_name: String,
}
