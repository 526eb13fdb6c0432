use std::sync::Arc;
use tokio::sync::Mutex;

use crate::services::{
    jobs_api::JobsApiClient,
    listing::{JobListing, RefreshSignal},
    notifications::Notifier,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<JobsApiClient>,
    pub listing: Arc<Mutex<JobListing>>,
    pub refresh: Arc<RefreshSignal>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(api: JobsApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api: Arc::new(api),
            listing: Arc::new(Mutex::new(JobListing::new())),
            refresh: Arc::new(RefreshSignal::new()),
            notifier,
        }
    }
}
