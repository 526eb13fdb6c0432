use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::job::Job;
use crate::services::filter::{filter_jobs, FilterCriteria};
use crate::services::jobs_api::{ApiError, JobsApiClient};
use crate::services::notifications::{Notification, Notifier};

/// Message shown in place of the listing when the last fetch failed.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load jobs. Please try again later.";

/// Opaque value whose change tells the listing to fetch again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshToken(u64);

/// Thread-safe producer of [`RefreshToken`]s.
#[derive(Debug, Default)]
pub struct RefreshSignal(AtomicU64);

impl RefreshSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> RefreshToken {
        RefreshToken(self.0.load(Ordering::Acquire))
    }

    /// Advance the signal and return the new token.
    pub fn bump(&self) -> RefreshToken {
        RefreshToken(self.0.fetch_add(1, Ordering::AcqRel) + 1)
    }
}

/// What the listing should display right now.
#[derive(Debug, PartialEq)]
pub enum ListingView<'a> {
    Loading,
    Error(&'a str),
    NoResults,
    Jobs(Vec<&'a Job>),
}

/// Client-side job collection with loading and error state.
///
/// Responses are applied in the order they complete; the last one to arrive
/// replaces whatever an earlier one left behind. In-flight requests are never
/// cancelled.
#[derive(Debug, Default)]
pub struct JobListing {
    jobs: Vec<Job>,
    error: Option<String>,
    loading: bool,
    loaded_for: Option<RefreshToken>,
}

impl JobListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Whether `token` has not been loaded successfully yet.
    pub fn needs_fetch(&self, token: RefreshToken) -> bool {
        self.loaded_for != Some(token)
    }

    /// Mark a request as in flight.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// Apply a completed fetch.
    ///
    /// Success replaces the job set and clears the error. Failure keeps the
    /// previous jobs, sets the user-facing error and raises a notification.
    /// Only a success records `token` as loaded.
    pub fn apply(
        &mut self,
        token: RefreshToken,
        result: Result<Vec<Job>, ApiError>,
        notifier: &dyn Notifier,
    ) {
        self.loading = false;
        match result {
            Ok(jobs) => {
                tracing::info!(count = jobs.len(), ?token, "Job listing refreshed");
                self.jobs = jobs;
                self.error = None;
                self.loaded_for = Some(token);
            }
            Err(e) => {
                tracing::error!(error = %e, ?token, "Error fetching jobs");
                metrics::counter!("job_listing_fetch_failures_total").increment(1);
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                self.loaded_for = None;
                notifier.notify(Notification::error("Error", "Failed to load jobs"));
            }
        }
    }

    /// Fetch the collection if `token` has not been loaded yet.
    ///
    /// Returns whether a request was issued.
    pub async fn sync(
        &mut self,
        token: RefreshToken,
        api: &JobsApiClient,
        notifier: &dyn Notifier,
    ) -> bool {
        if !self.needs_fetch(token) {
            return false;
        }
        self.begin_fetch();
        let result = api.list_jobs().await;
        self.apply(token, result, notifier);
        true
    }

    /// Recompute the displayed view from the current jobs and `criteria`.
    pub fn view(&self, criteria: &FilterCriteria) -> ListingView<'_> {
        if self.loading {
            return ListingView::Loading;
        }
        if let Some(message) = &self.error {
            return ListingView::Error(message);
        }
        let jobs = filter_jobs(&self.jobs, criteria);
        if jobs.is_empty() {
            ListingView::NoResults
        } else {
            ListingView::Jobs(jobs)
        }
    }
}
