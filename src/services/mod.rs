pub mod filter;
pub mod jobs_api;
pub mod listing;
pub mod notifications;
pub mod submission;
pub mod validation;
