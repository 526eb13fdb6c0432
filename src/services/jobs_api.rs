use chrono::SecondsFormat;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::models::job::{Job, JobStatus};
use crate::models::posting::JobDraft;

/// Message used when a failed create response carries nothing better.
const CREATE_FALLBACK: &str = "Failed to create job posting";
const FETCH_FALLBACK: &str = "Failed to fetch jobs";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the remote jobs REST API.
///
/// The cookie store is enabled so session cookies set by the API are sent
/// back on every request.
pub struct JobsApiClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Server { status: StatusCode, message: String },

    #[error("Invalid jobs API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status reported by the server, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            ApiError::InvalidBaseUrl(_) => None,
        }
    }
}

impl JobsApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("job-board/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET {base}/jobs: the whole job collection.
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let url = format!("{}/jobs", self.base_url);
        tracing::debug!(%url, "Fetching job collection");

        let start = Instant::now();
        let response = self.http.get(&url).send().await.inspect_err(|_| {
            record_failure("list");
        })?;
        if !response.status().is_success() {
            record_failure("list");
            return Err(server_error(response, FETCH_FALLBACK).await);
        }
        let jobs: Vec<Job> = response.json().await.inspect_err(|_| record_failure("list"))?;

        metrics::histogram!("jobs_api_request_seconds", "operation" => "list")
            .record(start.elapsed().as_secs_f64());
        tracing::debug!(count = jobs.len(), "Job collection received");
        Ok(jobs)
    }

    /// GET {base}/jobs/{id}
    pub async fn get_job(&self, id: &str) -> Result<Job, ApiError> {
        let url = format!("{}/jobs/{}", self.base_url, id);
        let response = self.http.get(&url).send().await.inspect_err(|_| {
            record_failure("get");
        })?;
        if !response.status().is_success() {
            record_failure("get");
            return Err(server_error(response, "Failed to fetch job").await);
        }
        Ok(response.json().await.inspect_err(|_| record_failure("get"))?)
    }

    /// POST {base}/jobs as multipart, one request, no retry.
    pub async fn create_job(&self, draft: &JobDraft, status: JobStatus) -> Result<Job, ApiError> {
        let url = format!("{}/jobs", self.base_url);
        let form = draft_form(draft, status)?;

        tracing::info!(
            title = %draft.title,
            company = %draft.company,
            %status,
            has_logo = draft.company_logo.is_some(),
            "Submitting job posting"
        );

        let start = Instant::now();
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .inspect_err(|_| record_failure("create"))?;

        if !response.status().is_success() {
            record_failure("create");
            let err = server_error(response, CREATE_FALLBACK).await;
            tracing::warn!(error = %err, "Jobs API rejected posting");
            return Err(err);
        }

        let job: Job = response
            .json()
            .await
            .inspect_err(|_| record_failure("create"))?;
        metrics::histogram!("jobs_api_request_seconds", "operation" => "create")
            .record(start.elapsed().as_secs_f64());
        tracing::info!(job_id = %job.id, %status, "Job posting created");
        Ok(job)
    }

    /// Check that the job collection endpoint answers.
    pub async fn health_check(&self) -> Result<(), ApiError> {
        let url = format!("{}/jobs", self.base_url);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(server_error(response, FETCH_FALLBACK).await);
        }
        Ok(())
    }
}

fn record_failure(operation: &'static str) {
    metrics::counter!("jobs_api_failures_total", "operation" => operation).increment(1);
}

/// Multipart body with every form field, the status and the optional logo.
fn draft_form(draft: &JobDraft, status: JobStatus) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("company", draft.company.clone())
        .text("location", draft.location.clone())
        .text("type", draft.job_type.to_string())
        .text("salaryMin", draft.salary_min.to_string())
        .text("salaryMax", draft.salary_max.to_string());

    if let Some(deadline) = draft.application_deadline {
        form = form.text(
            "applicationDeadline",
            deadline.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
    }

    form = form
        .text("description", draft.description.clone())
        .text("status", status.to_string());

    if let Some(logo) = &draft.company_logo {
        let part = Part::bytes(logo.bytes.clone())
            .file_name(logo.file_name.clone())
            .mime_str(&logo.content_type)?;
        form = form.part("companyLogo", part);
    }

    Ok(form)
}

async fn server_error(response: Response, fallback: &str) -> ApiError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();
    ApiError::Server {
        status,
        message: error_message(status, &body, fallback),
    }
}

/// Human-readable message for a failed response.
///
/// Tries `message`, then `errors[0].message` from a JSON body, then the
/// status reason phrase, then `fallback`.
pub(crate) fn error_message(status: StatusCode, body: &[u8], fallback: &str) -> String {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let from_body = parsed.as_ref().and_then(|v| {
        non_empty(v.get("message"))
            .or_else(|| non_empty(v.get("errors").and_then(|e| e.get(0)).and_then(|e| e.get("message"))))
    });

    from_body
        .or_else(|| status.canonical_reason())
        .unwrap_or(fallback)
        .to_string()
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
