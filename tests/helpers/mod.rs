//! Fake jobs API and server helpers for integration tests
#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use job_board::models::job::{Job, JobStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// A multipart field as received by the fake API.
#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub value: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl ReceivedField {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

/// Canned failure returned instead of the normal response.
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone, Default)]
struct UpstreamState {
    jobs: Arc<Mutex<Vec<Job>>>,
    list_failure: Arc<Mutex<Option<Failure>>>,
    list_delay: Arc<Mutex<Option<Duration>>>,
    create_failure: Arc<Mutex<Option<Failure>>>,
    list_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    posts: Arc<Mutex<Vec<HashMap<String, ReceivedField>>>>,
}

/// In-process stand-in for the remote jobs REST API.
pub struct FakeJobsApi {
    pub base_url: String,
    state: UpstreamState,
}

impl FakeJobsApi {
    pub async fn start(jobs: Vec<Job>) -> Self {
        let state = UpstreamState::default();
        *state.jobs.lock().unwrap() = jobs;

        let app = Router::new()
            .route("/jobs", get(list_jobs).post(create_job))
            .route("/jobs/{id}", get(get_job))
            .layer(axum::extract::DefaultBodyLimit::max(16 * 1024 * 1024))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn fail_list(&self, status: StatusCode, body: &str) {
        *self.state.list_failure.lock().unwrap() = Some(Failure {
            status,
            body: body.to_string(),
        });
    }

    pub fn heal_list(&self) {
        *self.state.list_failure.lock().unwrap() = None;
    }

    /// Hold the next collection response back for `delay`.
    pub fn stall_next_list(&self, delay: Duration) {
        *self.state.list_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_create(&self, status: StatusCode, body: &str) {
        *self.state.create_failure.lock().unwrap() = Some(Failure {
            status,
            body: body.to_string(),
        });
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.state.create_calls.load(Ordering::SeqCst)
    }

    pub fn last_post(&self) -> Option<HashMap<String, ReceivedField>> {
        self.state.posts.lock().unwrap().last().cloned()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.state.jobs.lock().unwrap().clone()
    }
}

async fn list_jobs(State(state): State<UpstreamState>) -> Response {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    let delay = state.list_delay.lock().unwrap().take();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(failure) = state.list_failure.lock().unwrap().clone() {
        return (failure.status, failure.body).into_response();
    }
    Json(state.jobs.lock().unwrap().clone()).into_response()
}

async fn get_job(State(state): State<UpstreamState>, Path(id): Path<String>) -> Response {
    let found = state
        .jobs
        .lock()
        .unwrap()
        .iter()
        .find(|job| job.id == id)
        .cloned();
    match found {
        Some(job) => Json(job).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Job not found" })),
        )
            .into_response(),
    }
}

async fn create_job(State(state): State<UpstreamState>, mut multipart: Multipart) -> Response {
    state.create_calls.fetch_add(1, Ordering::SeqCst);

    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let value = field.bytes().await.unwrap().to_vec();
        fields.insert(
            name,
            ReceivedField {
                value,
                file_name,
                content_type,
            },
        );
    }
    state.posts.lock().unwrap().push(fields.clone());

    if let Some(failure) = state.create_failure.lock().unwrap().clone() {
        return (failure.status, failure.body).into_response();
    }

    let text = |name: &str| fields.get(name).map(ReceivedField::text).unwrap_or_default();
    let now = Utc::now();
    let status: JobStatus = text("status").parse().unwrap();
    let job = Job {
        id: format!("created-{}", state.create_calls.load(Ordering::SeqCst)),
        title: text("title"),
        company: text("company"),
        location: text("location"),
        job_type: text("type"),
        salary_min: text("salaryMin").parse().unwrap(),
        salary_max: text("salaryMax").parse().unwrap(),
        application_deadline: text("applicationDeadline").parse::<DateTime<Utc>>().unwrap(),
        description: text("description"),
        status,
        created_at: now,
        updated_at: now,
        published_at: (status == JobStatus::Published).then_some(now),
        company_logo: fields
            .get("companyLogo")
            .and_then(|f| f.file_name.clone())
            .map(|name| format!("/uploads/{name}")),
    };
    state.jobs.lock().unwrap().push(job.clone());
    Json(job).into_response()
}

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn spawn_app(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
