use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::models::job::Job;
use crate::models::posting::{CompanyLogo, JobDraft, PublishAction};
use crate::services::filter::{FilterCriteria, SalaryRange};
use crate::services::jobs_api::ApiError;
use crate::services::listing::ListingView;
use crate::services::submission::{JobComposer, SubmitError};
use crate::services::validation::{validate_draft, DraftContext, FormErrors};

pub const NO_RESULTS_MESSAGE: &str = "No jobs found matching your filters.";

/// Query string of GET /api/jobs. Salary bounds are in thousands.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

impl From<ListingQuery> for FilterCriteria {
    fn from(query: ListingQuery) -> Self {
        let salary_range = match (query.salary_min, query.salary_max) {
            (None, None) => None,
            (min, max) => Some(SalaryRange::new(
                min.unwrap_or(0.0),
                max.unwrap_or(f64::INFINITY),
            )),
        };
        FilterCriteria {
            search_query: query.search.unwrap_or_default(),
            location: query.location,
            job_type: query.job_type,
            salary_range,
        }
    }
}

#[derive(Serialize)]
pub struct ListingResponse<'a> {
    pub jobs: Vec<&'a Job>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct CreateJobResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Job>,
    #[serde(skip_serializing_if = "FormErrors::is_empty")]
    pub errors: FormErrors,
}

impl CreateJobResponse {
    fn failure(message: impl Into<String>, errors: FormErrors) -> Self {
        Self {
            status: "error",
            message: message.into(),
            data: None,
            errors,
        }
    }
}

/// GET /api/jobs: the filtered listing.
///
/// The shared listing fetches the collection again whenever the refresh
/// signal moved since its last successful load. The lock is released while
/// the request is in flight, so concurrent requests fetch concurrently and
/// the last response applied wins.
pub async fn list_jobs(State(state): State<AppState>, Query(query): Query<ListingQuery>) -> Response {
    let criteria = FilterCriteria::from(query);
    let token = state.refresh.current();

    let fetch = {
        let mut listing = state.listing.lock().await;
        let needed = listing.needs_fetch(token);
        if needed {
            listing.begin_fetch();
        }
        needed
    };
    if fetch {
        let result = state.api.list_jobs().await;
        state
            .listing
            .lock()
            .await
            .apply(token, result, state.notifier.as_ref());
    }

    let listing = state.listing.lock().await;
    match listing.view(&criteria) {
        ListingView::Jobs(jobs) => Json(ListingResponse {
            total: jobs.len(),
            jobs,
            message: None,
        })
        .into_response(),
        ListingView::NoResults => Json(ListingResponse {
            jobs: Vec::new(),
            total: 0,
            message: Some(NO_RESULTS_MESSAGE),
        })
        .into_response(),
        ListingView::Error(message) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response(),
        ListingView::Loading => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Loading jobs...".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /api/jobs/{id}
pub async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.api.get_job(&id).await {
        Ok(job) => Json(job).into_response(),
        Err(e) => {
            tracing::warn!(job_id = %id, error = %e, "Failed to fetch job");
            (
                upstream_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/jobs: validate a multipart posting and forward it upstream.
pub async fn create_job(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let form = match read_posting(&mut multipart).await {
        Ok(form) => form,
        Err(status) => {
            return (
                status,
                Json(CreateJobResponse::failure(
                    "Malformed multipart body",
                    FormErrors::new(),
                )),
            )
                .into_response()
        }
    };

    if !form.errors.is_empty() {
        let mut errors = form.errors;
        if let Err(rule_errors) = validate_draft(&form.draft, &DraftContext::default()) {
            errors.merge(rule_errors);
        }
        return unprocessable(errors);
    }

    let mut composer = JobComposer::new();
    composer.draft = form.draft;
    let refresh = state.refresh.clone();

    let result = composer
        .submit(form.action, &state.api, state.notifier.as_ref(), |job| {
            let token = refresh.bump();
            tracing::debug!(job_id = %job.id, ?token, "Listing refresh signalled");
        })
        .await;

    match result {
        Ok(job) => (
            StatusCode::CREATED,
            Json(CreateJobResponse {
                status: "success",
                message: "Job posting created successfully".to_string(),
                data: Some(job),
                errors: FormErrors::new(),
            }),
        )
            .into_response(),
        Err(SubmitError::Invalid(errors)) => unprocessable(errors),
        Err(SubmitError::Api(e)) => (
            upstream_status(&e),
            Json(CreateJobResponse::failure(e.to_string(), FormErrors::new())),
        )
            .into_response(),
    }
}

fn unprocessable(errors: FormErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(CreateJobResponse::failure(
            "Please fix the form errors before submitting",
            errors,
        )),
    )
        .into_response()
}

/// Client errors from the jobs API are passed through, anything else is a
/// bad gateway.
fn upstream_status(err: &ApiError) -> StatusCode {
    err.status()
        .filter(StatusCode::is_client_error)
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

struct PostingForm {
    draft: JobDraft,
    action: PublishAction,
    errors: FormErrors,
}

/// Read the multipart fields into a draft. Values that cannot be parsed are
/// reported as field errors; a broken body is a 400.
async fn read_posting(multipart: &mut Multipart) -> Result<PostingForm, StatusCode> {
    let mut form = PostingForm {
        draft: JobDraft::default(),
        action: PublishAction::Publish,
        errors: FormErrors::new(),
    };
    let mut saw_type = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "companyLogo" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let declared = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            // An empty part without a file name is a file input left blank.
            if data.is_empty() && file_name.is_empty() {
                continue;
            }
            let content_type = declared
                .or_else(|| sniff_image_type(&data))
                .unwrap_or_else(|| "application/octet-stream".to_string());
            form.draft.company_logo = Some(CompanyLogo {
                file_name: if file_name.is_empty() {
                    "logo".to_string()
                } else {
                    file_name
                },
                content_type,
                bytes: data.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        match name.as_str() {
            "title" => form.draft.title = value,
            "company" => form.draft.company = value,
            "location" => form.draft.location = value,
            "description" => form.draft.description = value,
            "type" => {
                saw_type = true;
                match value.parse() {
                    Ok(job_type) => form.draft.job_type = job_type,
                    Err(_) if value.is_empty() => form.errors.insert("type", "job type is required"),
                    Err(_) => form.errors.insert("type", "invalid job type"),
                }
            }
            "salaryMin" => match parse_amount(&value) {
                Some(amount) => form.draft.salary_min = amount,
                None => form.errors.insert("salaryMin", "must be a number"),
            },
            "salaryMax" => match parse_amount(&value) {
                Some(amount) => form.draft.salary_max = amount,
                None => form.errors.insert("salaryMax", "must be a number"),
            },
            "applicationDeadline" => match parse_deadline(&value) {
                Some(deadline) => form.draft.application_deadline = Some(deadline),
                None if value.is_empty() => {}
                None => form
                    .errors
                    .insert("applicationDeadline", "must be an RFC 3339 timestamp"),
            },
            "status" => match value.as_str() {
                "draft" => form.action = PublishAction::SaveDraft,
                "published" => form.action = PublishAction::Publish,
                _ => form.errors.insert("status", "must be draft or published"),
            },
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    if !saw_type {
        form.errors.insert("type", "job type is required");
    }
    Ok(form)
}

fn parse_amount(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn sniff_image_type(data: &[u8]) -> Option<String> {
    image::guess_format(data)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}
