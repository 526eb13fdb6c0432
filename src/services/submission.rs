use crate::models::job::Job;
use crate::models::posting::{JobDraft, PublishAction};
use crate::services::jobs_api::{ApiError, JobsApiClient};
use crate::services::notifications::{Notification, Notifier};
use crate::services::validation::{validate_draft, DraftContext, FormErrors};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Please fix the form errors before submitting")]
    Invalid(FormErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// State behind the "create job" surface: the draft being edited, whether
/// the surface is open, and the field errors from the last attempt.
#[derive(Debug, Default)]
pub struct JobComposer {
    pub draft: JobDraft,
    errors: FormErrors,
    open: bool,
}

impl JobComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Discard the draft and any errors.
    pub fn reset(&mut self) {
        self.draft = JobDraft::default();
        self.errors = FormErrors::new();
    }

    /// Validate against the current time and submit.
    pub async fn submit(
        &mut self,
        action: PublishAction,
        api: &JobsApiClient,
        notifier: &dyn Notifier,
        on_created: impl FnOnce(&Job),
    ) -> Result<Job, SubmitError> {
        self.submit_at(action, &DraftContext::default(), api, notifier, on_created)
            .await
    }

    /// Validate the draft with `ctx` and, if it passes, issue exactly one
    /// create request.
    ///
    /// Invalid drafts never reach the network. On success the draft is
    /// reset, the surface closed and `on_created` called once. Nothing is
    /// retried.
    pub async fn submit_at(
        &mut self,
        action: PublishAction,
        ctx: &DraftContext,
        api: &JobsApiClient,
        notifier: &dyn Notifier,
        on_created: impl FnOnce(&Job),
    ) -> Result<Job, SubmitError> {
        if let Err(errors) = validate_draft(&self.draft, ctx) {
            tracing::info!(fields = %errors, "Job posting failed validation");
            metrics::counter!("job_submissions_rejected_total").increment(1);
            self.errors = errors.clone();
            let err = SubmitError::Invalid(errors);
            notifier.notify(Notification::error("Error", err.to_string()));
            return Err(err);
        }
        self.errors = FormErrors::new();

        let job = match api.create_job(&self.draft, action.status()).await {
            Ok(job) => job,
            Err(e) => {
                tracing::error!(error = %e, "Error creating job");
                notifier.notify(Notification::error("Error", e.to_string()));
                return Err(e.into());
            }
        };

        metrics::counter!("job_submissions_total", "status" => action.status().to_string())
            .increment(1);
        notifier.notify(success_notification(action));

        self.reset();
        self.close();
        on_created(&job);
        Ok(job)
    }
}

fn success_notification(action: PublishAction) -> Notification {
    match action {
        PublishAction::SaveDraft => Notification::success(
            "Draft Saved",
            "Your job posting has been saved as a draft",
        ),
        PublishAction::Publish => Notification::success(
            "Job Posted",
            "Your job posting has been published successfully",
        ),
    }
}
