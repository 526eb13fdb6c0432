use chrono::{DateTime, Utc};
use garde::Validate;

use crate::models::job::{JobStatus, JobType};
use crate::services::validation::{
    acceptable_logo, deadline_in_future, not_below_min, DraftContext,
};

/// Job posting form values collected before submission.
///
/// Field rules live on the struct; the cross-field salary rule, the deadline
/// rule and the logo rule are custom validators in
/// [`crate::services::validation`].
#[derive(Debug, Clone, Default, Validate)]
#[garde(context(DraftContext))]
pub struct JobDraft {
    #[garde(length(chars, min = 3, max = 100))]
    pub title: String,

    #[garde(length(chars, min = 2, max = 100))]
    pub company: String,

    #[garde(length(chars, min = 1, max = 100))]
    pub location: String,

    #[garde(skip)]
    pub job_type: JobType,

    #[garde(range(min = 0.0))]
    pub salary_min: f64,

    #[garde(range(min = 0.0), custom(not_below_min(self.salary_min)))]
    pub salary_max: f64,

    #[garde(custom(deadline_in_future))]
    pub application_deadline: Option<DateTime<Utc>>,

    #[garde(length(chars, min = 50, max = 5000))]
    pub description: String,

    #[garde(custom(acceptable_logo))]
    pub company_logo: Option<CompanyLogo>,
}

/// An uploaded company logo.
#[derive(Clone, PartialEq)]
pub struct CompanyLogo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for CompanyLogo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanyLogo")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Which button submitted the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    SaveDraft,
    Publish,
}

impl PublishAction {
    pub fn status(self) -> JobStatus {
        match self {
            PublishAction::SaveDraft => JobStatus::Draft,
            PublishAction::Publish => JobStatus::Published,
        }
    }
}
