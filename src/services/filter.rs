use serde::{Deserialize, Serialize};

use crate::models::job::Job;

/// Inclusive salary band in thousands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether the job's salary band, scaled to thousands, overlaps this range.
    pub fn overlaps(&self, job: &Job) -> bool {
        let min_k = job.salary_min / 1000.0;
        let max_k = job.salary_max / 1000.0;
        !(max_k < self.min || min_k > self.max)
    }
}

/// The four listing criteria chosen by the user.
///
/// Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_query: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_range: Option<SalaryRange>,
}

impl FilterCriteria {
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    pub fn with_salary_range(mut self, min: f64, max: f64) -> Self {
        self.salary_range = Some(SalaryRange::new(min, max));
        self
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }

    fn job_type(&self) -> Option<&str> {
        self.job_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Location or job type is selected.
    pub fn has_select_filter(&self) -> bool {
        self.location().is_some() || self.job_type().is_some()
    }

    /// Whether any criterion narrows the listing.
    ///
    /// A salary range on its own does not: the salary clause is only
    /// evaluated next to a location or job type selection.
    pub fn is_active(&self) -> bool {
        self.has_select_filter() || !self.search_query.is_empty()
    }

    /// A job is shown when it satisfies any one clause.
    ///
    /// Clauses are OR-ed: exact location, exact job type, case-insensitive
    /// search in title or company, and (only with a select filter active) an
    /// overlapping salary band. Nothing is excluded when no criterion is
    /// active.
    pub fn matches(&self, job: &Job) -> bool {
        if !self.is_active() {
            return true;
        }

        if self.location().is_some_and(|l| l == job.location) {
            return true;
        }
        if self.job_type().is_some_and(|t| t == job.job_type) {
            return true;
        }
        if !self.search_query.is_empty() {
            let needle = self.search_query.to_lowercase();
            if job.title.to_lowercase().contains(&needle)
                || job.company.to_lowercase().contains(&needle)
            {
                return true;
            }
        }
        // TODO: confirm with product whether a lone salary range should
        // filter; today it is ignored without a location or type selection.
        if self.has_select_filter() {
            if let Some(range) = &self.salary_range {
                return range.overlaps(job);
            }
        }
        false
    }
}

/// Jobs that should be displayed, in server order.
pub fn filter_jobs<'a>(jobs: &'a [Job], criteria: &FilterCriteria) -> Vec<&'a Job> {
    jobs.iter().filter(|job| criteria.matches(job)).collect()
}
