use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::Serialize;

use crate::models::posting::{CompanyLogo, JobDraft};

/// Largest accepted company logo: 5 MiB.
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Validation context for [`JobDraft`].
///
/// `now` is the reference instant for the deadline rule. The default context
/// reads the clock when it is created.
#[derive(Debug, Clone, Copy)]
pub struct DraftContext {
    pub now: DateTime<Utc>,
}

impl Default for DraftContext {
    fn default() -> Self {
        Self { now: Utc::now() }
    }
}

impl DraftContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// Field-level validation messages keyed by the field's wire name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn merge(&mut self, other: FormErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    fn from_report(report: &garde::Report) -> Self {
        let mut errors = Self::new();
        for (path, error) in report.iter() {
            let field = path.to_string();
            errors.insert(wire_name(&field), error.message());
        }
        errors
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Map a draft field to the name used in the multipart form and in errors.
fn wire_name(field: &str) -> String {
    match field {
        "job_type" => "type",
        "salary_min" => "salaryMin",
        "salary_max" => "salaryMax",
        "application_deadline" => "applicationDeadline",
        "company_logo" => "companyLogo",
        other => other,
    }
    .to_string()
}

/// Run every draft rule against `ctx.now`.
///
/// Rules are independent except `salaryMax`, which must not be below
/// `salaryMin`. A blank title, company, location or description fails its
/// length rule.
pub fn validate_draft(draft: &JobDraft, ctx: &DraftContext) -> Result<(), FormErrors> {
    draft
        .validate_with(ctx)
        .map_err(|report| FormErrors::from_report(&report))
}

pub(crate) fn not_below_min(min: f64) -> impl FnOnce(&f64, &DraftContext) -> garde::Result {
    move |max, _| {
        if *max < min {
            return Err(garde::Error::new(
                "maximum salary must not be less than minimum salary",
            ));
        }
        Ok(())
    }
}

pub(crate) fn deadline_in_future(
    value: &Option<DateTime<Utc>>,
    ctx: &DraftContext,
) -> garde::Result {
    match value {
        None => Err(garde::Error::new("application deadline is required")),
        Some(deadline) if *deadline <= ctx.now => Err(garde::Error::new(
            "application deadline must be in the future",
        )),
        Some(_) => Ok(()),
    }
}

pub(crate) fn acceptable_logo(value: &Option<CompanyLogo>, _: &DraftContext) -> garde::Result {
    let Some(logo) = value else {
        return Ok(());
    };
    if !logo.content_type.starts_with("image/") {
        return Err(garde::Error::new("logo must be an image file"));
    }
    if logo.bytes.len() > MAX_LOGO_BYTES {
        return Err(garde::Error::new("logo must be 5 MiB or smaller"));
    }
    Ok(())
}
