use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Employment types offered on the board.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, EnumIter, Display, PartialEq, Eq, Hash,
)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    #[strum(serialize = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    #[strum(serialize = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Freelance,
}

/// Publication state of a job record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Draft,
    Published,
    Closed,
}

/// A job posting as returned by the jobs API.
///
/// The frontend never mutates these records. `job_type` keeps the raw string
/// sent by the server because records created outside this application are
/// not guaranteed to use a known type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary_min: f64,
    pub salary_max: f64,
    pub application_deadline: DateTime<Utc>,
    pub description: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_job_type_wire_spelling() {
        let names: Vec<String> = JobType::iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            ["Full-time", "Part-time", "Contract", "Internship", "Freelance"]
        );
        assert_eq!("Part-time".parse::<JobType>().unwrap(), JobType::PartTime);
        assert!("part time".parse::<JobType>().is_err());
    }

    #[test]
    fn test_deserialize_remote_record() {
        let json = serde_json::json!({
            "id": "665f1c",
            "title": "Backend Engineer",
            "company": "Acme",
            "location": "Remote",
            "type": "Contract",
            "salaryMin": 60000,
            "salaryMax": 90000,
            "applicationDeadline": "2030-01-01T00:00:00Z",
            "description": "Build things.",
            "status": "published",
            "createdAt": "2024-02-20T10:00:00Z",
            "updatedAt": "2024-02-20T10:00:00Z",
            "publishedAt": null
        });
        let job: Job = serde_json::from_value(json).unwrap();
        assert_eq!(job.job_type.parse::<JobType>().unwrap(), JobType::Contract);
        assert_eq!(job.status, JobStatus::Published);
        assert!(job.published_at.is_none());
        assert!(job.company_logo.is_none());
    }

    #[test]
    fn test_unknown_type_is_kept_raw() {
        let json = serde_json::json!({
            "id": "1",
            "title": "Barista",
            "company": "Beans",
            "location": "London, UK",
            "type": "Seasonal",
            "salaryMin": 0,
            "salaryMax": 0,
            "applicationDeadline": "2030-01-01T00:00:00Z",
            "description": "Coffee.",
            "status": "closed",
            "createdAt": "2024-02-20T10:00:00Z",
            "updatedAt": "2024-02-20T10:00:00Z",
            "companyLogo": "/uploads/beans.png"
        });
        let job: Job = serde_json::from_value(json).unwrap();
        assert_eq!(job.job_type, "Seasonal");
        assert!(job.job_type.parse::<JobType>().is_err());
        assert_eq!(job.company_logo.as_deref(), Some("/uploads/beans.png"));
    }
}
