//! Sample jobs and drafts shared by the integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use job_board::models::job::{Job, JobStatus, JobType};
use job_board::models::posting::{CompanyLogo, JobDraft};

fn at(ts: &str) -> DateTime<Utc> {
    ts.parse().unwrap()
}

fn job(
    id: &str,
    title: &str,
    company: &str,
    location: &str,
    job_type: &str,
    salary: (f64, f64),
) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        job_type: job_type.to_string(),
        salary_min: salary.0,
        salary_max: salary.1,
        application_deadline: at("2030-06-30T00:00:00Z"),
        description: format!("{title} at {company}"),
        status: JobStatus::Published,
        created_at: at("2024-02-20T10:00:00Z"),
        updated_at: at("2024-02-20T10:00:00Z"),
        published_at: Some(at("2024-02-20T10:00:00Z")),
        company_logo: None,
    }
}

/// Four published jobs in server order.
pub fn sample_jobs() -> Vec<Job> {
    vec![
        job("j1", "Senior Frontend Developer", "Tech Corp", "New York, NY", "Full-time", (120_000.0, 150_000.0)),
        job("j2", "Full Stack Engineer", "Startup Inc", "Remote", "Contract", (60_000.0, 80_000.0)),
        job("j3", "React Developer", "Web Solutions", "Bangalore, India", "Part-time", (20_000.0, 30_000.0)),
        job("j4", "Data Intern", "Amazon", "San Francisco, CA", "Internship", (10_000.0, 12_000.0)),
    ]
}

/// Description of exactly 50 characters.
pub fn description_50() -> String {
    let text = "Build and run the services behind our job board!!!".to_string();
    assert_eq!(text.chars().count(), 50);
    text
}

/// The smallest draft that passes every rule.
pub fn valid_draft(now: DateTime<Utc>) -> JobDraft {
    JobDraft {
        title: "Backend Engineer".to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        job_type: JobType::FullTime,
        salary_min: 0.0,
        salary_max: 0.0,
        application_deadline: Some(now + Duration::days(1)),
        description: description_50(),
        company_logo: None,
    }
}

/// A tiny PNG header, enough for content sniffing.
pub fn png_logo() -> CompanyLogo {
    CompanyLogo {
        file_name: "acme.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13],
    }
}
