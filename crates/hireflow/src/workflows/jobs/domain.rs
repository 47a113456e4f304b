use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::accounts::UserId;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }

    pub const fn as_wire(self) -> &'static str {
        match self {
            JobType::FullTime => "FULL_TIME",
            JobType::PartTime => "PART_TIME",
            JobType::Contract => "CONTRACT",
            JobType::Internship => "INTERNSHIP",
        }
    }

    /// Accepts either the display label ("Full-time") or the wire name ("FULL_TIME").
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|kind| {
            kind.label().eq_ignore_ascii_case(raw) || kind.as_wire().eq_ignore_ascii_case(raw)
        })
    }
}

/// A recruiter-owned posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: JobType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub description: String,
    pub recruiter_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Editable fields of a posting, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: JobType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub description: String,
}

impl JobDraft {
    /// Returns the first missing required field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("companyName", &self.company_name),
            ("location", &self.location),
            ("description", &self.description),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    /// Trims text fields and drops blank or repeated skills, keeping their order.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.company_name = self.company_name.trim().to_string();
        self.location = self.location.trim().to_string();
        self.description = self.description.trim().to_string();
        self.salary_range = self
            .salary_range
            .map(|range| range.trim().to_string())
            .filter(|range| !range.is_empty());

        let mut skills: Vec<String> = Vec::with_capacity(self.required_skills.len());
        for skill in self.required_skills {
            let skill = skill.trim();
            if !skill.is_empty() && !skills.iter().any(|seen| seen.eq_ignore_ascii_case(skill)) {
                skills.push(skill.to_string());
            }
        }
        self.required_skills = skills;
        self
    }
}
