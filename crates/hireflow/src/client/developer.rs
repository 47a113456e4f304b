use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ClientError;
use super::session::Session;
use super::JobBoardClient;
use crate::workflows::accounts::{DeveloperProfile, ProfileUpdate};

pub const MAX_RESUME_BYTES: u64 = 5 * 1024 * 1024;

const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC: &str = "application/msword";

/// Stored resume as reported by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDetails {
    pub resume_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResumeError {
    #[error("Please select a file")]
    NoFile,
    #[error("The selected file is empty")]
    Empty,
    #[error("File size must be less than 5MB")]
    TooLarge { bytes: u64 },
    #[error("Only PDF and DOC/DOCX files are allowed")]
    UnsupportedType { content_type: String },
}

/// Checks size and type, falling back to the extension when no content type is given.
/// Returns the content type to upload with.
///
/// A blank file name means nothing was selected. A zero-byte file of an accepted type
/// is reported after the type check so the user sees the more specific problem first.
pub fn validate_resume(
    file_name: &str,
    bytes: u64,
    content_type: Option<&str>,
) -> Result<mime::Mime, ResumeError> {
    if file_name.trim().is_empty() {
        return Err(ResumeError::NoFile);
    }
    if bytes > MAX_RESUME_BYTES {
        return Err(ResumeError::TooLarge { bytes });
    }

    let detected = match content_type.map(str::trim).filter(|value| !value.is_empty()) {
        Some(raw) => raw.parse::<mime::Mime>().ok(),
        None => mime_guess::from_path(file_name).first(),
    };
    let kind = match detected {
        Some(kind) if is_resume_type(&kind) => kind,
        other => {
            return Err(ResumeError::UnsupportedType {
                content_type: other
                    .map(|kind| kind.essence_str().to_string())
                    .or_else(|| content_type.map(str::to_string))
                    .unwrap_or_else(|| "unknown".to_string()),
            })
        }
    };
    if bytes == 0 {
        return Err(ResumeError::Empty);
    }
    Ok(kind)
}

fn is_resume_type(kind: &mime::Mime) -> bool {
    let essence = kind.essence_str();
    *kind == mime::APPLICATION_PDF || essence == DOC || essence == DOCX
}

/// Human-readable size with up to two decimals, e.g. `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

impl JobBoardClient {
    /// Uploads a resume as multipart field `resume` after local validation.
    pub async fn upload_resume(
        &self,
        session: &Session,
        file_name: &str,
        contents: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<ResumeDetails, ClientError> {
        let kind = validate_resume(file_name, contents.len() as u64, content_type)?;
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str(kind.essence_str())
            .map_err(ClientError::Build)?;
        let form = Form::new().part("resume", part);

        let details: ResumeDetails = self
            .api
            .post_multipart("/api/developer/resume/upload", form, Some(session))
            .await?;
        info!(file = %file_name, url = %details.resume_url, "resume uploaded");
        Ok(details)
    }

    /// `None` when no resume is on file.
    pub async fn resume_details(
        &self,
        session: &Session,
    ) -> Result<Option<ResumeDetails>, ClientError> {
        self.api.get("/api/developer/resume", Some(session)).await
    }

    pub async fn delete_resume(&self, session: &Session) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .api
            .delete("/api/developer/resume", Some(session))
            .await?;
        Ok(())
    }

    pub async fn developer_profile(
        &self,
        session: &Session,
    ) -> Result<DeveloperProfile, ClientError> {
        self.api.get("/api/developer/profile", Some(session)).await
    }

    /// Sends only the fields set on `update`.
    pub async fn update_developer_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<DeveloperProfile, ClientError> {
        let profile: DeveloperProfile = self
            .api
            .patch("/api/developer/profile", update, Some(session))
            .await?;
        info!(user_id = %profile.user_id, "profile updated");
        Ok(profile)
    }
}
