//! Database models for interview experiences.

use crate::types::{ExperienceId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new experience record
#[derive(Debug, Clone)]
pub struct ExperienceCreateDBRequest {
    pub company_name: String,
    pub role: String,
    pub student_name: String,
    pub branch: String,
    pub year: i32,
    pub experience: String,
    pub rounds: Vec<String>,
    pub tips: Option<String>,
    /// Owner identity. Always set when auth is enabled, never when disabled.
    pub posted_by: Option<UserId>,
}

/// Database response for an experience record, with the author's public
/// fields joined in when the record has an owner.
#[derive(Debug, Clone)]
pub struct ExperienceDBResponse {
    pub id: ExperienceId,
    pub company_name: String,
    pub role: String,
    pub student_name: String,
    pub branch: String,
    pub year: i32,
    pub experience: String,
    pub rounds: Vec<String>,
    pub tips: Option<String>,
    pub created_at: DateTime<Utc>,
    pub posted_by: Option<UserId>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}
