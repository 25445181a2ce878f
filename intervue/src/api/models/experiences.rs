//! API request/response models for interview experiences.

use crate::db::models::experiences::ExperienceDBResponse;
use crate::types::{ExperienceId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default number of items to return per page.
pub const DEFAULT_LIMIT: i64 = 50;

/// Maximum number of items that can be requested per page.
pub const MAX_LIMIT: i64 = 200;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExperienceCreate {
    pub company_name: String,
    pub role: String,
    pub student_name: String,
    pub branch: String,
    pub year: i32,
    pub experience: String,
    /// Round descriptions in interview order
    #[serde(default)]
    pub rounds: Vec<String>,
    pub tips: Option<String>,
}

/// Public fields of the user who posted an experience.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostedBy {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExperienceResponse {
    #[schema(value_type = String, format = "uuid")]
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
    /// The posting user, present only in deployments with authentication enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<PostedBy>,
}

impl From<ExperienceDBResponse> for ExperienceResponse {
    fn from(db: ExperienceDBResponse) -> Self {
        let posted_by = match (db.posted_by, db.author_name, db.author_email) {
            (Some(id), Some(name), Some(email)) => Some(PostedBy { id, name, email }),
            _ => None,
        };

        Self {
            id: db.id,
            company_name: db.company_name,
            role: db.role,
            student_name: db.student_name,
            branch: db.branch,
            year: db.year,
            experience: db.experience,
            rounds: db.rounds,
            tips: db.tips,
            created_at: db.created_at,
            posted_by,
        }
    }
}

/// Query parameters for listing experiences.
///
/// Offset-based pagination; `limit` is clamped to [1, 200] to prevent both
/// zero-result queries and excessive data fetching.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListExperiencesQuery {
    /// Number of items to skip (default: 0)
    #[param(default = 0, minimum = 0)]
    pub skip: Option<i64>,

    /// Maximum number of items to return (default: 50, max: 200)
    #[param(default = 50, minimum = 1, maximum = 200)]
    pub limit: Option<i64>,
}

impl ListExperiencesQuery {
    #[inline]
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Confirmation body for a successful deletion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteExperienceResponse {
    pub message: String,
}
