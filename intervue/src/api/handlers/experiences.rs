use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        experiences::{DeleteExperienceResponse, ExperienceCreate, ExperienceResponse, ListExperiencesQuery},
        users::CurrentUser,
    },
    db::{
        handlers::{ExperienceFilter, Experiences, Repository},
        models::experiences::ExperienceCreateDBRequest,
    },
    errors::Error,
    types::{ExperienceId, Operation},
};

/// Presence checks on required fields. Content is stored as-is.
fn validate_experience(data: &ExperienceCreate) -> Result<(), Error> {
    let required = [
        ("company_name", &data.company_name),
        ("role", &data.role),
        ("student_name", &data.student_name),
        ("branch", &data.branch),
        ("experience", &data.experience),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(Error::BadRequest {
                message: format!("{field} cannot be empty"),
            });
        }
    }
    if data.year <= 0 {
        return Err(Error::BadRequest {
            message: "year must be a positive integer".to_string(),
        });
    }
    Ok(())
}

/// Post a new interview experience
#[utoipa::path(
    post,
    path = "/experiences",
    request_body = ExperienceCreate,
    tag = "experiences",
    responses(
        (status = 201, description = "Experience created", body = ExperienceResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_experience(
    State(state): State<AppState>,
    caller: Option<CurrentUser>,
    Json(data): Json<ExperienceCreate>,
) -> Result<(StatusCode, Json<ExperienceResponse>), Error> {
    // The caller becomes the record's immutable owner. With auth disabled,
    // records are owner-less even if a valid token was sent.
    let posted_by = if state.config.auth.enabled {
        Some(caller.ok_or(Error::Unauthenticated { message: None })?.id)
    } else {
        None
    };

    validate_experience(&data)?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Experiences::new(&mut pool_conn);

    let db_request = ExperienceCreateDBRequest {
        company_name: data.company_name,
        role: data.role,
        student_name: data.student_name,
        branch: data.branch,
        year: data.year,
        experience: data.experience,
        rounds: data.rounds,
        tips: data.tips,
        posted_by,
    };

    let created = repo.create(&db_request).await?;
    Ok((StatusCode::CREATED, Json(ExperienceResponse::from(created))))
}

/// List interview experiences, newest first
#[utoipa::path(
    get,
    path = "/experiences",
    tag = "experiences",
    params(ListExperiencesQuery),
    responses(
        (status = 200, description = "List of experiences", body = [ExperienceResponse]),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_experiences(
    State(state): State<AppState>,
    Query(query): Query<ListExperiencesQuery>,
) -> Result<Json<Vec<ExperienceResponse>>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Experiences::new(&mut pool_conn);

    let records = repo.list(&ExperienceFilter::new(query.skip(), query.limit())).await?;
    Ok(Json(records.into_iter().map(ExperienceResponse::from).collect()))
}

/// Get a single interview experience
#[utoipa::path(
    get,
    path = "/experiences/{id}",
    tag = "experiences",
    params(
        ("id" = String, Path, description = "Experience ID (UUID)"),
    ),
    responses(
        (status = 200, description = "The experience", body = ExperienceResponse),
        (status = 404, description = "Not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_experience(State(state): State<AppState>, Path(id): Path<ExperienceId>) -> Result<Json<ExperienceResponse>, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Experiences::new(&mut pool_conn);

    let record = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Experience".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(ExperienceResponse::from(record)))
}

/// Delete an interview experience
///
/// Only the user who posted an experience may delete it. The checks run in a
/// fixed order: authentication (401), then existence (404), then ownership
/// (403) - so a missing record reads as not-found even to a non-owner.
#[utoipa::path(
    delete,
    path = "/experiences/{id}",
    tag = "experiences",
    params(
        ("id" = String, Path, description = "Experience ID (UUID)"),
    ),
    responses(
        (status = 200, description = "Experience deleted", body = DeleteExperienceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - only the poster can delete"),
        (status = 404, description = "Not found"),
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_experience(
    State(state): State<AppState>,
    Path(id): Path<ExperienceId>,
    caller: Option<CurrentUser>,
) -> Result<Json<DeleteExperienceResponse>, Error> {
    let caller = if state.config.auth.enabled {
        Some(caller.ok_or(Error::Unauthenticated { message: None })?)
    } else {
        None
    };

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Experiences::new(&mut pool_conn);

    let existing = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Experience".to_string(),
        id: id.to_string(),
    })?;

    // Ensure only the creator can delete
    if let Some(caller) = caller {
        if existing.posted_by != Some(caller.id) {
            return Err(Error::InsufficientPermissions {
                action: Operation::Delete,
                resource: format!("experience {id}"),
            });
        }
    }

    if !repo.delete(id).await? {
        // Lost a race with another deletion
        return Err(Error::NotFound {
            resource: "Experience".to_string(),
            id: id.to_string(),
        });
    }

    Ok(Json(DeleteExperienceResponse {
        message: "Deleted successfully".to_string(),
    }))
}
