//! Database repository for interview experiences.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::experiences::{ExperienceCreateDBRequest, ExperienceDBResponse},
};
use crate::types::{ExperienceId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing experiences
#[derive(Debug, Clone)]
pub struct ExperienceFilter {
    pub skip: i64,
    pub limit: i64,
}

impl ExperienceFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

// Database entity model, with the author's public fields joined in
#[derive(Debug, Clone, FromRow)]
struct Experience {
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
    pub posted_by: Option<Uuid>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

impl From<Experience> for ExperienceDBResponse {
    fn from(record: Experience) -> Self {
        Self {
            id: record.id,
            company_name: record.company_name,
            role: record.role,
            student_name: record.student_name,
            branch: record.branch,
            year: record.year,
            experience: record.experience,
            rounds: record.rounds,
            tips: record.tips,
            created_at: record.created_at,
            posted_by: record.posted_by,
            author_name: record.author_name,
            author_email: record.author_email,
        }
    }
}

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT e.id, e.company_name, e.role, e.student_name, e.branch, e.year,
           e.experience, e.rounds, e.tips, e.created_at, e.posted_by,
           u.name AS author_name, u.email AS author_email
    FROM experiences e
    LEFT JOIN users u ON e.posted_by = u.id
"#;

pub struct Experiences<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Experiences<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Experiences<'c> {
    type CreateRequest = ExperienceCreateDBRequest;
    type Response = ExperienceDBResponse;
    type Id = ExperienceId;
    type Filter = ExperienceFilter;

    #[instrument(skip(self, request), fields(company = %request.company_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let experience_id = Uuid::new_v4();

        // created_at is assigned by the database so insertion order and
        // timestamp order agree
        let id: ExperienceId = sqlx::query_scalar(
            r#"
            INSERT INTO experiences (id, company_name, role, student_name, branch, year, experience, rounds, tips, posted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(experience_id)
        .bind(&request.company_name)
        .bind(&request.role)
        .bind(&request.student_name)
        .bind(&request.branch)
        .bind(request.year)
        .bind(&request.experience)
        .bind(&request.rounds)
        .bind(&request.tips)
        .bind(request.posted_by)
        .fetch_one(&mut *self.db)
        .await?;

        // Re-read through the author join so create and get return the same shape
        let record = sqlx::query_as::<_, Experience>(&format!("{SELECT_WITH_AUTHOR} WHERE e.id = $1"))
            .bind(id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(ExperienceDBResponse::from(record))
    }

    #[instrument(skip(self), fields(experience_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let record = sqlx::query_as::<_, Experience>(&format!("{SELECT_WITH_AUTHOR} WHERE e.id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(record.map(ExperienceDBResponse::from))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        // Newest first; tie-break on id so equal timestamps keep a stable order
        let records = sqlx::query_as::<_, Experience>(&format!(
            "{SELECT_WITH_AUTHOR} ORDER BY e.created_at DESC, e.id LIMIT $1 OFFSET $2"
        ))
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(records.into_iter().map(ExperienceDBResponse::from).collect())
    }

    #[instrument(skip(self), fields(experience_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{handlers::Users, models::users::UserCreateDBRequest};
    use crate::types::UserId;
    use sqlx::PgPool;

    async fn create_author(pool: &PgPool, email: &str) -> UserId {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);
        users
            .create(&UserCreateDBRequest {
                name: "Author".to_string(),
                email: email.to_string(),
                password_hash: "$argon2id$fake-hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn experience_create(company: &str, posted_by: Option<UserId>) -> ExperienceCreateDBRequest {
        ExperienceCreateDBRequest {
            company_name: company.to_string(),
            role: "SDE Intern".to_string(),
            student_name: "Test Student".to_string(),
            branch: "CSE".to_string(),
            year: 2024,
            experience: "Two technical rounds followed by HR.".to_string(),
            rounds: vec!["Online assessment".to_string(), "Technical".to_string(), "HR".to_string()],
            tips: Some("Practice graph problems".to_string()),
            posted_by,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_get(pool: PgPool) {
        let author_id = create_author(&pool, "author@example.com").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Experiences::new(&mut conn);

        let created = repo.create(&experience_create("Acme", Some(author_id))).await.unwrap();
        assert_eq!(created.company_name, "Acme");
        assert_eq!(created.posted_by, Some(author_id));
        assert_eq!(created.author_name.as_deref(), Some("Author"));
        assert_eq!(created.author_email.as_deref(), Some("author@example.com"));
        // Round order is preserved
        assert_eq!(created.rounds, vec!["Online assessment", "Technical", "HR"]);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.author_name.as_deref(), Some("Author"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_without_owner(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Experiences::new(&mut conn);

        let created = repo.create(&experience_create("OwnerlessCo", None)).await.unwrap();
        assert_eq!(created.posted_by, None);
        assert_eq!(created.author_name, None);
        assert_eq!(created.author_email, None);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_newest_first(pool: PgPool) {
        let author_id = create_author(&pool, "lister@example.com").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Experiences::new(&mut conn);

        for company in ["First", "Second", "Third"] {
            repo.create(&experience_create(company, Some(author_id))).await.unwrap();
        }

        let listed = repo.list(&ExperienceFilter::new(0, 50)).await.unwrap();
        assert_eq!(listed.len(), 3);
        // Newest first
        for pair in listed.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }

        // Stable across repeated calls absent new writes
        let listed_again = repo.list(&ExperienceFilter::new(0, 50)).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|e| e.id).collect();
        let ids_again: Vec<_> = listed_again.iter().map(|e| e.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_pagination(pool: PgPool) {
        let author_id = create_author(&pool, "pager@example.com").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Experiences::new(&mut conn);

        for i in 0..5 {
            repo.create(&experience_create(&format!("Company {i}"), Some(author_id)))
                .await
                .unwrap();
        }

        let page = repo.list(&ExperienceFilter::new(2, 2)).await.unwrap();
        assert_eq!(page.len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete(pool: PgPool) {
        let author_id = create_author(&pool, "deleter@example.com").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Experiences::new(&mut conn);

        let created = repo.create(&experience_create("ShortLived", Some(author_id))).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());

        // Deleting again reports nothing removed
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
