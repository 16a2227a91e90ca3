use sqlx::PgPool;

use super::repo_error::RepositoryError;
use crate::domain::models::{NewReview, ProjectId, Review, ReviewId, UserId};

const REVIEW_COLUMNS: &str =
    "review_id, reviewer_user_id, project_id, review_comments, review_decision, review_timestamp";

pub trait ReviewRepository {
    async fn create_review(&self, review: &NewReview) -> Result<Review, RepositoryError>;
    async fn get_review(&self, id: &ReviewId) -> Result<Option<Review>, RepositoryError>;
    async fn list_reviews(&self, skip: i64, limit: i64) -> Result<Vec<Review>, RepositoryError>;
    async fn list_reviews_by_project(
        &self,
        project_id: &ProjectId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError>;
    async fn list_reviews_by_reviewer(
        &self,
        reviewer_user_id: &UserId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError>;
    async fn delete_review(&self, id: &ReviewId) -> Result<(), RepositoryError>;
    async fn has_approved_review(&self, project_id: &ProjectId) -> Result<bool, RepositoryError>;
}

pub struct ReviewRepositoryImpl {
    pool: PgPool,
}

impl ReviewRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ReviewRepository for ReviewRepositoryImpl {
    async fn create_review(&self, review: &NewReview) -> Result<Review, RepositoryError> {
        let created = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (review_id, reviewer_user_id, project_id, review_comments, review_decision)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(ReviewId::generate().as_str())
        .bind(review.reviewer_user_id.as_str())
        .bind(review.project_id.as_str())
        .bind(&review.review_comments)
        .bind(review.review_decision.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_review(&self, id: &ReviewId) -> Result<Option<Review>, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn list_reviews(&self, skip: i64, limit: i64) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY review_timestamp OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn list_reviews_by_project(
        &self,
        project_id: &ProjectId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS} FROM reviews
            WHERE project_id = $1
            ORDER BY review_timestamp
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(project_id.as_str())
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn list_reviews_by_reviewer(
        &self,
        reviewer_user_id: &UserId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS} FROM reviews
            WHERE reviewer_user_id = $1
            ORDER BY review_timestamp
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(reviewer_user_id.as_str())
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn delete_review(&self, id: &ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Review not found: {}", id)));
        }

        Ok(())
    }

    /// The visibility and submission flows only care whether *any* approved
    /// review exists, never the full history.
    async fn has_approved_review(&self, project_id: &ProjectId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reviews
                WHERE project_id = $1 AND review_decision = 'approved'
            )
            "#,
        )
        .bind(project_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
