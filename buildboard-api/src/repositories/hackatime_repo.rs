use std::collections::HashSet;

use hackatime::ProjectStats;
use sqlx::PgPool;

use super::repo_error::RepositoryError;
use crate::domain::models::{ActivityId, HackatimeProject, ProjectId, UserId};

const CATALOG_COLUMNS: &str = "id, user_id, name, seconds, created_at, updated_at";

pub trait HackatimeRepository {
    async fn list_for_user(&self, user_id: &UserId)
        -> Result<Vec<HackatimeProject>, RepositoryError>;
    async fn upsert_stats(
        &self,
        user_id: &UserId,
        stats: &[ProjectStats],
    ) -> Result<Vec<HackatimeProject>, RepositoryError>;
    async fn unlinked_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HackatimeProject>, RepositoryError>;
    async fn linked_to_project(
        &self,
        user_id: &UserId,
        project_id: &ProjectId,
    ) -> Result<Vec<HackatimeProject>, RepositoryError>;
}

pub struct HackatimeRepositoryImpl {
    pool: PgPool,
}

impl HackatimeRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl HackatimeRepository for HackatimeRepositoryImpl {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HackatimeProject>, RepositoryError> {
        let projects = sqlx::query_as::<_, HackatimeProject>(&format!(
            "SELECT {CATALOG_COLUMNS} FROM hackatime_projects WHERE user_id = $1 ORDER BY name"
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Write one sync's worth of stats into the catalog. Existing rows keep
    /// their id; only `seconds` moves.
    async fn upsert_stats(
        &self,
        user_id: &UserId,
        stats: &[ProjectStats],
    ) -> Result<Vec<HackatimeProject>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut refreshed = Vec::with_capacity(stats.len());

        for stat in stats {
            let row = sqlx::query_as::<_, HackatimeProject>(&format!(
                r#"
                INSERT INTO hackatime_projects (id, user_id, name, seconds)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, name) DO UPDATE
                SET seconds = EXCLUDED.seconds,
                    updated_at = now()
                RETURNING {CATALOG_COLUMNS}
                "#
            ))
            .bind(ActivityId::generate().as_str())
            .bind(user_id.as_str())
            .bind(&stat.name)
            .bind(stat.seconds)
            .fetch_one(&mut *tx)
            .await?;

            refreshed.push(row);
        }

        tx.commit().await?;

        Ok(refreshed)
    }

    /// Catalog entries not currently linked to any of the user's projects.
    async fn unlinked_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HackatimeProject>, RepositoryError> {
        let catalog = self.list_for_user(user_id).await?;

        let linked_lists = sqlx::query_scalar::<_, Option<Vec<String>>>(
            "SELECT hackatime_projects FROM projects WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        let linked_names: HashSet<String> = linked_lists.into_iter().flatten().flatten().collect();

        Ok(catalog
            .into_iter()
            .filter(|hp| !linked_names.contains(&hp.name))
            .collect())
    }

    /// Resolve a project's link names back to full catalog records. Returns
    /// an empty list, not an error, when the project is missing or belongs
    /// to someone else.
    async fn linked_to_project(
        &self,
        user_id: &UserId,
        project_id: &ProjectId,
    ) -> Result<Vec<HackatimeProject>, RepositoryError> {
        let owner_and_links = sqlx::query_as::<_, (UserId, Option<Vec<String>>)>(
            "SELECT user_id, hackatime_projects FROM projects WHERE project_id = $1",
        )
        .bind(project_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let names = match owner_and_links {
            Some((owner, links)) if owner == *user_id => links.unwrap_or_default(),
            _ => return Ok(Vec::new()),
        };
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, HackatimeProject>(&format!(
            r#"
            SELECT {CATALOG_COLUMNS} FROM hackatime_projects
            WHERE user_id = $1 AND name = ANY($2)
            "#
        ))
        .bind(user_id.as_str())
        .bind(&names)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
