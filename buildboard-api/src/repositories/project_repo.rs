use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use super::repo_error::RepositoryError;
use crate::domain::{
    models::{HackatimeProject, NewProject, Project, ProjectId, ProjectPatch, UserId},
    resolve_link_update,
};

const PROJECT_COLUMNS: &str = "project_id, user_id, project_name, project_description, \
     project_type, attachment_urls, code_url, live_url, submission_week, shipped, \
     github_installation_id, github_repo_path, hackatime_projects, hackatime_hours, \
     created_at, updated_at";

pub trait ProjectRepository {
    async fn create_project(&self, project: &NewProject) -> Result<Project, RepositoryError>;
    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError>;
    async fn list_projects(&self, skip: i64, limit: i64) -> Result<Vec<Project>, RepositoryError>;
    async fn list_projects_by_user(
        &self,
        user_id: &UserId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Project>, RepositoryError>;
    async fn update_project(
        &self,
        id: &ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, RepositoryError>;
    async fn delete_project(&self, id: &ProjectId) -> Result<(), RepositoryError>;
    async fn update_hackatime_links(
        &self,
        id: &ProjectId,
        user_id: &UserId,
        names: Vec<String>,
    ) -> Result<Project, RepositoryError>;
    async fn set_shipped(&self, id: &ProjectId, shipped: bool) -> Result<Project, RepositoryError>;
}

pub struct ProjectRepositoryImpl {
    pool: PgPool,
}

impl ProjectRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProjectRepository for ProjectRepositoryImpl {
    async fn create_project(&self, project: &NewProject) -> Result<Project, RepositoryError> {
        let created = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (project_id, user_id, project_name, project_description,
                project_type, attachment_urls, code_url, live_url, submission_week,
                github_installation_id, github_repo_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(ProjectId::generate().as_str())
        .bind(project.user_id.as_str())
        .bind(&project.project_name)
        .bind(&project.project_description)
        .bind(&project.project_type)
        .bind(&project.attachment_urls)
        .bind(&project.code_url)
        .bind(&project.live_url)
        .bind(&project.submission_week)
        .bind(&project.github_installation_id)
        .bind(&project.github_repo_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE project_id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_projects(&self, skip: i64, limit: i64) -> Result<Vec<Project>, RepositoryError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn list_projects_by_user(
        &self,
        user_id: &UserId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Project>, RepositoryError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE user_id = $1
            ORDER BY created_at
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(user_id.as_str())
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn update_project(
        &self,
        id: &ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, RepositoryError> {
        let mut project = self
            .get_project(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Project not found: {}", id)))?;

        patch.apply(&mut project);

        let updated = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET project_name = $1, project_description = $2, project_type = $3,
                attachment_urls = $4, code_url = $5, live_url = $6, submission_week = $7,
                github_installation_id = $8, github_repo_path = $9, updated_at = now()
            WHERE project_id = $10
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&project.project_name)
        .bind(&project.project_description)
        .bind(&project.project_type)
        .bind(&project.attachment_urls)
        .bind(&project.code_url)
        .bind(&project.live_url)
        .bind(&project.submission_week)
        .bind(&project.github_installation_id)
        .bind(&project.github_repo_path)
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_project(&self, id: &ProjectId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM projects WHERE project_id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Project not found: {}",
                id
            )));
        }

        Ok(())
    }

    /// Replace the project's whole Hackatime link set and recompute hours.
    ///
    /// Conflict detection reads every other project of the same user, so the
    /// read-then-write runs in one transaction with all of the user's project
    /// rows locked, in a stable order. Two concurrent swaps for the same user
    /// serialize on those locks instead of both passing the conflict check.
    async fn update_hackatime_links(
        &self,
        id: &ProjectId,
        user_id: &UserId,
        names: Vec<String>,
    ) -> Result<Project, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE project_id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("Project not found: {}", id)))?;

        if project.user_id != *user_id {
            return Err(RepositoryError::Forbidden(
                "You can only update your own projects".to_string(),
            ));
        }

        // An explicitly empty request clears the links and nulls the hours
        // without touching the conflict or existence checks.
        if names.is_empty() {
            let cleared = sqlx::query_as::<_, Project>(&format!(
                r#"
                UPDATE projects
                SET hackatime_projects = '{{}}', hackatime_hours = NULL, updated_at = now()
                WHERE project_id = $1
                RETURNING {PROJECT_COLUMNS}
                "#
            ))
            .bind(id.as_str())
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;

            return Ok(cleared);
        }

        let user_projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE user_id = $1
            ORDER BY project_id
            FOR UPDATE
            "#
        ))
        .bind(user_id.as_str())
        .fetch_all(&mut *tx)
        .await?;

        let linked_elsewhere: HashSet<String> = user_projects
            .iter()
            .filter(|p| p.project_id != *id)
            .flat_map(|p| p.linked_hackatime_names().iter().cloned())
            .collect();

        let catalog_rows = sqlx::query_as::<_, HackatimeProject>(
            r#"
            SELECT id, user_id, name, seconds, created_at, updated_at
            FROM hackatime_projects
            WHERE user_id = $1 AND name = ANY($2)
            "#,
        )
        .bind(user_id.as_str())
        .bind(&names)
        .fetch_all(&mut *tx)
        .await?;

        let catalog: HashMap<String, i64> = catalog_rows
            .into_iter()
            .map(|hp| (hp.name, hp.seconds))
            .collect();

        let update = resolve_link_update(&names, &linked_elsewhere, &catalog)?;

        let updated = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET hackatime_projects = $1, hackatime_hours = $2, updated_at = now()
            WHERE project_id = $3
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&update.names)
        .bind(update.hours)
        .bind(id.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_shipped(&self, id: &ProjectId, shipped: bool) -> Result<Project, RepositoryError> {
        let updated = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET shipped = $1, updated_at = now()
            WHERE project_id = $2
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(shipped)
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("Project not found: {}", id)))?;

        Ok(updated)
    }
}
