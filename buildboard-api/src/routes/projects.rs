use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::{
        calculate_visibility,
        models::{HackatimeProject, NewProject, Project, ProjectId, ProjectPatch, UserId},
        validate_submission, ValidationError, VisibilityStatus,
    },
    repositories::{
        HackatimeRepository, ProjectRepository, ReviewRepository, UserRepository,
    },
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project).get(list_projects))
        .route(
            "/:project_id",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .route(
            "/:project_id/hackatime",
            put(replace_hackatime_links).get(linked_hackatime_projects),
        )
        .route("/:project_id/visibility", get(project_visibility))
        .route("/:project_id/submit", post(submit_project))
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    #[serde(default)]
    skip: i64,
    limit: Option<i64>,
    user_id: Option<UserId>,
}

#[instrument(name = "create_project", skip(app_state, body))]
async fn create_project(
    State(app_state): State<AppState>,
    Json(body): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = app_state.project_repo.create_project(&body).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

#[instrument(name = "list_projects", skip(app_state))]
async fn list_projects(
    State(app_state): State<AppState>,
    Query(params): Query<ListProjectsParams>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.unwrap_or(100).clamp(1, 500);

    let projects = match params.user_id {
        Some(user_id) => {
            app_state
                .project_repo
                .list_projects_by_user(&user_id, skip, limit)
                .await?
        }
        None => app_state.project_repo.list_projects(skip, limit).await?,
    };

    Ok(Json(projects))
}

#[instrument(name = "get_project", skip(app_state))]
async fn get_project(
    State(app_state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Project>, ApiError> {
    let project = app_state
        .project_repo
        .get_project(&project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    Ok(Json(project))
}

#[instrument(name = "update_project", skip(app_state, body))]
async fn update_project(
    State(app_state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<ProjectPatch>,
) -> Result<Json<Project>, ApiError> {
    let project = app_state
        .project_repo
        .update_project(&project_id, body)
        .await?;

    Ok(Json(project))
}

#[instrument(name = "delete_project", skip(app_state))]
async fn delete_project(
    State(app_state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<StatusCode, ApiError> {
    app_state.project_repo.delete_project(&project_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Hackatime linking
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReplaceLinksPayload {
    user_id: UserId,
    projects: Vec<String>,
}

#[instrument(name = "replace_hackatime_links", skip(app_state, body))]
async fn replace_hackatime_links(
    State(app_state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<ReplaceLinksPayload>,
) -> Result<Json<Project>, ApiError> {
    let project = app_state
        .project_repo
        .update_hackatime_links(&project_id, &body.user_id, body.projects)
        .await?;

    Ok(Json(project))
}

#[derive(Debug, Deserialize)]
pub struct LinkedProjectsParams {
    user_id: UserId,
}

#[instrument(name = "linked_hackatime_projects", skip(app_state))]
async fn linked_hackatime_projects(
    State(app_state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(params): Query<LinkedProjectsParams>,
) -> Result<Json<Vec<HackatimeProject>>, ApiError> {
    let linked = app_state
        .hackatime_repo
        .linked_to_project(&params.user_id, &project_id)
        .await?;

    Ok(Json(linked))
}

// ============================================================================
// Visibility
// ============================================================================

#[instrument(name = "project_visibility", skip(app_state))]
async fn project_visibility(
    State(app_state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<VisibilityStatus>, ApiError> {
    let project = app_state
        .project_repo
        .get_project(&project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    let has_approved = app_state
        .review_repo
        .has_approved_review(&project_id)
        .await?;

    Ok(Json(calculate_visibility(&project, has_approved)))
}

// ============================================================================
// Submission
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitProjectPayload {
    user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct SubmitProjectResponse {
    success: bool,
    errors: Vec<ValidationError>,
    shipped: bool,
}

/// Re-run the full eligibility check and flip `shipped` only when it comes
/// back clean. An ineligible project is a normal 200 outcome carrying every
/// unmet requirement; nothing is partially written.
#[instrument(name = "submit_project", skip(app_state, body))]
async fn submit_project(
    State(app_state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<SubmitProjectPayload>,
) -> Result<Json<SubmitProjectResponse>, ApiError> {
    let project = app_state
        .project_repo
        .get_project(&project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if project.user_id != body.user_id {
        return Err(ApiError::forbidden("You can only submit your own projects"));
    }

    let profile = app_state.user_repo.get_profile(&project.user_id).await?;
    let address = app_state
        .user_repo
        .get_primary_address(&project.user_id)
        .await?;

    let today = OffsetDateTime::now_utc().date();
    let validation = validate_submission(&project, profile.as_ref(), address.as_ref(), today);

    if !validation.valid {
        return Ok(Json(SubmitProjectResponse {
            success: false,
            errors: validation.errors,
            shipped: project.shipped,
        }));
    }

    let updated = app_state.project_repo.set_shipped(&project_id, true).await?;

    Ok(Json(SubmitProjectResponse {
        success: true,
        errors: Vec::new(),
        shipped: updated.shipped,
    }))
}
