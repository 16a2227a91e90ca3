use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::models::{HackatimeProject, UserId},
    repositories::{HackatimeRepository, UserRepository},
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id/refresh", post(refresh_stats))
        .route("/:user_id/projects", get(list_catalog))
        .route("/:user_id/unlinked", get(list_unlinked))
}

/// Pull fresh per-project stats from Hackatime and upsert the user's
/// catalog. This is the only writer of catalog rows; the linking resolver
/// only ever reads them.
#[instrument(name = "refresh_hackatime_stats", skip(app_state))]
async fn refresh_stats(
    State(app_state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<HackatimeProject>>, ApiError> {
    let user = app_state
        .user_repo
        .get_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let stats = app_state
        .hackatime_client
        .fetch_project_stats(&user.slack_id, &app_state.hackatime_start_date)
        .await?;

    let refreshed = app_state
        .hackatime_repo
        .upsert_stats(&user_id, &stats)
        .await?;

    tracing::info!(
        "Refreshed {} hackatime projects for user {}",
        refreshed.len(),
        user_id
    );

    Ok(Json(refreshed))
}

#[instrument(name = "list_hackatime_projects", skip(app_state))]
async fn list_catalog(
    State(app_state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<HackatimeProject>>, ApiError> {
    let projects = app_state.hackatime_repo.list_for_user(&user_id).await?;

    Ok(Json(projects))
}

#[instrument(name = "list_unlinked_hackatime_projects", skip(app_state))]
async fn list_unlinked(
    State(app_state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<HackatimeProject>>, ApiError> {
    let projects = app_state.hackatime_repo.unlinked_for_user(&user_id).await?;

    Ok(Json(projects))
}
