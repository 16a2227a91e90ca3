use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::models::{User, UserId},
    repositories::UserRepository,
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/:user_id", get(get_user))
}

#[instrument(name = "get_user", skip(app_state))]
async fn get_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    let user = app_state
        .user_repo
        .get_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}
