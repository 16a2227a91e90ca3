use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::models::{NewReview, ProjectId, Review, ReviewId, UserId},
    repositories::ReviewRepository,
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_review).get(list_reviews))
        .route("/:review_id", get(get_review).delete(delete_review))
}

#[instrument(name = "create_review", skip(app_state, body))]
async fn create_review(
    State(app_state): State<AppState>,
    Json(body): Json<NewReview>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = app_state.review_repo.create_review(&body).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

#[derive(Debug, Deserialize)]
pub struct ListReviewsParams {
    #[serde(default)]
    skip: i64,
    limit: Option<i64>,
    project_id: Option<ProjectId>,
    reviewer_user_id: Option<UserId>,
}

#[instrument(name = "list_reviews", skip(app_state))]
async fn list_reviews(
    State(app_state): State<AppState>,
    Query(params): Query<ListReviewsParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.unwrap_or(100).clamp(1, 500);

    let reviews = if let Some(project_id) = params.project_id {
        app_state
            .review_repo
            .list_reviews_by_project(&project_id, skip, limit)
            .await?
    } else if let Some(reviewer) = params.reviewer_user_id {
        app_state
            .review_repo
            .list_reviews_by_reviewer(&reviewer, skip, limit)
            .await?
    } else {
        app_state.review_repo.list_reviews(skip, limit).await?
    };

    Ok(Json(reviews))
}

#[instrument(name = "get_review", skip(app_state))]
async fn get_review(
    State(app_state): State<AppState>,
    Path(review_id): Path<ReviewId>,
) -> Result<Json<Review>, ApiError> {
    let review = app_state
        .review_repo
        .get_review(&review_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    Ok(Json(review))
}

#[instrument(name = "delete_review", skip(app_state))]
async fn delete_review(
    State(app_state): State<AppState>,
    Path(review_id): Path<ReviewId>,
) -> Result<StatusCode, ApiError> {
    app_state.review_repo.delete_review(&review_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
