use axum::{
    extract::{Request, State},
    http::Method,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, config::Settings, routes, routes::ApiError};

pub fn create(connection_pool: PgPool, config: Settings) -> Router<()> {
    let app_state = AppState::new(connection_pool, &config);

    // Every resource route requires the master key; only the health line
    // stays open.
    let api = Router::new()
        .nest("/projects", routes::projects::router())
        .nest("/hackatime", routes::hackatime::router())
        .nest("/reviews", routes::reviews::router())
        .nest("/users", routes::users::router())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_api_key,
        ))
        .route("/", get(|| async { "BuildBoard API" }));

    let app_url = config.application.app_url.clone();
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(["content-type".parse().unwrap(), "api-key".parse().unwrap()])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.to_str().unwrap_or_default() == app_url
        }));

    api.with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

async fn require_api_key(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get("api-key")
        .and_then(|value| value.to_str().ok());

    if provided != Some(app_state.master_key.as_str()) {
        return ApiError::forbidden("Invalid API key").into_response();
    }

    next.run(request).await
}
