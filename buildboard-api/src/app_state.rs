use std::sync::Arc;

use hackatime::HackatimeClient;
use sqlx::PgPool;

use crate::{
    config::Settings,
    repositories::{
        HackatimeRepositoryImpl, ProjectRepositoryImpl, ReviewRepositoryImpl, UserRepositoryImpl,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    pub project_repo: Arc<ProjectRepositoryImpl>,
    pub hackatime_repo: Arc<HackatimeRepositoryImpl>,
    pub review_repo: Arc<ReviewRepositoryImpl>,
    pub user_repo: Arc<UserRepositoryImpl>,
    pub hackatime_client: Arc<HackatimeClient>,
    pub master_key: String,
    pub hackatime_start_date: String,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: &Settings) -> Self {
        let hackatime_client = HackatimeClient::new(
            config.hackatime.base_url.clone(),
            config.hackatime.api_key.clone(),
        );

        Self {
            project_repo: Arc::new(ProjectRepositoryImpl::new(db_pool.clone())),
            hackatime_repo: Arc::new(HackatimeRepositoryImpl::new(db_pool.clone())),
            review_repo: Arc::new(ReviewRepositoryImpl::new(db_pool.clone())),
            user_repo: Arc::new(UserRepositoryImpl::new(db_pool.clone())),
            db_pool: Arc::new(db_pool),
            hackatime_client: Arc::new(hackatime_client),
            master_key: config.application.master_key.clone(),
            hackatime_start_date: config.hackatime.start_date.clone(),
        }
    }
}
