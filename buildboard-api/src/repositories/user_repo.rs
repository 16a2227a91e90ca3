use sqlx::PgPool;

use super::repo_error::RepositoryError;
use crate::domain::models::{User, UserAddress, UserId, UserProfile};

pub trait UserRepository {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
    async fn get_primary_address(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserAddress>, RepositoryError>;
}

pub struct UserRepositoryImpl {
    pool: PgPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for UserRepositoryImpl {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, first_name, last_name, slack_id, email, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, first_name, last_name, birthday
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn get_primary_address(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserAddress>, RepositoryError> {
        let address = sqlx::query_as::<_, UserAddress>(
            r#"
            SELECT id, user_id, address_line_1, address_line_2, city, state, country,
                   post_code, is_primary
            FROM user_addresses
            WHERE user_id = $1 AND is_primary = TRUE
            LIMIT 1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }
}
