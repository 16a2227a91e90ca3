use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use super::UserId;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub slack_id: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Free-text onboarding profile. Fields arrive from a form and can be
/// blank, so completeness is checked at submission time, not on write.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub birthday: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserAddress {
    pub id: String,
    pub user_id: UserId,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub post_code: Option<String>,
    pub is_primary: bool,
}
