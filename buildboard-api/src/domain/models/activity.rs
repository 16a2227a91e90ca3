use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use super::{ActivityId, UserId};

/// One externally tracked activity bucket from the user's Hackatime
/// catalog. Rows are created and refreshed wholesale by the stats sync;
/// `seconds` only ever grows.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HackatimeProject {
    pub id: ActivityId,
    pub user_id: UserId,
    pub name: String,
    pub seconds: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
