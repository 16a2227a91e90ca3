use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use time::OffsetDateTime;

use super::{ProjectId, ReviewId, UserId};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    #[strum(ascii_case_insensitive, serialize = "approved")]
    Approved,
    #[strum(ascii_case_insensitive, serialize = "rejected")]
    Rejected,
    #[strum(ascii_case_insensitive, serialize = "flagged")]
    Flagged,
    #[strum(ascii_case_insensitive, serialize = "pending")]
    Pending,
}

impl From<String> for ReviewDecision {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "approved" => ReviewDecision::Approved,
            "rejected" => ReviewDecision::Rejected,
            "flagged" => ReviewDecision::Flagged,
            "pending" => ReviewDecision::Pending,
            _ => panic!("Invalid review decision"),
        }
    }
}

/// A single staff verdict on a project.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub review_id: ReviewId,
    pub reviewer_user_id: UserId,
    pub project_id: ProjectId,
    pub review_comments: String,
    #[sqlx(try_from = "String")]
    pub review_decision: ReviewDecision,
    #[serde(with = "time::serde::rfc3339")]
    pub review_timestamp: OffsetDateTime,
}

/// Payload for recording a new review.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub reviewer_user_id: UserId,
    pub project_id: ProjectId,
    pub review_comments: String,
    pub review_decision: ReviewDecision,
}

#[cfg(test)]
mod tests {
    use super::ReviewDecision;

    #[test]
    fn decision_round_trips_through_strings() {
        assert_eq!(ReviewDecision::from("Approved".to_string()), ReviewDecision::Approved);
        assert_eq!(ReviewDecision::Approved.to_string(), "approved");

        let json = serde_json::to_string(&ReviewDecision::Flagged).expect("serialize decision");
        assert_eq!(json, "\"flagged\"");
    }
}
