pub mod linking;
pub mod models;
pub mod submission;
pub mod visibility;

pub use linking::{resolve_link_update, LinkError, LinkUpdate};
pub use submission::{validate_submission, SubmissionValidation, ValidationError};
pub use visibility::{calculate_visibility, VisibilityStatus};
