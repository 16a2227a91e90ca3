mod activity;
mod ids;
mod project;
mod review;
mod user;

pub use activity::*;
pub use ids::*;
pub use project::*;
pub use review::*;
pub use user::*;
