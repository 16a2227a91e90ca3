pub(crate) mod error;
pub(crate) mod hackatime;
pub(crate) mod projects;
pub(crate) mod reviews;
pub(crate) mod users;

pub(crate) use error::ApiError;
