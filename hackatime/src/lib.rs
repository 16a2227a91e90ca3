mod client;
mod hackatime_url;
mod stats;

pub(crate) use hackatime_url::*;

pub use client::*;
pub use stats::*;
