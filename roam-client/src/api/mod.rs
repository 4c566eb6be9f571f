mod backend;
mod client;
mod error;
mod fixture;

pub use backend::{BackendCall, BackendClient};
pub use client::HttpBackend;
pub use error::{ApiError, ApiResult};
pub use fixture::{FixtureBackend, FixtureOptions};
