//! Backend gateway: HTTP contract, typed errors and request dispatch.

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod types;

pub use client::{CLEAR_MEMORY_PATH, DEFAULT_BASE_URL, SummaryClient};
pub use dispatcher::{Completed, Dispatcher, Job, Outcome, RequestId, run_job};
pub use error::GatewayError;
pub use types::{DEFAULT_LANGUAGE, SummaryRequest, SummaryResponse};
