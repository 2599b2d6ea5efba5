//! TestRail integration.
//!
//! - [`api`]: the [`TestRailApi`] contract and its wire types
//! - [`http`]: the `reqwest` implementation
//! - [`connection`]: the connectivity check run before anything else
//! - [`run`]: selecting the run results are submitted to

pub mod api;
pub mod connection;
pub mod http;
pub mod run;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{
    AddResultPayload, AddRunPayload, ApiError, ApiResult, Project, ResultRecord, Run, RunId,
    TestRailApi,
};
pub use connection::verify_connection;
pub use http::HttpClient;
pub use run::resolve_run;
