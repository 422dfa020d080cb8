//! REST scaffold for the portfolio backend.
//!
//! Nothing in the dashboard core depends on it; the CLI only reaches it via
//! `portview api ...`.

pub mod client;
pub mod query_cache;
pub mod users;

pub use client::ApiClient;
pub use query_cache::QueryCache;
pub use users::{User, UserApi, UserService};
