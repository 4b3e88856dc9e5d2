//! Petitions API server library.
//!
//! Exposes the lifecycle manager, configuration, state, error handling and
//! routes so integration tests and the binary entrypoint share one router.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod query;
pub mod request_id;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
