pub mod health;
pub mod petition;
pub mod signature;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /petitions                                         petition routes
/// /petitions/{petition_id}/signatures/...            signing + lookup
/// /signatures                                        signature listing + lookup
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/petitions", petition::router())
        .nest("/signatures", signature::router())
}
