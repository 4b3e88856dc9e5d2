use axum::routing::get;
use axum::Router;

use crate::handlers::signature;
use crate::state::AppState;

/// Routes mounted at `/signatures`.
///
/// ```text
/// GET    /                  -> list
/// GET    /{signature_id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(signature::list))
        .route("/{signature_id}", get(signature::get_by_id))
}
