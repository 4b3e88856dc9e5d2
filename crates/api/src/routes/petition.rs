//! Route definitions for the `/petitions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{petition, signature};
use crate::state::AppState;

/// Routes mounted at `/petitions`.
///
/// ```text
/// GET    /                                       -> list
/// POST   /                                       -> create
/// GET    /{petition_id}                          -> get_by_id
/// POST   /{petition_id}/approve                  -> approve
/// POST   /{petition_id}/reject                   -> reject
/// POST   /{petition_id}/signatures               -> sign
/// GET    /{petition_id}/signatures/{user_id}     -> get_for_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(petition::list).post(petition::create))
        .route("/{petition_id}", get(petition::get_by_id))
        .route("/{petition_id}/approve", post(petition::approve))
        .route("/{petition_id}/reject", post(petition::reject))
        .route("/{petition_id}/signatures", post(signature::sign))
        .route(
            "/{petition_id}/signatures/{user_id}",
            get(signature::get_for_user),
        )
}
