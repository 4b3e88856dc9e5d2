//! Handlers for petition signatures.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use petitions_db::models::signature::PetitionSignature;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{parse_uuid, ListSignaturesParams};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// POST /api/v1/petitions/{petition_id}/signatures
///
/// Signs on behalf of the authenticated caller.
pub async fn sign(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<PetitionSignature>>)> {
    let Path(raw_id) = path?;
    let petition_id = parse_uuid("petition_id", &raw_id)?;

    let signature = state
        .petitions
        .sign_petition(user.user_id, petition_id)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: signature })))
}

/// GET /api/v1/petitions/{petition_id}/signatures/{user_id}
pub async fn get_for_user(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> AppResult<Json<DataResponse<PetitionSignature>>> {
    let Path((raw_petition_id, raw_user_id)) = path?;
    let petition_id = parse_uuid("petition_id", &raw_petition_id)?;
    let user_id = parse_uuid("user_id", &raw_user_id)?;

    let signature = state
        .petitions
        .get_signature_for_user(petition_id, user_id)
        .await?;
    Ok(Json(DataResponse { data: signature }))
}

/// GET /api/v1/signatures/{signature_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<DataResponse<PetitionSignature>>> {
    let Path(raw_id) = path?;
    let id = parse_uuid("signature_id", &raw_id)?;

    let signature = state.petitions.get_signature(id).await?;
    Ok(Json(DataResponse { data: signature }))
}

/// GET /api/v1/signatures
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListSignaturesParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<ListResponse<PetitionSignature>>>> {
    let Query(params) = params?;
    let (filter, sort, page) = params.into_request()?;

    let (items, pagination) = state.petitions.list_signatures(&filter, sort, page).await?;
    Ok(Json(DataResponse {
        data: ListResponse { items, pagination },
    }))
}
