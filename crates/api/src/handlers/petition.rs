//! Handlers for the `/petitions` resource.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use petitions_db::models::petition::Petition;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{parse_uuid, ListPetitionsParams};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// Body of `POST /petitions`. The creator is the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreatePetitionRequest {
    pub city_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Body of the approve/reject endpoints.
#[derive(Debug, Deserialize)]
pub struct ModerationRequest {
    #[serde(default)]
    pub reply: String,
}

/// POST /api/v1/petitions
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreatePetitionRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Petition>>)> {
    let Json(input) = payload?;
    let city_id = parse_uuid("city_id", &input.city_id)?;

    let petition = state
        .petitions
        .create_petition(city_id, user.user_id, &input.title, &input.description)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: petition })))
}

/// GET /api/v1/petitions/{petition_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<DataResponse<Petition>>> {
    let Path(raw_id) = path?;
    let id = parse_uuid("petition_id", &raw_id)?;

    let petition = state.petitions.get_petition(id).await?;
    Ok(Json(DataResponse { data: petition }))
}

/// GET /api/v1/petitions
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListPetitionsParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<ListResponse<Petition>>>> {
    let Query(params) = params?;
    let (filter, sort, page) = params.into_request()?;

    let (items, pagination) = state.petitions.list_petitions(&filter, sort, page).await?;
    Ok(Json(DataResponse {
        data: ListResponse { items, pagination },
    }))
}

/// POST /api/v1/petitions/{petition_id}/approve
pub async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ModerationRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Petition>>> {
    let Path(raw_id) = path?;
    let id = parse_uuid("petition_id", &raw_id)?;
    let Json(input) = payload?;

    let petition = state
        .petitions
        .approve_petition(&user.actor(), id, input.reply)
        .await?;
    Ok(Json(DataResponse { data: petition }))
}

/// POST /api/v1/petitions/{petition_id}/reject
pub async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ModerationRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Petition>>> {
    let Path(raw_id) = path?;
    let id = parse_uuid("petition_id", &raw_id)?;
    let Json(input) = payload?;

    let petition = state
        .petitions
        .reject_petition(&user.actor(), id, input.reply)
        .await?;
    Ok(Json(DataResponse { data: petition }))
}
