//! Petition row struct and DTOs.

use petitions_core::petition::PetitionStatus;
use petitions_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `petitions` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Petition {
    pub id: DbId,
    pub city_id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: PetitionStatus,
    /// Number of signature rows; maintained in the signing transaction.
    pub signatures: i32,
    pub goal: i32,
    /// Moderator reply, empty until the petition is approved or rejected.
    pub reply: String,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new petition. Identity, status and defaults are
/// assigned by the caller of [`PetitionRepo::create`](crate::repositories::PetitionRepo::create).
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePetition {
    pub city_id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub description: String,
}

/// Column changes applied by a scoped petition update. `updated_at` is always
/// refreshed.
#[derive(Debug, Clone, Default)]
pub struct UpdatePetition {
    pub status: Option<PetitionStatus>,
    pub reply: Option<String>,
    pub end_date: Option<Timestamp>,
}
