use petitions_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `petition_signatures` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PetitionSignature {
    pub id: DbId,
    pub petition_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}
