//! Repository for the `petition_signatures` table.

use petitions_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::signature::PetitionSignature;
use crate::query::SIGNATURE_COLUMNS;

pub struct SignatureRepo;

impl SignatureRepo {
    /// Record that `user_id` signed `petition_id`.
    ///
    /// Returns `None` when the pair already exists; the unique constraint on
    /// `(petition_id, user_id)` decides, so concurrent duplicates cannot both
    /// succeed.
    pub async fn insert_unique<'e, E>(
        executor: E,
        id: DbId,
        petition_id: DbId,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<Option<PetitionSignature>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO petition_signatures (id, petition_id, user_id, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (petition_id, user_id) DO NOTHING \
             RETURNING {SIGNATURE_COLUMNS}"
        );
        sqlx::query_as::<_, PetitionSignature>(&query)
            .bind(id)
            .bind(petition_id)
            .bind(user_id)
            .bind(now)
            .fetch_optional(executor)
            .await
    }
}
