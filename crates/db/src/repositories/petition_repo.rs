//! Repository for the `petitions` table.

use petitions_core::petition::{default_end_date, PetitionStatus, DEFAULT_SIGNATURE_GOAL};
use petitions_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::petition::{CreatePetition, Petition};
use crate::query::PETITION_COLUMNS;

/// Inserts petitions and maintains their signature counter.
pub struct PetitionRepo;

impl PetitionRepo {
    /// Insert a new published petition with zero signatures, the default goal
    /// and an end date [`DEFAULT_DURATION_DAYS`](petitions_core::petition::DEFAULT_DURATION_DAYS)
    /// after `now`. Returns the stored row.
    pub async fn create<'e, E>(
        executor: E,
        id: DbId,
        input: &CreatePetition,
        now: Timestamp,
    ) -> Result<Petition, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO petitions (\
                id, city_id, creator_id, title, description, status, \
                signatures, goal, reply, end_date, created_at, updated_at\
             ) VALUES ($1, $2, $3, $4, $5, $6, 0, $7, '', $8, $9, $9) \
             RETURNING {PETITION_COLUMNS}"
        );
        sqlx::query_as::<_, Petition>(&query)
            .bind(id)
            .bind(input.city_id)
            .bind(input.creator_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(PetitionStatus::Published.as_str())
            .bind(DEFAULT_SIGNATURE_GOAL)
            .bind(default_end_date(now))
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Add one to the signature counter. Returns `false` if no petition has
    /// the given ID.
    pub async fn increment_signatures<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE petitions SET signatures = signatures + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
