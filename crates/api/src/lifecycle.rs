//! Petition lifecycle manager.
//!
//! [`PetitionManager`] owns every petition state change: creation with
//! defaults, moderation (approve/reject) and signing. Each multi-step change
//! runs in one transaction with the petition row locked, so concurrent
//! moderators or signers serialize on the row and the stored signature counter
//! always equals the number of signature rows.
//!
//! Store failures other than the outcomes the manager recognizes are logged
//! and flattened into [`CoreError::Internal`].

use std::sync::Arc;

use chrono::Utc;
use petitions_core::error::CoreError;
use petitions_core::listing::{PetitionFilter, PetitionSort, SignatureFilter, SignatureSort};
use petitions_core::moderation::{Actor, ModerationAuthority, RoleAuthority};
use petitions_core::pagination::{PageRequest, PageResponse};
use petitions_core::petition::{is_available, PetitionStatus};
use petitions_core::types::DbId;
use petitions_db::models::petition::{CreatePetition, Petition, UpdatePetition};
use petitions_db::models::signature::PetitionSignature;
use petitions_db::query::{PetitionsQuery, SignaturesQuery};
use petitions_db::repositories::{PetitionRepo, SignatureRepo};
use petitions_db::DbPool;
use uuid::Uuid;

/// Stateless orchestrator over the petition store. Cheap to clone.
#[derive(Clone)]
pub struct PetitionManager {
    pool: DbPool,
    authority: Arc<dyn ModerationAuthority>,
}

impl PetitionManager {
    pub fn new(pool: DbPool, authority: Arc<dyn ModerationAuthority>) -> Self {
        Self { pool, authority }
    }

    /// Manager using the role-based [`RoleAuthority`] for moderation.
    pub fn with_role_authority(pool: DbPool) -> Self {
        Self::new(pool, Arc::new(RoleAuthority::default()))
    }

    // -----------------------------------------------------------------------
    // Petitions
    // -----------------------------------------------------------------------

    /// Create a published petition with a fresh id, zero signatures, the
    /// default goal and a 30-day signing window.
    pub async fn create_petition(
        &self,
        city_id: DbId,
        creator_id: DbId,
        title: &str,
        description: &str,
    ) -> Result<Petition, CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::invalid_argument("title", "must not be empty"));
        }

        let input = CreatePetition {
            city_id,
            creator_id,
            title: title.to_string(),
            description: description.to_string(),
        };
        let petition = PetitionRepo::create(&self.pool, Uuid::now_v7(), &input, Utc::now())
            .await
            .map_err(store_error("create petition"))?;

        tracing::info!(
            petition_id = %petition.id,
            city_id = %petition.city_id,
            creator_id = %petition.creator_id,
            "Petition created"
        );
        Ok(petition)
    }

    pub async fn get_petition(&self, id: DbId) -> Result<Petition, CoreError> {
        PetitionsQuery::new()
            .filter_id(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("get petition"))?
            .ok_or(CoreError::PetitionNotFound { id })
    }

    pub async fn approve_petition(
        &self,
        actor: &Actor,
        id: DbId,
        reply: String,
    ) -> Result<Petition, CoreError> {
        self.moderate(actor, id, PetitionStatus::Approved, reply).await
    }

    /// Reject a petition. The end date is written back unchanged.
    pub async fn reject_petition(
        &self,
        actor: &Actor,
        id: DbId,
        reply: String,
    ) -> Result<Petition, CoreError> {
        self.moderate(actor, id, PetitionStatus::Rejected, reply).await
    }

    /// Authorize against the petition's city, then lock the row, apply the
    /// transition and return the row as stored. Terminal petitions are not
    /// guarded.
    async fn moderate(
        &self,
        actor: &Actor,
        id: DbId,
        status: PetitionStatus,
        reply: String,
    ) -> Result<Petition, CoreError> {
        // Authorize before taking the row lock; the city never changes.
        let city_id = self.get_petition(id).await?.city_id;
        self.authority.authorize(actor, city_id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(store_error("begin moderation"))?;

        let current = PetitionsQuery::new()
            .filter_id(id)
            .for_update()
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error("lock petition"))?
            .ok_or(CoreError::PetitionNotFound { id })?;

        let changes = UpdatePetition {
            status: Some(status),
            reply: Some(reply),
            end_date: (status == PetitionStatus::Rejected).then_some(current.end_date),
        };
        let updated = PetitionsQuery::new()
            .filter_id(id)
            .update(&mut *tx, &changes)
            .await
            .map_err(store_error("update petition"))?
            .into_iter()
            .next()
            .ok_or(CoreError::PetitionNotFound { id })?;

        tx.commit().await.map_err(store_error("commit moderation"))?;

        if current.status.is_terminal() {
            tracing::warn!(
                petition_id = %id,
                from = %current.status,
                to = %updated.status,
                moderator_id = %actor.user_id,
                "Terminal petition moderated again"
            );
        } else {
            tracing::info!(
                petition_id = %id,
                from = %current.status,
                to = %updated.status,
                moderator_id = %actor.user_id,
                "Petition moderated"
            );
        }
        Ok(updated)
    }

    pub async fn list_petitions(
        &self,
        filter: &PetitionFilter,
        sort: PetitionSort,
        page: PageRequest,
    ) -> Result<(Vec<Petition>, PageResponse), CoreError> {
        let base = PetitionsQuery::from_filter(filter, Utc::now());
        let (limit, offset) = page.limit_offset();

        let items = empty_on_no_rows(
            base.clone()
                .sorted(sort)
                .page(limit, offset)
                .fetch_all(&self.pool)
                .await,
        )
        .map_err(store_error("list petitions"))?;
        let total = empty_on_no_rows(base.count(&self.pool).await)
            .map_err(store_error("count petitions"))?;

        tracing::debug!(returned = items.len(), total, "Listed petitions");
        Ok((items, page.respond(total)))
    }

    // -----------------------------------------------------------------------
    // Signatures
    // -----------------------------------------------------------------------

    /// Sign an available petition on behalf of `user_id`.
    ///
    /// Fails with `PetitionNotFound` for an unknown petition,
    /// `SignatureAlreadyExists` when the user signed before (whatever the
    /// petition's state is now), and `PetitionNotAvailable` once it is
    /// moderated or past its end date.
    pub async fn sign_petition(
        &self,
        user_id: DbId,
        petition_id: DbId,
    ) -> Result<PetitionSignature, CoreError> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(store_error("begin signing"))?;

        let petition = PetitionsQuery::new()
            .filter_id(petition_id)
            .for_update()
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error("lock petition"))?
            .ok_or(CoreError::PetitionNotFound { id: petition_id })?;

        let existing = SignaturesQuery::new()
            .filter_petition_id(petition_id)
            .filter_user_id(user_id)
            .count(&mut *tx)
            .await
            .map_err(store_error("check signature"))?;
        if existing > 0 {
            return Err(CoreError::SignatureAlreadyExists {
                petition_id,
                user_id,
            });
        }

        if !is_available(petition.status, petition.end_date, now) {
            return Err(CoreError::PetitionNotAvailable { id: petition_id });
        }

        let signature =
            SignatureRepo::insert_unique(&mut *tx, Uuid::now_v7(), petition_id, user_id, now)
                .await
                .map_err(store_error("insert signature"))?
                .ok_or(CoreError::SignatureAlreadyExists {
                    petition_id,
                    user_id,
                })?;

        PetitionRepo::increment_signatures(&mut *tx, petition_id)
            .await
            .map_err(store_error("increment signatures"))?;

        tx.commit().await.map_err(store_error("commit signing"))?;

        tracing::info!(
            signature_id = %signature.id,
            petition_id = %petition_id,
            user_id = %user_id,
            "Petition signed"
        );
        Ok(signature)
    }

    /// Signature by its own id.
    pub async fn get_signature(&self, id: DbId) -> Result<PetitionSignature, CoreError> {
        SignaturesQuery::new()
            .filter_id(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("get signature"))?
            .ok_or(CoreError::SignatureNotFound { id })
    }

    /// The signature `user_id` placed on `petition_id`.
    pub async fn get_signature_for_user(
        &self,
        petition_id: DbId,
        user_id: DbId,
    ) -> Result<PetitionSignature, CoreError> {
        SignaturesQuery::new()
            .filter_petition_id(petition_id)
            .filter_user_id(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("get signature"))?
            .ok_or(CoreError::SignatureNotFoundForUser {
                petition_id,
                user_id,
            })
    }

    pub async fn list_signatures(
        &self,
        filter: &SignatureFilter,
        sort: SignatureSort,
        page: PageRequest,
    ) -> Result<(Vec<PetitionSignature>, PageResponse), CoreError> {
        let base = SignaturesQuery::from_filter(filter);
        let (limit, offset) = page.limit_offset();

        let items = empty_on_no_rows(
            base.clone()
                .sorted(sort)
                .page(limit, offset)
                .fetch_all(&self.pool)
                .await,
        )
        .map_err(store_error("list signatures"))?;
        let total = empty_on_no_rows(base.count(&self.pool).await)
            .map_err(store_error("count signatures"))?;

        tracing::debug!(returned = items.len(), total, "Listed signatures");
        Ok((items, page.respond(total)))
    }
}

/// "No rows" from a listing read is an empty result, not a failure.
fn empty_on_no_rows<T: Default>(result: Result<T, sqlx::Error>) -> Result<T, sqlx::Error> {
    match result {
        Err(sqlx::Error::RowNotFound) => Ok(T::default()),
        other => other,
    }
}

/// Log a store failure and replace it with a sanitized internal error.
fn store_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |err| {
        tracing::error!(error = %err, operation, "Petition store error");
        CoreError::Internal(format!("{operation} failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_becomes_default() {
        let items: Vec<i32> = empty_on_no_rows(Err(sqlx::Error::RowNotFound)).unwrap();
        assert!(items.is_empty());
        assert_eq!(empty_on_no_rows::<u64>(Err(sqlx::Error::RowNotFound)).unwrap(), 0);
    }

    #[test]
    fn other_store_errors_pass_through() {
        let result = empty_on_no_rows::<u64>(Err(sqlx::Error::PoolTimedOut));
        assert!(matches!(result, Err(sqlx::Error::PoolTimedOut)));
    }

    #[test]
    fn store_error_is_sanitized() {
        let err = store_error("list petitions")(sqlx::Error::PoolClosed);
        assert!(matches!(err, CoreError::Internal(ref msg) if msg == "list petitions failed"));
    }
}
