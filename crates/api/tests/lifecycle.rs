//! Lifecycle manager tests against a real database, below the HTTP layer.
//!
//! - Pluggable moderation authority
//! - Re-moderation of terminal petitions
//! - Signing is not held up by an in-flight authorization
//! - Concurrent signing keeps the counter equal to the signature rows
//! - Repeat signers see a conflict regardless of petition state

use std::sync::Arc;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::Utc;
use petitions_api::lifecycle::PetitionManager;
use petitions_core::error::CoreError;
use petitions_core::listing::SignatureFilter;
use petitions_core::moderation::{Actor, ModerationAuthority};
use petitions_core::pagination::PageRequest;
use petitions_core::petition::PetitionStatus;
use petitions_core::roles::ROLE_ADMIN;
use petitions_core::types::DbId;
use petitions_db::models::petition::UpdatePetition;
use petitions_db::query::{PetitionsQuery, SignaturesQuery};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Admits only the officials of one city.
struct SingleCityAuthority {
    city_id: DbId,
}

#[async_trait]
impl ModerationAuthority for SingleCityAuthority {
    async fn authorize(&self, actor: &Actor, city_id: DbId) -> Result<(), CoreError> {
        if city_id == self.city_id {
            Ok(())
        } else {
            Err(CoreError::RoleIsNotApplicable {
                user_id: actor.user_id,
                role: actor.role.clone(),
            })
        }
    }
}

/// Admits everyone, after a delay standing in for a remote city service.
struct SlowAuthority {
    delay: Duration,
}

#[async_trait]
impl ModerationAuthority for SlowAuthority {
    async fn authorize(&self, _actor: &Actor, _city_id: DbId) -> Result<(), CoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

fn moderator() -> Actor {
    Actor {
        user_id: Uuid::new_v4(),
        role: ROLE_ADMIN.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_authority_is_consulted_with_the_petition_city(pool: PgPool) {
    let home = Uuid::new_v4();
    let manager = PetitionManager::new(
        pool.clone(),
        Arc::new(SingleCityAuthority { city_id: home }),
    );

    let local = manager
        .create_petition(home, Uuid::new_v4(), "Local", "")
        .await
        .unwrap();
    let foreign = manager
        .create_petition(Uuid::new_v4(), Uuid::new_v4(), "Foreign", "")
        .await
        .unwrap();

    let approved = manager
        .approve_petition(&moderator(), local.id, "ok".into())
        .await
        .unwrap();
    assert_eq!(approved.status, PetitionStatus::Approved);

    let denied = manager
        .approve_petition(&moderator(), foreign.id, "ok".into())
        .await;
    assert_matches!(denied, Err(CoreError::RoleIsNotApplicable { .. }));

    let unchanged = manager.get_petition(foreign.id).await.unwrap();
    assert_eq!(unchanged, foreign);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_terminal_petition_can_be_remoderated(pool: PgPool) {
    let manager = PetitionManager::with_role_authority(pool);
    let petition = manager
        .create_petition(Uuid::new_v4(), Uuid::new_v4(), "Lights", "")
        .await
        .unwrap();

    manager
        .approve_petition(&moderator(), petition.id, "yes".into())
        .await
        .unwrap();
    let rejected = manager
        .reject_petition(&moderator(), petition.id, "changed our mind".into())
        .await
        .unwrap();

    assert_eq!(rejected.status, PetitionStatus::Rejected);
    assert_eq!(rejected.reply, "changed our mind");
    assert_eq!(rejected.end_date, petition.end_date);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_slow_authorization_does_not_block_signers(pool: PgPool) {
    let manager = PetitionManager::new(
        pool,
        Arc::new(SlowAuthority {
            delay: Duration::from_millis(1500),
        }),
    );
    let petition = manager
        .create_petition(Uuid::new_v4(), Uuid::new_v4(), "Bike lanes", "")
        .await
        .unwrap();

    let moderation = {
        let manager = manager.clone();
        tokio::spawn(async move {
            manager
                .approve_petition(&moderator(), petition.id, "ok".into())
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    manager
        .sign_petition(Uuid::new_v4(), petition.id)
        .await
        .unwrap();
    let waited = started.elapsed();
    assert!(
        waited < Duration::from_millis(750),
        "signing waited {waited:?} for the authority"
    );

    let approved = moderation.await.unwrap().unwrap();
    assert_eq!(approved.status, PetitionStatus::Approved);
    assert_eq!(approved.signatures, 1);
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_repeat_signer_conflicts_after_expiry(pool: PgPool) {
    let manager = PetitionManager::with_role_authority(pool.clone());
    let petition = manager
        .create_petition(Uuid::new_v4(), Uuid::new_v4(), "Library hours", "")
        .await
        .unwrap();
    let user = Uuid::new_v4();
    manager.sign_petition(user, petition.id).await.unwrap();

    PetitionsQuery::new()
        .filter_id(petition.id)
        .update(
            &pool,
            &UpdatePetition {
                end_date: Some(Utc::now() - chrono::Duration::hours(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_matches!(
        manager.sign_petition(user, petition.id).await,
        Err(CoreError::SignatureAlreadyExists { .. })
    );
    assert_matches!(
        manager.sign_petition(Uuid::new_v4(), petition.id).await,
        Err(CoreError::PetitionNotAvailable { .. })
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_concurrent_signers_keep_counter_consistent(pool: PgPool) {
    let manager = PetitionManager::with_role_authority(pool.clone());
    let petition = manager
        .create_petition(Uuid::new_v4(), Uuid::new_v4(), "Crowded", "")
        .await
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.sign_petition(Uuid::new_v4(), petition.id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = manager.get_petition(petition.id).await.unwrap();
    let rows = SignaturesQuery::new()
        .filter_petition_id(petition.id)
        .count(&pool)
        .await
        .unwrap();
    assert_eq!(stored.signatures, 8);
    assert_eq!(rows, 8);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_concurrent_duplicate_signs_admit_exactly_one(pool: PgPool) {
    let manager = PetitionManager::with_role_authority(pool);
    let petition = manager
        .create_petition(Uuid::new_v4(), Uuid::new_v4(), "Once", "")
        .await
        .unwrap();
    let user = Uuid::new_v4();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.sign_petition(user, petition.id).await })
        })
        .collect();

    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(err) => assert_matches!(err, CoreError::SignatureAlreadyExists { .. }),
        }
    }
    assert_eq!(ok, 1);

    let (items, page) = manager
        .list_signatures(
            &SignatureFilter {
                petition_id: Some(petition.id),
                user_id: None,
            },
            Default::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(page.total, 1);
    assert_eq!(manager.get_petition(petition.id).await.unwrap().signatures, 1);
}
