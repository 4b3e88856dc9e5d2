//! Authorization seam for petition moderation.
//!
//! Approving or rejecting a petition is reserved for city-government actors.
//! The decision is delegated to a [`ModerationAuthority`] so deployments can
//! plug in a lookup against an external city service; [`RoleAuthority`] is the
//! token-role based default.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::roles::MODERATOR_ROLES;
use crate::types::DbId;

/// The verified identity of the caller, as supplied by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: String,
}

#[async_trait]
pub trait ModerationAuthority: Send + Sync {
    /// Succeed if `actor` may moderate petitions of `city_id`, otherwise
    /// fail with [`CoreError::RoleIsNotApplicable`].
    async fn authorize(&self, actor: &Actor, city_id: DbId) -> Result<(), CoreError>;
}

/// Admits any actor whose role is in the configured allow-list, for every city.
#[derive(Debug, Clone)]
pub struct RoleAuthority {
    roles: Vec<String>,
}

impl RoleAuthority {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for RoleAuthority {
    fn default() -> Self {
        Self::new(MODERATOR_ROLES.iter().copied())
    }
}

#[async_trait]
impl ModerationAuthority for RoleAuthority {
    async fn authorize(&self, actor: &Actor, _city_id: DbId) -> Result<(), CoreError> {
        if self.roles.iter().any(|r| *r == actor.role) {
            Ok(())
        } else {
            Err(CoreError::RoleIsNotApplicable {
                user_id: actor.user_id,
                role: actor.role.clone(),
            })
        }
    }
}
