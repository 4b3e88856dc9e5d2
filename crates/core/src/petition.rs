//! Petition status machine and creation defaults.
//!
//! A petition starts `published` and is moved to `approved` or `rejected` by
//! a moderator. Whether a published petition is still collecting signatures
//! is decided by its end date, not by a separate status.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Signature goal assigned to every new petition.
pub const DEFAULT_SIGNATURE_GOAL: i32 = 10_000;

/// Number of days a new petition stays open for signing.
pub const DEFAULT_DURATION_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetitionStatus {
    Published,
    Approved,
    Rejected,
}

impl PetitionStatus {
    pub const ALL: [PetitionStatus; 3] = [
        PetitionStatus::Published,
        PetitionStatus::Approved,
        PetitionStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PetitionStatus::Published => "published",
            PetitionStatus::Approved => "approved",
            PetitionStatus::Rejected => "rejected",
        }
    }

    /// Approved and rejected petitions receive no further moderation in the
    /// normal flow.
    pub fn is_terminal(self) -> bool {
        !matches!(self, PetitionStatus::Published)
    }
}

impl fmt::Display for PetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetitionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PetitionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::InvalidPetitionStatus(s.to_string()))
    }
}

// Used by `#[sqlx(try_from = "String")]` on the row structs.
impl TryFrom<String> for PetitionStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// End date of a petition created at `now`.
pub fn default_end_date(now: Timestamp) -> Timestamp {
    now + Duration::days(DEFAULT_DURATION_DAYS)
}

/// A petition can be signed while it is published and its end date lies
/// strictly in the future.
pub fn is_available(status: PetitionStatus, end_date: Timestamp, now: Timestamp) -> bool {
    status == PetitionStatus::Published && end_date > now
}
