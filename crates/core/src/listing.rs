//! Listing request objects for petitions and signatures.
//!
//! These describe *which* rows a caller wants in domain terms ("available",
//! "expired"). The translation into storage predicates happens here and in
//! the query engine of `petitions-db`, nowhere else.

use std::str::FromStr;

use crate::error::CoreError;
use crate::petition::PetitionStatus;
use crate::types::{DbId, Timestamp};

/// Filters for petition listing. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetitionFilter {
    pub city_id: Option<DbId>,
    pub creator_id: Option<DbId>,
    /// Case-insensitive substring match on the title.
    pub title_like: Option<String>,
    pub approved: bool,
    pub rejected: bool,
    /// Published petitions whose end date has not passed.
    pub available: bool,
    /// Published petitions whose end date has passed.
    pub expired: bool,
}

/// Restriction on `end_date` relative to the time of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDateBound {
    /// `end_date > t`
    After(Timestamp),
    /// `end_date < t`
    Before(Timestamp),
}

impl PetitionFilter {
    /// Union of the statuses selected by the flags. Empty means "no status
    /// filter".
    pub fn status_set(&self) -> Vec<PetitionStatus> {
        let mut statuses = Vec::with_capacity(3);
        if self.approved {
            statuses.push(PetitionStatus::Approved);
        }
        if self.rejected {
            statuses.push(PetitionStatus::Rejected);
        }
        if self.available || self.expired {
            statuses.push(PetitionStatus::Published);
        }
        statuses
    }

    /// End-date restriction implied by the availability flags.
    ///
    /// Both flags set (or neither) means both subsets are wanted, so no
    /// restriction applies.
    pub fn end_date_bound(&self, now: Timestamp) -> Option<EndDateBound> {
        match (self.available, self.expired) {
            (true, false) => Some(EndDateBound::After(now)),
            (false, true) => Some(EndDateBound::Before(now)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetitionSort {
    #[default]
    Newest,
    Oldest,
    MostSignatures,
    LeastSignatures,
}

impl FromStr for PetitionSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(PetitionSort::Newest),
            "oldest" => Ok(PetitionSort::Oldest),
            "most_signatures" => Ok(PetitionSort::MostSignatures),
            "least_signatures" => Ok(PetitionSort::LeastSignatures),
            other => Err(CoreError::invalid_argument(
                "sort",
                format!(
                    "unknown sort '{other}', expected one of: newest, oldest, \
                     most_signatures, least_signatures"
                ),
            )),
        }
    }
}

/// Filters for signature listing. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureFilter {
    pub petition_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureSort {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SignatureSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SignatureSort::Newest),
            "oldest" => Ok(SignatureSort::Oldest),
            other => Err(CoreError::invalid_argument(
                "sort",
                format!("unknown sort '{other}', expected one of: newest, oldest"),
            )),
        }
    }
}
