//! Query-string parameters for the listing endpoints and ID parsing helpers.
//!
//! IDs arrive as strings everywhere (paths, query strings, bodies) so a
//! malformed value can be reported as `INVALID_ARGUMENT` naming the field,
//! instead of a generic decoding failure.

use petitions_core::error::CoreError;
use petitions_core::listing::{PetitionFilter, PetitionSort, SignatureFilter, SignatureSort};
use petitions_core::pagination::PageRequest;
use petitions_core::types::DbId;
use serde::Deserialize;
use uuid::Uuid;

/// `GET /petitions` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListPetitionsParams {
    pub city_id: Option<String>,
    pub creator_id: Option<String>,
    pub title_like: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub rejected: bool,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub expired: bool,
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListPetitionsParams {
    pub fn into_request(self) -> Result<(PetitionFilter, PetitionSort, PageRequest), CoreError> {
        let filter = PetitionFilter {
            city_id: parse_optional_uuid("city_id", self.city_id.as_deref())?,
            creator_id: parse_optional_uuid("creator_id", self.creator_id.as_deref())?,
            title_like: self.title_like.filter(|t| !t.trim().is_empty()),
            approved: self.approved,
            rejected: self.rejected,
            available: self.available,
            expired: self.expired,
        };
        let sort = match non_empty(self.sort.as_deref()) {
            Some(raw) => raw.parse()?,
            None => PetitionSort::default(),
        };
        Ok((filter, sort, PageRequest::new(self.page, self.size)))
    }
}

/// `GET /signatures` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListSignaturesParams {
    pub petition_id: Option<String>,
    pub user_id: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListSignaturesParams {
    pub fn into_request(
        self,
    ) -> Result<(SignatureFilter, SignatureSort, PageRequest), CoreError> {
        let filter = SignatureFilter {
            petition_id: parse_optional_uuid("petition_id", self.petition_id.as_deref())?,
            user_id: parse_optional_uuid("user_id", self.user_id.as_deref())?,
        };
        let sort = match non_empty(self.sort.as_deref()) {
            Some(raw) => raw.parse()?,
            None => SignatureSort::default(),
        };
        Ok((filter, sort, PageRequest::new(self.page, self.size)))
    }
}

/// Parse a required UUID, naming `field` on failure.
pub fn parse_uuid(field: &'static str, raw: &str) -> Result<DbId, CoreError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CoreError::invalid_argument(field, format!("'{raw}' is not a valid UUID")))
}

/// Parse an optional UUID. Absent and blank values are both `None`.
pub fn parse_optional_uuid(field: &'static str, raw: Option<&str>) -> Result<Option<DbId>, CoreError> {
    non_empty(raw).map(|s| parse_uuid(field, s)).transpose()
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn blank_values_are_absent() {
        let params = ListPetitionsParams {
            city_id: Some(String::new()),
            creator_id: Some("  ".into()),
            title_like: Some(String::new()),
            ..Default::default()
        };
        let (filter, sort, page) = params.into_request().unwrap();
        assert_eq!(filter, PetitionFilter::default());
        assert_eq!(sort, PetitionSort::Newest);
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn title_fragment_keeps_its_spaces() {
        let params = ListPetitionsParams {
            title_like: Some(" park ".into()),
            ..Default::default()
        };
        let (filter, _, _) = params.into_request().unwrap();
        assert_eq!(filter.title_like.as_deref(), Some(" park "));
    }

    #[test]
    fn malformed_uuid_names_the_field() {
        let params = ListPetitionsParams {
            creator_id: Some("not-a-uuid".into()),
            ..Default::default()
        };
        assert_matches!(
            params.into_request(),
            Err(CoreError::InvalidArgument { field: "creator_id", .. })
        );
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let params = ListSignaturesParams {
            sort: Some("most_signatures".into()),
            ..Default::default()
        };
        assert_matches!(
            params.into_request(),
            Err(CoreError::InvalidArgument { field: "sort", .. })
        );
    }

    #[test]
    fn signature_params_parse_both_ids() {
        let petition = Uuid::new_v4();
        let user = Uuid::new_v4();
        let params = ListSignaturesParams {
            petition_id: Some(petition.to_string()),
            user_id: Some(user.to_string()),
            sort: Some("oldest".into()),
            page: Some(2),
            size: Some(5),
        };
        let (filter, sort, page) = params.into_request().unwrap();
        assert_eq!(filter.petition_id, Some(petition));
        assert_eq!(filter.user_id, Some(user));
        assert_eq!(sort, SignatureSort::Oldest);
        assert_eq!(page.limit_offset(), (5, 5));
    }
}
