//! Well-known role name constants carried in access-token claims.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CITY_OFFICIAL: &str = "city_official";
pub const ROLE_CITIZEN: &str = "citizen";

/// Roles allowed to approve or reject petitions by default.
pub const MODERATOR_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CITY_OFFICIAL];
