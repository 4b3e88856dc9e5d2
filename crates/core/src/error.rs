use crate::types::DbId;

/// Stable machine-readable reason strings attached to every error response.
pub mod reason {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const PETITION_NOT_FOUND: &str = "PETITION_NOT_FOUND";
    pub const PETITION_IS_NOT_AVAILABLE: &str = "PETITION_IS_NOT_AVAILABLE";
    pub const PETITION_SIGNATURES_NOT_FOUND: &str = "PETITION_SIGNATURES_NOT_FOUND";
    pub const PETITION_SIGNATURES_ALREADY_EXISTS: &str = "PETITION_SIGNATURES_ALREADY_EXISTS";
    pub const INVALID_PETITION_STATUS: &str = "INVALID_PETITION_STATUS";
    pub const ROLE_IS_NOT_APPLICABLE: &str = "ROLE_IS_NOT_APPLICABLE";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{field} is invalid: {message}")]
    InvalidArgument { field: &'static str, message: String },

    #[error("Petition with id '{id}' not found")]
    PetitionNotFound { id: DbId },

    #[error("Petition with id '{id}' is not available")]
    PetitionNotAvailable { id: DbId },

    #[error("Petition signature with id '{id}' not found")]
    SignatureNotFound { id: DbId },

    #[error("Petition signature for petition '{petition_id}' and user '{user_id}' not found")]
    SignatureNotFoundForUser { petition_id: DbId, user_id: DbId },

    #[error("Petition signature for petition '{petition_id}' and user '{user_id}' already exists")]
    SignatureAlreadyExists { petition_id: DbId, user_id: DbId },

    #[error("Invalid petition status '{0}'")]
    InvalidPetitionStatus(String),

    #[error("Role is not applicable: user={user_id} role={role}")]
    RoleIsNotApplicable { user_id: DbId, role: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for an [`CoreError::InvalidArgument`] naming the offending field.
    pub fn invalid_argument(field: &'static str, message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field,
            message: message.into(),
        }
    }

    /// The stable reason string for this error kind.
    pub fn reason(&self) -> &'static str {
        match self {
            CoreError::InvalidArgument { .. } => reason::INVALID_ARGUMENT,
            CoreError::PetitionNotFound { .. } => reason::PETITION_NOT_FOUND,
            CoreError::PetitionNotAvailable { .. } => reason::PETITION_IS_NOT_AVAILABLE,
            CoreError::SignatureNotFound { .. } | CoreError::SignatureNotFoundForUser { .. } => {
                reason::PETITION_SIGNATURES_NOT_FOUND
            }
            CoreError::SignatureAlreadyExists { .. } => reason::PETITION_SIGNATURES_ALREADY_EXISTS,
            CoreError::InvalidPetitionStatus(_) => reason::INVALID_PETITION_STATUS,
            CoreError::RoleIsNotApplicable { .. } => reason::ROLE_IS_NOT_APPLICABLE,
            CoreError::Unauthorized(_) => reason::UNAUTHENTICATED,
            CoreError::Internal(_) => reason::INTERNAL_ERROR,
        }
    }
}
