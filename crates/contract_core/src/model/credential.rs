//! Credential domain model.
//!
//! # Invariants
//! - `login` is trimmed and non-empty; it is unique across credentials.
//! - `password` is stored opaquely and never logged.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned surrogate identifier of a credential.
pub type CredentialId = i64;

/// Field-level validation failures for [`Credential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    BlankLogin,
    /// Login has leading or trailing whitespace.
    UntrimmedLogin,
    EmptyPassword,
}

impl Display for CredentialValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankLogin => write!(f, "login must not be blank"),
            Self::UntrimmedLogin => write!(f, "login must not start or end with whitespace"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl Error for CredentialValidationError {}

/// Login/password pair bound to one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// `None` before the first save.
    pub id: Option<CredentialId>,
    pub login: String,
    /// Skipped on serialization so it never leaves the process in JSON output.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub person_id: PersonId,
}

impl Credential {
    /// Creates an unsaved credential.
    pub fn new(person_id: PersonId, login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            login: login.into(),
            password: password.into(),
            person_id,
        }
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        if self.login.trim().is_empty() {
            return Err(CredentialValidationError::BlankLogin);
        }
        if self.login.trim() != self.login {
            return Err(CredentialValidationError::UntrimmedLogin);
        }
        if self.password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Credential, CredentialValidationError};

    #[test]
    fn validate_checks_login_and_password() {
        assert_eq!(Credential::new(1, "ana", "x").validate(), Ok(()));
        assert_eq!(
            Credential::new(1, "  ", "x").validate(),
            Err(CredentialValidationError::BlankLogin)
        );
        assert_eq!(
            Credential::new(1, " ana", "x").validate(),
            Err(CredentialValidationError::UntrimmedLogin)
        );
        assert_eq!(
            Credential::new(1, "ana", "").validate(),
            Err(CredentialValidationError::EmptyPassword)
        );
    }
}
