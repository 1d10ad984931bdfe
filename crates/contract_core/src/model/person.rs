//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical person record and its role enum.
//! - Provide field validation used by repository write paths.
//!
//! # Invariants
//! - `id` is `None` until storage assigns one, then never changes.
//! - `name` is non-blank and `password` is non-empty.
//! - Equality and hashing consider `name`, `role` and `password` only.

use crate::model::contract::ContractId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Storage-assigned surrogate identifier of a person.
pub type PersonId = i64;

/// Id reported for records that were never saved. Storage sequences start
/// at 1, so no stored person carries it.
pub const UNSAVED_PERSON_ID: PersonId = 0;

/// Function a person performs in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    /// Manages contracts and other persons.
    Admin,
    /// Holds contracts and pays for them.
    Client,
}

impl PersonRole {
    /// Stable lowercase name used in storage and CLI input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client => "client",
        }
    }

    /// Parses the lowercase storage name. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "client" => Some(Self::Client),
            _ => None,
        }
    }
}

impl Display for PersonRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failures for [`Person`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// Name is empty or whitespace only.
    BlankName,
    /// Password is empty.
    EmptyPassword,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "person name must not be blank"),
            Self::EmptyPassword => write!(f, "person password must not be empty"),
        }
    }
}

impl Error for PersonValidationError {}

/// Canonical person record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Surrogate id. `None` before the first save.
    pub id: Option<PersonId>,
    pub name: String,
    pub role: PersonRole,
    /// Opaque secret. Hashing happens outside core.
    pub password: String,
    /// Changed only through the dedicated toggle operation.
    #[serde(default)]
    pub payment_status: bool,
    /// Contracts owned by this person.
    #[serde(default)]
    pub contracts: BTreeSet<ContractId>,
}

impl Person {
    /// Creates an unsaved person with payment pending and no contracts.
    pub fn new(name: impl Into<String>, role: PersonRole, password: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            role,
            password: password.into(),
            payment_status: false,
            contracts: BTreeSet::new(),
        }
    }

    /// Checks field-level invariants.
    ///
    /// # Errors
    /// - [`PersonValidationError::BlankName`] when `name` trims to empty.
    /// - [`PersonValidationError::EmptyPassword`] when `password` is empty.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::BlankName);
        }
        if self.password.is_empty() {
            return Err(PersonValidationError::EmptyPassword);
        }
        Ok(())
    }

    /// Returns whether this record already has a storage identity.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Storage id, or [`UNSAVED_PERSON_ID`] for unsaved records.
    pub fn id_or_unsaved(&self) -> PersonId {
        self.id.unwrap_or(UNSAVED_PERSON_ID)
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.role == other.role && self.password == other.password
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.role.hash(state);
        self.password.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonRole, PersonValidationError};
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_identity_and_mutable_state() {
        let mut left = Person::new("Ana", PersonRole::Client, "x");
        let mut right = Person::new("Ana", PersonRole::Client, "x");
        left.id = Some(1);
        right.id = Some(2);
        right.payment_status = true;
        right.contracts.insert(9);

        assert_eq!(left, right);

        let set: HashSet<Person> = [left, right].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn equality_detects_role_change() {
        let client = Person::new("Ana", PersonRole::Client, "x");
        let admin = Person::new("Ana", PersonRole::Admin, "x");
        assert_ne!(client, admin);
    }

    #[test]
    fn validate_rejects_whitespace_name() {
        let person = Person::new("   ", PersonRole::Admin, "secret");
        assert_eq!(person.validate(), Err(PersonValidationError::BlankName));
    }

    #[test]
    fn role_names_roundtrip_through_parse() {
        for role in [PersonRole::Admin, PersonRole::Client] {
            assert_eq!(PersonRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(PersonRole::parse("CLIENT"), None);
    }
}
