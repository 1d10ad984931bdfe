//! Person use-case service.
//!
//! # Responsibility
//! - Enforce registration, removal and edit rules above the repository.
//! - Manage which person owns which contract.
//!
//! # Invariants
//! - Registration requires an absent id and a name not yet in storage.
//! - Payment status changes only through `toggle_payment_status`; every other
//!   edit goes through `edit_person`, which rejects a changed flag.
//! - A contract is owned by at most one person.
//! - Renames do not re-check name uniqueness; collisions are logged only.

use crate::model::contract::{Contract, ContractId};
use crate::model::person::{Person, PersonId};
use crate::repo::person_repo::PersonRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from person service operations.
#[derive(Debug)]
pub enum PersonServiceError {
    /// Input is malformed: caller-chosen id or failed field validation.
    InvalidInput(String),
    /// Another person already uses this name.
    DuplicateName(String),
    /// No person with this id exists.
    PersonNotFound(PersonId),
    /// A generic edit tried to change the payment flag.
    PaymentStatusImmutable { person_id: PersonId },
    /// No person owns the contract.
    ContractNotAssigned(ContractId),
    /// Contract is owned by someone else.
    ContractAlreadyAssigned {
        contract_id: ContractId,
        owner_id: PersonId,
    },
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for PersonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid person input: {message}"),
            Self::DuplicateName(name) => write!(f, "person already exists: `{name}`"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::PaymentStatusImmutable { person_id } => write!(
                f,
                "payment status of person {person_id} can only change through the toggle operation"
            ),
            Self::ContractNotAssigned(id) => write!(f, "contract {id} is not assigned to any person"),
            Self::ContractAlreadyAssigned {
                contract_id,
                owner_id,
            } => write!(
                f,
                "contract {contract_id} is already assigned to person {owner_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PersonServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PersonNotFound(id) => Self::PersonNotFound(id),
            RepoError::PersonValidation(err) => Self::InvalidInput(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

pub type PersonServiceResult<T> = Result<T, PersonServiceError>;

/// Person service facade over repository implementations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new person and returns the stored record.
    ///
    /// # Errors
    /// - `InvalidInput` when `person.id` is set or fields fail validation.
    /// - `DuplicateName` when a person with the same name exists.
    pub fn register_person(&self, person: &Person) -> PersonServiceResult<Person> {
        if person.is_persisted() {
            return Err(PersonServiceError::InvalidInput(
                "id is assigned by storage and must be empty on registration".to_string(),
            ));
        }
        if self.repo.exists_by_name(&person.name)? {
            info!("event=person_register module=service status=rejected reason=duplicate_name");
            return Err(PersonServiceError::DuplicateName(person.name.clone()));
        }

        let stored = self.repo.save(person)?;
        info!(
            "event=person_register module=service status=ok person_id={} role={}",
            stored.id.unwrap_or_default(),
            stored.role
        );
        Ok(stored)
    }

    /// Flips the payment flag of one person and returns the stored record.
    pub fn toggle_payment_status(&self, id: PersonId) -> PersonServiceResult<Person> {
        let mut person = self.require_person(id)?;
        person.payment_status = !person.payment_status;

        let stored = self.repo.save(&person)?;
        info!(
            "event=person_toggle_payment module=service status=ok person_id={id} payment_status={}",
            stored.payment_status
        );
        Ok(stored)
    }

    /// Deletes one person. Contract links and credentials go with it.
    pub fn remove_person(&self, id: PersonId) -> PersonServiceResult<()> {
        if !self.repo.exists_by_id(id)? {
            return Err(PersonServiceError::PersonNotFound(id));
        }
        self.repo.delete_by_id(id)?;
        info!("event=person_remove module=service status=ok person_id={id}");
        Ok(())
    }

    /// Lists every person in storage order.
    pub fn list_persons(&self) -> PersonServiceResult<Vec<Person>> {
        Ok(self.repo.find_all()?)
    }

    /// Gets one person by id.
    pub fn get_person(&self, id: PersonId) -> PersonServiceResult<Option<Person>> {
        Ok(self.repo.find_by_id(id)?)
    }

    /// Replaces the name of one person.
    ///
    /// Uniqueness is not re-checked here; see module invariants.
    pub fn rename_person(
        &self,
        id: PersonId,
        name: impl Into<String>,
    ) -> PersonServiceResult<Person> {
        let name = name.into();
        let mut person = self.require_person(id)?;

        if person.name != name && self.repo.exists_by_name(&name)? {
            warn!("event=person_rename module=service status=warn person_id={id} reason=name_collision");
        }

        person.name = name;
        let stored = self.repo.save(&person)?;
        info!("event=person_rename module=service status=ok person_id={id}");
        Ok(stored)
    }

    /// Adds a contract reference to the person with `person_id`.
    ///
    /// Re-adding a contract the person already owns is a no-op save.
    pub fn add_contract(
        &self,
        contract: &Contract,
        person_id: PersonId,
    ) -> PersonServiceResult<Person> {
        let mut person = self.require_person(person_id)?;

        if let Some(owner) = self.repo.find_by_contracts_containing(contract.id)? {
            let owner_id = owner.id.unwrap_or_default();
            if owner_id != person_id {
                return Err(PersonServiceError::ContractAlreadyAssigned {
                    contract_id: contract.id,
                    owner_id,
                });
            }
        }

        person.contracts.insert(contract.id);
        let stored = self.edit_person(&person)?;
        info!(
            "event=contract_assign module=service status=ok person_id={person_id} contract_id={}",
            contract.id
        );
        Ok(stored)
    }

    /// Removes a contract reference from whichever person owns it.
    pub fn remove_contract(&self, contract: &Contract) -> PersonServiceResult<Person> {
        let mut person = self
            .repo
            .find_by_contracts_containing(contract.id)?
            .ok_or(PersonServiceError::ContractNotAssigned(contract.id))?;

        person.contracts.remove(&contract.id);
        let stored = self.edit_person(&person)?;
        info!(
            "event=contract_unassign module=service status=ok person_id={} contract_id={}",
            stored.id.unwrap_or_default(),
            contract.id
        );
        Ok(stored)
    }

    /// Persists a full record after the existence and payment-flag checks.
    ///
    /// An unsaved record has no stored counterpart and fails as not found.
    fn edit_person(&self, person: &Person) -> PersonServiceResult<Person> {
        let id = person.id_or_unsaved();
        let stored = self.require_person(id)?;

        if stored.payment_status != person.payment_status {
            warn!("event=person_edit module=service status=rejected person_id={id} reason=payment_status_changed");
            return Err(PersonServiceError::PaymentStatusImmutable { person_id: id });
        }

        Ok(self.repo.save(person)?)
    }

    fn require_person(&self, id: PersonId) -> PersonServiceResult<Person> {
        self.repo
            .find_by_id(id)?
            .ok_or(PersonServiceError::PersonNotFound(id))
    }
}
