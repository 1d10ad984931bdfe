//! Credential use-case service.
//!
//! # Responsibility
//! - Issue, look up and revoke login credentials for existing persons.
//!
//! # Invariants
//! - Logins are trimmed, non-empty and unique.
//! - Passwords are opaque here; hashing belongs to the caller.
//! - Log events never carry login or password values.

use crate::model::credential::Credential;
use crate::model::person::PersonId;
use crate::repo::credential_repo::CredentialRepository;
use crate::repo::person_repo::PersonRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from credential service operations.
#[derive(Debug)]
pub enum CredentialServiceError {
    InvalidInput(String),
    DuplicateLogin(String),
    PersonNotFound(PersonId),
    CredentialNotFound(String),
    Repo(RepoError),
}

impl Display for CredentialServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid credential input: {message}"),
            Self::DuplicateLogin(login) => write!(f, "login already in use: `{login}`"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::CredentialNotFound(login) => write!(f, "credential not found: `{login}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CredentialServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CredentialServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PersonNotFound(id) => Self::PersonNotFound(id),
            RepoError::CredentialValidation(err) => Self::InvalidInput(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

/// Credential service facade over credential and person repositories.
pub struct CredentialService<C: CredentialRepository, P: PersonRepository> {
    credentials: C,
    persons: P,
}

impl<C: CredentialRepository, P: PersonRepository> CredentialService<C, P> {
    pub fn new(credentials: C, persons: P) -> Self {
        Self {
            credentials,
            persons,
        }
    }

    /// Creates a credential bound to an existing person.
    pub fn issue_credential(
        &self,
        person_id: PersonId,
        login: &str,
        password: &str,
    ) -> Result<Credential, CredentialServiceError> {
        let login = normalize_login(login)?;
        let credential = Credential::new(person_id, login, password);
        credential.validate().map_err(RepoError::from)?;
        if !self.persons.exists_by_id(person_id)? {
            return Err(CredentialServiceError::PersonNotFound(person_id));
        }
        if self.credentials.find_by_login(&credential.login)?.is_some() {
            return Err(CredentialServiceError::DuplicateLogin(credential.login));
        }

        let stored = self.credentials.save(&credential)?;
        info!(
            "event=credential_issue module=service status=ok person_id={person_id} credential_id={}",
            stored.id.unwrap_or_default()
        );
        Ok(stored)
    }

    /// Looks up a credential by login.
    pub fn find_by_login(&self, login: &str) -> Result<Option<Credential>, CredentialServiceError> {
        let login = normalize_login(login)?;
        Ok(self.credentials.find_by_login(&login)?)
    }

    /// Deletes the credential with `login`.
    pub fn revoke_by_login(&self, login: &str) -> Result<(), CredentialServiceError> {
        let login = normalize_login(login)?;
        if self.credentials.delete_by_login(&login)? == 0 {
            return Err(CredentialServiceError::CredentialNotFound(login));
        }
        info!("event=credential_revoke module=service status=ok scope=login");
        Ok(())
    }

    /// Deletes every credential of one person and returns how many were removed.
    pub fn revoke_for_person(&self, person_id: PersonId) -> Result<usize, CredentialServiceError> {
        let removed = self.credentials.delete_by_person_id(person_id)?;
        info!(
            "event=credential_revoke module=service status=ok scope=person person_id={person_id} removed={removed}"
        );
        Ok(removed)
    }
}

fn normalize_login(login: &str) -> Result<String, CredentialServiceError> {
    let trimmed = login.trim();
    if trimmed.is_empty() {
        return Err(CredentialServiceError::InvalidInput(
            "login must not be blank".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
