//! Core domain logic for the contract registry.
//! This crate is the single source of truth for person/contract invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use logging::{
    default_log_level, flush_logging, init_from_config, init_logging, logging_status,
};
pub use model::contract::{Contract, ContractId, ContractValidationError};
pub use model::credential::{Credential, CredentialId, CredentialValidationError};
pub use model::person::{Person, PersonId, PersonRole, PersonValidationError, UNSAVED_PERSON_ID};
pub use repo::contract_repo::{ContractRepository, SqliteContractRepository};
pub use repo::credential_repo::{CredentialRepository, SqliteCredentialRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use service::contract_service::ContractService;
pub use service::credential_service::{CredentialService, CredentialServiceError};
pub use service::person_service::{PersonService, PersonServiceError, PersonServiceResult};

/// Returns the core crate version reported by the CLI `--version` flag.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
