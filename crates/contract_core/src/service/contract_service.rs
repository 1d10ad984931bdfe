//! Contract registry use-case service.

use crate::model::contract::{Contract, ContractId};
use crate::repo::contract_repo::ContractRepository;
use crate::repo::RepoResult;
use log::info;

/// Thin facade over [`ContractRepository`].
pub struct ContractService<R: ContractRepository> {
    repo: R,
}

impl<R: ContractRepository> ContractService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a contract. Blank descriptions are rejected by the repository.
    pub fn create_contract(&self, description: &str) -> RepoResult<Contract> {
        let contract = self.repo.create_contract(description)?;
        info!(
            "event=contract_create module=service status=ok contract_id={}",
            contract.id
        );
        Ok(contract)
    }

    pub fn get_contract(&self, id: ContractId) -> RepoResult<Option<Contract>> {
        self.repo.get_contract(id)
    }

    pub fn list_contracts(&self) -> RepoResult<Vec<Contract>> {
        self.repo.list_contracts()
    }
}
