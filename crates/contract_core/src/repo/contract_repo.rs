//! Contract repository contract and SQLite implementation.

use crate::model::contract::{normalize_description, Contract, ContractId};
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{Connection, OptionalExtension};

/// Repository interface for contract rows.
pub trait ContractRepository {
    /// Inserts a contract and returns it with its storage-assigned id.
    fn create_contract(&self, description: &str) -> RepoResult<Contract>;
    fn get_contract(&self, id: ContractId) -> RepoResult<Option<Contract>>;
    /// Returns every contract ordered by id.
    fn list_contracts(&self) -> RepoResult<Vec<Contract>>;
}

/// SQLite-backed contract repository.
pub struct SqliteContractRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContractRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["contracts"])?;
        Ok(Self { conn })
    }
}

impl ContractRepository for SqliteContractRepository<'_> {
    fn create_contract(&self, description: &str) -> RepoResult<Contract> {
        let description = normalize_description(description)?;
        self.conn.execute(
            "INSERT INTO contracts (description) VALUES (?1);",
            [description.as_str()],
        )?;

        Ok(Contract {
            id: self.conn.last_insert_rowid(),
            description,
        })
    }

    fn get_contract(&self, id: ContractId) -> RepoResult<Option<Contract>> {
        let contract = self
            .conn
            .query_row(
                "SELECT id, description FROM contracts WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Contract {
                        id: row.get(0)?,
                        description: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(contract)
    }

    fn list_contracts(&self) -> RepoResult<Vec<Contract>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, description FROM contracts ORDER BY id ASC;")?;
        let contracts = stmt
            .query_map([], |row| {
                Ok(Contract {
                    id: row.get(0)?,
                    description: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contracts)
    }
}
