//! Credential repository contract and SQLite implementation.
//!
//! # Invariants
//! - `save` validates the credential before any SQL mutation.
//! - `login` is unique at the storage level.
//! - Credentials are removed with their person (`ON DELETE CASCADE`).

use crate::model::credential::{Credential, CredentialId};
use crate::model::person::PersonId;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CREDENTIAL_SELECT_SQL: &str = "SELECT id, login, password, person_id FROM credentials";

/// Repository interface for credential persistence.
pub trait CredentialRepository {
    /// Inserts when `credential.id` is `None`, otherwise updates in place.
    fn save(&self, credential: &Credential) -> RepoResult<Credential>;
    fn find_by_login(&self, login: &str) -> RepoResult<Option<Credential>>;
    /// Returns the number of deleted rows.
    fn delete_by_login(&self, login: &str) -> RepoResult<usize>;
    /// Returns the number of deleted rows.
    fn delete_by_person_id(&self, person_id: PersonId) -> RepoResult<usize>;
}

/// SQLite-backed credential repository.
pub struct SqliteCredentialRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCredentialRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["persons", "credentials"])?;
        Ok(Self { conn })
    }
}

impl CredentialRepository for SqliteCredentialRepository<'_> {
    fn save(&self, credential: &Credential) -> RepoResult<Credential> {
        credential.validate()?;

        let id: CredentialId = match credential.id {
            None => {
                self.conn.execute(
                    "INSERT INTO credentials (login, password, person_id) VALUES (?1, ?2, ?3);",
                    params![
                        credential.login.as_str(),
                        credential.password.as_str(),
                        credential.person_id,
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE credentials
                     SET login = ?1, password = ?2, person_id = ?3
                     WHERE id = ?4;",
                    params![
                        credential.login.as_str(),
                        credential.password.as_str(),
                        credential.person_id,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::CredentialNotFound(id));
                }
                id
            }
        };

        let mut stored = credential.clone();
        stored.id = Some(id);
        Ok(stored)
    }

    fn find_by_login(&self, login: &str) -> RepoResult<Option<Credential>> {
        let credential = self
            .conn
            .query_row(
                &format!("{CREDENTIAL_SELECT_SQL} WHERE login = ?1;"),
                [login],
                parse_credential_row,
            )
            .optional()?;
        Ok(credential)
    }

    fn delete_by_login(&self, login: &str) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM credentials WHERE login = ?1;", [login])?;
        Ok(changed)
    }

    fn delete_by_person_id(&self, person_id: PersonId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM credentials WHERE person_id = ?1;", [person_id])?;
        Ok(changed)
    }
}

fn parse_credential_row(row: &Row<'_>) -> rusqlite::Result<Credential> {
    Ok(Credential {
        id: Some(row.get("id")?),
        login: row.get("login")?,
        password: row.get("password")?,
        person_id: row.get("person_id")?,
    })
}
