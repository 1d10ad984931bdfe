//! Person repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist person rows together with their contract links.
//! - Answer existence, uniqueness and ownership lookups.
//!
//! # Invariants
//! - `save` validates the record before any SQL mutation.
//! - Row and contract links are written in one transaction.
//! - Contract ownership is resolved through `person_contracts.contract_id`
//!   (primary key), never by scanning persons.

use crate::model::contract::ContractId;
use crate::model::person::{Person, PersonId, PersonRole};
use crate::repo::{bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::collections::{BTreeMap, BTreeSet};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    name,
    role,
    password,
    payment_status
FROM persons";

const REQUIRED_TABLES: &[&str] = &["persons", "contracts", "person_contracts"];

/// Repository interface for person persistence.
pub trait PersonRepository {
    /// Inserts when `person.id` is `None`, otherwise replaces the stored row
    /// and contract set. Returns the stored record with its id.
    fn save(&self, person: &Person) -> RepoResult<Person>;
    fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn exists_by_id(&self, id: PersonId) -> RepoResult<bool>;
    /// Exact, case-sensitive name match.
    fn exists_by_name(&self, name: &str) -> RepoResult<bool>;
    fn delete_by_id(&self, id: PersonId) -> RepoResult<()>;
    /// Returns every person ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Person>>;
    /// Returns the person whose contract set contains `contract_id`.
    fn find_by_contracts_containing(&self, contract_id: ContractId)
        -> RepoResult<Option<Person>>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn save(&self, person: &Person) -> RepoResult<Person> {
        person.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let id = match person.id {
            None => {
                tx.execute(
                    "INSERT INTO persons (name, role, password, payment_status)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        person.name.as_str(),
                        person.role.as_str(),
                        person.password.as_str(),
                        bool_to_int(person.payment_status),
                    ],
                )?;
                tx.last_insert_rowid()
            }
            Some(id) => {
                let changed = tx.execute(
                    "UPDATE persons
                     SET
                        name = ?1,
                        role = ?2,
                        password = ?3,
                        payment_status = ?4
                     WHERE id = ?5;",
                    params![
                        person.name.as_str(),
                        person.role.as_str(),
                        person.password.as_str(),
                        bool_to_int(person.payment_status),
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::PersonNotFound(id));
                }
                id
            }
        };

        replace_contract_links(&tx, id, &person.contracts)?;
        tx.commit()?;

        let mut stored = person.clone();
        stored.id = Some(id);
        Ok(stored)
    }

    fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut person = parse_person_row(row)?;
        person.contracts = load_contracts_for_person(self.conn, id)?;
        Ok(Some(person))
    }

    fn exists_by_id(&self, id: PersonId) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM persons WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM persons WHERE name = ?1);",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn delete_by_id(&self, id: PersonId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM persons WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::PersonNotFound(id));
        }
        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<Person>> {
        let mut links = load_all_contract_links(self.conn)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            let mut person = parse_person_row(row)?;
            if let Some(id) = person.id {
                person.contracts = links.remove(&id).unwrap_or_default();
            }
            persons.push(person);
        }

        Ok(persons)
    }

    fn find_by_contracts_containing(
        &self,
        contract_id: ContractId,
    ) -> RepoResult<Option<Person>> {
        let owner: Option<PersonId> = self
            .conn
            .query_row(
                "SELECT person_id FROM person_contracts WHERE contract_id = ?1;",
                [contract_id],
                |row| row.get(0),
            )
            .optional()?;

        match owner {
            Some(person_id) => self.find_by_id(person_id),
            None => Ok(None),
        }
    }
}

fn replace_contract_links(
    tx: &Transaction<'_>,
    person_id: PersonId,
    contracts: &BTreeSet<ContractId>,
) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM person_contracts WHERE person_id = ?1;",
        [person_id],
    )?;

    let mut exists_stmt = tx.prepare("SELECT EXISTS(SELECT 1 FROM contracts WHERE id = ?1);")?;
    let mut insert_stmt =
        tx.prepare("INSERT INTO person_contracts (contract_id, person_id) VALUES (?1, ?2);")?;
    for contract_id in contracts {
        let exists: bool = exists_stmt.query_row([contract_id], |row| row.get(0))?;
        if !exists {
            return Err(RepoError::ContractNotFound(*contract_id));
        }
        insert_stmt.execute(params![contract_id, person_id])?;
    }

    Ok(())
}

fn load_contracts_for_person(
    conn: &Connection,
    person_id: PersonId,
) -> RepoResult<BTreeSet<ContractId>> {
    let mut stmt = conn.prepare(
        "SELECT contract_id FROM person_contracts WHERE person_id = ?1 ORDER BY contract_id;",
    )?;
    let contracts = stmt
        .query_map([person_id], |row| row.get::<_, ContractId>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(contracts)
}

fn load_all_contract_links(
    conn: &Connection,
) -> RepoResult<BTreeMap<PersonId, BTreeSet<ContractId>>> {
    let mut stmt = conn.prepare("SELECT person_id, contract_id FROM person_contracts;")?;
    let mut rows = stmt.query([])?;
    let mut links: BTreeMap<PersonId, BTreeSet<ContractId>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let person_id: PersonId = row.get(0)?;
        let contract_id: ContractId = row.get(1)?;
        links.entry(person_id).or_default().insert(contract_id);
    }
    Ok(links)
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let role_text: String = row.get("role")?;
    let role = PersonRole::parse(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in persons.role"))
    })?;

    let person = Person {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        role,
        password: row.get("password")?,
        payment_status: int_to_bool(row.get("payment_status")?, "persons.payment_status")?,
        contracts: BTreeSet::new(),
    };
    person.validate()?;
    Ok(person)
}
