//! Command-line front end for the contract registry.
//!
//! # Responsibility
//! - Translate arguments into `contract_core` service calls.
//! - Print results as JSON on stdout; errors go to stderr with exit code 1.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use contract_core::db::{open_db, Connection};
use contract_core::{
    flush_logging, init_from_config, AppConfig, Contract, ContractId, ContractService,
    CredentialService, Person, PersonId, PersonRole, PersonService, SqliteContractRepository,
    SqliteCredentialRepository, SqlitePersonRepository,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "contract",
    version = contract_core::core_version(),
    about = "Manage persons, contracts and credentials"
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, default_value = contract_core::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides `database.path` from configuration.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Person registration and edits.
    #[command(subcommand)]
    Person(PersonCommand),
    /// Contract registry.
    #[command(subcommand)]
    Contract(ContractCommand),
    /// Login credentials.
    #[command(subcommand)]
    Credential(CredentialCommand),
}

#[derive(Subcommand)]
enum PersonCommand {
    Register(RegisterArgs),
    List,
    TogglePayment { id: PersonId },
    Rename { id: PersonId, name: String },
    Remove { id: PersonId },
    AddContract { contract_id: ContractId, person_id: PersonId },
    RemoveContract { contract_id: ContractId },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long, value_enum)]
    role: RoleArg,
    #[arg(long)]
    password: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    Client,
}

impl From<RoleArg> for PersonRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => Self::Admin,
            RoleArg::Client => Self::Client,
        }
    }
}

#[derive(Subcommand)]
enum ContractCommand {
    Create { description: String },
    List,
}

#[derive(Subcommand)]
enum CredentialCommand {
    Issue {
        person_id: PersonId,
        #[arg(long)]
        login: String,
        #[arg(long)]
        password: String,
    },
    Find { login: String },
    Revoke { login: String },
    RevokePerson { person_id: PersonId },
}

fn main() {
    let outcome = run(Cli::parse());
    flush_logging();
    if let Err(err) = outcome {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load_from(&cli.config)?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    init_from_config(&config.logging).map_err(|err| anyhow!(err))?;

    let conn = open_db(&config.database.path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database.path.display()
        )
    })?;

    match cli.command {
        Command::Person(command) => run_person(&conn, command),
        Command::Contract(command) => run_contract(&conn, command),
        Command::Credential(command) => run_credential(&conn, command),
    }
}

fn run_person(conn: &Connection, command: PersonCommand) -> Result<()> {
    let service = PersonService::new(SqlitePersonRepository::try_new(conn)?);
    match command {
        PersonCommand::Register(args) => {
            let person = Person::new(args.name, args.role.into(), args.password);
            print_json(&PersonView::from(service.register_person(&person)?))
        }
        PersonCommand::List => {
            let persons: Vec<_> = service
                .list_persons()?
                .into_iter()
                .map(PersonView::from)
                .collect();
            print_json(&persons)
        }
        PersonCommand::TogglePayment { id } => {
            print_json(&PersonView::from(service.toggle_payment_status(id)?))
        }
        PersonCommand::Rename { id, name } => {
            print_json(&PersonView::from(service.rename_person(id, name)?))
        }
        PersonCommand::Remove { id } => {
            service.remove_person(id)?;
            print_json(&serde_json::json!({ "removed": id }))
        }
        PersonCommand::AddContract {
            contract_id,
            person_id,
        } => {
            let contract = require_contract(conn, contract_id)?;
            print_json(&PersonView::from(service.add_contract(&contract, person_id)?))
        }
        PersonCommand::RemoveContract { contract_id } => {
            let contract = require_contract(conn, contract_id)?;
            print_json(&PersonView::from(service.remove_contract(&contract)?))
        }
    }
}

fn run_contract(conn: &Connection, command: ContractCommand) -> Result<()> {
    let service = ContractService::new(SqliteContractRepository::try_new(conn)?);
    match command {
        ContractCommand::Create { description } => {
            print_json(&service.create_contract(&description)?)
        }
        ContractCommand::List => print_json(&service.list_contracts()?),
    }
}

fn run_credential(conn: &Connection, command: CredentialCommand) -> Result<()> {
    let service = CredentialService::new(
        SqliteCredentialRepository::try_new(conn)?,
        SqlitePersonRepository::try_new(conn)?,
    );
    match command {
        CredentialCommand::Issue {
            person_id,
            login,
            password,
        } => print_json(&service.issue_credential(person_id, &login, &password)?),
        CredentialCommand::Find { login } => print_json(&service.find_by_login(&login)?),
        CredentialCommand::Revoke { login } => {
            service.revoke_by_login(&login)?;
            print_json(&serde_json::json!({ "revoked": login }))
        }
        CredentialCommand::RevokePerson { person_id } => {
            let removed = service.revoke_for_person(person_id)?;
            print_json(&serde_json::json!({ "person_id": person_id, "removed": removed }))
        }
    }
}

fn require_contract(conn: &Connection, id: ContractId) -> Result<Contract> {
    ContractService::new(SqliteContractRepository::try_new(conn)?)
        .get_contract(id)?
        .ok_or_else(|| anyhow!("contract not found: {id}"))
}

/// Person output without the password field.
#[derive(Serialize)]
struct PersonView {
    id: Option<PersonId>,
    name: String,
    role: PersonRole,
    payment_status: bool,
    contracts: Vec<ContractId>,
}

impl From<Person> for PersonView {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            role: person.role,
            payment_status: person.payment_status,
            contracts: person.contracts.into_iter().collect(),
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, PersonCommand};
    use clap::{CommandFactory, Parser};

    #[test]
    fn version_comes_from_core() {
        let command = Cli::command();
        assert_eq!(command.get_version(), Some(contract_core::core_version()));
    }

    #[test]
    fn parses_register_command() {
        let cli = Cli::try_parse_from([
            "contract", "person", "register", "--name", "Ana", "--role", "client", "--password",
            "x",
        ])
        .unwrap();
        match cli.command {
            Command::Person(PersonCommand::Register(args)) => assert_eq!(args.name, "Ana"),
            _ => panic!("expected person register"),
        }
    }

    #[test]
    fn db_flag_is_global() {
        let cli = Cli::try_parse_from(["contract", "contract", "list", "--db", "/tmp/x.sqlite3"])
            .unwrap();
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/x.sqlite3")));
    }
}
