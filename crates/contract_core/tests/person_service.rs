use contract_core::db::open_db_in_memory;
use contract_core::{
    Contract, ContractService, Person, PersonRole, PersonService, PersonServiceError,
    SqliteContractRepository, SqlitePersonRepository,
};
use rusqlite::Connection;

fn person_service(conn: &Connection) -> PersonService<SqlitePersonRepository<'_>> {
    PersonService::new(SqlitePersonRepository::try_new(conn).unwrap())
}

fn contract(conn: &Connection, description: &str) -> Contract {
    ContractService::new(SqliteContractRepository::try_new(conn).unwrap())
        .create_contract(description)
        .unwrap()
}

fn ana() -> Person {
    Person::new("Ana", PersonRole::Client, "x")
}

#[test]
fn register_assigns_id_and_defaults() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);

    let stored = service.register_person(&ana()).unwrap();
    assert_eq!(stored.id, Some(1));
    assert!(!stored.payment_status);
    assert!(stored.contracts.is_empty());
}

#[test]
fn register_rejects_preset_id() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);

    let mut person = ana();
    person.id = Some(7);
    let err = service.register_person(&person).unwrap_err();
    assert!(matches!(err, PersonServiceError::InvalidInput(_)));
    assert!(service.list_persons().unwrap().is_empty());
}

#[test]
fn register_rejects_duplicate_name() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);

    service.register_person(&ana()).unwrap();
    let err = service
        .register_person(&Person::new("Ana", PersonRole::Admin, "other"))
        .unwrap_err();
    assert!(matches!(err, PersonServiceError::DuplicateName(name) if name == "Ana"));
}

#[test]
fn register_rejects_blank_name_as_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);

    let err = service
        .register_person(&Person::new(" ", PersonRole::Client, "x"))
        .unwrap_err();
    assert!(matches!(err, PersonServiceError::InvalidInput(_)));
}

#[test]
fn toggling_payment_twice_restores_original_value() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    let id = service.register_person(&ana()).unwrap().id.unwrap();

    let once = service.toggle_payment_status(id).unwrap();
    assert!(once.payment_status);
    let twice = service.toggle_payment_status(id).unwrap();
    assert!(!twice.payment_status);

    let loaded = service.get_person(id).unwrap().unwrap();
    assert!(!loaded.payment_status);
}

#[test]
fn toggle_on_missing_person_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);

    let err = service.toggle_payment_status(5).unwrap_err();
    assert!(matches!(err, PersonServiceError::PersonNotFound(5)));
}

#[test]
fn remove_missing_person_fails_and_existing_one_is_deleted() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);

    let err = service.remove_person(3).unwrap_err();
    assert!(matches!(err, PersonServiceError::PersonNotFound(3)));

    let id = service.register_person(&ana()).unwrap().id.unwrap();
    service.remove_person(id).unwrap();
    assert!(service.get_person(id).unwrap().is_none());
}

#[test]
fn rename_keeps_every_other_field() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    let lease = contract(&conn, "lease");
    let id = service.register_person(&ana()).unwrap().id.unwrap();
    service.add_contract(&lease, id).unwrap();
    let before = service.get_person(id).unwrap().unwrap();

    let renamed = service.rename_person(id, "Ana Maria").unwrap();

    assert_eq!(renamed.name, "Ana Maria");
    assert_eq!(renamed.id, before.id);
    assert_eq!(renamed.role, before.role);
    assert_eq!(renamed.password, before.password);
    assert_eq!(renamed.contracts, before.contracts);
    assert_eq!(renamed.payment_status, before.payment_status);
}

#[test]
fn rename_allows_name_collision() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    service.register_person(&ana()).unwrap();
    let bia = service
        .register_person(&Person::new("Bia", PersonRole::Client, "y"))
        .unwrap();

    let renamed = service.rename_person(bia.id.unwrap(), "Ana").unwrap();
    assert_eq!(renamed.name, "Ana");
}

#[test]
fn rename_rejects_missing_person_and_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);

    let err = service.rename_person(9, "Nobody").unwrap_err();
    assert!(matches!(err, PersonServiceError::PersonNotFound(9)));

    let id = service.register_person(&ana()).unwrap().id.unwrap();
    let err = service.rename_person(id, "").unwrap_err();
    assert!(matches!(err, PersonServiceError::InvalidInput(_)));
}

#[test]
fn add_then_remove_contract_restores_contract_set() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    let lease = contract(&conn, "lease");
    let loan = contract(&conn, "loan");
    let id = service.register_person(&ana()).unwrap().id.unwrap();
    service.add_contract(&lease, id).unwrap();
    let original = service.get_person(id).unwrap().unwrap().contracts;

    let with_loan = service.add_contract(&loan, id).unwrap();
    assert!(with_loan.contracts.contains(&loan.id));

    let restored = service.remove_contract(&loan).unwrap();
    assert_eq!(restored.contracts, original);
    assert_eq!(service.get_person(id).unwrap().unwrap().contracts, original);
}

#[test]
fn contract_edits_preserve_paid_status() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    let lease = contract(&conn, "lease");
    let id = service.register_person(&ana()).unwrap().id.unwrap();
    service.toggle_payment_status(id).unwrap();

    let updated = service.add_contract(&lease, id).unwrap();
    assert!(updated.payment_status);
}

#[test]
fn add_contract_to_missing_person_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    let lease = contract(&conn, "lease");

    let err = service.add_contract(&lease, 1).unwrap_err();
    assert!(matches!(err, PersonServiceError::PersonNotFound(1)));
}

#[test]
fn contract_cannot_be_owned_twice() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    let lease = contract(&conn, "lease");
    let ana_id = service.register_person(&ana()).unwrap().id.unwrap();
    let bia_id = service
        .register_person(&Person::new("Bia", PersonRole::Client, "y"))
        .unwrap()
        .id
        .unwrap();

    service.add_contract(&lease, ana_id).unwrap();
    service.add_contract(&lease, ana_id).unwrap();

    let err = service.add_contract(&lease, bia_id).unwrap_err();
    assert!(matches!(
        err,
        PersonServiceError::ContractAlreadyAssigned { contract_id, owner_id }
            if contract_id == lease.id && owner_id == ana_id
    ));
}

#[test]
fn removing_unassigned_contract_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    let lease = contract(&conn, "lease");

    let err = service.remove_contract(&lease).unwrap_err();
    assert!(matches!(err, PersonServiceError::ContractNotAssigned(id) if id == lease.id));
}

#[test]
fn list_returns_registered_persons() {
    let conn = open_db_in_memory().unwrap();
    let service = person_service(&conn);
    service.register_person(&ana()).unwrap();
    service
        .register_person(&Person::new("Bia", PersonRole::Admin, "y"))
        .unwrap();

    let persons = service.list_persons().unwrap();
    assert_eq!(persons.len(), 2);
    assert!(persons.contains(&ana()));
}
