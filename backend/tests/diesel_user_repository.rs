//! Integration tests for `DieselUserRepository` against a temporary SQLite
//! database.
//!
//! These tests check that the Diesel adapter honours the `UserRepository`
//! port contract: lookups, conflict detection and unique constraints.

use placement_backend::domain::ports::{AccountConflict, UserPersistenceError, UserRepository};
use placement_backend::domain::{Email, NewUserAccount, PasswordHash, PhoneNumber};
use placement_backend::outbound::persistence::DieselUserRepository;
use rstest::{fixture, rstest};

mod support;

use support::{TempDatabase, username};

fn new_account(name: &str, email: &str) -> NewUserAccount {
    NewUserAccount {
        username: username(name),
        email: Email::new(email).expect("valid email"),
        phone_number: PhoneNumber::new("555-0100").expect("valid phone"),
        password_hash: PasswordHash::from_encoded("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
    }
}

#[fixture]
fn database() -> TempDatabase {
    TempDatabase::migrated()
}

#[rstest]
#[tokio::test]
async fn inserted_account_can_be_found(database: TempDatabase) {
    let repo = DieselUserRepository::new(database.connector.clone());
    let stored = repo
        .insert(&new_account("alice", "alice@example.com"))
        .await
        .expect("insert succeeds");

    let found = repo
        .find_by_username(&username("alice"))
        .await
        .expect("lookup succeeds")
        .expect("account exists");
    assert_eq!(found, stored);
    assert_eq!(found.email.as_ref(), "alice@example.com");
    assert!(found.password_hash.as_str().starts_with("$argon2id$"));
}

#[rstest]
#[tokio::test]
async fn unknown_username_is_absent(database: TempDatabase) {
    let repo = DieselUserRepository::new(database.connector.clone());
    let found = repo
        .find_by_username(&username("nobody"))
        .await
        .expect("lookup succeeds");
    assert!(found.is_none());
}

#[rstest]
#[case("alice", "other@example.com", Some(AccountConflict::Username))]
#[case("bob", "alice@example.com", Some(AccountConflict::Email))]
#[case("alice", "alice@example.com", Some(AccountConflict::Username))]
#[case("bob", "bob@example.com", None)]
#[tokio::test]
async fn conflicts_report_the_taken_field(
    database: TempDatabase,
    #[case] name: &str,
    #[case] email: &str,
    #[case] expected: Option<AccountConflict>,
) {
    let repo = DieselUserRepository::new(database.connector.clone());
    repo.insert(&new_account("alice", "alice@example.com"))
        .await
        .expect("seed account");

    let conflict = repo
        .find_conflict(&username(name), &Email::new(email).expect("valid email"))
        .await
        .expect("conflict query succeeds");
    assert_eq!(conflict, expected);
}

#[rstest]
#[case("alice", "second@example.com", "username")]
#[case("bob", "alice@example.com", "email")]
#[tokio::test]
async fn unique_constraints_surface_as_duplicates(
    database: TempDatabase,
    #[case] name: &str,
    #[case] email: &str,
    #[case] field: &str,
) {
    let repo = DieselUserRepository::new(database.connector.clone());
    repo.insert(&new_account("alice", "alice@example.com"))
        .await
        .expect("seed account");

    let err = repo
        .insert(&new_account(name, email))
        .await
        .expect_err("duplicate insert fails");
    assert_eq!(err, UserPersistenceError::duplicate(field));
}
