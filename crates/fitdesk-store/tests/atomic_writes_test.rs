// Integration tests for the opt-in atomic mode
// Without it a failing multi-table write leaves earlier rows behind;
// with it the whole operation is rolled back

use fitdesk_core::model::profile::GeneralField;
use fitdesk_core::model::{ClientProfile, User, NEW_ID};
use fitdesk_store::{EntityType, PersistenceEngine, StoreConfig, UserRepository, UserStore};

fn client_with_profile() -> User {
    let mut user = User::client(NEW_ID, "ana", "ana@gym", "pw", "basic");
    let mut profile = ClientProfile::new(NEW_ID);
    profile.set(GeneralField::Age, 30).unwrap();
    user.as_client_mut().unwrap().profile = Some(profile);
    user
}

fn engine_without_general_table(atomic: bool) -> PersistenceEngine {
    let config = StoreConfig::default().atomic_writes(atomic);
    let engine = PersistenceEngine::open_in_memory(&config).unwrap();
    engine.connection().execute_batch("DROP TABLE client_general").unwrap();
    engine.reset_schema_cache();
    engine
}

#[test]
fn test_partial_write_survives_by_default() {
    let engine = engine_without_general_table(false);
    let repo = UserRepository::new(&engine);
    let mut user = client_with_profile();

    assert!(!repo.save_user(&mut user));
    assert_eq!(user.id(), 1);
    assert_eq!(engine.get_all(EntityType::User).row_count(), 1);
    assert_eq!(engine.get_all(EntityType::Client).row_count(), 1);
}

#[test]
fn test_atomic_mode_rolls_back() {
    let engine = engine_without_general_table(true);
    let repo = UserRepository::new(&engine);
    let mut user = client_with_profile();

    assert!(!repo.save_user(&mut user));
    assert_eq!(user.id(), NEW_ID);
    assert!(engine.get_all(EntityType::User).is_empty());
    assert!(engine.get_all(EntityType::Client).is_empty());
}

#[test]
fn test_atomic_mode_commits_on_success() {
    let config = StoreConfig::default().atomic_writes(true);
    let engine = PersistenceEngine::open_in_memory(&config).unwrap();
    let repo = UserRepository::new(&engine);
    let mut user = client_with_profile();

    assert!(repo.save_user(&mut user));
    assert!(repo.get_user_by_id(user.id()).is_some());
    assert!(repo.delete_user(user.id()));
    assert!(engine.get_all(EntityType::User).is_empty());
}
