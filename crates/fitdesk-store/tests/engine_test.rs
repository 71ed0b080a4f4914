// Integration tests for the persistence engine
// Reads, filtered upserts, replace mode, deletes and id allocation

use fitdesk_core::model::Value;
use fitdesk_store::{EntityType, Filter, PersistenceEngine, Relation, StoreConfig};

fn setup_test_db() -> PersistenceEngine {
    PersistenceEngine::open_in_memory(&StoreConfig::default()).unwrap()
}

fn exercise_rows(rows: &[(i64, &str, i64)]) -> Relation {
    let mut rel = Relation::new("exerciseespecs");
    rel.set_columns(["idEx", "Name", "idTrainer"]);
    for (id, name, trainer) in rows {
        rel.add_row(vec![(*id).into(), (*name).into(), (*trainer).into()]);
    }
    rel
}

fn user_row(id: i64, name: &str) -> Relation {
    let mut rel = Relation::new("users");
    rel.set_columns(["idUser", "userName", "email", "password", "userType"]);
    rel.add_row(vec![
        id.into(),
        name.into(),
        format!("{name}@gym").into(),
        "pw".into(),
        "Client".into(),
    ]);
    rel
}

#[test]
fn test_get_applies_valid_filter() {
    let engine = setup_test_db();
    assert!(engine.replace(
        EntityType::ExerciseSpec,
        &exercise_rows(&[(1, "squat", 7), (2, "lunge", 8), (3, "plank", 7)])
    ));

    let rel = engine.get(EntityType::ExerciseSpec, Filter::IdTrainer, 7);
    assert_eq!(rel.name(), "exerciseespecs");
    assert_eq!(rel.row_count(), 2);
    assert!(rel.contains("Name", &"plank".into()));
    assert!(!rel.contains("Name", &"lunge".into()));
}

#[test]
fn test_filter_missing_from_table_is_ignored() {
    let engine = setup_test_db();
    engine.replace(EntityType::ExerciseSpec, &exercise_rows(&[(1, "squat", 7), (2, "lunge", 8)]));

    // exerciseespecs has no email column
    let rel = engine.get(EntityType::ExerciseSpec, Filter::Email, "a@b");
    assert_eq!(rel.row_count(), 2);
    assert!(!engine.is_valid_filter_for_table("exerciseespecs", Filter::Email));
    assert!(engine.is_valid_filter_for_table("exerciseespecs", Filter::IdTrainer));
}

#[test]
fn test_unsupplied_value_returns_whole_table() {
    let engine = setup_test_db();
    engine.replace(EntityType::ExerciseSpec, &exercise_rows(&[(1, "squat", 7), (2, "lunge", 8)]));

    assert_eq!(engine.get(EntityType::ExerciseSpec, Filter::IdTrainer, "").row_count(), 2);
    assert_eq!(engine.get(EntityType::ExerciseSpec, Filter::IdTrainer, Value::Null).row_count(), 2);
    assert_eq!(engine.get_all(EntityType::ExerciseSpec).row_count(), 2);
}

#[test]
fn test_unknown_entity_yields_error_relation() {
    let engine = setup_test_db();
    let rel = engine.get(EntityType::Unknown, Filter::IdUser, 1);
    assert!(rel.is_error());
    assert_eq!(rel.row_count(), 0);
    assert!(!engine.replace(EntityType::Unknown, &user_row(1, "ana")));
    assert_eq!(engine.generate_id(EntityType::Unknown), None);
}

#[test]
fn test_get_in_and_get_where() {
    let engine = setup_test_db();
    engine.replace(
        EntityType::ExerciseSpec,
        &exercise_rows(&[(1, "squat", 7), (2, "lunge", 8), (3, "plank", 7)]),
    );

    let rel = engine.get_in(EntityType::ExerciseSpec, Filter::IdEx, &[1.into(), 2.into()]);
    assert_eq!(rel.row_count(), 2);

    let rel = engine.get_where(
        EntityType::ExerciseSpec,
        &[(Filter::IdTrainer, 7.into()), (Filter::Name, "plank".into())],
    );
    assert_eq!(rel.row_count(), 1);
    assert_eq!(rel.value(0, "idEx"), &Value::Integer(3));

    // A pair the table cannot answer is dropped, the rest still apply
    let rel = engine.get_where(
        EntityType::ExerciseSpec,
        &[(Filter::IdTrainer, 7.into()), (Filter::Email, "x".into())],
    );
    assert_eq!(rel.row_count(), 2);
}

#[test]
fn test_filtered_save_updates_existing_row() {
    let engine = setup_test_db();
    assert!(engine.save(EntityType::User, &user_row(4, "ana"), Filter::IdUser, 4));
    assert!(engine.save(EntityType::User, &user_row(4, "anna"), Filter::IdUser, 4));

    let rel = engine.get_all(EntityType::User);
    assert_eq!(rel.row_count(), 1);
    assert_eq!(rel.value(0, "userName"), &Value::from("anna"));
}

#[test]
fn test_filtered_save_inserts_when_no_match() {
    let engine = setup_test_db();
    assert!(engine.save(EntityType::User, &user_row(1, "ana"), Filter::IdUser, 1));
    assert!(engine.save(EntityType::User, &user_row(2, "ben"), Filter::IdUser, 2));
    assert_eq!(engine.get_all(EntityType::User).row_count(), 2);
}

#[test]
fn test_filtered_save_requires_primary_key_column() {
    let engine = setup_test_db();
    let mut rel = Relation::new("users");
    rel.set_columns(["userName", "email", "password", "userType"]);
    rel.add_row(vec!["ana".into(), "a@gym".into(), "pw".into(), "Client".into()]);
    assert!(!engine.save(EntityType::User, &rel, Filter::IdUser, 1));
}

#[test]
fn test_replace_collapses_same_key() {
    let engine = setup_test_db();
    assert!(engine.replace(EntityType::User, &user_row(9, "ana")));
    assert!(engine.replace(EntityType::User, &user_row(9, "ana2")));
    let rel = engine.get(EntityType::User, Filter::IdUser, 9);
    assert_eq!(rel.row_count(), 1);
    assert_eq!(rel.value(0, "userName"), &Value::from("ana2"));
}

#[test]
fn test_save_with_invalid_filter_falls_back_to_replace() {
    let engine = setup_test_db();
    assert!(engine.save(EntityType::User, &user_row(3, "ana"), Filter::IdWorkout, 3));
    assert_eq!(engine.get_all(EntityType::User).row_count(), 1);
}

fn session_row(id: i64, client: i64) -> Relation {
    let mut rel = Relation::new("training_sesions");
    rel.set_columns(["idSesion", "idClient", "idWorkout"]);
    rel.add_row(vec![id.into(), client.into(), 1.into()]);
    rel
}

#[test]
fn test_upsert_and_replace_differ_on_non_key_filter() {
    let engine = setup_test_db();
    assert!(engine.save(EntityType::TrainingSession, &session_row(1, 5), Filter::IdClient, 5));

    // Same key, other client: no (idClient, idSesion) match, so the insert hits the key
    assert!(!engine.save(EntityType::TrainingSession, &session_row(1, 6), Filter::IdClient, 6));
    let rel = engine.get_all(EntityType::TrainingSession);
    assert_eq!(rel.row_count(), 1);
    assert_eq!(rel.value(0, "idClient"), &Value::Integer(5));

    assert!(engine.replace(EntityType::TrainingSession, &session_row(1, 6)));
    let rel = engine.get_all(EntityType::TrainingSession);
    assert_eq!(rel.row_count(), 1);
    assert_eq!(rel.value(0, "idClient"), &Value::Integer(6));
}

#[test]
fn test_filtered_save_refused_on_composite_key_table() {
    let engine = setup_test_db();
    let mut rel = Relation::new("client_workout_calendar");
    rel.set_columns(["idClient", "date", "idWorkout"]);
    rel.add_row(vec![1.into(), "2024-01-01".into(), 3.into()]);
    rel.add_row(vec![1.into(), "2024-01-02".into(), 4.into()]);
    assert!(engine.replace(EntityType::ClientWorkoutCalendar, &rel));

    let mut change = Relation::new("client_workout_calendar");
    change.set_columns(["idClient", "date", "idWorkout"]);
    change.add_row(vec![1.into(), "2024-01-01".into(), 9.into()]);
    assert!(!engine.save(EntityType::ClientWorkoutCalendar, &change, Filter::IdClient, 1));

    let stored = engine.get(EntityType::ClientWorkoutCalendar, Filter::IdClient, 1);
    assert_eq!(stored.row_count(), 2);
    assert!(stored.contains("idWorkout", &4.into()));
    assert!(!stored.contains("idWorkout", &9.into()));
}

#[test]
fn test_save_empty_relation() {
    let engine = setup_test_db();
    let mut rel = Relation::new("users");
    rel.set_columns(["idUser"]);
    assert!(engine.save(EntityType::User, &rel, Filter::IdUser, 1));
    assert!(!engine.save(EntityType::User, &Relation::new("users"), Filter::IdUser, 1));
}

#[test]
fn test_save_stops_at_first_failing_row() {
    let engine = setup_test_db();
    let mut rel = user_row(1, "ana");
    // userName is NOT NULL
    rel.add_row(vec![2.into(), Value::Null, "x@gym".into(), "pw".into(), "Client".into()]);
    rel.add_row(vec![3.into(), "cid".into(), "c@gym".into(), "pw".into(), "Client".into()]);

    assert!(!engine.replace(EntityType::User, &rel));
    let ids = engine.get_all(EntityType::User);
    assert_eq!(ids.row_count(), 1);
    assert!(ids.contains("idUser", &1.into()));
}

#[test]
fn test_delete_row_and_delete_in() {
    let engine = setup_test_db();
    engine.replace(
        EntityType::ExerciseSpec,
        &exercise_rows(&[(1, "squat", 7), (2, "lunge", 8), (3, "plank", 7), (4, "row", 9)]),
    );

    assert!(engine.delete_row(EntityType::ExerciseSpec, Filter::IdEx, 1));
    assert!(engine.delete_in(EntityType::ExerciseSpec, Filter::IdEx, &[2.into(), 3.into()]));
    assert!(engine.delete_in(EntityType::ExerciseSpec, Filter::IdEx, &[]));

    let left = engine.get_all(EntityType::ExerciseSpec);
    assert_eq!(left.row_count(), 1);
    assert_eq!(left.value(0, "idEx"), &Value::Integer(4));

    // Nothing matches: still a successful statement
    assert!(engine.delete_row(EntityType::ExerciseSpec, Filter::IdEx, 42));
}

#[test]
fn test_delete_refuses_invalid_filter_or_value() {
    let engine = setup_test_db();
    engine.replace(EntityType::ExerciseSpec, &exercise_rows(&[(1, "squat", 7)]));

    assert!(!engine.delete_row(EntityType::ExerciseSpec, Filter::Email, "x"));
    assert!(!engine.delete_row(EntityType::ExerciseSpec, Filter::IdEx, ""));
    assert!(!engine.delete_where(EntityType::ExerciseSpec, &[]));
    assert!(!engine.delete_where(
        EntityType::ExerciseSpec,
        &[(Filter::IdTrainer, 7.into()), (Filter::Email, "x".into())]
    ));
    assert_eq!(engine.get_all(EntityType::ExerciseSpec).row_count(), 1);

    assert!(engine.delete_where(
        EntityType::ExerciseSpec,
        &[(Filter::IdTrainer, 7.into()), (Filter::Name, "squat".into())]
    ));
    assert!(engine.get_all(EntityType::ExerciseSpec).is_empty());
}

#[test]
fn test_generate_id_fills_first_gap() {
    let engine = setup_test_db();
    assert_eq!(engine.generate_id(EntityType::User), Some(1));

    for id in [1, 2, 4] {
        engine.replace(EntityType::User, &user_row(id, &format!("u{id}")));
    }
    assert_eq!(engine.generate_id(EntityType::User), Some(3));
}

#[test]
fn test_generate_id_when_one_is_free() {
    let engine = setup_test_db();
    for id in [2, 3] {
        engine.replace(EntityType::User, &user_row(id, &format!("u{id}")));
    }
    assert_eq!(engine.generate_id(EntityType::User), Some(1));
}

#[test]
fn test_generate_id_past_search_limit() {
    let config = StoreConfig::default().id_search_limit(3);
    let engine = PersistenceEngine::open_in_memory(&config).unwrap();
    for id in [1, 2, 3, 10] {
        engine.replace(EntityType::User, &user_row(id, &format!("u{id}")));
    }
    assert_eq!(engine.generate_id(EntityType::User), Some(11));
}

#[test]
fn test_column_cache_sees_new_table_after_schema_apply() {
    let engine = setup_test_db();
    assert!(engine.table_columns("gyms").is_empty());
    assert!(engine.initialize_schema_from_sql("CREATE TABLE gyms (IdUser INTEGER, Name TEXT)"));
    assert_eq!(engine.table_columns("GYMS"), vec!["IdUser".to_string(), "Name".to_string()]);
}
