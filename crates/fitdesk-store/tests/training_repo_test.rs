// Integration tests for the training repository
// Listing, id allocation and the exercise/workout cascades

use fitdesk_core::model::Value;
use fitdesk_store::{
    EntityType, Filter, PersistenceEngine, Relation, StoreConfig, TrainingRepository,
};

fn setup_test_db() -> PersistenceEngine {
    PersistenceEngine::open_in_memory(&StoreConfig::default()).unwrap()
}

fn table(name: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Relation {
    let mut rel = Relation::new(name);
    rel.set_columns(columns.iter().copied());
    for row in rows {
        rel.add_row(row);
    }
    rel
}

/// Two workouts: 1 links exercises 10 and 11, 2 links exercise 12.
/// Each exercise has one state with one constraint and one transition.
fn seed(engine: &PersistenceEngine) {
    assert!(engine.replace(
        EntityType::ExerciseSpec,
        &table(
            "exerciseespecs",
            &["idEx", "Name", "idTrainer"],
            vec![
                vec![10.into(), "squat".into(), 7.into()],
                vec![11.into(), "lunge".into(), 7.into()],
                vec![12.into(), "plank".into(), 8.into()],
            ],
        )
    ));
    assert!(engine.replace(
        EntityType::TrainingWorkout,
        &table(
            "trainingworkouts",
            &["idWorkout", "Name", "idTrainer"],
            vec![
                vec![1.into(), "legs".into(), 7.into()],
                vec![2.into(), "core".into(), 8.into()],
            ],
        )
    ));
    assert!(engine.replace(
        EntityType::WorkoutExercises,
        &table(
            "workout_exerciseespec",
            &["idWorkout", "idEx", "position"],
            vec![
                vec![1.into(), 10.into(), 0.into()],
                vec![1.into(), 11.into(), 1.into()],
                vec![2.into(), 12.into(), 0.into()],
            ],
        )
    ));
    assert!(engine.replace(
        EntityType::State,
        &table(
            "states",
            &["idState", "idEx", "Name"],
            vec![
                vec![100.into(), 10.into(), "down".into()],
                vec![110.into(), 11.into(), "down".into()],
                vec![120.into(), 12.into(), "hold".into()],
            ],
        )
    ));
    assert!(engine.replace(
        EntityType::Transition,
        &table(
            "transitions",
            &["idTransition", "idEx", "fromState", "toState"],
            vec![
                vec![1.into(), 10.into(), 100.into(), 100.into()],
                vec![2.into(), 11.into(), 110.into(), 110.into()],
                vec![3.into(), 12.into(), 120.into(), 120.into()],
            ],
        )
    ));
    assert!(engine.replace(
        EntityType::AngleConstraint,
        &table(
            "angle_constraints",
            &["idConstraint", "idState", "idEx", "minAngle", "maxAngle"],
            vec![
                vec![1.into(), 100.into(), 10.into(), 80.0.into(), 100.0.into()],
                vec![2.into(), 110.into(), 11.into(), 70.0.into(), 90.0.into()],
                vec![3.into(), 120.into(), 12.into(), 170.0.into(), 180.0.into()],
            ],
        )
    ));
}

fn count(engine: &PersistenceEngine, entity: EntityType) -> usize {
    engine.get_all(entity).row_count()
}

#[test]
fn test_list_exercises_by_trainer() {
    let engine = setup_test_db();
    seed(&engine);
    let repo = TrainingRepository::new(&engine);

    let mine = repo.list_exercises(Filter::IdTrainer, 7);
    assert_eq!(mine.row_count(), 2);
    assert!(mine.contains("idEx", &Value::from(10)));
    assert!(mine.contains("idEx", &Value::from(11)));

    assert_eq!(repo.list_workouts(Filter::IdTrainer, 8).row_count(), 1);
    assert_eq!(repo.list_states(Filter::IdEx, 12).row_count(), 1);
    assert_eq!(repo.list_constraints(Filter::IdState, 110).row_count(), 1);
}

#[test]
fn test_next_ids_fill_gaps() {
    let engine = setup_test_db();
    let repo = TrainingRepository::new(&engine);
    assert_eq!(repo.next_exercise_id(), Some(1));
    assert_eq!(repo.next_workout_id(), Some(1));

    seed(&engine);
    // 1 is taken by workout 1, 2 by workout 2
    assert_eq!(repo.next_workout_id(), Some(3));
    // exercise ids start at 10
    assert_eq!(repo.next_exercise_id(), Some(1));
}

#[test]
fn test_delete_exercise_removes_dependents() {
    let engine = setup_test_db();
    seed(&engine);
    let repo = TrainingRepository::new(&engine);

    assert!(repo.delete_exercise(10));

    assert!(engine.get(EntityType::ExerciseSpec, Filter::IdEx, 10).is_empty());
    assert!(engine.get(EntityType::State, Filter::IdEx, 10).is_empty());
    assert!(engine.get(EntityType::Transition, Filter::IdEx, 10).is_empty());
    assert!(engine.get(EntityType::AngleConstraint, Filter::IdEx, 10).is_empty());
    assert_eq!(count(&engine, EntityType::ExerciseSpec), 2);
    assert_eq!(count(&engine, EntityType::AngleConstraint), 2);
}

#[test]
fn test_delete_workout_full_cascades_to_linked_exercises() {
    let engine = setup_test_db();
    seed(&engine);
    let repo = TrainingRepository::new(&engine);

    assert!(repo.delete_workout_full(1));

    let workouts = engine.get_all(EntityType::TrainingWorkout);
    assert_eq!(workouts.row_count(), 1);
    assert_eq!(workouts.value(0, "idWorkout"), &Value::from(2));

    let links = engine.get_all(EntityType::WorkoutExercises);
    assert_eq!(links.row_count(), 1);
    assert_eq!(links.value(0, "idEx"), &Value::from(12));

    for entity in [
        EntityType::ExerciseSpec,
        EntityType::State,
        EntityType::Transition,
        EntityType::AngleConstraint,
    ] {
        let rows = engine.get_all(entity);
        assert_eq!(rows.row_count(), 1, "{entity} should keep only exercise 12");
        assert_eq!(rows.value(0, "idEx"), &Value::from(12));
    }
}

#[test]
fn test_delete_absent_workout_succeeds() {
    let engine = setup_test_db();
    seed(&engine);
    let repo = TrainingRepository::new(&engine);

    assert!(repo.delete_workout_full(99));
    assert_eq!(count(&engine, EntityType::TrainingWorkout), 2);
    assert_eq!(count(&engine, EntityType::ExerciseSpec), 3);
}

#[test]
fn test_negative_ids_refused() {
    let engine = setup_test_db();
    seed(&engine);
    let repo = TrainingRepository::new(&engine);

    assert!(!repo.delete_workout_full(-1));
    assert!(!repo.delete_exercise(-1));
    assert_eq!(count(&engine, EntityType::TrainingWorkout), 2);
}

#[test]
fn test_delete_exercise_stops_at_first_failure() {
    let engine = setup_test_db();
    seed(&engine);
    engine.connection().execute_batch("DROP TABLE transitions").unwrap();
    engine.reset_schema_cache();
    let repo = TrainingRepository::new(&engine);

    assert!(!repo.delete_exercise(10));
    assert_eq!(engine.get(EntityType::ExerciseSpec, Filter::IdEx, 10).row_count(), 1);
    assert_eq!(engine.get(EntityType::State, Filter::IdEx, 10).row_count(), 1);
}

#[test]
fn test_atomic_workout_delete_rolls_back() {
    let config = StoreConfig::default().atomic_writes(true);
    let engine = PersistenceEngine::open_in_memory(&config).unwrap();
    seed(&engine);
    engine.connection().execute_batch("DROP TABLE angle_constraints").unwrap();
    engine.reset_schema_cache();
    let repo = TrainingRepository::new(&engine);

    assert!(!repo.delete_workout_full(1));
    // transitions of exercise 10 were deleted before the failure, then restored
    assert_eq!(count(&engine, EntityType::Transition), 3);
    assert_eq!(count(&engine, EntityType::WorkoutExercises), 3);
    assert_eq!(count(&engine, EntityType::TrainingWorkout), 2);
}
