//! Training repository
//!
//! Exercise specifications and workouts. An exercise owns its states, the
//! transitions between them and the angle constraints attached to each
//! state; a workout links exercises through `workout_exerciseespec`.

#![allow(clippy::result_large_err)]

use super::{elapsed_ms, invalid_id, read_failed, write_failed};
use crate::catalog::{EntityType, Filter};
use crate::engine::PersistenceEngine;
use crate::errors::Result;
use crate::relation::Relation;
use fitdesk_core::errors::ExError;
use fitdesk_core::model::Value;
use fitdesk_core::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

pub struct TrainingRepository<'a> {
    engine: &'a PersistenceEngine,
}

impl<'a> TrainingRepository<'a> {
    pub fn new(engine: &'a PersistenceEngine) -> Self {
        Self { engine }
    }

    pub fn list_workouts(&self, filter: Filter, value: impl Into<Value>) -> Relation {
        self.engine.get(EntityType::TrainingWorkout, filter, value)
    }

    pub fn list_exercises(&self, filter: Filter, value: impl Into<Value>) -> Relation {
        self.engine.get(EntityType::ExerciseSpec, filter, value)
    }

    pub fn list_states(&self, filter: Filter, value: impl Into<Value>) -> Relation {
        self.engine.get(EntityType::State, filter, value)
    }

    pub fn list_constraints(&self, filter: Filter, value: impl Into<Value>) -> Relation {
        self.engine.get(EntityType::AngleConstraint, filter, value)
    }

    /// Smallest free exercise id
    pub fn next_exercise_id(&self) -> Option<i64> {
        self.engine.generate_id(EntityType::ExerciseSpec)
    }

    /// Smallest free workout id
    pub fn next_workout_id(&self) -> Option<i64> {
        self.engine.generate_id(EntityType::TrainingWorkout)
    }

    /// Delete an exercise with its transitions, constraints and states
    ///
    /// Stops at the first failing delete. An exercise that does not exist
    /// counts as deleted.
    pub fn delete_exercise(&self, id_ex: i64) -> bool {
        log_op_start!("delete_exercise", id_ex = id_ex);
        let start = Instant::now();

        let result = if id_ex < 0 {
            Err(invalid_id("delete_exercise", id_ex))
        } else {
            self.in_unit_of_work("delete_exercise", id_ex, |engine| {
                delete_exercise_rows(engine, id_ex)
            })
        };
        match result {
            Ok(()) => {
                log_op_end!("delete_exercise", duration_ms = elapsed_ms(start));
                true
            }
            Err(e) => {
                log_op_error!("delete_exercise", e, duration_ms = elapsed_ms(start), id_ex = id_ex);
                false
            }
        }
    }

    /// Delete a workout, every exercise it links and the links themselves
    pub fn delete_workout_full(&self, id_workout: i64) -> bool {
        log_op_start!("delete_workout_full", id_workout = id_workout);
        let start = Instant::now();

        let result = if id_workout < 0 {
            Err(invalid_id("delete_workout_full", id_workout))
        } else {
            self.in_unit_of_work("delete_workout_full", id_workout, |engine| {
                delete_workout_rows(engine, id_workout)
            })
        };
        match result {
            Ok(()) => {
                log_op_end!("delete_workout_full", duration_ms = elapsed_ms(start));
                true
            }
            Err(e) => {
                log_op_error!(
                    "delete_workout_full",
                    e,
                    duration_ms = elapsed_ms(start),
                    id_workout = id_workout
                );
                false
            }
        }
    }

    fn in_unit_of_work<F>(&self, op: &str, id: i64, f: F) -> Result<()>
    where
        F: FnOnce(&PersistenceEngine) -> Result<()>,
    {
        let mut failure: Option<ExError> = None;
        let ok = self.engine.unit_of_work(op, |engine| match f(engine) {
            Ok(()) => true,
            Err(e) => {
                failure = Some(e);
                false
            }
        });
        match failure {
            Some(e) => Err(e),
            None if !ok => Err(write_failed(op, id, "delete")),
            None => Ok(()),
        }
    }
}

fn deleted(done: bool, op: &str, id: i64, entity: EntityType) -> Result<()> {
    if done {
        return Ok(());
    }
    Err(write_failed(op, id, "delete")
        .with_table(entity.table().unwrap_or_default())
        .with_message(format!("{} rows could not be deleted", entity)))
}

fn delete_exercise_rows(engine: &PersistenceEngine, id_ex: i64) -> Result<()> {
    const OP: &str = "delete_exercise";

    let states = engine.get(EntityType::State, Filter::IdEx, id_ex);
    if states.is_error() {
        return Err(read_failed(OP, "states").with_entity_id(id_ex.to_string()));
    }

    deleted(
        engine.delete_row(EntityType::Transition, Filter::IdEx, id_ex),
        OP,
        id_ex,
        EntityType::Transition,
    )?;
    for row in 0..states.row_count() {
        let id_state = states.value(row, "idState").clone();
        deleted(
            engine.delete_where(
                EntityType::AngleConstraint,
                &[(Filter::IdEx, id_ex.into()), (Filter::IdState, id_state)],
            ),
            OP,
            id_ex,
            EntityType::AngleConstraint,
        )?;
    }
    deleted(
        engine.delete_row(EntityType::State, Filter::IdEx, id_ex),
        OP,
        id_ex,
        EntityType::State,
    )?;
    deleted(
        engine.delete_row(EntityType::ExerciseSpec, Filter::IdEx, id_ex),
        OP,
        id_ex,
        EntityType::ExerciseSpec,
    )
}

fn delete_workout_rows(engine: &PersistenceEngine, id_workout: i64) -> Result<()> {
    const OP: &str = "delete_workout_full";

    let links = engine.get(EntityType::WorkoutExercises, Filter::IdWorkout, id_workout);
    if links.is_error() {
        return Err(read_failed(OP, "workout exercises").with_entity_id(id_workout.to_string()));
    }

    for row in 0..links.row_count() {
        let Some(id_ex) = links.value(row, "idEx").as_i64() else {
            tracing::warn!(id_workout, "workout link without exercise id, skipped");
            continue;
        };
        delete_exercise_rows(engine, id_ex)?;
    }

    deleted(
        engine.delete_row(EntityType::WorkoutExercises, Filter::IdWorkout, id_workout),
        OP,
        id_workout,
        EntityType::WorkoutExercises,
    )?;
    deleted(
        engine.delete_row(EntityType::TrainingWorkout, Filter::IdWorkout, id_workout),
        OP,
        id_workout,
        EntityType::TrainingWorkout,
    )
}
