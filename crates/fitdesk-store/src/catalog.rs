//! Entity/filter catalog
//!
//! Static maps from entity types to physical tables and from filters to
//! column names. These strings are the on-disk vocabulary of existing
//! databases and must not change.

use fitdesk_core::model::{ProfileCategory, UserType};
use std::fmt;
use std::str::FromStr;

/// Which physical table a generic operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    User,
    Client,
    Trainer,
    Admin,
    Preferences,
    ProfileGeneral,
    ProfileFunctional,
    ProfileMorphology,
    ProfileRom,
    ProfileLifestyle,
    ProfileMedical,
    ProfileAdditional,
    ClientWorkoutCalendar,
    ExerciseSpec,
    TrainingWorkout,
    WorkoutExercises,
    State,
    Transition,
    AngleConstraint,
    TrainingSession,
    SessionReport,
    ExerciseSummary,
    Unknown,
}

impl EntityType {
    pub const ALL: [EntityType; 23] = [
        EntityType::User,
        EntityType::Client,
        EntityType::Trainer,
        EntityType::Admin,
        EntityType::Preferences,
        EntityType::ProfileGeneral,
        EntityType::ProfileFunctional,
        EntityType::ProfileMorphology,
        EntityType::ProfileRom,
        EntityType::ProfileLifestyle,
        EntityType::ProfileMedical,
        EntityType::ProfileAdditional,
        EntityType::ClientWorkoutCalendar,
        EntityType::ExerciseSpec,
        EntityType::TrainingWorkout,
        EntityType::WorkoutExercises,
        EntityType::State,
        EntityType::Transition,
        EntityType::AngleConstraint,
        EntityType::TrainingSession,
        EntityType::SessionReport,
        EntityType::ExerciseSummary,
        EntityType::Unknown,
    ];

    /// Physical table, `None` for [`EntityType::Unknown`]
    pub fn table(&self) -> Option<&'static str> {
        self.mapping().map(|(table, _)| table)
    }

    /// Primary-key column, `None` for [`EntityType::Unknown`]
    pub fn primary_key(&self) -> Option<&'static str> {
        self.mapping().map(|(_, pk)| pk)
    }

    /// Tables whose key spans more than the mapped primary-key column
    ///
    /// A filtered upsert would match every row sharing the first key
    /// column, so these are written in replace mode only.
    pub fn is_replace_only(&self) -> bool {
        matches!(self, EntityType::ClientWorkoutCalendar | EntityType::WorkoutExercises)
    }

    fn mapping(&self) -> Option<(&'static str, &'static str)> {
        let pair = match self {
            EntityType::User => ("users", "idUser"),
            EntityType::Client => ("clients", "idUser"),
            EntityType::Trainer => ("trainers", "idUser"),
            EntityType::Admin => ("admins", "idUser"),
            EntityType::Preferences => ("userpreferences", "idUser"),
            EntityType::ProfileGeneral => ("client_general", "idClient"),
            EntityType::ProfileFunctional => ("client_functional", "idClient"),
            EntityType::ProfileMorphology => ("client_morphology", "idClient"),
            EntityType::ProfileRom => ("client_rom", "idClient"),
            EntityType::ProfileLifestyle => ("client_lifestyle", "idClient"),
            EntityType::ProfileMedical => ("client_medical", "idClient"),
            EntityType::ProfileAdditional => ("client_additional", "idClient"),
            EntityType::ClientWorkoutCalendar => ("client_workout_calendar", "idClient"),
            EntityType::ExerciseSpec => ("exerciseespecs", "idEx"),
            EntityType::TrainingWorkout => ("trainingworkouts", "idWorkout"),
            EntityType::WorkoutExercises => ("workout_exerciseespec", "idWorkout"),
            EntityType::State => ("states", "idState"),
            EntityType::Transition => ("transitions", "idTransition"),
            EntityType::AngleConstraint => ("angle_constraints", "idConstraint"),
            EntityType::TrainingSession => ("training_sesions", "idSesion"),
            EntityType::SessionReport => ("sesion_reports", "idReport"),
            EntityType::ExerciseSummary => ("exercise_summaries", "idSummary"),
            EntityType::Unknown => return None,
        };
        Some(pair)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityType::User => "User",
            EntityType::Client => "Client",
            EntityType::Trainer => "Trainer",
            EntityType::Admin => "Admin",
            EntityType::Preferences => "Preferences",
            EntityType::ProfileGeneral => "ProfileGeneral",
            EntityType::ProfileFunctional => "ProfileFunctional",
            EntityType::ProfileMorphology => "ProfileMorphology",
            EntityType::ProfileRom => "ProfileROM",
            EntityType::ProfileLifestyle => "ProfileLifestyle",
            EntityType::ProfileMedical => "ProfileMedical",
            EntityType::ProfileAdditional => "ProfileAditional",
            EntityType::ClientWorkoutCalendar => "ClientWorkoutCalendar",
            EntityType::ExerciseSpec => "ExerciseEspec",
            EntityType::TrainingWorkout => "TrainingWorkout",
            EntityType::WorkoutExercises => "WorkoutExercises",
            EntityType::State => "State",
            EntityType::Transition => "Transition",
            EntityType::AngleConstraint => "AngleConstraint",
            EntityType::TrainingSession => "TrainingSesion",
            EntityType::SessionReport => "SesionReport",
            EntityType::ExerciseSummary => "ExerciseSummary",
            EntityType::Unknown => "Unknown",
        }
    }

    /// Variant table holding a user type's extra columns
    pub fn for_user_type(user_type: UserType) -> Self {
        match user_type {
            UserType::Client => EntityType::Client,
            UserType::Trainer => EntityType::Trainer,
            UserType::Admin => EntityType::Admin,
        }
    }

    /// Table holding a profile category
    pub fn for_profile(category: ProfileCategory) -> Self {
        match category {
            ProfileCategory::General => EntityType::ProfileGeneral,
            ProfileCategory::Functional => EntityType::ProfileFunctional,
            ProfileCategory::Morphological => EntityType::ProfileMorphology,
            ProfileCategory::Rom => EntityType::ProfileRom,
            ProfileCategory::Lifestyle => EntityType::ProfileLifestyle,
            ProfileCategory::Medical => EntityType::ProfileMedical,
            ProfileCategory::Additional => EntityType::ProfileAdditional,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised names map to [`EntityType::Unknown`]; matching ignores case
impl FromStr for EntityType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(Self::ALL
            .into_iter()
            .find(|e| {
                e.name().eq_ignore_ascii_case(s) || e.table().is_some_and(|t| t.eq_ignore_ascii_case(s))
            })
            .unwrap_or(EntityType::Unknown))
    }
}

/// A filterable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    IdUser,
    IdClient,
    IdTrainer,
    IdAdmin,
    Email,
    Name,
    UserName,
    FamilyName,
    IdEx,
    IdWorkout,
    IdState,
    IdSesion,
    None,
}

impl Filter {
    pub const ALL: [Filter; 13] = [
        Filter::IdUser,
        Filter::IdClient,
        Filter::IdTrainer,
        Filter::IdAdmin,
        Filter::Email,
        Filter::Name,
        Filter::UserName,
        Filter::FamilyName,
        Filter::IdEx,
        Filter::IdWorkout,
        Filter::IdState,
        Filter::IdSesion,
        Filter::None,
    ];

    /// Column name, empty for [`Filter::None`]
    pub fn column(&self) -> &'static str {
        match self {
            Filter::IdUser => "IdUser",
            Filter::IdClient => "IdClient",
            Filter::IdTrainer => "IdTrainer",
            Filter::IdAdmin => "IdAdmin",
            Filter::Email => "Email",
            Filter::Name => "Name",
            Filter::UserName => "UserName",
            Filter::FamilyName => "FamilyName",
            Filter::IdEx => "IdEx",
            Filter::IdWorkout => "IdWorkout",
            Filter::IdState => "IdState",
            Filter::IdSesion => "IdSesion",
            Filter::None => "",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::None => f.write_str("none"),
            other => f.write_str(other.column()),
        }
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(Self::ALL
            .into_iter()
            .find(|f| *f != Filter::None && f.column().eq_ignore_ascii_case(s))
            .unwrap_or(Filter::None))
    }
}
