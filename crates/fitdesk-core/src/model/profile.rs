//! Client profile: seven independent categories of measurements
//!
//! Six categories are keyed by closed field enums, declared with
//! `profile_fields!`. Numeric fields carry a static `[min, max]` range that
//! every write is checked against. The Additional category is keyed by
//! free-form strings.

use crate::errors::{ModelError, Result};
use crate::model::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// The seven profile categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ProfileCategory {
    General,
    Functional,
    Morphological,
    Rom,
    Lifestyle,
    Medical,
    Additional,
}

impl ProfileCategory {
    pub const ALL: [ProfileCategory; 7] = [
        ProfileCategory::General,
        ProfileCategory::Functional,
        ProfileCategory::Morphological,
        ProfileCategory::Rom,
        ProfileCategory::Lifestyle,
        ProfileCategory::Medical,
        ProfileCategory::Additional,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProfileCategory::General => "General",
            ProfileCategory::Functional => "Functional",
            ProfileCategory::Morphological => "Morphological",
            ProfileCategory::Rom => "ROM",
            ProfileCategory::Lifestyle => "Lifestyle",
            ProfileCategory::Medical => "Medical",
            ProfileCategory::Additional => "Additional",
        }
    }

    /// Case-insensitive parse of [`ProfileCategory::name`]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
    }
}

/// A field of one of the enum-keyed profile categories
pub trait ProfileField: Copy + Ord + Debug + 'static {
    const CATEGORY: ProfileCategory;

    /// Every field of the category, in column order
    fn all() -> &'static [Self];

    /// Physical column name
    fn column_name(&self) -> &'static str;

    /// Inclusive numeric bounds, if the field is ranged
    fn range(&self) -> Option<(f64, f64)>;

    fn entries(profile: &ClientProfile) -> &BTreeMap<Self, Value>;

    fn entries_mut(profile: &mut ClientProfile) -> &mut BTreeMap<Self, Value>;

    /// Case-insensitive lookup by column name
    fn from_column(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.column_name().eq_ignore_ascii_case(name))
    }

    /// Check a value against the field's range
    ///
    /// Unranged fields accept anything. Ranged fields require a numeric
    /// value inside the bounds.
    fn check(&self, value: &Value) -> Result<()> {
        let Some((min, max)) = self.range() else {
            return Ok(());
        };
        let number = value.as_f64().ok_or_else(|| ModelError::NotNumeric {
            field: self.column_name().to_string(),
            value: value.to_text(),
        })?;
        if number < min || number > max {
            return Err(ModelError::OutOfRange {
                field: self.column_name().to_string(),
                value: number,
                min,
                max,
            });
        }
        Ok(())
    }
}

macro_rules! profile_fields {
    (@range $min:literal, $max:literal) => {
        Some(($min as f64, $max as f64))
    };
    (@range) => {
        None
    };
    (
        $(#[$meta:meta])*
        $name:ident in $category:ident => $slot:ident {
            $( $variant:ident $( [$min:literal, $max:literal] )? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum $name {
            $($variant),*
        }

        impl ProfileField for $name {
            const CATEGORY: ProfileCategory = ProfileCategory::$category;

            fn all() -> &'static [Self] {
                &[$($name::$variant),*]
            }

            fn column_name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),*
                }
            }

            fn range(&self) -> Option<(f64, f64)> {
                match self {
                    $($name::$variant => profile_fields!(@range $($min, $max)?)),*
                }
            }

            fn entries(profile: &ClientProfile) -> &BTreeMap<Self, Value> {
                &profile.$slot
            }

            fn entries_mut(profile: &mut ClientProfile) -> &mut BTreeMap<Self, Value> {
                &mut profile.$slot
            }
        }
    };
}

profile_fields! {
    /// Identity and account-level settings
    GeneralField in General => general {
        Qualification,
        Level,
        Language,
        Notifications,
        Units,
        Age [5, 120],
        Gender,
        Weight [30, 170],
        Height [100, 250],
        Plan,
    }
}

profile_fields! {
    /// Functional assessment scores
    FunctionalField in Functional => functional {
        StaticPosture,
        HipMobility [0, 10],
        AnkleMobility [0, 10],
        ShoulderMobilityLevel [0, 10],
        SquatStrength [0, 1000],
        BalanceTest [0, 100],
        CardioLevel [0, 10],
    }
}

profile_fields! {
    /// Body composition and segment lengths (cm, %, bpm)
    MorphologicalField in Morphological => morphological {
        FatPercentage [0, 70],
        MuscleMass [0, 100],
        BMI [10, 60],
        VO2Max [0, 90],
        HeartRate [30, 220],
        TorsoLength [30, 80],
        LegLength [30, 120],
        ArmLength [20, 100],
        ForearmLength [15, 50],
        ThighCircumference [20, 100],
        WaistCircumference [40, 150],
    }
}

profile_fields! {
    /// Joint range of motion, degrees
    RomField in Rom => rom {
        NeckFlexion [0, 80],
        NeckExtension [0, 70],
        NeckRotation [0, 90],
        NeckLateralFlexion [0, 45],
        ShoulderFlexion [0, 180],
        ShoulderExtension [0, 60],
        ShoulderAbduction [0, 180],
        ShoulderAdduction [0, 50],
        ShoulderInternalRotation [0, 90],
        ShoulderExternalRotation [0, 90],
        ElbowFlexion [0, 150],
        ElbowExtension [0, 0],
        ForearmSupination [0, 90],
        ForearmPronation [0, 90],
        WristFlexion [0, 80],
        WristExtension [0, 70],
        WristRadialDeviation [0, 20],
        WristUlnarDeviation [0, 30],
        FingerFlexion [0, 90],
        ThumbOpposition [0, 60],
        ThoracicRotation [0, 35],
        ThoracicLateralFlexion [0, 30],
        ThoracicExtension [0, 25],
        LumbarFlexion [0, 60],
        LumbarExtension [0, 25],
        LumbarLateralFlexion [0, 25],
        LumbarRotation [0, 20],
        HipFlexion [0, 120],
        HipExtension [0, 30],
        HipAbduction [0, 45],
        HipAdduction [0, 30],
        HipInternalRotation [0, 45],
        HipExternalRotation [0, 45],
        KneeFlexion [0, 135],
        KneeExtension [0, 0],
        AnkleDorsiflexion [0, 20],
        AnklePlantarflexion [0, 50],
        FootInversion [0, 35],
        FootEversion [0, 15],
        ToeFlexion [0, 60],
        ToeExtension [0, 60],
    }
}

profile_fields! {
    LifestyleField in Lifestyle => lifestyle {
        TrainingFrequency,
        TypeofTraining,
        PreviousSports,
        SmokingHabits,
    }
}

profile_fields! {
    MedicalField in Medical => medical {
        PreviousInjuries,
        MedicalLimitations,
        PainZones,
    }
}

/// All stored measurements of one client
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClientProfile {
    client_id: i64,
    general: BTreeMap<GeneralField, Value>,
    functional: BTreeMap<FunctionalField, Value>,
    morphological: BTreeMap<MorphologicalField, Value>,
    rom: BTreeMap<RomField, Value>,
    lifestyle: BTreeMap<LifestyleField, Value>,
    medical: BTreeMap<MedicalField, Value>,
    additional: BTreeMap<String, Value>,
}

impl ClientProfile {
    pub fn new(client_id: i64) -> Self {
        Self {
            client_id,
            ..Self::default()
        }
    }

    pub fn client_id(&self) -> i64 {
        self.client_id
    }

    pub fn set_client_id(&mut self, client_id: i64) {
        self.client_id = client_id;
    }

    /// Set a field after checking its range
    ///
    /// Setting `Null` removes the entry. A rejected value leaves the
    /// profile unchanged.
    pub fn set<F: ProfileField>(&mut self, field: F, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if value.is_null() {
            F::entries_mut(self).remove(&field);
            return Ok(());
        }
        field.check(&value)?;
        F::entries_mut(self).insert(field, value);
        Ok(())
    }

    pub fn get<F: ProfileField>(&self, field: F) -> Option<&Value> {
        F::entries(self).get(&field)
    }

    /// All set fields of one category
    pub fn category<F: ProfileField>(&self) -> &BTreeMap<F, Value> {
        F::entries(self)
    }

    /// Set a category field addressed by column name
    pub fn set_by_column<F: ProfileField>(&mut self, column: &str, value: Value) -> Result<()> {
        let field = F::from_column(column).ok_or_else(|| ModelError::UnknownField {
            category: F::CATEGORY.name().to_string(),
            field: column.to_string(),
        })?;
        self.set(field, value)
    }

    pub fn set_additional(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        let key = key.into();
        if value.is_null() {
            self.additional.remove(&key);
        } else {
            self.additional.insert(key, value);
        }
    }

    pub fn additional(&self) -> &BTreeMap<String, Value> {
        &self.additional
    }

    /// Number of set fields in a category
    pub fn category_len(&self, category: ProfileCategory) -> usize {
        match category {
            ProfileCategory::General => self.general.len(),
            ProfileCategory::Functional => self.functional.len(),
            ProfileCategory::Morphological => self.morphological.len(),
            ProfileCategory::Rom => self.rom.len(),
            ProfileCategory::Lifestyle => self.lifestyle.len(),
            ProfileCategory::Medical => self.medical.len(),
            ProfileCategory::Additional => self.additional.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        ProfileCategory::ALL
            .iter()
            .all(|c| self.category_len(*c) == 0)
    }

    /// Set a field addressed by category and column name
    ///
    /// For Additional the column is the free-form key.
    pub fn set_in(&mut self, category: ProfileCategory, column: &str, value: Value) -> Result<()> {
        match category {
            ProfileCategory::General => self.set_by_column::<GeneralField>(column, value),
            ProfileCategory::Functional => self.set_by_column::<FunctionalField>(column, value),
            ProfileCategory::Morphological => {
                self.set_by_column::<MorphologicalField>(column, value)
            }
            ProfileCategory::Rom => self.set_by_column::<RomField>(column, value),
            ProfileCategory::Lifestyle => self.set_by_column::<LifestyleField>(column, value),
            ProfileCategory::Medical => self.set_by_column::<MedicalField>(column, value),
            ProfileCategory::Additional => {
                self.set_additional(column, value);
                Ok(())
            }
        }
    }

    /// Every column of a category with its current value, `Null` when unset
    ///
    /// Enum-keyed categories list all their fields in column order;
    /// Additional lists only the keys that are set.
    pub fn columns(&self, category: ProfileCategory) -> Vec<(String, Value)> {
        match category {
            ProfileCategory::General => self.columns_of::<GeneralField>(),
            ProfileCategory::Functional => self.columns_of::<FunctionalField>(),
            ProfileCategory::Morphological => self.columns_of::<MorphologicalField>(),
            ProfileCategory::Rom => self.columns_of::<RomField>(),
            ProfileCategory::Lifestyle => self.columns_of::<LifestyleField>(),
            ProfileCategory::Medical => self.columns_of::<MedicalField>(),
            ProfileCategory::Additional => self
                .additional
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    fn columns_of<F: ProfileField>(&self) -> Vec<(String, Value)> {
        F::all()
            .iter()
            .map(|f| {
                let value = self.get(*f).cloned().unwrap_or_default();
                (f.column_name().to_string(), value)
            })
            .collect()
    }
}
