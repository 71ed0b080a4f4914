pub mod picture;
pub mod preferences;
pub mod profile;
pub mod user;
pub mod value;

pub use picture::ProfilePicture;
pub use preferences::UserPreferences;
pub use profile::{
    ClientProfile, FunctionalField, GeneralField, LifestyleField, MedicalField,
    MorphologicalField, ProfileCategory, ProfileField, RomField,
};
pub use user::{
    AdminData, ClientData, FieldMap, TrainerData, User, UserField, UserKind, UserType, NEW_ID,
};
pub use value::Value;
