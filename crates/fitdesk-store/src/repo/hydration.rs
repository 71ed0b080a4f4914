//! Hydration layer: users to rows and back
//!
//! Pure conversions between [`User`] and the relations the engine reads and
//! writes. Nothing here touches the connection.

#![allow(clippy::result_large_err)]

use crate::catalog::EntityType;
use crate::errors::Result;
use crate::relation::Relation;
use fitdesk_core::errors::{ExError, ExErrorKind};
use fitdesk_core::model::user::{parse_date, DATE_FORMAT};
use fitdesk_core::model::{
    ClientData, FieldMap, ProfilePicture, User, UserField, UserType, Value,
};
use std::path::Path;

/// Single-row relation holding a user's common columns
pub fn common_row(user: &User, picture_png: Vec<u8>) -> Relation {
    let mut fields = user.common_field_map();
    fields.insert(UserField::ProfilePicture, Value::Blob(picture_png));
    single_row(EntityType::User, &UserField::COMMON, &fields)
}

/// Single-row relation holding the variant table's columns
pub fn variant_row(user: &User) -> Relation {
    let mut fields = user.kind().to_field_map();
    fields.insert(UserField::IdUser, user.id().into());
    let user_type = user.user_type();
    single_row(
        EntityType::for_user_type(user_type),
        UserField::variant_columns(user_type),
        &fields,
    )
}

fn single_row(entity: EntityType, columns: &[UserField], fields: &FieldMap) -> Relation {
    let mut relation = Relation::new(entity.table().unwrap_or_default());
    relation.set_columns(columns.iter().map(UserField::column_name));
    relation.add_row(
        columns
            .iter()
            .map(|f| fields.get(f).cloned().unwrap_or_default())
            .collect(),
    );
    relation
}

/// The stored user type of the first row of a `users` relation
pub fn stored_user_type(common: &Relation) -> Result<UserType> {
    let raw = common.value(0, UserField::UserType.column_name()).to_text();
    raw.parse::<UserType>().map_err(|e| {
        ExError::from(e)
            .with_op("get_user_by_id")
            .with_table(EntityType::User.table().unwrap_or_default())
    })
}

/// Merge the first rows of the common and the variant relation
///
/// Columns that are not user fields are ignored. A variant column never
/// overwrites a common one.
pub fn merge_rows(common: &Relation, variant: &Relation) -> FieldMap {
    let mut fields = FieldMap::new();
    for relation in [common, variant] {
        for (column, value) in relation.row_entries(0) {
            if let Some(field) = UserField::from_column(column) {
                fields.entry(field).or_insert(value);
            }
        }
    }
    fields
}

/// Build a user from merged rows, decoding the stored picture
///
/// Fails with `ValidationFailure` when the rows do not make a valid user.
pub fn user_from_rows(user_type: UserType, fields: &FieldMap) -> Result<User> {
    User::required_fields(fields).map_err(|e| {
        ExError::from(e)
            .with_op("get_user_by_id")
            .with_table(EntityType::User.table().unwrap_or_default())
    })?;

    let mut user = User::from_field_map(user_type, fields);
    if !user.is_valid() {
        return Err(ExError::new(ExErrorKind::ValidationFailure)
            .with_op("get_user_by_id")
            .with_entity_id(user.id().to_string())
            .with_message("stored user is not valid"));
    }
    user.set_profile_picture(
        fields
            .get(&UserField::ProfilePicture)
            .and_then(|v| decode_picture(user.id(), v)),
    );
    Ok(user)
}

/// Decode a stored picture; undecodable bytes are logged and dropped
pub fn decode_picture(user_id: i64, value: &Value) -> Option<ProfilePicture> {
    let bytes = value.as_blob().filter(|b| !b.is_empty())?;
    match ProfilePicture::from_png(bytes) {
        Ok(picture) => Some(picture),
        Err(e) => {
            tracing::warn!(user_id, error = %e, "stored profile picture is not a PNG, dropped");
            None
        }
    }
}

/// Stock picture bundled with the crate
pub const STOCK_PICTURE_PNG: &[u8] = include_bytes!("../../assets/blank_profile.png");

/// PNG bytes stored for a user without a picture
///
/// A configured stock image is used when it decodes; otherwise the bundled
/// one is, and a generated 1x1 blank only if that fails to decode too.
pub fn blank_picture_png(path: Option<&Path>) -> Result<Vec<u8>> {
    if let Some(path) = path {
        match std::fs::read(path) {
            Ok(bytes) if ProfilePicture::from_png(&bytes).is_ok() => return Ok(bytes),
            Ok(_) => {
                tracing::warn!(path = %path.display(), "stock picture is not a PNG, using bundled one");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "stock picture unreadable, using bundled one");
            }
        }
    }
    match ProfilePicture::from_png(STOCK_PICTURE_PNG) {
        Ok(_) => Ok(STOCK_PICTURE_PNG.to_vec()),
        Err(e) => {
            tracing::warn!(error = %e, "bundled stock picture unusable, using generated blank");
            Ok(ProfilePicture::blank(1, 1).to_png()?)
        }
    }
}

/// PNG bytes for the user's own picture, or the stock blank
pub fn picture_png(user: &User, blank_path: Option<&Path>) -> Result<Vec<u8>> {
    match user.profile_picture() {
        Some(picture) => Ok(picture.to_png()?),
        None => blank_picture_png(blank_path),
    }
}

/// Calendar relation for `client_workout_calendar`, one row per date
pub fn calendar_rows(client_id: i64, data: &ClientData) -> Relation {
    let mut relation = Relation::new(EntityType::ClientWorkoutCalendar.table().unwrap_or_default());
    relation.set_columns(["idClient", "date", "idWorkout"]);
    for (date, workout) in &data.workout_calendar {
        relation.add_row(vec![
            client_id.into(),
            date.format(DATE_FORMAT).to_string().into(),
            (*workout).into(),
        ]);
    }
    relation
}

/// Replay stored calendar rows into the client's data
///
/// Rows with an unparseable date or workout id are logged and skipped.
pub fn apply_calendar(data: &mut ClientData, rows: &Relation) {
    for row in 0..rows.row_count() {
        let date = rows.value(row, "date");
        let workout = rows.value(row, "idWorkout");
        match (parse_date(&date.to_text()), workout.as_i64()) {
            (Some(date), Some(workout)) => {
                data.schedule_workout(date, workout);
            }
            _ => {
                tracing::warn!(date = %date, workout = %workout, "calendar row skipped");
            }
        }
    }
}
