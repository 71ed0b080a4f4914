use crate::errors::{ModelError, Result};
use crate::model::picture::ProfilePicture;
use crate::model::profile::ClientProfile;
use crate::model::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use fitdesk_core_types::Sensitive;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Id of a user that has never been saved
pub const NEW_ID: i64 = -1;

/// Storage format of `join_up_date` and `last_login`
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Storage format of workout calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Discriminator stored in `users.userType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum UserType {
    Client,
    Trainer,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Client => "Client",
            UserType::Trainer => "Trainer",
            UserType::Admin => "Admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive
impl FromStr for UserType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(UserType::Client),
            "trainer" => Ok(UserType::Trainer),
            "admin" => Ok(UserType::Admin),
            _ => Err(ModelError::UnknownUserType {
                value: s.to_string(),
            }),
        }
    }
}

/// Every column a user is assembled from, across the common and the
/// variant tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    IdUser,
    UserName,
    Email,
    Password,
    UserType,
    JoinUpDate,
    LastLogin,
    ProfilePicture,
    Plan,
    Qualifications,
    SpecialtyArea,
    Resume,
    ExperienceYears,
    PermissionLevel,
    RoleDescription,
    CanManageUsers,
    CanModifyPlans,
}

impl UserField {
    /// Columns of the `users` table, in declaration order
    pub const COMMON: [UserField; 8] = [
        UserField::IdUser,
        UserField::UserName,
        UserField::Email,
        UserField::Password,
        UserField::UserType,
        UserField::JoinUpDate,
        UserField::LastLogin,
        UserField::ProfilePicture,
    ];

    const ALL: [UserField; 17] = [
        UserField::IdUser,
        UserField::UserName,
        UserField::Email,
        UserField::Password,
        UserField::UserType,
        UserField::JoinUpDate,
        UserField::LastLogin,
        UserField::ProfilePicture,
        UserField::Plan,
        UserField::Qualifications,
        UserField::SpecialtyArea,
        UserField::Resume,
        UserField::ExperienceYears,
        UserField::PermissionLevel,
        UserField::RoleDescription,
        UserField::CanManageUsers,
        UserField::CanModifyPlans,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            UserField::IdUser => "idUser",
            UserField::UserName => "userName",
            UserField::Email => "email",
            UserField::Password => "password",
            UserField::UserType => "userType",
            UserField::JoinUpDate => "join_up_date",
            UserField::LastLogin => "last_login",
            UserField::ProfilePicture => "profile_picture",
            UserField::Plan => "plan",
            UserField::Qualifications => "qualifications",
            UserField::SpecialtyArea => "specialtyArea",
            UserField::Resume => "resume",
            UserField::ExperienceYears => "experienceYears",
            UserField::PermissionLevel => "permissionLevel",
            UserField::RoleDescription => "roleDescription",
            UserField::CanManageUsers => "canManageUsers",
            UserField::CanModifyPlans => "canModifyPlans",
        }
    }

    /// Case-insensitive lookup by column name
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.column_name().eq_ignore_ascii_case(name))
    }

    /// Columns of the variant table for a user type, primary key first
    pub fn variant_columns(user_type: UserType) -> &'static [UserField] {
        match user_type {
            UserType::Client => &[UserField::IdUser, UserField::Plan],
            UserType::Trainer => &[
                UserField::IdUser,
                UserField::Qualifications,
                UserField::SpecialtyArea,
                UserField::Resume,
                UserField::ExperienceYears,
            ],
            UserType::Admin => &[
                UserField::IdUser,
                UserField::PermissionLevel,
                UserField::RoleDescription,
                UserField::CanManageUsers,
                UserField::CanModifyPlans,
            ],
        }
    }
}

/// Field map a user is built from
pub type FieldMap = BTreeMap<UserField, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClientData {
    pub plan: String,
    #[serde(skip)]
    pub profile: Option<ClientProfile>,
    /// One workout per date
    pub workout_calendar: BTreeMap<NaiveDate, i64>,
}

impl ClientData {
    /// Schedule a workout, replacing whatever was planned that day
    pub fn schedule_workout(&mut self, date: NaiveDate, workout_id: i64) -> Option<i64> {
        self.workout_calendar.insert(date, workout_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TrainerData {
    pub qualifications: String,
    pub specialty_area: String,
    pub resume: String,
    pub experience_years: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AdminData {
    pub permission_level: i64,
    pub role_description: String,
    pub can_manage_users: bool,
    pub can_modify_plans: bool,
}

/// Variant-specific part of a user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "userType")]
pub enum UserKind {
    Client(ClientData),
    Trainer(TrainerData),
    Admin(AdminData),
}

impl UserKind {
    pub fn user_type(&self) -> UserType {
        match self {
            UserKind::Client(_) => UserType::Client,
            UserKind::Trainer(_) => UserType::Trainer,
            UserKind::Admin(_) => UserType::Admin,
        }
    }

    /// Variant fields as a field map (without `idUser`)
    pub fn to_field_map(&self) -> FieldMap {
        let mut map = FieldMap::new();
        match self {
            UserKind::Client(c) => {
                map.insert(UserField::Plan, c.plan.clone().into());
            }
            UserKind::Trainer(t) => {
                map.insert(UserField::Qualifications, t.qualifications.clone().into());
                map.insert(UserField::SpecialtyArea, t.specialty_area.clone().into());
                map.insert(UserField::Resume, t.resume.clone().into());
                map.insert(UserField::ExperienceYears, t.experience_years.into());
            }
            UserKind::Admin(a) => {
                map.insert(UserField::PermissionLevel, a.permission_level.into());
                map.insert(UserField::RoleDescription, a.role_description.clone().into());
                map.insert(UserField::CanManageUsers, a.can_manage_users.into());
                map.insert(UserField::CanModifyPlans, a.can_modify_plans.into());
            }
        }
        map
    }

    fn from_field_map(user_type: UserType, fields: &FieldMap) -> Self {
        let text = |f: UserField| fields.get(&f).map(Value::to_text).unwrap_or_default();
        let int = |f: UserField| fields.get(&f).and_then(Value::as_i64).unwrap_or_default();
        let flag = |f: UserField| fields.get(&f).and_then(Value::as_bool).unwrap_or_default();
        match user_type {
            UserType::Client => UserKind::Client(ClientData {
                plan: text(UserField::Plan),
                ..ClientData::default()
            }),
            UserType::Trainer => UserKind::Trainer(TrainerData {
                qualifications: text(UserField::Qualifications),
                specialty_area: text(UserField::SpecialtyArea),
                resume: text(UserField::Resume),
                experience_years: int(UserField::ExperienceYears),
            }),
            UserType::Admin => UserKind::Admin(AdminData {
                permission_level: int(UserField::PermissionLevel),
                role_description: text(UserField::RoleDescription),
                can_manage_users: flag(UserField::CanManageUsers),
                can_modify_plans: flag(UserField::CanModifyPlans),
            }),
        }
    }
}

/// Parse a stored timestamp; date-only values read as midnight
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a stored calendar date; timestamps are truncated to their date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date()))
}

/// A user of the application
///
/// Validity is decided once at construction: a user is valid only if id,
/// user name, email and password were all present and non-empty. Invalid
/// users are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: i64,
    user_name: String,
    email: String,
    password: Sensitive<String>,
    join_date: Option<NaiveDateTime>,
    last_login: Option<NaiveDateTime>,
    #[serde(skip)]
    profile_picture: Option<ProfilePicture>,
    #[serde(skip)]
    valid: bool,
    #[serde(flatten)]
    kind: UserKind,
}

impl User {
    /// Build a user; use [`NEW_ID`] for one not yet stored
    pub fn new(
        id: i64,
        user_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<Sensitive<String>>,
        kind: UserKind,
    ) -> Self {
        let user_name = user_name.into();
        let email = email.into();
        let password = password.into();
        let valid = !user_name.trim().is_empty()
            && !email.trim().is_empty()
            && !password.expose().trim().is_empty();
        Self {
            id,
            user_name,
            email,
            password,
            join_date: None,
            last_login: None,
            profile_picture: None,
            valid,
            kind,
        }
    }

    pub fn client(
        id: i64,
        user_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<Sensitive<String>>,
        plan: impl Into<String>,
    ) -> Self {
        let data = ClientData {
            plan: plan.into(),
            ..ClientData::default()
        };
        Self::new(id, user_name, email, password, UserKind::Client(data))
    }

    pub fn trainer(
        id: i64,
        user_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<Sensitive<String>>,
        data: TrainerData,
    ) -> Self {
        Self::new(id, user_name, email, password, UserKind::Trainer(data))
    }

    pub fn admin(
        id: i64,
        user_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<Sensitive<String>>,
        data: AdminData,
    ) -> Self {
        Self::new(id, user_name, email, password, UserKind::Admin(data))
    }

    /// Build from a merged field map (common and variant columns)
    ///
    /// Missing required fields do not fail construction; they produce a
    /// user whose [`User::is_valid`] is false. Use [`User::required_fields`]
    /// to learn which field was missing.
    pub fn from_field_map(user_type: UserType, fields: &FieldMap) -> Self {
        let text = |f: UserField| fields.get(&f).map(Value::to_text).unwrap_or_default();
        let id = fields
            .get(&UserField::IdUser)
            .and_then(Value::as_i64)
            .unwrap_or(NEW_ID);

        let mut user = Self::new(
            id,
            text(UserField::UserName),
            text(UserField::Email),
            text(UserField::Password),
            UserKind::from_field_map(user_type, fields),
        );
        user.valid = user.valid && Self::required_fields(fields).is_ok();
        user.join_date = fields
            .get(&UserField::JoinUpDate)
            .and_then(|v| parse_datetime(&v.to_text()));
        user.last_login = fields
            .get(&UserField::LastLogin)
            .and_then(|v| parse_datetime(&v.to_text()));
        user
    }

    /// Check that id, user name, email and password are supplied
    pub fn required_fields(fields: &FieldMap) -> Result<()> {
        for field in [
            UserField::IdUser,
            UserField::UserName,
            UserField::Email,
            UserField::Password,
        ] {
            if !fields.get(&field).is_some_and(Value::is_supplied) {
                return Err(ModelError::MissingField {
                    field: field.column_name().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Assign the id allocated on first save
    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &Sensitive<String> {
        &self.password
    }

    pub fn user_type(&self) -> UserType {
        self.kind.user_type()
    }

    pub fn kind(&self) -> &UserKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut UserKind {
        &mut self.kind
    }

    pub fn join_date(&self) -> Option<NaiveDateTime> {
        self.join_date
    }

    pub fn set_join_date(&mut self, at: Option<NaiveDateTime>) {
        self.join_date = at;
    }

    pub fn last_login(&self) -> Option<NaiveDateTime> {
        self.last_login
    }

    pub fn set_last_login(&mut self, at: Option<NaiveDateTime>) {
        self.last_login = at;
    }

    pub fn profile_picture(&self) -> Option<&ProfilePicture> {
        self.profile_picture.as_ref()
    }

    pub fn set_profile_picture(&mut self, picture: Option<ProfilePicture>) {
        self.profile_picture = picture;
    }

    /// Client-specific data, when this user is a client
    pub fn as_client(&self) -> Option<&ClientData> {
        match &self.kind {
            UserKind::Client(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_client_mut(&mut self) -> Option<&mut ClientData> {
        match &mut self.kind {
            UserKind::Client(c) => Some(c),
            _ => None,
        }
    }

    /// Common columns except the picture, which needs encoding
    pub fn common_field_map(&self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert(UserField::IdUser, self.id.into());
        map.insert(UserField::UserName, self.user_name.clone().into());
        map.insert(UserField::Email, self.email.clone().into());
        map.insert(UserField::Password, self.password.expose().clone().into());
        map.insert(UserField::UserType, self.user_type().as_str().into());
        map.insert(
            UserField::JoinUpDate,
            self.join_date
                .map(|d| d.format(DATETIME_FORMAT).to_string())
                .into(),
        );
        map.insert(
            UserField::LastLogin,
            self.last_login
                .map(|d| d.format(DATETIME_FORMAT).to_string())
                .into(),
        );
        map
    }
}
