use thiserror::Error;

/// Result type alias using ModelError
pub type Result<T> = std::result::Result<T, ModelError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure inside the persistence layer is classified by one of these
/// kinds. Public repository and engine calls collapse failures into neutral
/// values (`None`, `false`, an empty relation), but the kind and its stable
/// code are what gets logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    MissingField,
    ValidationFailure,
    OutOfRange,

    // Catalog
    UnknownEntityType,
    FilterInvalid,
    UnknownUserType,

    // Schema
    SchemaLoad,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Image,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::ValidationFailure => "ERR_VALIDATION_FAILURE",
            ExErrorKind::OutOfRange => "ERR_OUT_OF_RANGE",
            ExErrorKind::UnknownEntityType => "ERR_UNKNOWN_ENTITY_TYPE",
            ExErrorKind::FilterInvalid => "ERR_FILTER_INVALID",
            ExErrorKind::UnknownUserType => "ERR_UNKNOWN_USER_TYPE",
            ExErrorKind::SchemaLoad => "ERR_SCHEMA_LOAD",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Image => "ERR_IMAGE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context
/// (operation, entity, table) for the log line.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    table: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            table: None,
            message: String::new(),
            source: None,
        }
    }

    /// Set the operation name
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Set the entity ID (user id, client id, row key)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Set the physical table the failure relates to
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation name, if set
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID, if set
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the table name, if set
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain-level rejections raised while building or mutating model values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A field required for a valid user was absent or empty
    #[error("Required field missing: {field}")]
    MissingField { field: String },

    /// The discriminator string does not name a known user type
    #[error("Unknown user type: {value}")]
    UnknownUserType { value: String },

    /// A ranged profile field received a value outside its bounds
    #[error("Value {value} for {field} outside range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A ranged profile field received a value that is not a number
    #[error("Value for {field} is not numeric: {value}")]
    NotNumeric { field: String, value: String },

    /// A column name matched no field of the category
    #[error("Unknown field {field} in category {category}")]
    UnknownField { category: String, field: String },

    /// A stored date could not be parsed
    #[error("Invalid date for {field}: {value}")]
    InvalidDate { field: String, value: String },

    /// Encoding or decoding a profile picture failed
    #[error("Image codec error: {message}")]
    Image { message: String },

    /// JSON payload (preferences graph, additional profile data) was malformed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from ModelError to ExError
impl From<ModelError> for ExError {
    fn from(err: ModelError) -> Self {
        let message = err.to_string();
        match err {
            ModelError::MissingField { field } => ExError::new(ExErrorKind::MissingField)
                .with_entity_id(field)
                .with_message(message),

            ModelError::UnknownUserType { .. } => {
                ExError::new(ExErrorKind::UnknownUserType).with_message(message)
            }

            ModelError::OutOfRange { field, .. } => ExError::new(ExErrorKind::OutOfRange)
                .with_entity_id(field)
                .with_message(message),

            ModelError::NotNumeric { field, .. } | ModelError::UnknownField { field, .. } => {
                ExError::new(ExErrorKind::ValidationFailure)
                    .with_entity_id(field)
                    .with_message(message)
            }

            ModelError::InvalidDate { field, .. } => ExError::new(ExErrorKind::ValidationFailure)
                .with_entity_id(field)
                .with_message(message),

            ModelError::Image { .. } => ExError::new(ExErrorKind::Image).with_message(message),

            ModelError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to ModelError
impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization {
            message: err.to_string(),
        }
    }
}
