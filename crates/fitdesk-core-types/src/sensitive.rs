//! Sensitive data marker for automatic redaction
//!
//! Passwords travel through the user model wrapped in `Sensitive<T>` so
//! that neither `Debug`, `Display` nor JSON output of a user ever shows
//! them.

use serde::{Serialize, Serializer};
use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Wrapper for sensitive data that redacts itself in Debug, Display and
/// serialized output
///
/// # Example
///
/// ```
/// use fitdesk_core_types::Sensitive;
///
/// let password = Sensitive::new("hunter2");
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(password.expose(), &"hunter2");
/// ```
#[derive(Default, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    ///
    /// Only the persistence layer needs this, when the credential is
    /// written to its column.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Sensitive<String> {
    /// True when the wrapped string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Serialize for Sensitive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl From<String> for Sensitive<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Sensitive<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_redacted_in_debug_and_display() {
        let secret = Sensitive::new("pw-1234".to_string());
        assert_eq!(format!("{:?}", secret), REDACTED);
        assert_eq!(format!("{}", secret), REDACTED);
    }

    #[test]
    fn test_password_redacted_in_json() {
        #[derive(Serialize)]
        struct Login {
            user_name: String,
            password: Sensitive<String>,
        }

        let login = Login {
            user_name: "coach".to_string(),
            password: "pw-1234".into(),
        };
        let json = serde_json::to_string(&login).unwrap();
        assert!(json.contains("coach"));
        assert!(!json.contains("pw-1234"));
        assert!(json.contains(REDACTED));
    }

    #[test]
    fn test_expose_and_into_inner() {
        let secret: Sensitive<String> = "abc".into();
        assert_eq!(secret.expose(), "abc");
        assert!(!secret.is_empty());
        assert_eq!(secret.clone().into_inner(), "abc");
        assert!(Sensitive::new(String::new()).is_empty());
    }

    #[test]
    fn test_equality_compares_inner_value() {
        assert_eq!(Sensitive::new(1), Sensitive::new(1));
        assert_ne!(Sensitive::new(1), Sensitive::new(2));
    }
}
