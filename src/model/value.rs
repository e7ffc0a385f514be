//! Loosely typed field values used for construction requests and lookups.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::error::CollectionError;

/// Named field values forwarded to an entity constructor.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A single field value, as read from an entity or supplied to its constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Text value.
    Text(String),
    /// Ordered list of values.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns the short kind label used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    /// Returns true for [`FieldValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text if this is a [`FieldValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Converts into required text for `field`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TypeMismatch`] unless the value is text.
    pub fn into_text(self, field: &str) -> Result<String, CollectionError> {
        match self {
            Self::Text(value) => Ok(value),
            other => Err(CollectionError::field_mismatch(field, "text", other.kind())),
        }
    }

    /// Converts into optional text; `Null` maps to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TypeMismatch`] unless the value is text or null.
    pub fn into_opt_text(self, field: &str) -> Result<Option<String>, CollectionError> {
        match self {
            Self::Null => Ok(None),
            other => other.into_text(field).map(Some),
        }
    }

    /// Converts into an optional integer that must fit `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TypeMismatch`] for non-integers or out-of-range values.
    pub fn into_opt_int<T: TryFrom<i64>>(self, field: &str) -> Result<Option<T>, CollectionError> {
        match self {
            Self::Null => Ok(None),
            Self::Int(value) => T::try_from(value)
                .map(Some)
                .map_err(|_| CollectionError::field_mismatch(field, "in-range int", "int")),
            other => Err(CollectionError::field_mismatch(field, "int", other.kind())),
        }
    }

    /// Converts into a list of strings. A single text value becomes a one-item list.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TypeMismatch`] if any element is not text.
    pub fn into_text_list(self, field: &str) -> Result<Vec<String>, CollectionError> {
        match self {
            Self::Null => Ok(Vec::new()),
            Self::Text(value) => Ok(vec![value]),
            Self::List(values) => values
                .into_iter()
                .map(|value| value.into_text(field))
                .collect(),
            other => Err(CollectionError::field_mismatch(field, "list", other.kind())),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
            Self::List(values) => {
                write!(f, "[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Null, Self::Int)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`FieldMap`] from `(name, value)` pairs.
///
/// ```
/// use citelink_core::model::{FieldValue, fields};
///
/// let map = fields([("family", "Jolie".into()), ("given", "Angelina".into())]);
/// assert_eq!(map.get("family"), Some(&FieldValue::from("Jolie")));
/// ```
#[must_use]
pub fn fields<'a>(pairs: impl IntoIterator<Item = (&'a str, FieldValue)>) -> FieldMap {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_option_converts_to_null() {
        let value: FieldValue = Option::<String>::None.into();
        assert!(value.is_null());
        let value: FieldValue = Some("x").into();
        assert_eq!(value.as_text(), Some("x"));
    }

    #[test]
    fn test_into_opt_int_rejects_text() {
        let err = FieldValue::from("1999").into_opt_int::<u16>("year").unwrap_err();
        assert!(err.to_string().contains("year"));
    }

    #[test]
    fn test_into_opt_int_rejects_out_of_range() {
        let err = FieldValue::Int(70_000).into_opt_int::<u16>("year").unwrap_err();
        assert!(matches!(err, CollectionError::TypeMismatch { .. }));
    }

    #[test]
    fn test_into_text_list_accepts_single_text() {
        let list = FieldValue::from("Smith").into_text_list("authors").unwrap();
        assert_eq!(list, vec!["Smith".to_string()]);
    }

    #[test]
    fn test_display_list() {
        let value = FieldValue::from(vec![1_i64, 2]);
        assert_eq!(value.to_string(), "[1, 2]");
    }
}
