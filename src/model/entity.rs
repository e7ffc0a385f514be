//! The entity contract shared by everything stored in a [`UniqueCollection`](super::UniqueCollection).

use std::fmt;

use super::error::CollectionError;
use super::value::{FieldMap, FieldValue};

/// Reads one named property from an entity.
///
/// Tables of accessors are declared once per entity type and drive
/// [`UniqueCollection::find_by`](super::UniqueCollection::find_by).
pub struct Accessor<T> {
    /// Field or computed property name.
    pub name: &'static str,
    /// Read function.
    pub read: fn(&T) -> FieldValue,
}

impl<T> Accessor<T> {
    /// Creates an accessor.
    #[must_use]
    pub const fn new(name: &'static str, read: fn(&T) -> FieldValue) -> Self {
        Self { name, read }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").field("name", &self.name).finish()
    }
}

/// A structured record compared by full attribute equality.
///
/// `PartialEq` must compare every attribute; collections rely on it to
/// reject duplicates.
pub trait Entity: Clone + PartialEq + Default + fmt::Debug + 'static {
    /// Human-readable type name used in errors and logs.
    const KIND: &'static str;

    /// Field names consumed, in order, by positional construction.
    const POSITIONAL: &'static [&'static str];

    /// Accessor table covering direct fields and computed properties.
    fn accessors() -> &'static [Accessor<Self>];

    /// Builds an instance from named fields. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::UnknownField`] or [`CollectionError::TypeMismatch`].
    fn from_named(fields: FieldMap) -> Result<Self, CollectionError>;

    /// Builds an instance from positional values, mapped onto [`Entity::POSITIONAL`].
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TooManyValues`] when more values than positional
    /// fields are supplied, or any error from [`Entity::from_named`].
    fn from_positional(values: Vec<FieldValue>) -> Result<Self, CollectionError> {
        if values.len() > Self::POSITIONAL.len() {
            return Err(CollectionError::TooManyValues {
                kind: Self::KIND,
                expected: Self::POSITIONAL.len(),
                found: values.len(),
            });
        }
        let named = Self::POSITIONAL
            .iter()
            .zip(values)
            .map(|(name, value)| ((*name).to_string(), value))
            .collect();
        Self::from_named(named)
    }

    /// Reads a field or computed property by name.
    fn field(&self, name: &str) -> Option<FieldValue> {
        Self::accessors()
            .iter()
            .find(|accessor| accessor.name == name)
            .map(|accessor| (accessor.read)(self))
    }

    /// Returns true if every criterion names a known property with an equal value.
    fn matches(&self, criteria: &[(&str, FieldValue)]) -> bool {
        criteria
            .iter()
            .all(|(name, expected)| self.field(name).as_ref() == Some(expected))
    }
}
