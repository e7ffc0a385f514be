//! Insertion-ordered collection that rejects attribute-equal duplicates.

use std::any::Any;

use serde::Serialize;
use tracing::{debug, trace};

use super::entity::Entity;
use super::error::CollectionError;
use super::value::{FieldMap, FieldValue};

/// How [`UniqueCollection::add`] should obtain the item to insert.
#[derive(Debug, Clone)]
pub enum Construct<T> {
    /// A pre-built instance.
    Instance(T),
    /// Positional values forwarded to [`Entity::from_positional`].
    Positional(Vec<FieldValue>),
    /// Named values forwarded to [`Entity::from_named`].
    Named(FieldMap),
    /// `T::default()`.
    Default,
}

impl<T: Entity> Construct<T> {
    fn build(self) -> Result<T, CollectionError> {
        match self {
            Self::Instance(item) => Ok(item),
            Self::Positional(values) => T::from_positional(values),
            Self::Named(fields) => T::from_named(fields),
            Self::Default => Ok(T::default()),
        }
    }
}

/// Holds entities of one type in insertion order; no two members are attribute-equal.
///
/// Members are never mutated in place. [`UniqueCollection::modify`] replaces a
/// member with an updated copy only when the copy stays unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UniqueCollection<T> {
    items: Vec<T>,
}

impl<T> Default for UniqueCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> UniqueCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs one item as requested and appends it.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Duplicate`] if an attribute-equal member exists,
    /// or any construction error. The collection is unchanged on failure.
    pub fn add(&mut self, request: Construct<T>) -> Result<&T, CollectionError> {
        let item = request.build()?;
        if self.items.contains(&item) {
            debug!(kind = T::KIND, item = ?item, "rejected duplicate entity");
            return Err(CollectionError::duplicate(T::KIND, &item));
        }
        trace!(kind = T::KIND, position = self.items.len(), "entity added");
        self.items.push(item);
        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// Appends a pre-built instance.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Duplicate`] if an attribute-equal member exists.
    pub fn push(&mut self, item: T) -> Result<&T, CollectionError> {
        self.add(Construct::Instance(item))
    }

    /// Constructs an item from positional values and appends it.
    ///
    /// # Errors
    ///
    /// See [`UniqueCollection::add`].
    pub fn add_positional(&mut self, values: Vec<FieldValue>) -> Result<&T, CollectionError> {
        self.add(Construct::Positional(values))
    }

    /// Constructs an item from named fields and appends it.
    ///
    /// # Errors
    ///
    /// See [`UniqueCollection::add`].
    pub fn add_named(&mut self, fields: FieldMap) -> Result<&T, CollectionError> {
        self.add(Construct::Named(fields))
    }

    /// Appends `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Duplicate`] if a default member is already present.
    pub fn add_default(&mut self) -> Result<&T, CollectionError> {
        self.add(Construct::Default)
    }

    /// Appends a type-erased instance.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TypeMismatch`] if `item` is not a `T`, otherwise
    /// behaves like [`UniqueCollection::push`].
    pub fn add_any(&mut self, item: Box<dyn Any>) -> Result<&T, CollectionError> {
        match item.downcast::<T>() {
            Ok(item) => self.push(*item),
            Err(_) => Err(CollectionError::instance_mismatch(
                T::KIND,
                "an instance of a different type",
            )),
        }
    }

    /// Appends every item in order, stopping at the first failure.
    ///
    /// Items appended before the failure stay in the collection.
    ///
    /// # Errors
    ///
    /// Returns the first [`CollectionError::Duplicate`] encountered.
    pub fn try_extend(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), CollectionError> {
        for item in items {
            self.push(item)?;
        }
        Ok(())
    }

    /// Returns the first member (in insertion order) matching every criterion.
    ///
    /// Criteria name direct fields or computed properties from [`Entity::accessors`].
    /// An unknown name never matches.
    #[must_use]
    pub fn find_by(&self, criteria: &[(&str, FieldValue)]) -> Option<&T> {
        self.items.iter().find(|item| item.matches(criteria))
    }

    /// Attribute-equality membership test.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Index of the attribute-equal member, if any.
    #[must_use]
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|member| member == item)
    }

    /// Replaces the member at `index` with an updated copy.
    ///
    /// `update` runs on a clone. The copy is stored only if `update` succeeds and
    /// the copy is not attribute-equal to another member; otherwise the collection
    /// is left untouched. Returns `Ok(None)` when `index` is out of bounds.
    ///
    /// # Errors
    ///
    /// Returns the error from `update`, or [`CollectionError::Duplicate`].
    pub fn modify<F>(&mut self, index: usize, update: F) -> Result<Option<&T>, CollectionError>
    where
        F: FnOnce(&mut T) -> Result<(), CollectionError>,
    {
        let Some(current) = self.items.get(index) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        update(&mut updated)?;
        let collides = self
            .items
            .iter()
            .enumerate()
            .any(|(position, member)| position != index && *member == updated);
        if collides {
            return Err(CollectionError::duplicate(T::KIND, &updated));
        }
        self.items[index] = updated;
        Ok(Some(&self.items[index]))
    }

    /// Removes and returns the attribute-equal member, if present.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let index = self.position(item)?;
        Some(self.items.remove(index))
    }
}

impl<T> UniqueCollection<T> {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// First inserted member.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Last inserted member.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Members as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a UniqueCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for UniqueCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
