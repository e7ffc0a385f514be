//! Authors and affiliations of a paper.

use serde::Serialize;

use super::entity::{Accessor, Entity};
use super::error::CollectionError;
use super::value::FieldMap;

/// A paper author, either structured (family/given) or a literal name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Author {
    /// Family name.
    pub family: Option<String>,
    /// Given names.
    pub given: Option<String>,
    /// Unstructured name, used when the markup carries no name parts.
    pub literal: Option<String>,
    /// Correspondence e-mail.
    pub email: Option<String>,
    /// Affiliation text.
    pub affiliation: Option<String>,
}

impl Author {
    /// Creates a structured author.
    #[must_use]
    pub fn named(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            given: Some(given.into()),
            ..Self::default()
        }
    }

    /// Creates an author from an unstructured name.
    #[must_use]
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            literal: Some(name.into()),
            ..Self::default()
        }
    }

    /// Name suitable for display: `Given Family`, or the literal name.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match (&self.given, &self.family) {
            (Some(given), Some(family)) => Some(format!("{given} {family}")),
            (None, Some(family)) => Some(family.clone()),
            (Some(given), None) => Some(given.clone()),
            (None, None) => self.literal.clone(),
        }
    }
}

static AUTHOR_FIELDS: &[Accessor<Author>] = &[
    Accessor::new("family", |a: &Author| a.family.as_deref().into()),
    Accessor::new("given", |a: &Author| a.given.as_deref().into()),
    Accessor::new("literal", |a: &Author| a.literal.as_deref().into()),
    Accessor::new("email", |a: &Author| a.email.as_deref().into()),
    Accessor::new("affiliation", |a: &Author| a.affiliation.as_deref().into()),
    Accessor::new("display_name", |a: &Author| a.display_name().into()),
];

impl Entity for Author {
    const KIND: &'static str = "Author";
    const POSITIONAL: &'static [&'static str] = &["family", "given"];

    fn accessors() -> &'static [Accessor<Self>] {
        AUTHOR_FIELDS
    }

    fn from_named(fields: FieldMap) -> Result<Self, CollectionError> {
        let mut author = Self::default();
        for (name, value) in fields {
            match name.as_str() {
                "family" => author.family = value.into_opt_text("family")?,
                "given" => author.given = value.into_opt_text("given")?,
                "literal" => author.literal = value.into_opt_text("literal")?,
                "email" => author.email = value.into_opt_text("email")?,
                "affiliation" => author.affiliation = value.into_opt_text("affiliation")?,
                other => return Err(CollectionError::unknown_field(Self::KIND, other)),
            }
        }
        Ok(author)
    }
}

/// An institution an author belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Affiliation {
    /// Document-local identifier (e.g. `aff1`).
    pub id: Option<String>,
    /// Institution name or address text.
    pub name: String,
}

static AFFILIATION_FIELDS: &[Accessor<Affiliation>] = &[
    Accessor::new("id", |a: &Affiliation| a.id.as_deref().into()),
    Accessor::new("name", |a: &Affiliation| a.name.as_str().into()),
];

impl Entity for Affiliation {
    const KIND: &'static str = "Affiliation";
    const POSITIONAL: &'static [&'static str] = &["id", "name"];

    fn accessors() -> &'static [Accessor<Self>] {
        AFFILIATION_FIELDS
    }

    fn from_named(fields: FieldMap) -> Result<Self, CollectionError> {
        let mut affiliation = Self::default();
        for (name, value) in fields {
            match name.as_str() {
                "id" => affiliation.id = value.into_opt_text("id")?,
                "name" => affiliation.name = value.into_text("name")?,
                other => return Err(CollectionError::unknown_field(Self::KIND, other)),
            }
        }
        Ok(affiliation)
    }
}
