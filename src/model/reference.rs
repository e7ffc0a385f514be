//! Citation references and the candidate URIs resolved for them.

use serde::Serialize;
use url::Url;

use super::collection::UniqueCollection;
use super::entity::{Accessor, Entity};
use super::error::CollectionError;
use super::value::FieldMap;

/// A resolved identifier proposed for a reference, tagged with the resolver that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CandidateUri {
    /// Fully-qualified URI.
    pub uri: String,
    /// Name of the resolver that proposed it.
    pub source: String,
}

impl CandidateUri {
    /// Creates a candidate after checking that `uri` is absolute.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidUri`] if `uri` does not parse as an absolute URI.
    pub fn new(uri: &str, source: &str) -> Result<Self, CollectionError> {
        let uri = uri.trim();
        Url::parse(uri).map_err(|e| CollectionError::invalid_uri(uri, &e.to_string()))?;
        Ok(Self {
            uri: uri.to_string(),
            source: source.to_string(),
        })
    }
}

static CANDIDATE_URI_FIELDS: &[Accessor<CandidateUri>] = &[
    Accessor::new("uri", |c: &CandidateUri| c.uri.as_str().into()),
    Accessor::new("source", |c: &CandidateUri| c.source.as_str().into()),
];

impl Entity for CandidateUri {
    const KIND: &'static str = "CandidateUri";
    const POSITIONAL: &'static [&'static str] = &["uri", "source"];

    fn accessors() -> &'static [Accessor<Self>] {
        CANDIDATE_URI_FIELDS
    }

    fn from_named(fields: FieldMap) -> Result<Self, CollectionError> {
        let mut uri = String::new();
        let mut source = String::new();
        for (name, value) in fields {
            match name.as_str() {
                "uri" => uri = value.into_text("uri")?,
                "source" => source = value.into_text("source")?,
                other => return Err(CollectionError::unknown_field(Self::KIND, other)),
            }
        }
        Self::new(&uri, &source)
    }
}

/// One citation as it appears in the source document.
///
/// Bibliographic fields are filled once by the document parser; candidate URIs
/// accumulate as resolvers run and are never removed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Reference {
    /// Document-local identifier (e.g. the `id` attribute of a `<ref>`).
    pub id: String,
    /// Position in the reference list, 1-based.
    pub number: Option<u32>,
    /// Raw citation text.
    pub text: Option<String>,
    /// Title of the cited work.
    pub title: Option<String>,
    /// Author names as written.
    pub authors: Vec<String>,
    /// Publication year.
    pub year: Option<u16>,
    /// DOI embedded in the citation.
    pub doi: Option<String>,
    /// `PubMed` identifier.
    pub pmid: Option<String>,
    /// `PubMed` Central identifier.
    pub pmcid: Option<String>,
    /// arXiv identifier.
    pub arxiv: Option<String>,
    /// ISBN.
    pub isbn: Option<String>,
    /// URL embedded in the citation.
    pub url: Option<String>,
    /// Candidate URIs attached by resolvers.
    pub candidate_uris: UniqueCollection<CandidateUri>,
}

impl Reference {
    /// Creates a reference with only an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the raw citation text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attaches a candidate URI produced by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidUri`] for a non-absolute URI, or
    /// [`CollectionError::Duplicate`] if the same URI was already attached by the same source.
    pub fn add_candidate_uri(
        &mut self,
        uri: &str,
        source: &str,
    ) -> Result<&CandidateUri, CollectionError> {
        let candidate = CandidateUri::new(uri, source)?;
        self.candidate_uris.push(candidate)
    }

    /// Returns true if both describe the same citation, ignoring candidate URIs.
    #[must_use]
    pub fn same_citation(&self, other: &Self) -> bool {
        self.id == other.id
            && self.number == other.number
            && self.text == other.text
            && self.title == other.title
            && self.authors == other.authors
            && self.year == other.year
            && self.doi == other.doi
            && self.pmid == other.pmid
            && self.pmcid == other.pmcid
            && self.arxiv == other.arxiv
            && self.isbn == other.isbn
            && self.url == other.url
    }

    /// Number of candidate URIs attached so far.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidate_uris.len()
    }

    /// Returns true once any resolver attached a candidate.
    #[must_use]
    pub fn has_candidates(&self) -> bool {
        !self.candidate_uris.is_empty()
    }

    /// Distinct sources that contributed candidates, in first-seen order.
    #[must_use]
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = Vec::new();
        for candidate in &self.candidate_uris {
            if !sources.contains(&candidate.source.as_str()) {
                sources.push(&candidate.source);
            }
        }
        sources
    }
}

static REFERENCE_FIELDS: &[Accessor<Reference>] = &[
    Accessor::new("id", |r: &Reference| r.id.as_str().into()),
    Accessor::new("number", |r: &Reference| r.number.into()),
    Accessor::new("text", |r: &Reference| r.text.as_deref().into()),
    Accessor::new("title", |r: &Reference| r.title.as_deref().into()),
    Accessor::new("authors", |r: &Reference| r.authors.clone().into()),
    Accessor::new("year", |r: &Reference| r.year.into()),
    Accessor::new("doi", |r: &Reference| r.doi.as_deref().into()),
    Accessor::new("pmid", |r: &Reference| r.pmid.as_deref().into()),
    Accessor::new("pmcid", |r: &Reference| r.pmcid.as_deref().into()),
    Accessor::new("arxiv", |r: &Reference| r.arxiv.as_deref().into()),
    Accessor::new("isbn", |r: &Reference| r.isbn.as_deref().into()),
    Accessor::new("url", |r: &Reference| r.url.as_deref().into()),
    Accessor::new("candidate_count", |r: &Reference| r.candidate_count().into()),
    Accessor::new("has_candidates", |r: &Reference| r.has_candidates().into()),
    Accessor::new("sources", |r: &Reference| r.sources().into()),
];

impl Entity for Reference {
    const KIND: &'static str = "Reference";
    const POSITIONAL: &'static [&'static str] = &["id", "text"];

    fn accessors() -> &'static [Accessor<Self>] {
        REFERENCE_FIELDS
    }

    fn from_named(fields: FieldMap) -> Result<Self, CollectionError> {
        let mut reference = Self::default();
        for (name, value) in fields {
            match name.as_str() {
                "id" => reference.id = value.into_text("id")?,
                "number" => reference.number = value.into_opt_int("number")?,
                "text" => reference.text = value.into_opt_text("text")?,
                "title" => reference.title = value.into_opt_text("title")?,
                "authors" => reference.authors = value.into_text_list("authors")?,
                "year" => reference.year = value.into_opt_int("year")?,
                "doi" => reference.doi = value.into_opt_text("doi")?,
                "pmid" => reference.pmid = value.into_opt_text("pmid")?,
                "pmcid" => reference.pmcid = value.into_opt_text("pmcid")?,
                "arxiv" => reference.arxiv = value.into_opt_text("arxiv")?,
                "isbn" => reference.isbn = value.into_opt_text("isbn")?,
                "url" => reference.url = value.into_opt_text("url")?,
                other => return Err(CollectionError::unknown_field(Self::KIND, other)),
            }
        }
        Ok(reference)
    }
}
