//! Scholarly identifiers embedded in citation text: detection and canonical URIs.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Reference;

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

static DOI_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r#"10\.\d{4,9}(?:\.\d+)*/[^\s<>"'\]]+"#));
static PMID_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)(?:\bPMID\s*:?\s*|pubmed(?:\.ncbi\.nlm\.nih\.gov)?/)(\d{1,9})\b")
});
static PMCID_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)\b(PMC\d{4,9})\b"));
static ARXIV_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r"(?i)(?:\barxiv\s*:\s*|arxiv\.org/(?:abs|pdf)/)((?:\d{4}\.\d{4,5}|[a-z][a-z\-]*(?:\.[a-z]{2})?/\d{7})(?:v\d+)?)",
    )
});
static BARE_ARXIV_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)^(?:\d{4}\.\d{4,5}|[a-z][a-z\-]*(?:\.[a-z]{2})?/\d{7})(?:v\d+)?$")
});
static ISBN_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)\bISBN(?:-1[03])?\s*:?\s*((?:97[89][\s\-]?)?(?:\d[\s\-]?){9}[\dX])\b")
});
static GITHUB_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)github\.com/([a-z0-9](?:[a-z0-9\-]*[a-z0-9])?)/([a-z0-9._\-]+)")
});

/// Strips sentence punctuation and unbalanced closing brackets from a match.
fn clean_trailing(candidate: &str) -> &str {
    let mut cleaned = candidate.trim_end_matches(['.', ',', ';', ':']);
    loop {
        let Some(last) = cleaned.chars().last() else {
            return cleaned;
        };
        let open = match last {
            ')' => '(',
            '}' => '{',
            _ => return cleaned,
        };
        let closes = cleaned.chars().filter(|&c| c == last).count();
        let opens = cleaned.chars().filter(|&c| c == open).count();
        if closes <= opens {
            return cleaned;
        }
        cleaned = cleaned[..cleaned.len() - 1].trim_end_matches(['.', ',', ';', ':']);
    }
}

/// First DOI in `text`, e.g. `10.1038/nature12373`.
#[must_use]
pub fn extract_doi(text: &str) -> Option<String> {
    let found = DOI_RE.find(text)?;
    let cleaned = clean_trailing(found.as_str());
    cleaned.contains('/').then(|| cleaned.to_string())
}

/// First `PubMed` id in `text`, from a `PMID:` label or a `PubMed` URL.
#[must_use]
pub fn extract_pmid(text: &str) -> Option<String> {
    PMID_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First `PubMed` Central id in `text`, upper-cased (`PMC3531190`).
#[must_use]
pub fn extract_pmcid(text: &str) -> Option<String> {
    PMCID_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
}

/// First arXiv id in `text`, from an `arXiv:` label or an arxiv.org URL.
#[must_use]
pub fn extract_arxiv_id(text: &str) -> Option<String> {
    ARXIV_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First checksum-valid ISBN in `text`, as bare digits.
#[must_use]
pub fn extract_isbn(text: &str) -> Option<String> {
    ISBN_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| normalize_isbn(m.as_str()))
}

/// First GitHub repository in `text`, as `owner/repo`.
#[must_use]
pub fn extract_github_repo(text: &str) -> Option<String> {
    let caps = GITHUB_RE.captures(text)?;
    let owner = caps.get(1)?.as_str();
    let repo = clean_trailing(caps.get(2)?.as_str());
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() || repo == "." || repo == ".." {
        return None;
    }
    Some(format!("{owner}/{repo}"))
}

/// Strips separators and returns the ISBN if its check digit is valid.
fn normalize_isbn(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let valid = match digits.len() {
        10 => isbn10_valid(&digits),
        13 => isbn13_valid(&digits),
        _ => false,
    };
    valid.then_some(digits)
}

fn isbn10_valid(digits: &str) -> bool {
    let mut sum = 0;
    for (index, ch) in digits.chars().enumerate() {
        let value = match ch {
            'X' if index == 9 => 10,
            _ => match ch.to_digit(10) {
                Some(value) => value,
                None => return false,
            },
        };
        let weight = 10 - u32::try_from(index).unwrap_or(u32::MAX).min(10);
        sum += value * weight;
    }
    sum % 11 == 0
}

fn isbn13_valid(digits: &str) -> bool {
    let mut sum = 0;
    for (index, ch) in digits.chars().enumerate() {
        let Some(value) = ch.to_digit(10) else {
            return false;
        };
        sum += if index % 2 == 0 { value } else { value * 3 };
    }
    sum % 10 == 0
}

/// Identifier schemes recognized in citations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// Digital Object Identifier.
    Doi,
    /// `PubMed` id.
    PubMed,
    /// `PubMed` Central id.
    Pmc,
    /// arXiv id.
    Arxiv,
    /// International Standard Book Number.
    Isbn,
    /// GitHub repository.
    Github,
}

impl IdentifierKind {
    /// Every kind, in default pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Doi,
        Self::PubMed,
        Self::Pmc,
        Self::Arxiv,
        Self::Isbn,
        Self::Github,
    ];

    /// Source name recorded on candidates and used in configuration.
    #[must_use]
    pub fn source(self) -> &'static str {
        match self {
            Self::Doi => "doi",
            Self::PubMed => "pubmed",
            Self::Pmc => "pmc",
            Self::Arxiv => "arxiv",
            Self::Isbn => "isbn",
            Self::Github => "github",
        }
    }

    /// Parses a source name.
    #[must_use]
    pub fn from_source(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.source().eq_ignore_ascii_case(name.trim()))
    }

    /// Prefix the identifier is appended to when building a URI.
    #[must_use]
    pub fn default_base(self) -> &'static str {
        match self {
            Self::Doi => "https://doi.org/",
            Self::PubMed => "https://www.ncbi.nlm.nih.gov/pubmed/",
            Self::Pmc => "https://www.ncbi.nlm.nih.gov/pmc/articles/",
            Self::Arxiv => "https://arxiv.org/abs/",
            Self::Isbn => "urn:isbn:",
            Self::Github => "https://github.com/",
        }
    }

    /// Canonical URI for `id` under `base`.
    #[must_use]
    pub fn uri(self, base: &str, id: &str) -> String {
        match self {
            Self::Pmc => format!("{base}{id}/"),
            _ => format!("{base}{id}"),
        }
    }

    /// Searches free text for this kind of identifier.
    #[must_use]
    pub fn extract(self, text: &str) -> Option<String> {
        match self {
            Self::Doi => extract_doi(text),
            Self::PubMed => extract_pmid(text),
            Self::Pmc => extract_pmcid(text),
            Self::Arxiv => extract_arxiv_id(text),
            Self::Isbn => extract_isbn(text),
            Self::Github => extract_github_repo(text),
        }
    }

    /// Normalizes a value stored in a structured reference field.
    ///
    /// Bare ids are accepted as well as labelled ones.
    #[must_use]
    pub fn normalize(self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let all_digits = raw.chars().all(|c| c.is_ascii_digit());
        match self {
            Self::PubMed if all_digits => Some(raw.to_string()),
            Self::Pmc if all_digits => Some(format!("PMC{raw}")),
            Self::Arxiv if BARE_ARXIV_RE.is_match(raw) => Some(raw.to_string()),
            Self::Isbn => normalize_isbn(raw).or_else(|| extract_isbn(raw)),
            _ => self.extract(raw),
        }
    }

    /// The structured field this kind is stored in, if any.
    #[must_use]
    pub fn field(self, reference: &Reference) -> Option<&str> {
        match self {
            Self::Doi => reference.doi.as_deref(),
            Self::PubMed => reference.pmid.as_deref(),
            Self::Pmc => reference.pmcid.as_deref(),
            Self::Arxiv => reference.arxiv.as_deref(),
            Self::Isbn => reference.isbn.as_deref(),
            Self::Github => reference.url.as_deref(),
        }
    }

    /// Finds this kind of identifier on a reference.
    ///
    /// Checks the structured field first, then the raw citation text, then the URL.
    #[must_use]
    pub fn find(self, reference: &Reference) -> Option<String> {
        self.field(reference)
            .and_then(|value| self.normalize(value))
            .or_else(|| reference.text.as_deref().and_then(|text| self.extract(text)))
            .or_else(|| reference.url.as_deref().and_then(|url| self.extract(url)))
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.source())
    }
}
