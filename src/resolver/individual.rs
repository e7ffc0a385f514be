//! Strategy that resolves references one at a time.

use tracing::{debug, info, warn};

use crate::model::{CandidateUri, Reference, UniqueCollection};

use super::{ReferenceResolver, ResolveError, ResolveOutcome, UriResolver};

/// Drives a [`ReferenceResolver`] over each filtered reference in order.
#[derive(Debug, Clone, Default)]
pub struct Individual<R> {
    resolver: R,
}

impl<R: ReferenceResolver> Individual<R> {
    /// Wraps `resolver`.
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// The wrapped resolver.
    #[must_use]
    pub fn inner(&self) -> &R {
        &self.resolver
    }
}

impl<R: ReferenceResolver> UriResolver for Individual<R> {
    fn name(&self) -> &str {
        self.resolver.source()
    }

    #[tracing::instrument(skip_all, fields(resolver = %self.resolver.source(), references = references.len()))]
    fn resolve(
        &self,
        references: &mut UniqueCollection<Reference>,
    ) -> Result<ResolveOutcome, ResolveError> {
        let source = self.resolver.source();
        if !self.resolver.attempt(references) {
            debug!("resolver declined to run");
            return Ok(ResolveOutcome::skipped(source));
        }

        let filtered = self.resolver.filtered_references(references);
        let examined = filtered.len();
        let mut found: Vec<(usize, String)> = Vec::new();
        for reference in &filtered {
            let Some(position) = references.position(reference) else {
                continue;
            };
            match self.resolver.uri_for_reference(reference) {
                Some(uri) if !uri.trim().is_empty() => match CandidateUri::new(&uri, source) {
                    Ok(_) => found.push((position, uri)),
                    Err(error) => {
                        warn!(reference = %reference.id, %uri, %error, "skipping unusable candidate URI");
                    }
                },
                _ => debug!(reference = %reference.id, "no candidate URI"),
            }
        }

        let mut attached = 0;
        for (position, uri) in found {
            references.modify(position, |reference| {
                reference.add_candidate_uri(&uri, source).map(|_| ())
            })?;
            attached += 1;
        }

        info!(examined, attached, "individual resolution complete");
        Ok(ResolveOutcome {
            resolver: source.to_string(),
            attempted: true,
            examined,
            batches: 0,
            attached,
        })
    }
}
