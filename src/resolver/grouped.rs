//! Strategy that resolves references in fixed-size batches.

use tracing::{debug, info};

use crate::model::{Reference, UniqueCollection};

use super::{BatchReferenceResolver, ResolveError, ResolveOutcome, UriResolver, positions_of};

/// Drives a [`BatchReferenceResolver`] over consecutive batches of at most
/// `GROUP_SIZE` filtered references.
///
/// Each batch is handed to the resolver as its own collection. Once the
/// resolver returns, every member is written back to the position of the
/// citation it describes; the batch is committed whole or not at all.
#[derive(Debug, Clone, Default)]
pub struct Grouped<R> {
    resolver: R,
}

impl<R: BatchReferenceResolver> Grouped<R> {
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

    /// Batch size declared by the wrapped resolver.
    #[must_use]
    pub fn group_size(&self) -> usize {
        R::GROUP_SIZE
    }
}

fn candidate_total(references: &UniqueCollection<Reference>, positions: &[usize]) -> usize {
    positions
        .iter()
        .filter_map(|&position| references.get(position))
        .map(Reference::candidate_count)
        .sum()
}

/// Pairs every returned member with the source position of the citation it
/// describes, so a resolver may reorder its batch freely.
fn match_batch(
    references: &UniqueCollection<Reference>,
    chunk: &[usize],
    batch: UniqueCollection<Reference>,
) -> Result<Vec<(usize, Reference)>, String> {
    if batch.len() != chunk.len() {
        return Err(format!(
            "batch of {} references came back with {}",
            chunk.len(),
            batch.len()
        ));
    }
    let mut slots: Vec<Option<Reference>> = vec![None; chunk.len()];
    for updated in batch {
        let mut matches = chunk.iter().enumerate().filter(|&(_, &position)| {
            references
                .get(position)
                .is_some_and(|source| source.same_citation(&updated))
        });
        let slot = match (matches.next(), matches.next()) {
            (Some((slot, _)), None) => slot,
            (None, _) => {
                return Err(format!("reference {:?} does not belong to the batch", updated.id));
            }
            (Some(_), Some(_)) => {
                return Err(format!("reference {:?} matches several batch members", updated.id));
            }
        };
        if slots[slot].is_some() {
            return Err(format!("reference {:?} came back twice", updated.id));
        }
        slots[slot] = Some(updated);
    }
    Ok(chunk
        .iter()
        .zip(slots)
        .filter_map(|(&position, updated)| updated.map(|updated| (position, updated)))
        .collect())
}

impl<R: BatchReferenceResolver> UriResolver for Grouped<R> {
    fn name(&self) -> &str {
        self.resolver.name()
    }

    #[tracing::instrument(skip_all, fields(resolver = %self.resolver.name(), references = references.len()))]
    fn resolve(
        &self,
        references: &mut UniqueCollection<Reference>,
    ) -> Result<ResolveOutcome, ResolveError> {
        let name = self.resolver.name();
        if R::GROUP_SIZE == 0 {
            return Err(ResolveError::missing_group_size(name));
        }
        if !self.resolver.attempt(references) {
            debug!("resolver declined to run");
            return Ok(ResolveOutcome::skipped(name));
        }

        let positions = {
            let filtered = self.resolver.filtered_references(references);
            positions_of(references, &filtered)
        };
        let before = candidate_total(references, &positions);

        let mut batches = 0;
        for chunk in positions.chunks(R::GROUP_SIZE) {
            let mut batch = UniqueCollection::new();
            for &position in chunk {
                if let Some(reference) = references.get(position) {
                    batch.push(reference.clone())?;
                }
            }
            debug!(batch = batches, size = batch.len(), "delegating batch");
            self.resolver.resolve_references(&mut batch)?;

            let writes = match_batch(references, chunk, batch)
                .map_err(|reason| ResolveError::resolution_failed(name, &reason))?;
            let mut staged = references.clone();
            for (position, updated) in writes {
                staged.modify(position, |reference| {
                    *reference = updated;
                    Ok(())
                })?;
            }
            *references = staged;
            batches += 1;
        }

        let attached = candidate_total(references, &positions).saturating_sub(before);
        info!(examined = positions.len(), batches, attached, "grouped resolution complete");
        Ok(ResolveOutcome {
            resolver: name.to_string(),
            attempted: true,
            examined: positions.len(),
            batches,
            attached,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records batch ids and tags every member with `https://example.org/<id>`.
    #[derive(Default)]
    struct Recorder {
        batches: RefCell<Vec<Vec<String>>>,
    }

    impl BatchReferenceResolver for Recorder {
        const GROUP_SIZE: usize = 2;

        fn name(&self) -> &str {
            "recorder"
        }

        fn resolve_references(
            &self,
            batch: &mut UniqueCollection<Reference>,
        ) -> Result<(), ResolveError> {
            self.batches
                .borrow_mut()
                .push(batch.iter().map(|r| r.id.clone()).collect());
            for index in 0..batch.len() {
                batch.modify(index, |reference| {
                    let uri = format!("https://example.org/{}", reference.id);
                    reference.add_candidate_uri(&uri, "recorder").map(|_| ())
                })?;
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct Unsized;

    impl BatchReferenceResolver for Unsized {
        const GROUP_SIZE: usize = 0;

        fn name(&self) -> &str {
            "unsized"
        }

        fn resolve_references(&self, _: &mut UniqueCollection<Reference>) -> Result<(), ResolveError> {
            Ok(())
        }
    }

    /// Drops the last member of every batch.
    #[derive(Default)]
    struct Shrinking;

    impl BatchReferenceResolver for Shrinking {
        const GROUP_SIZE: usize = 3;

        fn name(&self) -> &str {
            "shrinking"
        }

        fn resolve_references(
            &self,
            batch: &mut UniqueCollection<Reference>,
        ) -> Result<(), ResolveError> {
            if let Some(last) = batch.last().cloned() {
                batch.remove(&last);
            }
            Ok(())
        }
    }

    /// Replaces members by removing and re-adding them, last to first, and tags
    /// only the first `tag` of them.
    struct Reinserting {
        tag: usize,
    }

    impl BatchReferenceResolver for Reinserting {
        const GROUP_SIZE: usize = 2;

        fn name(&self) -> &str {
            "reinserting"
        }

        fn resolve_references(
            &self,
            batch: &mut UniqueCollection<Reference>,
        ) -> Result<(), ResolveError> {
            let members: Vec<Reference> = batch.iter().cloned().collect();
            for (index, member) in members.iter().enumerate().rev() {
                let mut updated = batch.remove(member).unwrap();
                if index < self.tag {
                    let uri = format!("https://example.org/{}", updated.id);
                    updated.add_candidate_uri(&uri, "reinserting")?;
                }
                batch.push(updated)?;
            }
            Ok(())
        }
    }

    /// Swaps the last member for an unrelated reference.
    struct Substituting;

    impl BatchReferenceResolver for Substituting {
        const GROUP_SIZE: usize = 2;

        fn name(&self) -> &str {
            "substituting"
        }

        fn resolve_references(
            &self,
            batch: &mut UniqueCollection<Reference>,
        ) -> Result<(), ResolveError> {
            for index in 0..batch.len() {
                batch.modify(index, |reference| {
                    let uri = format!("https://example.org/{}", reference.id);
                    reference.add_candidate_uri(&uri, "substituting").map(|_| ())
                })?;
            }
            if let Some(last) = batch.last().cloned() {
                batch.remove(&last);
                batch.push(Reference::new("stranger"))?;
            }
            Ok(())
        }
    }

    fn ids(references: &UniqueCollection<Reference>) -> Vec<&str> {
        references.iter().map(|r| r.id.as_str()).collect()
    }

    fn refs(count: usize) -> UniqueCollection<Reference> {
        let mut references = UniqueCollection::new();
        for index in 1..=count {
            references.push(Reference::new(format!("r{index}"))).unwrap();
        }
        references
    }

    #[test]
    fn test_batches_in_order() {
        let mut references = refs(5);
        let strategy = Grouped::new(Recorder::default());
        let outcome = strategy.resolve(&mut references).unwrap();

        let batches = strategy.inner().batches.borrow();
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(batches[0], vec!["r1", "r2"]);
        assert_eq!(batches[2], vec!["r5"]);
        assert_eq!(outcome.batches, 3);
        assert_eq!(outcome.attached, 5);
    }

    #[test]
    fn test_batch_updates_written_back() {
        let mut references = refs(3);
        Grouped::new(Recorder::default())
            .resolve(&mut references)
            .unwrap();
        for reference in &references {
            assert_eq!(reference.sources(), vec!["recorder"]);
        }
    }

    #[test]
    fn test_zero_group_size_is_configuration_error() {
        let mut references = refs(2);
        let err = Grouped::new(Unsized).resolve(&mut references).unwrap_err();
        assert!(matches!(err, ResolveError::Configuration { .. }));
    }

    #[test]
    fn test_zero_group_size_rejected_even_when_empty() {
        let mut references = UniqueCollection::new();
        assert!(Grouped::new(Unsized).resolve(&mut references).is_err());
    }

    #[test]
    fn test_shrunk_batch_is_rejected() {
        let mut references = refs(3);
        let before = references.clone();
        let err = Grouped::new(Shrinking).resolve(&mut references).unwrap_err();
        assert!(matches!(err, ResolveError::ResolutionFailed { .. }));
        assert_eq!(references, before);
    }

    #[test]
    fn test_reinserted_members_keep_their_positions() {
        let mut references = refs(4);
        let outcome = Grouped::new(Reinserting { tag: 2 })
            .resolve(&mut references)
            .unwrap();

        assert_eq!(ids(&references), ["r1", "r2", "r3", "r4"]);
        assert_eq!(outcome.attached, 4);
        for reference in &references {
            let uri = &reference.candidate_uris.first().unwrap().uri;
            assert_eq!(uri, &format!("https://example.org/{}", reference.id));
        }
    }

    #[test]
    fn test_partially_updated_reordered_batch() {
        let mut references = refs(4);
        let outcome = Grouped::new(Reinserting { tag: 1 })
            .resolve(&mut references)
            .unwrap();

        assert_eq!(ids(&references), ["r1", "r2", "r3", "r4"]);
        assert_eq!(outcome.attached, 2);
        let tagged: Vec<bool> = references.iter().map(Reference::has_candidates).collect();
        assert_eq!(tagged, [true, false, true, false]);
    }

    #[test]
    fn test_foreign_member_rejects_batch_without_writes() {
        let mut references = refs(2);
        let before = references.clone();
        let err = Grouped::new(Substituting)
            .resolve(&mut references)
            .unwrap_err();
        assert!(matches!(err, ResolveError::ResolutionFailed { .. }));
        assert_eq!(references, before);
    }

    #[test]
    fn test_group_size_accessor() {
        assert_eq!(Grouped::new(Recorder::default()).group_size(), 2);
    }
}
