//! Multi-run integration helpers.
//!
//! A stored mapping only means something across runs, so the harness
//! plays the role of the persistence layer: each run starts a fresh
//! indexer over a new batch and feeds it the mapping the previous run
//! returned for the same entity kind.

use entindex_core::{
    Batch, CoreResult, EntityIndexer, EntityKind, IndexOutcome, IndexSpec, IndexerConfig, Mapping,
};
use std::collections::HashMap;

/// Replays indexing runs against mappings kept between them.
#[derive(Debug, Default)]
pub struct IndexingHarness {
    config: IndexerConfig,
    stored: HashMap<String, Batch>,
    history: Vec<IndexOutcome>,
}

impl IndexingHarness {
    /// Creates a harness with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a harness with an explicit configuration.
    pub fn with_config(config: IndexerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Indexes `batch` against the stored mapping for `kind` and stores
    /// the result.
    pub fn run<S: AsRef<str>>(
        &mut self,
        batch: Batch,
        kind: impl Into<EntityKind>,
        key_columns: &[S],
        allow_new: bool,
    ) -> CoreResult<IndexOutcome> {
        let kind = kind.into();
        let mut spec = IndexSpec::new(kind.clone(), key_columns.iter().map(|c| c.as_ref()))
            .allow_new(allow_new);
        if let Some(prior) = self.stored.get(kind.name()) {
            spec = spec.existing_mapping(prior.clone());
        }

        let mut indexer = EntityIndexer::with_config(batch, self.config.clone());
        let outcome = indexer.index(spec)?;

        self.stored
            .insert(kind.name().to_string(), outcome.mapping_batch.clone());
        self.history.push(outcome.clone());
        Ok(outcome)
    }

    /// Seeds the stored mapping for a kind.
    pub fn store(&mut self, kind: impl Into<EntityKind>, mapping: Batch) {
        self.stored.insert(kind.into().name().to_string(), mapping);
    }

    /// The stored mapping batch for a kind.
    pub fn stored(&self, kind: &str) -> Option<&Batch> {
        self.stored.get(kind)
    }

    /// Every outcome produced so far, oldest first.
    pub fn history(&self) -> &[IndexOutcome] {
        &self.history
    }

    /// Asserts that each run's mapping contains every pair of the run
    /// before it for the same kind.
    pub fn verify_stability(&self) {
        let mut last: HashMap<&str, &Mapping> = HashMap::new();
        for outcome in &self.history {
            if let Some(previous) = last.get(outcome.kind.name()) {
                assert!(
                    outcome.mapping.is_superset_of(previous),
                    "mapping for {} dropped or moved a key",
                    outcome.kind
                );
            }
            last.insert(outcome.kind.name(), &outcome.mapping);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{customer_prior, key, orders_batch};

    #[test]
    fn second_run_reuses_stored_mapping() {
        let mut harness = IndexingHarness::new();
        let first = harness
            .run(orders_batch(), "customer", &["zsource", "customer_code"], true)
            .unwrap();
        let second = harness
            .run(orders_batch(), "customer", &["zsource", "customer_code"], true)
            .unwrap();

        assert_eq!(first.mapping, second.mapping);
        assert!(second.minted.is_empty());
        assert_eq!(harness.history().len(), 2);
        harness.verify_stability();
    }

    #[test]
    fn seeded_mapping_is_extended() {
        let mut harness = IndexingHarness::new();
        harness.store("customer", customer_prior());
        let outcome = harness
            .run(orders_batch(), "customer", &["zsource", "customer_code"], true)
            .unwrap();

        assert_eq!(outcome.mapping.get(&key(&["erp", "7"])), Some(5));
        assert_eq!(outcome.mapping.get(&key(&["erp", "12"])), Some(6));
        assert!(harness.stored("customer").is_some());
    }
}
