//! Key-to-index mappings and index assignment.

use crate::batch::Batch;
use crate::config::IndexerConfig;
use crate::error::{CoreResult, IndexError};
use crate::normalize::{CanonicalKey, KeyNormalizer};
use crate::value::Value;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// An immutable set of `(canonical key, index)` pairs.
///
/// Keys are unique and, for every mapping this crate builds, so are
/// indices. Extending a mapping yields a new value that contains every
/// pair of the old one unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: BTreeMap<CanonicalKey, i64>,
}

impl Mapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from pairs whose keys are already canonical.
    ///
    /// A pair repeated verbatim is accepted once. A key bound to two
    /// different indices, or an index bound to two different keys, is
    /// rejected.
    pub fn from_pairs<I, K>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<CanonicalKey>,
    {
        let mut entries = BTreeMap::new();
        let mut owners: HashMap<i64, CanonicalKey> = HashMap::new();

        for (key, index) in pairs {
            let key = key.into();
            match entries.entry(key.clone()) {
                Entry::Occupied(existing) => {
                    if *existing.get() != index {
                        return Err(IndexError::validation(format!(
                            "key {key:?} is mapped to both {} and {index}",
                            existing.get()
                        )));
                    }
                }
                Entry::Vacant(slot) => {
                    if let Some(owner) = owners.get(&index) {
                        return Err(IndexError::validation(format!(
                            "index {index} is mapped to both {owner:?} and {key:?}"
                        )));
                    }
                    owners.insert(index, key);
                    slot.insert(index);
                }
            }
        }

        Ok(Self { entries })
    }

    /// Reads a mapping from a two-column batch.
    ///
    /// Keys are re-normalized with `normalizer` before use, so a mapping
    /// stored by an older run (or typed by hand) joins against freshly
    /// normalized batch keys. Every index value must be a non-null integer.
    pub fn from_batch(
        batch: &Batch,
        key_column: &str,
        index_column: &str,
        normalizer: &KeyNormalizer,
    ) -> CoreResult<Self> {
        let key_col = batch.require_column(key_column)?;
        let index_col = batch.require_column(index_column)?;

        let pairs = batch
            .rows()
            .iter()
            .map(|row| {
                let index = match &row[index_col] {
                    Value::Integer(n) => *n,
                    other => {
                        return Err(IndexError::type_mismatch(index_column, other.type_name()))
                    }
                };
                let key = match &row[key_col] {
                    Value::Text(s) => normalizer.normalize_key(s),
                    other => normalizer.normalize_value(other),
                };
                Ok((key, index))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Self::from_pairs(pairs)
    }

    /// Returns the index of a key.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.entries.get(key).copied()
    }

    /// Returns true if the key is mapped.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping has no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the largest index, if any.
    pub fn max_index(&self) -> Option<i64> {
        self.entries.values().copied().max()
    }

    /// Iterates pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the pairs sorted by index.
    pub fn by_index(&self) -> Vec<(&str, i64)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by_key(|&(_, index)| index);
        pairs
    }

    /// Returns true if every pair of `other` is present here unchanged.
    pub fn is_superset_of(&self, other: &Mapping) -> bool {
        other.iter().all(|(k, v)| self.get(k) == Some(v))
    }

    /// Renders the mapping as a two-column batch sorted by index.
    pub fn to_batch(&self, key_column: &str, index_column: &str) -> CoreResult<Batch> {
        let rows = self
            .by_index()
            .into_iter()
            .map(|(key, index)| vec![Value::from(key), Value::Integer(index)])
            .collect();
        Batch::new([key_column, index_column], rows)
    }
}

/// Result of one [`MappingAssigner::assign`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The prior mapping plus any newly minted pairs.
    pub mapping: Mapping,
    /// Pairs minted by this call, in index order.
    pub minted: Vec<(CanonicalKey, i64)>,
    /// Number of observed keys that were already mapped.
    pub reused: usize,
    /// Observed keys left unmapped because new indices were not allowed.
    pub excluded: Vec<CanonicalKey>,
}

/// Computes the mapping for one indexing call.
#[derive(Debug, Clone)]
pub struct MappingAssigner {
    floor: i64,
    normalizer: KeyNormalizer,
}

impl Default for MappingAssigner {
    fn default() -> Self {
        Self::new(&IndexerConfig::default())
    }
}

impl MappingAssigner {
    /// Creates an assigner following an indexer configuration.
    #[must_use]
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            floor: config.index_floor,
            normalizer: KeyNormalizer::from_config(config),
        }
    }

    /// Returns the index minted first for an empty prior mapping.
    pub fn floor(&self) -> i64 {
        self.floor
    }

    /// Extends `prior` with the keys observed in a batch.
    ///
    /// Keys already in `prior` keep their index. Unknown keys receive
    /// consecutive indices above the prior maximum (or from the floor) in
    /// natural key order when `allow_new` is set, and are left out of the
    /// mapping otherwise.
    pub fn assign(
        &self,
        distinct_keys: &BTreeSet<CanonicalKey>,
        prior: &Mapping,
        allow_new: bool,
    ) -> CoreResult<Assignment> {
        if distinct_keys.is_empty() && prior.is_empty() {
            return Err(IndexError::validation(
                "no keys observed and no prior mapping to extend",
            ));
        }

        let (known, mut unknown): (Vec<&CanonicalKey>, Vec<&CanonicalKey>) =
            distinct_keys.iter().partition(|k| prior.contains(k));

        if !allow_new {
            debug!(
                reused = known.len(),
                excluded = unknown.len(),
                "closed-set assignment"
            );
            return Ok(Assignment {
                mapping: prior.clone(),
                minted: Vec::new(),
                reused: known.len(),
                excluded: unknown.into_iter().cloned().collect(),
            });
        }

        unknown.sort_by(|a, b| self.normalizer.compare_keys(a, b));

        let mut entries = prior.entries.clone();
        let mut minted = Vec::with_capacity(unknown.len());
        let mut next = match prior.max_index() {
            Some(max) => max.checked_add(1),
            None => Some(self.floor),
        };

        for key in unknown {
            let index = next.ok_or_else(|| IndexError::validation("index space exhausted"))?;
            entries.insert(key.clone(), index);
            minted.push((key.clone(), index));
            next = index.checked_add(1);
        }

        debug!(
            reused = known.len(),
            minted = minted.len(),
            total = entries.len(),
            "assigned indices"
        );

        Ok(Assignment {
            mapping: Mapping { entries },
            minted,
            reused: known.len(),
            excluded: Vec::new(),
        })
    }
}
