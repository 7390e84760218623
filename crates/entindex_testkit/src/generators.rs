//! Property-based test generators using proptest.
//!
//! Raw values are deliberately messy (padding, case, leading zeros,
//! nulls) so that normalization is exercised on every generated batch.

use crate::fixtures::key;
use entindex_core::{Batch, Mapping, Value};
use proptest::prelude::*;

/// Strategy for raw business codes as they arrive from source systems.
pub fn raw_code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[0-9]{1,4}").expect("Invalid regex"),
        prop::string::string_regex(" {0,2}0{0,3}[0-9]{1,3} {0,2}").expect("Invalid regex"),
        prop::string::string_regex("[a-cA-C]{1,2}[0-9]{0,2}").expect("Invalid regex"),
    ]
}

/// Strategy for a single key cell.
pub fn raw_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        6 => raw_code_strategy().prop_map(Value::Text),
        2 => (0i64..500).prop_map(Value::Integer),
        1 => Just(Value::Null),
    ]
}

/// Strategy for a source-system qualifier.
pub fn zsource_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::from("erp")),
        Just(Value::from(" ERP")),
        Just(Value::from("sap")),
    ]
}

/// Strategy for non-empty batches with `zsource`, `code` and `plant`
/// columns.
pub fn key_batch_strategy(max_rows: usize) -> impl Strategy<Value = Batch> {
    prop::collection::vec(
        (zsource_strategy(), raw_value_strategy(), raw_value_strategy()),
        1..=max_rows.max(1),
    )
    .prop_map(|rows| {
        let rows = rows
            .into_iter()
            .map(|(zsource, code, plant)| vec![zsource, code, plant])
            .collect();
        Batch::new(["zsource", "code", "plant"], rows).expect("three values per row")
    })
}

/// Strategy for canonical `(zsource, code)` mappings with unique, possibly
/// sparse indices.
pub fn prior_mapping_strategy() -> impl Strategy<Value = Mapping> {
    (
        prop::collection::btree_set(
            (
                prop_oneof![Just("erp"), Just("sap")],
                prop::string::string_regex("[1-9][0-9]{0,2}|[a-c]{1,2}").expect("Invalid regex"),
            ),
            0..12,
        ),
        1i64..1_000,
        1i64..4,
    )
        .prop_map(|(keys, start, step)| {
            let pairs = keys
                .into_iter()
                .enumerate()
                .map(|(i, (zsource, code))| (key(&[zsource, &code]), start + step * i as i64));
            Mapping::from_pairs(pairs).expect("unique keys and indices")
        })
}

/// Case and size budget shared by the indexing property tests.
///
/// Shrinking is capped at a few hundred steps: a failing batch rarely
/// needs more than that to reach a handful of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingPropConfig {
    /// Generated cases per property.
    pub cases: u32,
    /// Upper bound on rows per generated batch.
    pub max_rows: usize,
}

impl Default for IndexingPropConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl IndexingPropConfig {
    /// Budget used by the crate's own property tests.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            cases: 256,
            max_rows: 20,
        }
    }

    /// Small budget for smoke runs.
    #[must_use]
    pub const fn quick() -> Self {
        Self {
            cases: 32,
            max_rows: 8,
        }
    }

    /// Large budget for soak runs over wide batches.
    #[must_use]
    pub const fn thorough() -> Self {
        Self {
            cases: 1024,
            max_rows: 200,
        }
    }

    /// Batches sized to this budget.
    pub fn batches(&self) -> impl Strategy<Value = Batch> {
        key_batch_strategy(self.max_rows)
    }

    /// The matching proptest runner configuration.
    #[must_use]
    pub fn proptest(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: 512,
            ..ProptestConfig::default()
        }
    }
}
