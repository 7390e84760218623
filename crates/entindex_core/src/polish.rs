//! Column standardization applied before indexing.
//!
//! [`polish`] brings a freshly ingested batch into the shape the indexer
//! expects: snake_case lower-case column names, normalized primary/foreign
//! key values, and a stable column order.

use crate::batch::Batch;
use crate::config::IndexerConfig;
use crate::error::CoreResult;
use crate::normalize::KeyNormalizer;
use crate::value::Value;
use tracing::debug;

/// Marker of primary-key columns.
pub const PRIMARY_KEY_MARKER: &str = "keyp__";

/// Marker of foreign-key columns.
pub const FOREIGN_KEY_MARKER: &str = "keyf__";

/// Suffix of business code columns.
pub const CODE_SUFFIX: &str = "_code";

const SEPARATORS: &[char] = &[' ', ',', ';', '{', '}', '(', ')', '\n', '\t', '=', '-'];

/// Standardizes a batch with the default configuration.
pub fn polish(batch: &Batch) -> CoreResult<Batch> {
    Polisher::default().polish(batch)
}

/// Standardizes a single column name.
///
/// Trims, turns separator characters into `_`, strips outer underscores
/// and lower-cases: `" Customer Code(SAP) "` becomes `customer_code_sap`.
pub fn standardize_column_name(name: &str) -> String {
    name.trim()
        .replace(SEPARATORS, "_")
        .trim_matches('_')
        .to_lowercase()
}

/// Column polisher.
#[derive(Debug, Clone)]
pub struct Polisher {
    normalizer: KeyNormalizer,
    index_prefix: String,
}

impl Default for Polisher {
    fn default() -> Self {
        Self::new(&IndexerConfig::default())
    }
}

impl Polisher {
    /// Creates a polisher following an indexer configuration.
    #[must_use]
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            normalizer: KeyNormalizer::from_config(config),
            index_prefix: config.index_prefix.clone(),
        }
    }

    /// Renames, cleans and reorders the columns of `batch`.
    ///
    /// Fails with `DuplicateColumn` when two names standardize to the same
    /// name.
    pub fn polish(&self, batch: &Batch) -> CoreResult<Batch> {
        let names = batch
            .columns()
            .iter()
            .map(|c| standardize_column_name(c))
            .collect();
        let mut polished = batch.rename_columns(names)?;

        let key_columns: Vec<String> = polished
            .columns()
            .iter()
            .filter(|c| is_key_column(c))
            .cloned()
            .collect();
        for column in &key_columns {
            polished = polished.map_column(column, |v| {
                Value::Text(self.normalizer.normalize_value(v))
            })?;
        }

        let order = self.column_order(polished.columns());
        debug!(
            columns = order.len(),
            key_columns = key_columns.len(),
            "polished batch"
        );
        polished.select(&order)
    }

    /// Orders columns as index columns, key columns, code columns, then
    /// everything else, each group alphabetical.
    ///
    /// Only names starting with a key marker count as key columns here.
    pub fn column_order(&self, columns: &[String]) -> Vec<String> {
        let mut index = Vec::new();
        let mut keys = Vec::new();
        let mut codes = Vec::new();
        let mut rest = Vec::new();

        for column in columns {
            let group = if column.starts_with(&self.index_prefix) {
                &mut index
            } else if starts_with_key_marker(column) {
                &mut keys
            } else if column.ends_with(CODE_SUFFIX) {
                &mut codes
            } else {
                &mut rest
            };
            group.push(column.clone());
        }

        let mut order = Vec::with_capacity(columns.len());
        for mut group in [index, keys, codes, rest] {
            group.sort();
            order.append(&mut group);
        }
        order
    }
}

/// Columns whose values are cleaned: the marker may appear anywhere.
fn is_key_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains(PRIMARY_KEY_MARKER) || lower.contains(FOREIGN_KEY_MARKER)
}

fn starts_with_key_marker(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with(PRIMARY_KEY_MARKER) || lower.starts_with(FOREIGN_KEY_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;

    #[test]
    fn column_names() {
        assert_eq!(standardize_column_name(" Customer Code "), "customer_code");
        assert_eq!(standardize_column_name("KeyP__Customer"), "keyp__customer");
        assert_eq!(standardize_column_name("Sales(EUR)"), "sales_eur");
        assert_eq!(standardize_column_name("a-b=c;d"), "a_b_c_d");
    }

    #[test]
    fn cleans_key_values() {
        let batch = Batch::new(
            ["KeyP__Customer", "Product_Code", "Sales"],
            vec![
                vec!["  0001".into(), "SKU-001".into(), Value::Integer(15)],
                vec![Value::Null, "SKU-002".into(), Value::Integer(21)],
            ],
        )
        .unwrap();

        let polished = polish(&batch).unwrap();

        assert_eq!(polished.columns(), ["keyp__customer", "product_code", "sales"]);
        assert_eq!(polished.value(0, "keyp__customer"), Some(&Value::from("1")));
        assert_eq!(polished.value(1, "keyp__customer"), Some(&Value::from("na")));
        // code columns keep their values
        assert_eq!(polished.value(0, "product_code"), Some(&Value::from("SKU-001")));
    }

    #[test]
    fn index_columns_first() {
        let batch = Batch::new(
            [
                "KeyP__Customer",
                "Product_Code",
                "Sales",
                "index__plant",
                "index__customer",
                "Other_Field",
            ],
            vec![vec![
                "001".into(),
                "SKU-001".into(),
                Value::Integer(15),
                Value::Integer(2),
                Value::Integer(1),
                "test".into(),
            ]],
        )
        .unwrap();

        let polished = polish(&batch).unwrap();
        assert_eq!(
            polished.columns(),
            [
                "index__customer",
                "index__plant",
                "keyp__customer",
                "product_code",
                "other_field",
                "sales"
            ]
        );
        assert_eq!(polished.value(0, "index__plant"), Some(&Value::Integer(2)));
    }

    #[test]
    fn embedded_marker_cleans_but_does_not_reorder() {
        let batch = Batch::new(
            ["sales_keyp__x", "keyp__customer", "alpha"],
            vec![vec![" 007".into(), "0042".into(), Value::Integer(1)]],
        )
        .unwrap();

        let polished = polish(&batch).unwrap();

        assert_eq!(
            polished.columns(),
            ["keyp__customer", "alpha", "sales_keyp__x"]
        );
        assert_eq!(polished.value(0, "sales_keyp__x"), Some(&Value::from("7")));
        assert_eq!(polished.value(0, "keyp__customer"), Some(&Value::from("42")));
    }

    #[test]
    fn colliding_names_rejected() {
        let batch = Batch::empty(["Customer Code", "customer_code"]).unwrap();
        assert_eq!(
            polish(&batch).unwrap_err(),
            IndexError::duplicate_column("customer_code")
        );
    }
}
