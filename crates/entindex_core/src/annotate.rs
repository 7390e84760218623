//! Propagating mapped indices back onto rows.

use crate::batch::Batch;
use crate::config::IndexerConfig;
use crate::error::{CoreResult, IndexError};
use crate::mapping::Mapping;
use crate::normalize::{CanonicalKey, KeyNormalizer};
use crate::value::Value;

/// Attaches an index column to a batch by joining each row's canonical key
/// against a mapping.
///
/// The join is a left-outer functional join: one output row per input row,
/// in the same order, with null where the key is unmapped.
#[derive(Debug, Clone)]
pub struct RowAnnotator {
    normalizer: KeyNormalizer,
    prefix: String,
}

impl Default for RowAnnotator {
    fn default() -> Self {
        Self::new(&IndexerConfig::default())
    }
}

impl RowAnnotator {
    /// Creates an annotator following an indexer configuration.
    #[must_use]
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            normalizer: KeyNormalizer::from_config(config),
            prefix: config.index_prefix.clone(),
        }
    }

    /// Name of the index column produced for `key_columns`.
    ///
    /// `["zsource", "customer_code"]` gives `index__zsource_customer_code`.
    pub fn index_column_name<S: AsRef<str>>(&self, key_columns: &[S]) -> String {
        let joined: Vec<&str> = key_columns.iter().map(|c| c.as_ref()).collect();
        format!("{}{}", self.prefix, joined.join("_"))
    }

    /// Normalizes `key_columns` of every row and attaches the mapped index
    /// as `output_column`.
    pub fn annotate<S: AsRef<str>>(
        &self,
        batch: &Batch,
        key_columns: &[S],
        mapping: &Mapping,
        output_column: &str,
    ) -> CoreResult<Batch> {
        let row_keys = self.normalizer.batch_keys(batch, key_columns)?;
        self.annotate_keys(batch, &row_keys, mapping, output_column)
    }

    /// Attaches the mapped index for precomputed row keys.
    ///
    /// `row_keys` must hold one key per row of `batch`.
    pub fn annotate_keys(
        &self,
        batch: &Batch,
        row_keys: &[CanonicalKey],
        mapping: &Mapping,
        output_column: &str,
    ) -> CoreResult<Batch> {
        if row_keys.len() != batch.num_rows() {
            return Err(IndexError::validation(format!(
                "{} row keys for {} rows",
                row_keys.len(),
                batch.num_rows()
            )));
        }

        let values = row_keys
            .iter()
            .map(|key| mapping.get(key).map_or(Value::Null, Value::Integer))
            .collect();

        batch.with_column(output_column, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(parts: &[&str]) -> String {
        parts.join("\u{1F}")
    }

    fn batch() -> Batch {
        Batch::new(
            ["zsource", "customer_code"],
            vec![
                vec!["erp".into(), "0007".into()],
                vec!["erp".into(), "12".into()],
                vec!["ERP".into(), " 7".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn column_name() {
        let annotator = RowAnnotator::default();
        assert_eq!(
            annotator.index_column_name(&["zsource", "customer_code"]),
            "index__zsource_customer_code"
        );
        assert_eq!(annotator.index_column_name(&["plant"]), "index__plant");
    }

    #[test]
    fn left_join_keeps_every_row() {
        let annotator = RowAnnotator::default();
        let mapping = Mapping::from_pairs([(key(&["erp", "7"]), 5i64)]).unwrap();

        let out = annotator
            .annotate(&batch(), &["zsource", "customer_code"], &mapping, "idx")
            .unwrap();

        assert_eq!(out.num_rows(), 3);
        let idx = out.column("idx").unwrap();
        assert_eq!(idx, vec![&Value::Integer(5), &Value::Null, &Value::Integer(5)]);
        assert_eq!(out.value(1, "customer_code"), Some(&Value::from("12")));
    }

    #[test]
    fn reannotating_overwrites() {
        let annotator = RowAnnotator::default();
        let first = Mapping::from_pairs([(key(&["erp", "7"]), 1i64)]).unwrap();
        let second = Mapping::from_pairs([(key(&["erp", "7"]), 1i64), (key(&["erp", "12"]), 2)])
            .unwrap();
        let cols = ["zsource", "customer_code"];

        let once = annotator.annotate(&batch(), &cols, &first, "idx").unwrap();
        let twice = annotator.annotate(&once, &cols, &second, "idx").unwrap();

        assert_eq!(twice.num_columns(), 3);
        assert_eq!(twice.value(1, "idx"), Some(&Value::Integer(2)));
    }

    #[test]
    fn key_count_must_match_rows() {
        let annotator = RowAnnotator::default();
        let err = annotator
            .annotate_keys(&batch(), &[key(&["erp", "7"])], &Mapping::new(), "idx")
            .unwrap_err();
        assert!(err.is_validation());
    }
}
