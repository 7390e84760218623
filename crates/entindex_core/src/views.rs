//! The four-layer view model kept across indexing calls.
//!
//! - `base`: the batch the indexer was built over, never modified
//! - `indexed`: base plus every index column added so far
//! - `filtered`: rows of `indexed` whose index columns are all non-null
//! - `focal`: base plus only the column added by the latest call

use crate::batch::Batch;
use crate::error::{CoreResult, IndexError};
use tracing::debug;

/// Owns the views derived from one base batch.
#[derive(Debug, Clone)]
pub struct IndexedViews {
    base: Batch,
    indexed: Batch,
    filtered: Batch,
    focal: Batch,
    prefix: String,
    last_column: Option<String>,
}

impl IndexedViews {
    /// Creates the view set; every view starts out equal to `base`.
    pub fn new(base: Batch, prefix: impl Into<String>) -> Self {
        Self {
            indexed: base.clone(),
            filtered: base.clone(),
            focal: base.clone(),
            base,
            prefix: prefix.into(),
            last_column: None,
        }
    }

    /// The base batch, never modified.
    pub fn base(&self) -> &Batch {
        &self.base
    }

    /// Base plus every index column added so far.
    pub fn indexed(&self) -> &Batch {
        &self.indexed
    }

    /// Rows of [`indexed`](Self::indexed) with no null index column.
    pub fn filtered(&self) -> &Batch {
        &self.filtered
    }

    /// Base plus the index column of the latest call.
    pub fn focal(&self) -> &Batch {
        &self.focal
    }

    /// Name of the column added by the latest call.
    pub fn last_column(&self) -> Option<&str> {
        self.last_column.as_deref()
    }

    /// Names of the index columns currently in the indexed view.
    pub fn index_columns(&self) -> Vec<&str> {
        self.indexed
            .columns()
            .iter()
            .filter(|c| c.starts_with(&self.prefix))
            .map(String::as_str)
            .collect()
    }

    /// Replaces the indexed view with `indexed`, which must be the previous
    /// indexed view plus (or with a rewritten) `output_column`, and
    /// recomputes the filtered and focal views.
    pub fn record(&mut self, indexed: Batch, output_column: &str) -> CoreResult<()> {
        if indexed.num_rows() != self.base.num_rows() {
            return Err(IndexError::validation(format!(
                "indexed batch has {} rows, base has {}",
                indexed.num_rows(),
                self.base.num_rows()
            )));
        }
        let values = indexed
            .column(output_column)?
            .into_iter()
            .cloned()
            .collect();

        self.focal = self.base.with_column(output_column, values)?;
        self.indexed = indexed;
        self.filtered = self.compute_filtered();
        self.last_column = Some(output_column.to_string());

        debug!(
            column = output_column,
            rows = self.indexed.num_rows(),
            resolved = self.filtered.num_rows(),
            "views recorded"
        );
        Ok(())
    }

    fn compute_filtered(&self) -> Batch {
        let positions: Vec<usize> = self
            .indexed
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_with(&self.prefix))
            .map(|(i, _)| i)
            .collect();

        self.indexed
            .filter_rows(|row| positions.iter().all(|&p| !row[p].is_null()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn base() -> Batch {
        Batch::new(
            ["code", "qty"],
            vec![
                vec!["a".into(), Value::Integer(1)],
                vec!["b".into(), Value::Integer(2)],
                vec!["c".into(), Value::Integer(3)],
            ],
        )
        .unwrap()
    }

    fn ints(values: &[Option<i64>]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn starts_as_base() {
        let views = IndexedViews::new(base(), "index__");
        assert_eq!(views.indexed(), &base());
        assert_eq!(views.filtered(), &base());
        assert_eq!(views.focal(), &base());
        assert!(views.last_column().is_none());
    }

    #[test]
    fn accumulates_and_filters() {
        let mut views = IndexedViews::new(base(), "index__");

        let first = base()
            .with_column("index__code", ints(&[Some(1), None, Some(3)]))
            .unwrap();
        views.record(first, "index__code").unwrap();
        assert_eq!(views.filtered().num_rows(), 2);

        let second = views
            .indexed()
            .with_column("index__qty", ints(&[None, Some(2), Some(3)]))
            .unwrap();
        views.record(second, "index__qty").unwrap();

        assert_eq!(views.index_columns(), vec!["index__code", "index__qty"]);
        assert_eq!(views.filtered().num_rows(), 1);
        assert_eq!(views.filtered().value(0, "code"), Some(&Value::from("c")));

        // focal carries only the latest column
        assert_eq!(views.focal().columns(), ["code", "qty", "index__qty"]);
        assert_eq!(views.base().num_columns(), 2);
    }

    #[test]
    fn rejects_row_count_change() {
        let mut views = IndexedViews::new(base(), "index__");
        let shorter = base().head(1).with_column("index__code", ints(&[Some(1)])).unwrap();
        assert!(views.record(shorter, "index__code").unwrap_err().is_validation());
    }

    #[test]
    fn rejects_missing_output_column() {
        let mut views = IndexedViews::new(base(), "index__");
        let err = views.record(base(), "index__code").unwrap_err();
        assert_eq!(err, IndexError::column_not_found("index__code"));
    }
}
