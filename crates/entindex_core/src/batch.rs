//! Immutable tabular batches.
//!
//! A [`Batch`] is an ordered list of column names plus row vectors holding
//! one [`Value`] per column. Every operation returns a new batch; nothing
//! is mutated in place. Row identity is row position, which all indexing
//! operations preserve.

use crate::error::{CoreResult, IndexError};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An immutable, ordered collection of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BatchData")]
pub struct Batch {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Unvalidated wire form of a batch.
#[derive(Deserialize)]
struct BatchData {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl TryFrom<BatchData> for Batch {
    type Error = IndexError;

    fn try_from(data: BatchData) -> CoreResult<Self> {
        Batch::new(data.columns, data.rows)
    }
}

impl Batch {
    /// Creates a batch, checking column names are unique and every row has
    /// one value per column.
    pub fn new<I, S>(columns: I, rows: Vec<Vec<Value>>) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        check_unique(&columns)?;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(IndexError::RowWidthMismatch {
                    row,
                    expected: columns.len(),
                    actual: values.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Creates a batch with the given columns and no rows.
    pub fn empty<I, S>(columns: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(columns, Vec::new())
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows in order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the batch has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the position of a column or a `ColumnNotFound` error.
    pub fn require_column(&self, name: &str) -> CoreResult<usize> {
        self.column_index(name)
            .ok_or_else(|| IndexError::column_not_found(name))
    }

    /// Returns true if the batch has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the value at `row` in column `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Returns all values of a column, in row order.
    pub fn column(&self, name: &str) -> CoreResult<Vec<&Value>> {
        let col = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Returns a batch with `values` as column `name`.
    ///
    /// An existing column of that name is overwritten in place; otherwise
    /// the column is appended.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> CoreResult<Self> {
        if values.len() != self.rows.len() {
            return Err(IndexError::validation(format!(
                "column {name} has {} values, batch has {} rows",
                values.len(),
                self.rows.len()
            )));
        }

        let mut columns = self.columns.clone();
        let slot = match self.column_index(name) {
            Some(col) => Some(col),
            None => {
                columns.push(name.to_string());
                None
            }
        };

        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                match slot {
                    Some(col) => row[col] = value,
                    None => row.push(value),
                }
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Returns a batch with only the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> CoreResult<Self> {
        let positions = names
            .iter()
            .map(|n| self.require_column(n.as_ref()))
            .collect::<CoreResult<Vec<_>>>()?;
        let columns: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        check_unique(&columns)?;

        let rows = self
            .rows
            .iter()
            .map(|row| positions.iter().map(|&p| row[p].clone()).collect())
            .collect();

        Ok(Self { columns, rows })
    }

    /// Returns a batch with the columns renamed positionally.
    pub fn rename_columns(&self, names: Vec<String>) -> CoreResult<Self> {
        if names.len() != self.columns.len() {
            return Err(IndexError::validation(format!(
                "rename expects {} names, got {}",
                self.columns.len(),
                names.len()
            )));
        }
        check_unique(&names)?;
        Ok(Self {
            columns: names,
            rows: self.rows.clone(),
        })
    }

    /// Returns a batch with `f` applied to every value of column `name`.
    pub fn map_column<F>(&self, name: &str, mut f: F) -> CoreResult<Self>
    where
        F: FnMut(&Value) -> Value,
    {
        let col = self.require_column(name)?;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[col] = f(&row[col]);
                row
            })
            .collect();
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Returns a batch with only the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r.as_slice())).cloned().collect(),
        }
    }

    /// Returns a batch with at most the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

fn check_unique(columns: &[String]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for name in columns {
        if !seen.insert(name.as_str()) {
            return Err(IndexError::duplicate_column(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Batch {
        Batch::new(
            ["zsource", "customer_code"],
            vec![
                vec!["erp".into(), "0007".into()],
                vec!["erp".into(), "12".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Batch::new(["a", "b"], vec![vec![Value::Null]]).unwrap_err();
        assert_eq!(
            err,
            IndexError::RowWidthMismatch {
                row: 0,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Batch::empty(["a", "a"]).unwrap_err();
        assert_eq!(err, IndexError::duplicate_column("a"));
    }

    #[test]
    fn with_column_appends() {
        let batch = sample()
            .with_column("n", vec![Value::Integer(1), Value::Integer(2)])
            .unwrap();
        assert_eq!(batch.columns(), ["zsource", "customer_code", "n"]);
        assert_eq!(batch.value(1, "n"), Some(&Value::Integer(2)));
    }

    #[test]
    fn with_column_overwrites() {
        let batch = sample()
            .with_column("zsource", vec![Value::Null, Value::Null])
            .unwrap();
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(batch.columns()[0], "zsource");
        assert!(batch.value(0, "zsource").unwrap().is_null());
    }

    #[test]
    fn with_column_length_checked() {
        let err = sample().with_column("n", vec![Value::Null]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn select_and_filter() {
        let batch = sample();
        let selected = batch.select(&["customer_code"]).unwrap();
        assert_eq!(selected.columns(), ["customer_code"]);
        assert_eq!(selected.num_rows(), 2);

        let filtered = batch.filter_rows(|row| row[1] == Value::from("12"));
        assert_eq!(filtered.num_rows(), 1);

        assert!(matches!(
            batch.select(&["missing"]),
            Err(IndexError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn json_roundtrip_validates() {
        let json = r#"{"columns":["a","b"],"rows":[[1,"x"],[null,"y"]]}"#;
        let batch: Batch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(serde_json::to_string(&batch).unwrap(), json);

        let ragged = r#"{"columns":["a","b"],"rows":[[1]]}"#;
        assert!(serde_json::from_str::<Batch>(ragged).is_err());
    }
}
