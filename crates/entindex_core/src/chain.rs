//! Ordered, named collection of batches.
//!
//! A workflow keeps each intermediate batch under a name, in creation
//! order, and refers back to them by name or position:
//!
//! ```rust,ignore
//! let mut chain = BatchChain::new();
//! chain.push("raw", raw);
//! chain.push("polished", polish(chain.get("raw")?)?);
//! let latest = chain.pick(-1)?;
//! ```

use crate::batch::Batch;
use crate::error::{CoreResult, IndexError};
use serde::Serialize;

/// Shape of one chained batch, as reported by [`BatchChain::trace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainEntry {
    /// Zero-based position in the chain.
    pub position: usize,
    /// Name of the batch.
    pub name: String,
    /// Number of columns.
    pub columns: usize,
    /// Number of rows.
    pub rows: usize,
}

/// Named batches in insertion order.
#[derive(Debug, Clone, Default)]
pub struct BatchChain {
    entries: Vec<(String, Batch)>,
}

impl BatchChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a batch, or replaces the batch of the same name in place.
    pub fn push(&mut self, name: impl Into<String>, batch: Batch) {
        let name = name.into();
        match self.entries.iter().position(|(n, _)| *n == name) {
            Some(position) => self.entries[position].1 = batch,
            None => self.entries.push((name, batch)),
        }
    }

    /// Returns the batch with the given name.
    pub fn get(&self, name: &str) -> CoreResult<&Batch> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b)
            .ok_or_else(|| IndexError::UnknownBatch {
                name: name.to_string(),
            })
    }

    /// Returns the batch at `index`; negative values count from the end.
    pub fn pick(&self, index: isize) -> CoreResult<&Batch> {
        let position = self.resolve(index)?;
        Ok(&self.entries[position].1)
    }

    /// Lists position, name and shape of every batch.
    pub fn trace(&self) -> Vec<ChainEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, (name, batch))| ChainEntry {
                position,
                name: name.clone(),
                columns: batch.num_columns(),
                rows: batch.num_rows(),
            })
            .collect()
    }

    /// Names in chain order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of batches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve(&self, index: isize) -> CoreResult<usize> {
        let len = self.entries.len();
        let resolved = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            Some(index.unsigned_abs())
        };
        match resolved {
            Some(position) if position < len => Ok(position),
            _ => Err(IndexError::ChainIndexOutOfRange { index, len }),
        }
    }
}
