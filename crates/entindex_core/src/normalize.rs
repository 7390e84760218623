//! Canonical key normalization.
//!
//! Every value that takes part in a join (batch rows and prior mapping keys
//! alike) goes through the same [`KeyNormalizer`], so keys never drift
//! between the current batch and a historical mapping.

use crate::batch::Batch;
use crate::config::{IndexerConfig, DEFAULT_KEY_DELIMITER};
use crate::error::{CoreResult, IndexError};
use crate::value::Value;
use std::cmp::Ordering;

/// Normalized string identifying an entity across batches.
pub type CanonicalKey = String;

/// Token substituted for null key components.
pub const NULL_TOKEN: &str = "na";

/// Delimiter used by [`KeyNormalizer::display_key`].
pub const DISPLAY_DELIMITER: char = '|';

/// Turns raw column values into canonical composite keys.
///
/// Per component: string form (null becomes `"na"`), trimmed, lower-cased,
/// leading zeros stripped down to a single `"0"` at most. Components are
/// joined with a reserved delimiter that business data is not expected to
/// contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNormalizer {
    delimiter: char,
    strip_leading_zeros: bool,
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_KEY_DELIMITER,
            strip_leading_zeros: true,
        }
    }
}

impl KeyNormalizer {
    /// Creates a normalizer with the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a normalizer following an indexer configuration.
    #[must_use]
    pub fn from_config(config: &IndexerConfig) -> Self {
        Self {
            delimiter: config.key_delimiter,
            strip_leading_zeros: config.strip_leading_zeros,
        }
    }

    /// Returns the component delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Normalizes one raw string component.
    pub fn normalize_str(&self, raw: &str) -> String {
        let lowered = raw.trim().to_lowercase();
        if !self.strip_leading_zeros || lowered.is_empty() {
            return lowered;
        }
        match lowered.trim_start_matches('0') {
            "" => "0".to_string(),
            stripped => stripped.to_string(),
        }
    }

    /// Normalizes one cell value.
    pub fn normalize_value(&self, value: &Value) -> String {
        match value.to_string_form() {
            Some(raw) => self.normalize_str(&raw),
            None => NULL_TOKEN.to_string(),
        }
    }

    /// Builds the canonical key for an ordered list of cell values.
    pub fn canonical_key<'a, I>(&self, values: I) -> CanonicalKey
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut key = String::new();
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                key.push(self.delimiter);
            }
            key.push_str(&self.normalize_value(value));
        }
        key
    }

    /// Re-normalizes an already joined key, component by component.
    ///
    /// Canonical keys are fixed points of this function, which makes it
    /// safe to apply to stored mapping keys of unknown provenance.
    pub fn normalize_key(&self, key: &str) -> CanonicalKey {
        key.split(self.delimiter)
            .map(|part| self.normalize_str(part))
            .collect::<Vec<_>>()
            .join(&self.delimiter.to_string())
    }

    /// Renders a canonical key with a printable delimiter, for logs and
    /// text reports only.
    pub fn display_key(&self, key: &str) -> String {
        key.replace(self.delimiter, &DISPLAY_DELIMITER.to_string())
    }

    /// Computes the canonical key of every row of `batch`.
    ///
    /// Fails if `key_columns` is empty or names a column the batch lacks.
    pub fn batch_keys<S: AsRef<str>>(
        &self,
        batch: &Batch,
        key_columns: &[S],
    ) -> CoreResult<Vec<CanonicalKey>> {
        if key_columns.is_empty() {
            return Err(IndexError::validation("key column list is empty"));
        }
        let positions = key_columns
            .iter()
            .map(|c| batch.require_column(c.as_ref()))
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(batch
            .rows()
            .iter()
            .map(|row| self.canonical_key(positions.iter().map(|&p| &row[p])))
            .collect())
    }

    /// Natural key order used when minting indices.
    ///
    /// Keys compare component by component. All-digit components sort
    /// before other components and compare numerically; everything else
    /// compares bytewise. A key with fewer components sorts first when it
    /// is a prefix of the other.
    pub fn compare_keys(&self, a: &str, b: &str) -> Ordering {
        let mut left = a.split(self.delimiter);
        let mut right = b.split(self.delimiter);
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) => match compare_component(x, y) {
                    Ordering::Equal => {}
                    ord => return ord,
                },
            }
        }
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn compare_component(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(parts: &[&str]) -> String {
        parts.join("\u{1F}")
    }

    #[test]
    fn leading_zeros() {
        let n = KeyNormalizer::new();
        assert_eq!(n.normalize_str("007"), "7");
        assert_eq!(n.normalize_str(" 007 "), "7");
        assert_eq!(n.normalize_str("000"), "0");
        assert_eq!(n.normalize_str("0"), "0");
        assert_eq!(n.normalize_str("000"), n.normalize_str("0"));
        assert_eq!(n.normalize_str(""), "");
        assert_eq!(n.normalize_str("   "), "");
    }

    #[test]
    fn case_and_whitespace() {
        let n = KeyNormalizer::new();
        assert_eq!(n.normalize_str("007".to_uppercase().as_str()), "7");
        assert_eq!(n.normalize_str("  ERP "), "erp");
        assert_eq!(n.normalize_str("A0B"), "a0b");
    }

    #[test]
    fn keep_zeros_when_disabled() {
        let n = KeyNormalizer::from_config(&IndexerConfig::new().strip_leading_zeros(false));
        assert_eq!(n.normalize_str(" 007 "), "007");
    }

    #[test]
    fn null_becomes_token() {
        let n = KeyNormalizer::new();
        assert_eq!(n.normalize_value(&Value::Null), "na");
        assert_eq!(n.normalize_value(&Value::Integer(7)), "7");
        assert_eq!(n.normalize_value(&Value::Text("0007".into())), "7");
    }

    #[test]
    fn composite_keys_do_not_collide() {
        let n = KeyNormalizer::new();
        let split = n.canonical_key(&[Value::from("ab"), Value::from("c")]);
        let other = n.canonical_key(&[Value::from("a"), Value::from("bc")]);
        let single = n.canonical_key(&[Value::from("abc")]);
        assert_ne!(split, other);
        assert_ne!(split, single);
        assert_eq!(split, key(&["ab", "c"]));
    }

    #[test]
    fn normalize_key_is_fixed_point() {
        let n = KeyNormalizer::new();
        let canonical = n.canonical_key(&[Value::from(" ERP "), Value::from("0007")]);
        assert_eq!(n.normalize_key(&canonical), canonical);
        assert_eq!(n.normalize_key(&key(&["ERP", "007"])), key(&["erp", "7"]));
        // component-wise, so a leading "0" component survives
        assert_eq!(n.normalize_key(&key(&["0", "7"])), key(&["0", "7"]));
    }

    #[test]
    fn display_key() {
        let n = KeyNormalizer::new();
        assert_eq!(n.display_key(&key(&["erp", "7"])), "erp|7");
    }

    #[test]
    fn batch_keys_checks_columns() {
        let n = KeyNormalizer::new();
        let batch = Batch::new(["zsource", "code"], vec![vec!["ERP".into(), "007".into()]]).unwrap();

        assert_eq!(
            n.batch_keys(&batch, &["zsource", "code"]).unwrap(),
            vec![key(&["erp", "7"])]
        );
        assert!(n.batch_keys::<&str>(&batch, &[]).unwrap_err().is_validation());
        assert_eq!(
            n.batch_keys(&batch, &["plant"]).unwrap_err(),
            IndexError::column_not_found("plant")
        );
    }

    #[test]
    fn natural_order() {
        let n = KeyNormalizer::new();
        assert_eq!(n.compare_keys(&key(&["erp", "7"]), &key(&["erp", "12"])), Ordering::Less);
        assert_eq!(n.compare_keys(&key(&["erp", "b"]), &key(&["erp", "a"])), Ordering::Greater);
        assert_eq!(n.compare_keys(&key(&["erp", "9"]), &key(&["erp", "a"])), Ordering::Less);
        assert_eq!(n.compare_keys(&key(&["erp"]), &key(&["erp", "1"])), Ordering::Less);
        assert_eq!(n.compare_keys(&key(&["sap", "1"]), &key(&["erp", "2"])), Ordering::Greater);
        assert_eq!(n.compare_keys("x", "x"), Ordering::Equal);
    }
}
