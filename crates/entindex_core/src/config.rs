//! Indexer configuration.

/// Default reserved delimiter between composite-key components (U+001F,
/// the ASCII unit separator).
pub const DEFAULT_KEY_DELIMITER: char = '\u{1F}';

/// Default prefix of every index column added to a batch.
pub const DEFAULT_INDEX_PREFIX: &str = "index__";

/// Configuration for an [`EntityIndexer`](crate::EntityIndexer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    /// First index minted when no prior mapping exists.
    pub index_floor: i64,

    /// Separator placed between normalized key components.
    pub key_delimiter: char,

    /// Whether leading zeros are stripped from key components.
    pub strip_leading_zeros: bool,

    /// Prefix for index column names; also the marker the filtered view
    /// uses to find index columns.
    pub index_prefix: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            index_floor: 1,
            key_delimiter: DEFAULT_KEY_DELIMITER,
            strip_leading_zeros: true,
            index_prefix: DEFAULT_INDEX_PREFIX.to_string(),
        }
    }
}

impl IndexerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first index minted for an empty mapping.
    #[must_use]
    pub const fn index_floor(mut self, floor: i64) -> Self {
        self.index_floor = floor;
        self
    }

    /// Sets the composite-key delimiter.
    #[must_use]
    pub const fn key_delimiter(mut self, delimiter: char) -> Self {
        self.key_delimiter = delimiter;
        self
    }

    /// Sets whether leading zeros are stripped.
    #[must_use]
    pub const fn strip_leading_zeros(mut self, value: bool) -> Self {
        self.strip_leading_zeros = value;
        self
    }

    /// Sets the index column prefix.
    #[must_use]
    pub fn index_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.index_prefix = prefix.into();
        self
    }
}
