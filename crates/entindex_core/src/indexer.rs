//! Entity indexer facade.
//!
//! [`EntityIndexer`] ties the normalizer, the assigner, the annotator and
//! the view set together over one base batch:
//!
//! ```rust,ignore
//! use entindex_core::{Batch, EntityIndexer};
//!
//! let mut indexer = EntityIndexer::new(orders);
//!
//! // Open-set call: unseen customers receive new indices.
//! let customers = indexer.customer("zsource", "customer_code", None, true)?;
//! persist(&customers.mapping_batch);
//!
//! // Closed-set call against a stored plant mapping.
//! let plants = indexer.plant("zsource", "plant_code", Some(stored_plants), false)?;
//!
//! // Rows resolved against every mapping applied so far.
//! let clean = indexer.filtered_indexed();
//! ```

use crate::annotate::RowAnnotator;
use crate::batch::Batch;
use crate::config::IndexerConfig;
use crate::error::{CoreResult, IndexError};
use crate::mapping::{Mapping, MappingAssigner};
use crate::normalize::{CanonicalKey, KeyNormalizer};
use crate::polish::standardize_column_name;
use crate::stats::IndexStats;
use crate::views::IndexedViews;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Index column name accepted in stored mappings that predate the
/// `<kind>_index` naming.
pub const LEGACY_INDEX_COLUMN: &str = "index";

/// Category of indexed business object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Customers.
    Customer,
    /// Plants.
    Plant,
    /// Materials.
    Material,
    /// Any other kind, by name.
    Custom(String),
}

impl EntityKind {
    /// The kind's name, also the mapping's key column.
    pub fn name(&self) -> &str {
        match self {
            Self::Customer => "customer",
            Self::Plant => "plant",
            Self::Material => "material",
            Self::Custom(name) => name,
        }
    }

    /// Name of the mapping's index column, `<kind>_index`.
    pub fn index_column(&self) -> String {
        format!("{}_index", self.name())
    }
}

impl From<&str> for EntityKind {
    /// Parses a kind name after column-name standardization, so
    /// `"Customer"` and `" customer "` both give [`EntityKind::Customer`].
    fn from(name: &str) -> Self {
        match standardize_column_name(name).as_str() {
            "customer" => Self::Customer,
            "plant" => Self::Plant,
            "material" => Self::Material,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters of one indexing call.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    /// Source columns forming the composite key, in order.
    pub key_columns: Vec<String>,
    /// Entity kind the mapping belongs to.
    pub kind: EntityKind,
    /// Prior mapping batch to extend.
    pub existing_mapping: Option<Batch>,
    /// Whether unseen keys may receive new indices.
    pub allow_new: bool,
}

impl IndexSpec {
    /// Creates an open-set spec with no prior mapping.
    pub fn new<I, S>(kind: impl Into<EntityKind>, key_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_columns: key_columns.into_iter().map(Into::into).collect(),
            kind: kind.into(),
            existing_mapping: None,
            allow_new: true,
        }
    }

    /// Sets the prior mapping to extend.
    #[must_use]
    pub fn existing_mapping(mut self, mapping: Batch) -> Self {
        self.existing_mapping = Some(mapping);
        self
    }

    /// Sets whether unseen keys may receive new indices.
    #[must_use]
    pub fn allow_new(mut self, value: bool) -> Self {
        self.allow_new = value;
        self
    }

    /// Restricts the call to keys of the prior mapping.
    #[must_use]
    pub fn closed(self) -> Self {
        self.allow_new(false)
    }
}

/// Everything one indexing call produces.
#[derive(Debug, Clone)]
pub struct IndexOutcome {
    /// Entity kind of the mapping.
    pub kind: EntityKind,
    /// Name of the index column added to the views.
    pub output_column: String,
    /// The resulting mapping.
    pub mapping: Mapping,
    /// The mapping as `{<kind>, <kind>_index}`, sorted by index.
    pub mapping_batch: Batch,
    /// Pairs minted by this call, in index order.
    pub minted: Vec<(CanonicalKey, i64)>,
    /// Base batch plus this call's index column.
    pub focal: Batch,
    /// Counters for this call.
    pub stats: IndexStats,
}

/// Assigns stable surrogate indices to entities of one base batch.
///
/// Each call annotates the progressively indexed view, so index columns
/// accumulate across calls while the base batch stays untouched.
#[derive(Debug, Clone)]
pub struct EntityIndexer {
    config: IndexerConfig,
    normalizer: KeyNormalizer,
    assigner: MappingAssigner,
    annotator: RowAnnotator,
    views: IndexedViews,
}

impl EntityIndexer {
    /// Creates an indexer with the default configuration.
    pub fn new(base: Batch) -> Self {
        Self::with_config(base, IndexerConfig::default())
    }

    /// Creates an indexer with an explicit configuration.
    pub fn with_config(base: Batch, config: IndexerConfig) -> Self {
        Self {
            normalizer: KeyNormalizer::from_config(&config),
            assigner: MappingAssigner::new(&config),
            annotator: RowAnnotator::new(&config),
            views: IndexedViews::new(base, config.index_prefix.clone()),
            config,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// The normalizer in use.
    pub fn normalizer(&self) -> &KeyNormalizer {
        &self.normalizer
    }

    /// The view set.
    pub fn views(&self) -> &IndexedViews {
        &self.views
    }

    /// The base batch, never modified.
    pub fn base(&self) -> &Batch {
        self.views.base()
    }

    /// Base plus every index column added so far.
    pub fn indexed(&self) -> &Batch {
        self.views.indexed()
    }

    /// Rows resolved against every mapping applied so far.
    pub fn filtered_indexed(&self) -> &Batch {
        self.views.filtered()
    }

    /// Base plus the latest index column.
    pub fn focal(&self) -> &Batch {
        self.views.focal()
    }

    /// Indexes customers keyed by `(zsource, code)`.
    pub fn customer(
        &mut self,
        zsource: &str,
        code: &str,
        existing_mapping: Option<Batch>,
        allow_new: bool,
    ) -> CoreResult<IndexOutcome> {
        self.named(EntityKind::Customer, zsource, code, existing_mapping, allow_new)
    }

    /// Indexes plants keyed by `(zsource, code)`.
    pub fn plant(
        &mut self,
        zsource: &str,
        code: &str,
        existing_mapping: Option<Batch>,
        allow_new: bool,
    ) -> CoreResult<IndexOutcome> {
        self.named(EntityKind::Plant, zsource, code, existing_mapping, allow_new)
    }

    /// Indexes materials keyed by `(zsource, code)`.
    pub fn material(
        &mut self,
        zsource: &str,
        code: &str,
        existing_mapping: Option<Batch>,
        allow_new: bool,
    ) -> CoreResult<IndexOutcome> {
        self.named(EntityKind::Material, zsource, code, existing_mapping, allow_new)
    }

    fn named(
        &mut self,
        kind: EntityKind,
        zsource: &str,
        code: &str,
        existing_mapping: Option<Batch>,
        allow_new: bool,
    ) -> CoreResult<IndexOutcome> {
        let mut spec = IndexSpec::new(kind, [zsource, code]).allow_new(allow_new);
        spec.existing_mapping = existing_mapping;
        self.index(spec)
    }

    /// Runs one indexing call and updates the views.
    pub fn index(&mut self, spec: IndexSpec) -> CoreResult<IndexOutcome> {
        let IndexSpec {
            key_columns,
            kind,
            existing_mapping,
            allow_new,
        } = spec;

        if key_columns.is_empty() {
            return Err(IndexError::validation("key column list is empty"));
        }
        for column in &key_columns {
            self.base().require_column(column)?;
        }
        // focal must gain exactly one column over base
        let output_column = self.annotator.index_column_name(&key_columns);
        if self.base().has_column(&output_column) {
            return Err(IndexError::duplicate_column(output_column));
        }

        let prior = match &existing_mapping {
            Some(batch) => self.read_prior(batch, &kind)?,
            None => Mapping::new(),
        };

        let row_keys = self.normalizer.batch_keys(self.views.indexed(), &key_columns)?;
        let distinct: BTreeSet<CanonicalKey> = row_keys.iter().cloned().collect();

        let assignment = self.assigner.assign(&distinct, &prior, allow_new)?;
        let annotated = self.annotator.annotate_keys(
            self.views.indexed(),
            &row_keys,
            &assignment.mapping,
            &output_column,
        )?;
        self.views.record(annotated, &output_column)?;

        let matched_rows = row_keys
            .iter()
            .filter(|k| assignment.mapping.contains(k))
            .count();
        let stats = IndexStats {
            rows: row_keys.len(),
            distinct_keys: distinct.len(),
            reused_keys: assignment.reused,
            minted_keys: assignment.minted.len(),
            excluded_keys: assignment.excluded.len(),
            matched_rows,
            unmatched_rows: row_keys.len() - matched_rows,
            mapping_size: assignment.mapping.len(),
        };

        debug!(
            kind = kind.name(),
            column = output_column.as_str(),
            allow_new,
            %stats,
            "indexed entities"
        );

        let mapping_batch = assignment
            .mapping
            .to_batch(kind.name(), &kind.index_column())?;

        Ok(IndexOutcome {
            output_column,
            mapping: assignment.mapping,
            mapping_batch,
            minted: assignment.minted,
            focal: self.views.focal().clone(),
            stats,
            kind,
        })
    }

    /// Reads a stored mapping batch for `kind`.
    ///
    /// The index column is `<kind>_index`, or `index` for older tables.
    fn read_prior(&self, batch: &Batch, kind: &EntityKind) -> CoreResult<Mapping> {
        let index_column = kind.index_column();
        let index_column = if batch.has_column(&index_column) {
            index_column
        } else if batch.has_column(LEGACY_INDEX_COLUMN) {
            LEGACY_INDEX_COLUMN.to_string()
        } else {
            return Err(IndexError::column_not_found(index_column));
        };
        Mapping::from_batch(batch, kind.name(), &index_column, &self.normalizer)
    }
}
