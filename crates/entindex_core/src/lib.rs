//! # entindex Core
//!
//! Stable surrogate-key indexing for tabular batches.
//!
//! This crate provides:
//! - An immutable [`Batch`] of scalar [`Value`]s
//! - Canonical key normalization ([`KeyNormalizer`])
//! - Index assignment that never renumbers a known key ([`MappingAssigner`])
//! - Left-join propagation of indices onto rows ([`RowAnnotator`])
//! - The base / indexed / filtered / focal view model ([`IndexedViews`])
//! - The [`EntityIndexer`] facade tying them together
//! - Column standardization ([`polish`]) and named batch chains
//!   ([`BatchChain`]) for the surrounding workflow
//!
//! The core performs no I/O. Mappings go in and come out as plain values;
//! persisting them is up to the caller.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod annotate;
mod batch;
mod chain;
mod config;
mod error;
mod indexer;
mod mapping;
mod normalize;
mod polish;
mod stats;
mod value;
mod views;

pub use annotate::RowAnnotator;
pub use batch::Batch;
pub use chain::{BatchChain, ChainEntry};
pub use config::{IndexerConfig, DEFAULT_INDEX_PREFIX, DEFAULT_KEY_DELIMITER};
pub use error::{CoreResult, IndexError};
pub use indexer::{EntityIndexer, EntityKind, IndexOutcome, IndexSpec, LEGACY_INDEX_COLUMN};
pub use mapping::{Assignment, Mapping, MappingAssigner};
pub use normalize::{CanonicalKey, KeyNormalizer, DISPLAY_DELIMITER, NULL_TOKEN};
pub use polish::{polish, standardize_column_name, Polisher};
pub use stats::IndexStats;
pub use value::Value;
pub use views::IndexedViews;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
