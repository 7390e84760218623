//! # entindex Testkit
//!
//! Test utilities for entindex.
//!
//! This crate provides:
//! - Fixture batches and mappings for the documented indexing scenarios
//! - Property-based test generators using proptest
//! - A harness replaying indexing runs against stored mappings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entindex_testkit::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn indices_are_stable(batch in key_batch_strategy(20)) {
//!         // ...
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use proptest::prelude::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::IndexingHarness;
