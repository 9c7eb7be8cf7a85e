//! Shared utilities for Nebula.
//!
//! This crate provides text helpers that the engine needs but that don't belong
//! in the domain-pure `nebula-types` crate:
//!
//! - **`diff`**: Unified diff rendering and change stats
//! - **`similarity`**: Sequence-matcher similarity ratio for fuzzy lookup

pub mod diff;
pub mod similarity;

pub use diff::{DiffStats, compute_diff_stats, unified_diff};
pub use similarity::similarity_ratio;
