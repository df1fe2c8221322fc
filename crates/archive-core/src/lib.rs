//! # archive-core
//!
//! Core types, traits, and pure computations for the personal archive.
//!
//! This crate provides the item model, request validation, the storage
//! trait, and the spending analytics that the other archive crates build on.

pub mod analytics;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use analytics::{
    is_valid_spend, spend_amount, unique_tags, unique_years, SpendingReport, SpendingSummary,
    TagShare, TagSpend, YearBucket, YearSpend, UNCATEGORIZED, UNKNOWN_YEAR,
};
pub use error::{Error, Result};
pub use filter::ItemFilter;
pub use models::*;
pub use traits::*;
