//! Domain types and rules for the ShopSEO backend.
//!
//! Everything in this crate is free of I/O: preference validation and
//! merging, the options catalog, prompt construction, optimization
//! analytics, and the contract for description generators. Storage lives in
//! `shopseo-db`, the HTTP surface in `shopseo-api`.

pub mod analytics;
pub mod error;
pub mod generation;
pub mod merchant;
pub mod optimization;
pub mod options;
pub mod preferences;
pub mod types;
