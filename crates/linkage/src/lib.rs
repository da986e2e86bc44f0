//! Fuzzy multi-key record linkage for shipment and logistics tables.
//!
//! The engine reconciles a pending-shipment table against a logistics
//! export: rows are grouped by exact normalized name, then told apart with
//! mask-tolerant phone and address comparators and a product-content
//! comparator, under a per-record usage bound. The caller hands in
//! pre-loaded tables and a [`LinkConfig`]; [`load_table`] parses CSV text
//! it is given, and file handling stays with the caller.

pub mod address;
pub mod allocate;
pub mod candidates;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod phone;
pub mod product;
pub mod split;
pub mod stats;

pub use config::{DuplicatePolicy, LinkConfig};
pub use engine::{load_table, run};
pub use error::LinkError;
pub use model::{LinkInput, LinkResult, LinkSummary, LinkedRow, Outcome, Table};
