//! Domain model for quotes and category selection.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Quotes are immutable values; updates replace whole records.
//! - Identity is derived from content, there is no stored ID.

pub mod collection;
pub mod quote;
