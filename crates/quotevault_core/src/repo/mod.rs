//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Own the in-memory quote collection and its persistence.
//!
//! # Invariants
//! - Repository writes validate input before touching the store.
//! - Unreadable persisted state degrades to defaults instead of failing.

pub mod quote_repo;
