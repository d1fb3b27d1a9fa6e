//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, session store and sync calls into use-case
//!   level APIs.
//! - Keep UI glue decoupled from storage details.

pub mod quote_service;
