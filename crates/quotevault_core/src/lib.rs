//! Core domain logic for Quote Vault.
//! This crate is the single source of truth for collection and sync invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{QuoteCollection, Upsert};
pub use model::quote::{
    default_quotes, CategoryFilter, Quote, QuoteKey, QuoteValidationError, ALL_CATEGORIES,
};
pub use repo::quote_repo::{
    pick_random, pick_random_with, ImportSummary, QuoteRepository, RepoError, RepoResult,
    EXPORT_FILE_NAME,
};
pub use service::quote_service::QuoteService;
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};
pub use sync::config::SyncConfig;
pub use sync::notifier::{FnNotifier, LogNotifier, Notifier, SYNC_SUCCESS_MESSAGE};
pub use sync::reconcile::{merge_collection, merge_quotes, MergeReport};
pub use sync::remote::{quotes_from_payload, HttpRemoteSource, NetworkError, RemoteSource};
pub use sync::scheduler::{
    run_sync_tick, SchedulerError, SharedRepository, SyncScheduler, SyncStats, TickOutcome,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
