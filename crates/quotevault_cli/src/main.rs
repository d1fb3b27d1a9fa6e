//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quotevault_core` wiring.
//! - Show one random quote and optionally run a single sync round.
//!
//! Environment:
//! - `QUOTEVAULT_DB`: SQLite store path (in-memory when unset).
//! - `QUOTEVAULT_LOG_DIR`: absolute log directory (logging off when unset).
//! - `QUOTEVAULT_SYNC=1`: fetch and merge remote quotes before display.

use parking_lot::Mutex;
use quotevault_core::{
    default_log_level, init_logging, HttpRemoteSource, LogNotifier, MemoryStore, QuoteRepository,
    QuoteService, RepoError, SqliteStore, StoreError, SyncConfig,
};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("quotevault_core ping={}", quotevault_core::ping());
    println!("quotevault_core version={}", quotevault_core::core_version());

    if let Ok(log_dir) = std::env::var("QUOTEVAULT_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let store = match open_store() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let repo = Arc::new(Mutex::new(QuoteRepository::open(store)));
    let service = QuoteService::new(repo, MemoryStore::new());

    if std::env::var("QUOTEVAULT_SYNC").is_ok_and(|value| value == "1") {
        let remote = HttpRemoteSource::new(&SyncConfig::default());
        let outcome = service.sync_now(&remote, &LogNotifier);
        println!("sync success={}", outcome.is_success());
    }

    match service.show_random() {
        Ok(quote) => {
            println!("\"{}\"", quote.text);
            println!("- {}", quote.category);
            ExitCode::SUCCESS
        }
        Err(RepoError::EmptyCollection) => {
            println!("No quotes available.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to show quote: {err}");
            ExitCode::FAILURE
        }
    }
}

fn open_store() -> Result<SqliteStore, StoreError> {
    match std::env::var("QUOTEVAULT_DB") {
        Ok(path) => SqliteStore::open(path),
        Err(_) => SqliteStore::open_in_memory(),
    }
}
