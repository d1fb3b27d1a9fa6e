//! On-disk layout of the durable quote store.
//!
//! The store keeps one table, `kv_entries`, keyed by the store key
//! (`quotes`, `selectedCategory`). Its layout version lives in
//! `PRAGMA user_version`; version 0 means a fresh or pre-versioned file.

use super::{StoreError, StoreResult};
use log::info;
use rusqlite::Connection;
use std::time::Duration;

/// Layout version written by this build.
pub const STORE_SCHEMA_VERSION: u32 = 1;

const CREATE_KV_ENTRIES: &str = "
CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Prepares a freshly opened connection for key-value access.
///
/// Entries already present in `kv_entries` are left untouched.
///
/// # Errors
/// - `UnsupportedSchema` when the file was written by a newer build.
/// - `Sqlite` when the layout cannot be created.
pub(super) fn prepare(conn: &mut Connection) -> StoreResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    let found = schema_version(conn)?;
    if found > STORE_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found,
            supported: STORE_SCHEMA_VERSION,
        });
    }
    if found == STORE_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_KV_ENTRIES)?;
    tx.pragma_update(None, "user_version", STORE_SCHEMA_VERSION)?;
    tx.commit()?;

    info!(
        "event=store_schema module=store status=ok from_version={found} to_version={STORE_SCHEMA_VERSION}"
    );
    Ok(())
}

/// Reads the layout version recorded in the file.
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
