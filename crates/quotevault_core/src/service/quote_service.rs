//! Quote use-case service.
//!
//! # Responsibility
//! - Provide the entry points UI glue calls: show a random quote, add,
//!   filter, import/export and manual sync.
//! - Track the last displayed quote in the session store.
//!
//! # Invariants
//! - Every collection mutation goes through the shared repository lock.
//! - The last-viewed quote lives only in the session store and is never
//!   written to the durable store.
//! - A stale selected category yields an empty display set, not an error.

use crate::model::quote::{CategoryFilter, Quote};
use crate::repo::quote_repo::{pick_random, ImportSummary, RepoResult};
use crate::store::{KeyValueStore, MemoryStore, LAST_VIEWED_QUOTE_KEY};
use crate::sync::notifier::Notifier;
use crate::sync::remote::RemoteSource;
use crate::sync::scheduler::{run_sync_tick, SharedRepository, TickOutcome};
use log::{debug, warn};
use std::sync::Arc;

/// Use-case wrapper over a shared repository and a session store.
pub struct QuoteService<S: KeyValueStore, T: KeyValueStore = MemoryStore> {
    repo: SharedRepository<S>,
    session: T,
}

impl<S: KeyValueStore, T: KeyValueStore> QuoteService<S, T> {
    pub fn new(repo: SharedRepository<S>, session: T) -> Self {
        Self { repo, session }
    }

    /// Returns a handle to the shared repository, e.g. for the scheduler.
    pub fn repository(&self) -> SharedRepository<S> {
        Arc::clone(&self.repo)
    }

    /// Picks a random quote from the currently selected category and records
    /// it as the last viewed quote.
    ///
    /// # Errors
    /// - `EmptyCollection` when the selection has no quotes.
    pub fn show_random(&self) -> RepoResult<Quote> {
        let candidates = self.visible_quotes();
        let quote = pick_random(&candidates)?.clone();
        self.remember_last_viewed(&quote);
        Ok(quote)
    }

    /// Returns the last displayed quote of this session.
    ///
    /// Missing or unreadable session state yields `None`.
    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = match self.session.get(LAST_VIEWED_QUOTE_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("event=last_viewed_load module=service status=degraded error={err}");
                return None;
            }
        };
        match serde_json::from_str::<Quote>(&raw) {
            Ok(quote) => Some(quote),
            Err(err) => {
                warn!("event=last_viewed_load module=service status=degraded reason=invalid_json error={err}");
                None
            }
        }
    }

    /// Adds a quote from form input.
    pub fn add_quote(&self, text: &str, category: &str) -> RepoResult<Quote> {
        self.repo.lock().add(text, category)
    }

    /// Persists a new category selection and returns the matching quotes.
    pub fn select_category(&self, selector: &str) -> RepoResult<Vec<Quote>> {
        let filter = CategoryFilter::parse(selector);
        let repo = self.repo.lock();
        repo.set_selected_filter(&filter)?;
        Ok(repo.filtered(&filter))
    }

    /// Returns the persisted category selection.
    pub fn selected_category(&self) -> CategoryFilter {
        self.repo.lock().selected_filter()
    }

    /// Returns quotes matching the persisted category selection.
    pub fn visible_quotes(&self) -> Vec<Quote> {
        let repo = self.repo.lock();
        repo.filtered(&repo.selected_filter())
    }

    /// Returns category options in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        self.repo.lock().categories()
    }

    /// Imports the content of a `quotes.json` style file.
    pub fn import_json(&self, payload: &str) -> RepoResult<ImportSummary> {
        self.repo.lock().import_json(payload)
    }

    /// Exports the collection as `quotes.json` content.
    pub fn export_json(&self) -> RepoResult<String> {
        self.repo.lock().export_all()
    }

    /// Runs one fetch-and-merge cycle immediately.
    pub fn sync_now(&self, remote: &dyn RemoteSource, notifier: &dyn Notifier) -> TickOutcome {
        run_sync_tick(self.repo.as_ref(), remote, notifier)
    }

    fn remember_last_viewed(&self, quote: &Quote) {
        let encoded = match serde_json::to_string(quote) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("event=last_viewed_save module=service status=error error={err}");
                return;
            }
        };
        match self.session.set(LAST_VIEWED_QUOTE_KEY, &encoded) {
            Ok(()) => debug!("event=last_viewed_save module=service status=ok"),
            Err(err) => warn!("event=last_viewed_save module=service status=error error={err}"),
        }
    }
}
