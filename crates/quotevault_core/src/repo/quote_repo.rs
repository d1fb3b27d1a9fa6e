//! Quote repository over a key-value store.
//!
//! # Responsibility
//! - Own the authoritative in-memory quote collection.
//! - Mediate every read and write of the `quotes` and `selectedCategory`
//!   store keys.
//! - Provide import/export in the `quotes.json` file format.
//!
//! # Invariants
//! - Mutations persist the full collection before they become visible:
//!   on a store failure the in-memory collection is left untouched.
//! - `load` never fails; absent or corrupt state falls back to defaults.
//! - Filtering with an unknown category yields an empty result, not an error.

use crate::model::collection::QuoteCollection;
use crate::model::quote::{default_quotes, CategoryFilter, Quote, QuoteValidationError};
use crate::store::{KeyValueStore, StoreError, QUOTES_KEY, SELECTED_CATEGORY_KEY};
use crate::sync::reconcile::{merge_collection, MergeReport};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// File name used for exported collections.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for quote operations.
#[derive(Debug)]
pub enum RepoError {
    /// Empty required field on manual add.
    Validation(QuoteValidationError),
    /// Import payload is not a JSON array (or not JSON at all).
    Format(String),
    /// Nothing to pick from.
    EmptyCollection,
    /// Collection could not be encoded for storage or export.
    Encode(serde_json::Error),
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Format(message) => write!(f, "invalid quote file format: {message}"),
            Self::EmptyCollection => write!(f, "no quotes available"),
            Self::Encode(err) => write!(f, "failed to encode quotes: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Format(_) | Self::EmptyCollection => None,
        }
    }
}

impl From<QuoteValidationError> for RepoError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Per-call import counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records that carried a non-empty `text` and `category`.
    pub accepted: usize,
    /// Records dropped for missing or malformed fields.
    pub skipped: usize,
}

/// In-memory quote collection backed by a key-value store.
pub struct QuoteRepository<S: KeyValueStore> {
    store: S,
    collection: QuoteCollection,
}

impl<S: KeyValueStore> QuoteRepository<S> {
    /// Creates an empty repository. Call `load` to restore saved state.
    pub fn new(store: S) -> Self {
        Self {
            store,
            collection: QuoteCollection::new(),
        }
    }

    /// Creates a repository and immediately restores saved state.
    pub fn open(store: S) -> Self {
        let mut repo = Self::new(store);
        repo.load();
        repo
    }

    /// Restores the collection from the store.
    ///
    /// A missing key, a read failure, unparseable JSON or a non-array value
    /// all seed the built-in default set. Malformed entries inside a stored
    /// array are skipped.
    pub fn load(&mut self) {
        let stored = match self.store.get(QUOTES_KEY) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=quotes_load module=repo status=degraded reason=store_read error={err}");
                None
            }
        };

        let restored = stored.and_then(|raw| match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => Some(QuoteCollection::from_quotes(
                records.iter().filter_map(Quote::from_record),
            )),
            Ok(_) => {
                warn!("event=quotes_load module=repo status=degraded reason=not_array");
                None
            }
            Err(err) => {
                warn!("event=quotes_load module=repo status=degraded reason=invalid_json error={err}");
                None
            }
        });

        self.collection = match restored {
            Some(collection) => {
                info!(
                    "event=quotes_load module=repo status=ok source=store count={}",
                    collection.len()
                );
                collection
            }
            None => {
                let defaults = QuoteCollection::from_quotes(default_quotes());
                info!(
                    "event=quotes_load module=repo status=ok source=defaults count={}",
                    defaults.len()
                );
                defaults
            }
        };
    }

    /// Returns the collection in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        self.collection.as_slice()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a quote from user input.
    ///
    /// Both fields are trimmed. An existing quote with the same identity key
    /// is overwritten in place.
    ///
    /// # Errors
    /// - `Validation` when either field is blank; the collection is unchanged.
    /// - `Store`/`Encode` when persistence fails; the collection is unchanged.
    pub fn add(&mut self, text: &str, category: &str) -> RepoResult<Quote> {
        let quote = Quote::new(text, category)?;
        let mut next = self.collection.clone();
        let outcome = next.upsert(quote.clone());
        self.commit(next)?;
        debug!(
            "event=quote_add module=repo status=ok outcome={:?} count={}",
            outcome,
            self.collection.len()
        );
        Ok(quote)
    }

    /// Imports a sequence of untyped records.
    ///
    /// Records without non-empty `text` and `category` strings are skipped.
    /// The collection is persisted once, after the whole sequence.
    ///
    /// # Errors
    /// - `Format` when `candidates` is not a JSON array.
    pub fn import_many(&mut self, candidates: &Value) -> RepoResult<ImportSummary> {
        let Value::Array(records) = candidates else {
            return Err(RepoError::Format(format!(
                "expected a JSON array, got {}",
                json_kind(candidates)
            )));
        };

        let mut next = self.collection.clone();
        let mut summary = ImportSummary::default();
        for record in records {
            match Quote::from_record(record) {
                Some(quote) => {
                    next.upsert(quote);
                    summary.accepted += 1;
                }
                None => summary.skipped += 1,
            }
        }
        self.commit(next)?;

        info!(
            "event=quotes_import module=repo status=ok accepted={} skipped={} count={}",
            summary.accepted,
            summary.skipped,
            self.collection.len()
        );
        Ok(summary)
    }

    /// Parses `payload` as JSON and imports it with `import_many`.
    ///
    /// # Errors
    /// - `Format` when `payload` is not valid JSON or not an array.
    pub fn import_json(&mut self, payload: &str) -> RepoResult<ImportSummary> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|err| RepoError::Format(format!("unreadable JSON: {err}")))?;
        self.import_many(&value)
    }

    /// Serializes the collection as 2-space pretty-printed JSON.
    pub fn export_all(&self) -> RepoResult<String> {
        serde_json::to_string_pretty(self.collection.as_slice()).map_err(RepoError::Encode)
    }

    /// Returns quotes matching `selector` (`"all"` or a category name).
    pub fn filter_by_category(&self, selector: &str) -> Vec<Quote> {
        self.filtered(&CategoryFilter::parse(selector))
    }

    /// Returns quotes matching a parsed filter, in collection order.
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.collection
            .as_slice()
            .iter()
            .filter(|quote| filter.matches(quote))
            .cloned()
            .collect()
    }

    /// Returns distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for quote in self.collection.as_slice() {
            if !categories.iter().any(|seen| *seen == quote.category) {
                categories.push(quote.category.clone());
            }
        }
        categories
    }

    /// Merges a fetched remote batch with server-wins semantics and persists
    /// the result as the new authoritative collection.
    pub fn reconcile(&mut self, remote: &[Quote]) -> RepoResult<MergeReport> {
        let (merged, report) = merge_collection(self.collection.as_slice(), remote);
        self.commit(merged)?;
        info!(
            "event=quotes_reconcile module=repo status=ok added={} overwritten={} unchanged={} count={}",
            report.added, report.overwritten, report.unchanged, report.total
        );
        Ok(report)
    }

    /// Replaces the whole collection and persists it.
    ///
    /// Duplicate keys in `quotes` collapse into the first slot.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> RepoResult<()> {
        self.commit(QuoteCollection::from_quotes(quotes))
    }

    /// Returns the persisted category filter.
    ///
    /// Missing or unreadable state maps to `CategoryFilter::All`. A stale
    /// category is returned as-is.
    pub fn selected_filter(&self) -> CategoryFilter {
        match self.store.get(SELECTED_CATEGORY_KEY) {
            Ok(Some(value)) => CategoryFilter::parse(&value),
            Ok(None) => CategoryFilter::All,
            Err(err) => {
                warn!("event=filter_load module=repo status=degraded error={err}");
                CategoryFilter::All
            }
        }
    }

    /// Persists the category filter selection.
    pub fn set_selected_filter(&self, filter: &CategoryFilter) -> RepoResult<()> {
        self.store.set(SELECTED_CATEGORY_KEY, filter.as_str())?;
        Ok(())
    }

    fn commit(&mut self, next: QuoteCollection) -> RepoResult<()> {
        let encoded = serde_json::to_string(next.as_slice()).map_err(RepoError::Encode)?;
        self.store.set(QUOTES_KEY, &encoded)?;
        self.collection = next;
        Ok(())
    }
}

/// Picks one quote uniformly at random.
///
/// # Errors
/// - `EmptyCollection` when `quotes` is empty.
pub fn pick_random(quotes: &[Quote]) -> RepoResult<&Quote> {
    pick_random_with(quotes, &mut rand::thread_rng())
}

/// Same as `pick_random` with a caller-provided RNG.
pub fn pick_random_with<'a, R: Rng + ?Sized>(
    quotes: &'a [Quote],
    rng: &mut R,
) -> RepoResult<&'a Quote> {
    quotes.choose(rng).ok_or(RepoError::EmptyCollection)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::{pick_random, pick_random_with, QuoteRepository, RepoError};
    use crate::model::quote::{CategoryFilter, Quote};
    use crate::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery))
        }
    }

    fn quote(text: &str, category: &str) -> Quote {
        Quote {
            text: text.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn categories_are_listed_in_first_seen_order() {
        let mut repo = QuoteRepository::new(MemoryStore::new());
        repo.replace_all(vec![
            quote("a", "Life"),
            quote("b", "Work"),
            quote("c", "Life"),
        ])
        .unwrap();
        assert_eq!(repo.categories(), vec!["Life", "Work"]);
    }

    #[test]
    fn failed_persist_leaves_collection_untouched() {
        let mut repo = QuoteRepository::open(ReadOnlyStore);
        let before = repo.quotes().to_vec();

        let err = repo.add("new quote", "Life").unwrap_err();
        assert!(matches!(err, RepoError::Store(_)));
        assert_eq!(repo.quotes(), before.as_slice());
    }

    #[test]
    fn pick_random_handles_empty_and_singleton() {
        assert!(matches!(pick_random(&[]), Err(RepoError::EmptyCollection)));

        let only = vec![quote("only", "One")];
        for _ in 0..10 {
            assert_eq!(pick_random(&only).unwrap(), &only[0]);
        }
    }

    #[test]
    fn pick_random_with_seeded_rng_stays_in_range() {
        let quotes = vec![quote("a", "X"), quote("b", "Y"), quote("c", "Z")];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = pick_random_with(&quotes, &mut rng).unwrap();
            assert!(quotes.contains(picked));
        }
    }

    #[test]
    fn selected_filter_defaults_to_all_and_persists() {
        let store = MemoryStore::new();
        let repo = QuoteRepository::open(store.clone());
        assert_eq!(repo.selected_filter(), CategoryFilter::All);

        repo.set_selected_filter(&CategoryFilter::Category("Life".into()))
            .unwrap();
        assert_eq!(
            store.get("selectedCategory").unwrap().as_deref(),
            Some("Life")
        );
        assert_eq!(
            repo.selected_filter(),
            CategoryFilter::Category("Life".into())
        );
    }
}
