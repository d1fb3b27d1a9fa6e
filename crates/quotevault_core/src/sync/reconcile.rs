//! Server-wins merge of a remote batch into the local collection.
//!
//! # Invariants
//! - A remote quote always replaces a local quote with the same identity key.
//! - Local quotes with no colliding remote key are preserved in order.
//! - Replaced quotes keep the local slot; new remote quotes append.
//! - Merging the same batch twice equals merging it once.

use crate::model::collection::{QuoteCollection, Upsert};
use crate::model::quote::Quote;

/// Counters describing one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Remote quotes whose key was not present locally.
    pub added: usize,
    /// Local quotes overwritten by a differing remote quote.
    pub overwritten: usize,
    /// Remote quotes identical to the local entry.
    pub unchanged: usize,
    /// Collection size after the merge.
    pub total: usize,
}

impl MergeReport {
    /// Returns whether the merge changed the collection.
    pub fn changed(&self) -> bool {
        self.added > 0 || self.overwritten > 0
    }
}

/// Merges `remote` into `local` and returns the new collection.
pub fn merge_quotes(local: &[Quote], remote: &[Quote]) -> Vec<Quote> {
    merge_collection(local, remote).0.into_vec()
}

/// Merges `remote` into `local`, returning the keyed collection and counters.
pub fn merge_collection(local: &[Quote], remote: &[Quote]) -> (QuoteCollection, MergeReport) {
    let mut working = QuoteCollection::from_quotes(local.iter().cloned());
    let mut report = MergeReport::default();

    for quote in remote {
        match working.upsert(quote.clone()) {
            Upsert::Inserted => report.added += 1,
            Upsert::Replaced => report.overwritten += 1,
            Upsert::Unchanged => report.unchanged += 1,
        }
    }

    report.total = working.len();
    (working, report)
}
