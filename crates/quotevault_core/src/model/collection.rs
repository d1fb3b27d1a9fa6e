//! Ordered quote collection keyed by identity.
//!
//! # Invariants
//! - At most one quote per `QuoteKey`.
//! - Iteration order is insertion order; replacing a quote keeps its slot.

use crate::model::quote::{Quote, QuoteKey};
use std::collections::HashMap;

/// Outcome of one `QuoteCollection::upsert` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// Key was new; quote appended at the end.
    Inserted,
    /// Key existed; the previous quote was replaced in place.
    Replaced,
    /// Key existed with an identical quote.
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteCollection {
    quotes: Vec<Quote>,
    index: HashMap<QuoteKey, usize>,
}

impl QuoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a sequence, collapsing duplicate keys.
    ///
    /// A later duplicate overwrites the earlier one in the earlier slot.
    pub fn from_quotes<I>(quotes: I) -> Self
    where
        I: IntoIterator<Item = Quote>,
    {
        let mut collection = Self::new();
        for quote in quotes {
            collection.upsert(quote);
        }
        collection
    }

    /// Inserts or overwrites `quote` under its identity key.
    pub fn upsert(&mut self, quote: Quote) -> Upsert {
        let key = quote.key();
        match self.index.get(&key) {
            Some(&slot) if self.quotes[slot] == quote => Upsert::Unchanged,
            Some(&slot) => {
                self.quotes[slot] = quote;
                Upsert::Replaced
            }
            None => {
                self.index.insert(key, self.quotes.len());
                self.quotes.push(quote);
                Upsert::Inserted
            }
        }
    }

    pub fn get(&self, key: &QuoteKey) -> Option<&Quote> {
        self.index.get(key).map(|&slot| &self.quotes[slot])
    }

    pub fn contains(&self, key: &QuoteKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn as_slice(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn into_vec(self) -> Vec<Quote> {
        self.quotes
    }
}
