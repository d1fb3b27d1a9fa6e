//! Quote domain model.
//!
//! # Responsibility
//! - Define the immutable `Quote` value object and its identity key.
//! - Validate user-entered and imported quote fields.
//! - Model the category selector used by filtering.
//!
//! # Invariants
//! - `text` and `category` are non-empty after trimming for every quote built
//!   through `Quote::new`.
//! - Two quotes are the same quote iff their joined `text + category` keys
//!   are equal. `("AB", "")` and `("A", "B")` intentionally collide.
//!
//! # See also
//! - DESIGN.md (identity key collision)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Sentinel selector value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Immutable quote record.
///
/// Field order is the serialized key order (`text`, then `category`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

/// Validation failures for quote fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
    EmptyCategory,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text cannot be empty"),
            Self::EmptyCategory => write!(f, "quote category cannot be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

impl Quote {
    /// Builds a quote from raw input, trimming surrounding whitespace.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank.
    /// - `EmptyCategory` when `category` is blank.
    pub fn new(
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Self, QuoteValidationError> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();
        if text.is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(QuoteValidationError::EmptyCategory);
        }
        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Builds a quote from an untyped JSON record.
    ///
    /// Returns `None` unless the record is an object whose `text` and
    /// `category` fields are non-empty strings. Values are kept verbatim
    /// (no trimming) so an exported collection re-imports unchanged.
    pub fn from_record(record: &Value) -> Option<Self> {
        let text = record.get("text")?.as_str()?;
        let category = record.get("category")?.as_str()?;
        if text.is_empty() || category.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Returns the identity key of this quote.
    pub fn key(&self) -> QuoteKey {
        QuoteKey::new(&self.text, &self.category)
    }
}

/// Structured identity key for a quote.
///
/// Equality and hashing are defined over the joined byte sequence of
/// `text` followed by `category`, so the key behaves exactly like the
/// concatenated string it replaces.
#[derive(Debug, Clone)]
pub struct QuoteKey {
    text: String,
    category: String,
}

impl QuoteKey {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Returns the legacy concatenated form of this key.
    pub fn joined(&self) -> String {
        format!("{}{}", self.text, self.category)
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.text.bytes().chain(self.category.bytes())
    }
}

impl PartialEq for QuoteKey {
    fn eq(&self, other: &Self) -> bool {
        self.text.len() + self.category.len() == other.text.len() + other.category.len()
            && self.bytes().eq(other.bytes())
    }
}

impl Eq for QuoteKey {}

impl Hash for QuoteKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with `eq`: hash the joined bytes, not the two fields.
        for byte in self.bytes() {
            state.write_u8(byte);
        }
        state.write_u8(0xff);
    }
}

/// Category selector used by display filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parses a stored or user-selected selector string.
    ///
    /// Only the exact sentinel `"all"` and the empty string map to `All`.
    /// Any other selector is kept verbatim, so every name listed by
    /// `QuoteRepository::categories` selects its own quotes.
    pub fn parse(selector: &str) -> Self {
        if selector.is_empty() || selector == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(selector.to_string())
        }
    }

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(name) => name.as_str(),
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => quote.category == *name,
        }
    }
}

/// Returns the built-in quotes used when no collection has been saved yet.
pub fn default_quotes() -> Vec<Quote> {
    [
        (
            "The only limit to our realization of tomorrow is our doubts of today.",
            "Motivation",
        ),
        (
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        ("Do one thing every day that scares you.", "Courage"),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::{default_quotes, CategoryFilter, Quote, QuoteKey, QuoteValidationError};
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn new_trims_and_rejects_blank_fields() {
        let quote = Quote::new("  Stay hungry.  ", " Life ").expect("valid quote");
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "Life");

        assert_eq!(
            Quote::new("", "Life").unwrap_err(),
            QuoteValidationError::EmptyText
        );
        assert_eq!(
            Quote::new("text", "   ").unwrap_err(),
            QuoteValidationError::EmptyCategory
        );
    }

    #[test]
    fn key_collides_on_joined_text_and_category() {
        let left = QuoteKey::new("AB", "");
        let right = QuoteKey::new("A", "B");
        assert_eq!(left, right);
        assert_eq!(left.joined(), "AB");

        let mut keys = HashSet::new();
        keys.insert(left);
        assert!(!keys.insert(right));
        assert!(keys.insert(QuoteKey::new("A", "C")));
    }

    #[test]
    fn from_record_requires_non_empty_strings() {
        assert!(Quote::from_record(&json!({"text": "a", "category": "b"})).is_some());
        assert!(Quote::from_record(&json!({"text": "a"})).is_none());
        assert!(Quote::from_record(&json!({"text": "", "category": "b"})).is_none());
        assert!(Quote::from_record(&json!({"text": 1, "category": "b"})).is_none());
        assert!(Quote::from_record(&json!("text")).is_none());
    }

    #[test]
    fn category_filter_parses_sentinel() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Life "),
            CategoryFilter::Category(" Life ".to_string())
        );
        assert_eq!(
            CategoryFilter::parse("All"),
            CategoryFilter::Category("All".to_string())
        );
        assert_eq!(CategoryFilter::Category("Life".into()).as_str(), "Life");
    }

    #[test]
    fn default_set_has_three_distinct_categories() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 3);
        let categories: Vec<_> = quotes.iter().map(|q| q.category.as_str()).collect();
        assert_eq!(categories, vec!["Motivation", "Life", "Courage"]);
    }
}
