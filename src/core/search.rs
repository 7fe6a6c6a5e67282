use serde::{Deserialize, Serialize};

use crate::core::Book;

/// Sort key for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Title,
    Author,
    Year,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortBy {
    /// Parse a user-supplied sort key; anything unrecognized falls back
    /// to relevance rather than being rejected.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "title" => SortBy::Title,
            "author" => SortBy::Author,
            "year" => SortBy::Year,
            _ => SortBy::Relevance,
        }
    }
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// One search invocation's filter set.
///
/// Facets combine conjunctively across fields; a multi-valued facet
/// (genres, authors) matches disjunctively within itself. Missing range
/// bounds widen to the full domain instead of rejecting the query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub genres: Vec<String>,

    #[serde(default)]
    pub authors: Vec<String>,

    /// Inclusive (min, max) on the derived release year
    #[serde(default)]
    pub year_range: Option<(Option<i32>, Option<i32>)>,

    /// Inclusive (min, max) on page count
    #[serde(default)]
    pub page_range: Option<(Option<u32>, Option<u32>)>,

    /// Substring match against the series name
    #[serde(default)]
    pub series: Option<String>,

    /// Exact match against the featured flag
    #[serde(default)]
    pub featured: Option<bool>,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_order: SortOrder,
}

impl SearchFilters {
    /// Filters with just a text query and default sort
    pub fn query(text: impl Into<String>) -> Self {
        Self {
            query: text.into(),
            ..Default::default()
        }
    }
}

/// Which book field a text query matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Title,
    Author,
    Description,
    Genre,
}

/// A scored search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub book: Book,
    pub score: i64,
    pub matched_fields: Vec<MatchedField>,
}

/// A single facet value with its count in the current result set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Facet aggregations over a result set (not the whole catalog)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facets {
    pub genres: Vec<FacetCount>,
    /// Capped to the 20 most frequent authors
    pub authors: Vec<FacetCount>,
    pub years: Vec<FacetCount>,
}

/// What an autocomplete suggestion refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Title,
    Author,
    Genre,
}

/// One autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
}

/// Engine-level recommendation response with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub books: Vec<Book>,
    /// True when the curated featured list stood in for a personalized one
    pub fallback: bool,
    /// Wall time spent producing the set, in milliseconds
    pub latency_ms: f64,
}

impl RecommendationSet {
    pub fn personalized(books: Vec<Book>, latency_ms: f64) -> Self {
        Self {
            books,
            fallback: false,
            latency_ms,
        }
    }

    pub fn featured_fallback(books: Vec<Book>, latency_ms: f64) -> Self {
        Self {
            books,
            fallback: true,
            latency_ms,
        }
    }
}
