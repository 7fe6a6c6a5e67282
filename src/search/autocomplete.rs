use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::core::{Book, Suggestion, SuggestionKind};

/// Most suggestions one query returns
const SUGGESTION_LIMIT: usize = 10;

/// Default cache capacity (distinct normalized queries)
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Autocomplete over titles, authors and genres with a bounded
/// memoization cache.
///
/// Results are memoized per normalized query in an LRU cache so typing
/// the same prefix twice does not rescan the catalog; the bound keeps
/// the cache from growing for the life of the process. Call
/// [`SuggestionIndex::clear`] after a catalog refresh so stale entries
/// cannot outlive the list they were computed from.
pub struct SuggestionIndex {
    cache: Mutex<LruCache<String, Vec<Suggestion>>>,
}

impl SuggestionIndex {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Normalize a query for consistent cache lookups
    fn normalize_query(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Up to 10 suggestions for a query: matching titles, then deduped
    /// authors, then deduped genres. An empty query suggests nothing.
    pub fn suggest(&self, query: &str, books: &[Book]) -> Vec<Suggestion> {
        let normalized = Self::normalize_query(query);
        if normalized.is_empty() {
            return Vec::new();
        }

        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&normalized) {
                return hit.clone();
            }
        }

        let suggestions = build_suggestions(&normalized, books);

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(normalized, suggestions.clone());
        }

        suggestions
    }

    /// Drop every memoized entry (call after the catalog changes)
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Number of memoized queries currently held
    pub fn cached_queries(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl Default for SuggestionIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn build_suggestions(normalized: &str, books: &[Book]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for book in books {
        if suggestions.len() >= SUGGESTION_LIMIT {
            return suggestions;
        }
        if book.title.to_lowercase().contains(normalized) && seen.insert(book.title.clone()) {
            suggestions.push(Suggestion {
                text: book.title.clone(),
                kind: SuggestionKind::Title,
            });
        }
    }

    for book in books {
        if suggestions.len() >= SUGGESTION_LIMIT {
            return suggestions;
        }
        if !book.author.is_empty()
            && book.author.to_lowercase().contains(normalized)
            && seen.insert(book.author.clone())
        {
            suggestions.push(Suggestion {
                text: book.author.clone(),
                kind: SuggestionKind::Author,
            });
        }
    }

    for book in books {
        if suggestions.len() >= SUGGESTION_LIMIT {
            return suggestions;
        }
        if !book.genre.is_empty()
            && book.genre.to_lowercase().contains(normalized)
            && seen.insert(book.genre.clone())
        {
            suggestions.push(Suggestion {
                text: book.genre.clone(),
                kind: SuggestionKind::Genre,
            });
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Book> {
        vec![
            Book::new("1", "Dune", "Frank Herbert", "Sci-Fi"),
            Book::new("2", "Dune Messiah", "Frank Herbert", "Sci-Fi"),
            Book::new("3", "Emma", "Jane Austen", "Romance"),
        ]
    }

    #[test]
    fn test_suggests_titles_authors_genres() {
        let index = SuggestionIndex::new();
        let suggestions = index.suggest("dune", &catalog());

        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Title));

        let suggestions = index.suggest("frank", &catalog());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Author);

        let suggestions = index.suggest("sci", &catalog());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Genre);
    }

    #[test]
    fn test_authors_and_genres_deduplicated() {
        let index = SuggestionIndex::new();
        // "Frank Herbert" appears on two books but suggests once
        let suggestions = index.suggest("herbert", &catalog());
        assert_eq!(suggestions.len(), 1);
    }

    #[test]
    fn test_cache_hit_is_idempotent() {
        let index = SuggestionIndex::new();
        let books = catalog();

        let first = index.suggest("Dune", &books);
        assert_eq!(index.cached_queries(), 1);

        // same query with different casing hits the same entry
        let second = index.suggest("  dUnE ", &books);
        assert_eq!(index.cached_queries(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let index = SuggestionIndex::with_capacity(2);
        let books = catalog();

        index.suggest("a", &books);
        index.suggest("b", &books);
        index.suggest("c", &books);
        assert_eq!(index.cached_queries(), 2);
    }

    #[test]
    fn test_empty_query_suggests_nothing() {
        let index = SuggestionIndex::new();
        assert!(index.suggest("   ", &catalog()).is_empty());
        assert_eq!(index.cached_queries(), 0);
    }

    #[test]
    fn test_clear_drops_entries() {
        let index = SuggestionIndex::new();
        index.suggest("dune", &catalog());
        index.clear();
        assert_eq!(index.cached_queries(), 0);
    }

    #[test]
    fn test_limit_of_ten() {
        let books: Vec<Book> = (0..30)
            .map(|i| Book::new(i.to_string(), format!("Common Title {i}"), "A", "G"))
            .collect();

        let index = SuggestionIndex::new();
        assert_eq!(index.suggest("common", &books).len(), 10);
    }
}
