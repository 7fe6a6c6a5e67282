use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::{
    Book, FacetCount, Facets, MatchedField, SearchFilters, SearchResult, SortBy, SortOrder,
};

// Text-match weights per field
const TITLE_WEIGHT: i64 = 100;
const AUTHOR_WEIGHT: i64 = 50;
const DESCRIPTION_WEIGHT: i64 = 25;
const GENRE_WEIGHT: i64 = 30;

// Range fallbacks when a bound is missing
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;
const MIN_PAGES: u32 = 0;
const MAX_PAGES: u32 = 999_999;

/// How many authors the facet aggregation reports
const AUTHOR_FACET_CAP: usize = 20;

/// Run one search over the pre-loaded catalog.
///
/// With a non-empty query, books are scored by case-insensitive
/// substring containment per field and zero-score books drop out; with
/// an empty query every book enters with score 0 and only the facets
/// narrow the set. Facet predicates AND together; multi-valued facets
/// OR within themselves. The sort stage runs last.
pub fn search_books(books: &[Book], filters: &SearchFilters) -> Vec<SearchResult> {
    let query = filters.query.trim().to_lowercase();

    let mut results: Vec<SearchResult> = books
        .iter()
        .filter_map(|book| {
            let (score, matched_fields) = if query.is_empty() {
                (0, Vec::new())
            } else {
                let scored = score_text(book, &query);
                if scored.0 == 0 {
                    return None;
                }
                scored
            };

            if !matches_facets(book, filters) {
                return None;
            }

            Some(SearchResult {
                book: book.clone(),
                score,
                matched_fields,
            })
        })
        .collect();

    sort_results(&mut results, filters.sort_by, filters.sort_order);
    results
}

/// Score a book against a lowercased query string
fn score_text(book: &Book, query: &str) -> (i64, Vec<MatchedField>) {
    let mut score = 0;
    let mut matched = Vec::new();

    if book.title.to_lowercase().contains(query) {
        score += TITLE_WEIGHT;
        matched.push(MatchedField::Title);
    }
    if book.author.to_lowercase().contains(query) {
        score += AUTHOR_WEIGHT;
        matched.push(MatchedField::Author);
    }
    if book.description.to_lowercase().contains(query) {
        score += DESCRIPTION_WEIGHT;
        matched.push(MatchedField::Description);
    }
    if book.genre.to_lowercase().contains(query) {
        score += GENRE_WEIGHT;
        matched.push(MatchedField::Genre);
    }

    (score, matched)
}

fn matches_facets(book: &Book, filters: &SearchFilters) -> bool {
    if !filters.genres.is_empty() && !filters.genres.iter().any(|g| g == &book.genre) {
        return false;
    }

    if !filters.authors.is_empty() {
        let author = book.author.to_lowercase();
        let hit = filters
            .authors
            .iter()
            .any(|a| author.contains(&a.to_lowercase()));
        if !hit {
            return false;
        }
    }

    if let Some((min, max)) = filters.year_range {
        let year = book.year();
        if year < min.unwrap_or(MIN_YEAR) || year > max.unwrap_or(MAX_YEAR) {
            return false;
        }
    }

    if let Some((min, max)) = filters.page_range {
        let pages = book.pages.unwrap_or(0);
        if pages < min.unwrap_or(MIN_PAGES) || pages > max.unwrap_or(MAX_PAGES) {
            return false;
        }
    }

    if let Some(series) = filters.series.as_deref().filter(|s| !s.is_empty()) {
        let wanted = series.to_lowercase();
        match book.series_name() {
            Some(name) if name.to_lowercase().contains(&wanted) => {}
            _ => return false,
        }
    }

    if let Some(featured) = filters.featured {
        if book.is_featured != featured {
            return false;
        }
    }

    true
}

fn sort_results(results: &mut [SearchResult], sort_by: SortBy, order: SortOrder) {
    results.sort_by(|a, b| {
        // Ascending base comparison per key; the order flips it, so the
        // default (desc) yields highest-score / newest-year first
        let cmp = match sort_by {
            SortBy::Relevance => a.score.cmp(&b.score),
            SortBy::Title => lower_cmp(&a.book.title, &b.book.title),
            SortBy::Author => lower_cmp(&a.book.author, &b.book.author),
            SortBy::Year => a.book.year().cmp(&b.book.year()),
        };
        let cmp = match order {
            SortOrder::Asc => cmp,
            SortOrder::Desc => cmp.reverse(),
        };
        // Id keeps equal keys in a reproducible order
        cmp.then_with(|| a.book.id.cmp(&b.book.id))
    });
}

fn lower_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Aggregate facet counts over a result set (not the whole catalog).
pub fn facets(results: &[SearchResult]) -> Facets {
    let mut genres: HashMap<&str, usize> = HashMap::new();
    let mut authors: HashMap<&str, usize> = HashMap::new();
    let mut years: HashMap<i32, usize> = HashMap::new();

    for result in results {
        let book = &result.book;
        if !book.genre.is_empty() {
            *genres.entry(book.genre.as_str()).or_default() += 1;
        }
        if !book.author.is_empty() {
            *authors.entry(book.author.as_str()).or_default() += 1;
        }
        *years.entry(book.year()).or_default() += 1;
    }

    let mut author_counts = to_counts(authors);
    author_counts.truncate(AUTHOR_FACET_CAP);

    Facets {
        genres: to_counts(genres),
        authors: author_counts,
        years: {
            let mut counts: Vec<FacetCount> = years
                .into_iter()
                .map(|(year, count)| FacetCount {
                    value: year.to_string(),
                    count,
                })
                .collect();
            counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
            counts
        },
    }
}

fn to_counts(map: HashMap<&str, usize>) -> Vec<FacetCount> {
    let mut counts: Vec<FacetCount> = map
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Book> {
        let mut dune = Book::new("1", "Dune", "Frank Herbert", "Sci-Fi");
        dune.pages = Some(412);
        dune.release_date = "1965-08-01".to_string();
        dune.description = "Spice and sandworms on Arrakis".to_string();

        let mut messiah = Book::new("2", "Dune Messiah", "Frank Herbert", "Sci-Fi");
        messiah.pages = Some(256);
        messiah.release_date = "1969-10-15".to_string();
        messiah.series = Some("Dune".to_string());

        let mut emma = Book::new("3", "Emma", "Jane Austen", "Romance");
        emma.pages = Some(474);
        emma.release_date = "1815-12-23".to_string();
        emma.is_featured = true;

        vec![dune, messiah, emma]
    }

    #[test]
    fn test_query_scores_title_matches() {
        let results = search_books(&catalog(), &SearchFilters::query("dune"));

        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.score >= TITLE_WEIGHT);
            assert!(result.matched_fields.contains(&MatchedField::Title));
        }
    }

    #[test]
    fn test_author_and_description_matches_score_lower() {
        let results = search_books(&catalog(), &SearchFilters::query("herbert"));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, AUTHOR_WEIGHT);

        let results = search_books(&catalog(), &SearchFilters::query("sandworms"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, DESCRIPTION_WEIGHT);
        assert_eq!(results[0].matched_fields, vec![MatchedField::Description]);
    }

    #[test]
    fn test_non_matching_books_dropped() {
        let results = search_books(&catalog(), &SearchFilters::query("wizard"));
        assert!(results.is_empty());
    }

    #[test]
    fn test_adding_facet_never_grows_results() {
        let books = catalog();
        let unfiltered = search_books(&books, &SearchFilters::query("dune"));

        let mut narrowed = SearchFilters::query("dune");
        narrowed.page_range = Some((Some(300), None));
        let filtered = search_books(&books, &narrowed);

        assert!(filtered.len() <= unfiltered.len());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].book.id, "1");
    }

    #[test]
    fn test_genre_facet_is_exact_author_facet_is_substring() {
        let books = catalog();

        let mut filters = SearchFilters::default();
        filters.genres = vec!["Romance".to_string()];
        let results = search_books(&books, &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].book.id, "3");

        let mut filters = SearchFilters::default();
        filters.authors = vec!["austen".to_string(), "herbert".to_string()];
        let results = search_books(&books, &filters);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_year_range_with_missing_bound() {
        let mut filters = SearchFilters::default();
        filters.year_range = Some((Some(1900), None));

        let results = search_books(&catalog(), &filters);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.book.year() >= 1900));
    }

    #[test]
    fn test_series_and_featured_facets() {
        let books = catalog();

        let mut filters = SearchFilters::default();
        filters.series = Some("dun".to_string());
        let results = search_books(&books, &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].book.id, "2");

        let mut filters = SearchFilters::default();
        filters.featured = Some(true);
        let results = search_books(&books, &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].book.id, "3");
    }

    #[test]
    fn test_title_sort_ascending() {
        let mut filters = SearchFilters::default();
        filters.sort_by = SortBy::Title;
        filters.sort_order = SortOrder::Asc;

        let results = search_books(&catalog(), &filters);
        let titles: Vec<&str> = results.iter().map(|r| r.book.title.as_str()).collect();
        let mut sorted = titles.clone();
        sorted.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        assert_eq!(titles, sorted);
    }

    #[test]
    fn test_year_sort_defaults_to_newest_first() {
        let mut filters = SearchFilters::default();
        filters.sort_by = SortBy::Year;

        let results = search_books(&catalog(), &filters);
        assert_eq!(results[0].book.id, "2");
        assert_eq!(results[2].book.id, "3");
    }

    #[test]
    fn test_facets_reflect_result_set_only() {
        let results = search_books(&catalog(), &SearchFilters::query("dune"));
        let facets = facets(&results);

        assert_eq!(facets.genres.len(), 1);
        assert_eq!(facets.genres[0].value, "Sci-Fi");
        assert_eq!(facets.genres[0].count, 2);
        assert_eq!(facets.authors[0].value, "Frank Herbert");
        // Emma's Romance genre is not in the result set
        assert!(facets.genres.iter().all(|f| f.value != "Romance"));
    }

    #[test]
    fn test_author_facet_capped_at_twenty() {
        let books: Vec<Book> = (0..30)
            .map(|i| Book::new(i.to_string(), format!("Book {i}"), format!("Author {i}"), "G"))
            .collect();
        let results = search_books(&books, &SearchFilters::default());

        assert_eq!(facets(&results).authors.len(), 20);
    }
}
