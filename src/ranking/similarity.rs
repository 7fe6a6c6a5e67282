use crate::core::Book;

/// Heuristic similarity between two catalog books.
///
/// Additive, unnormalized:
/// - same author: +40
/// - same genre: +50
/// - same non-empty series: +60
/// - page counts within 100 of each other: +10
/// - row-creation years within 2 of each other: +5
///
/// Missing optional fields simply fail their clause.
pub fn similarity(a: &Book, b: &Book) -> i64 {
    let mut score = 0;

    if !a.author.is_empty() && a.author == b.author {
        score += 40;
    }

    if !a.genre.is_empty() && a.genre == b.genre {
        score += 50;
    }

    if let (Some(series_a), Some(series_b)) = (a.series_name(), b.series_name()) {
        if series_a == series_b {
            score += 60;
        }
    }

    if let (Some(pages_a), Some(pages_b)) = (a.pages, b.pages) {
        if pages_a.abs_diff(pages_b) <= 100 {
            score += 10;
        }
    }

    if (a.created_year() - b.created_year()).abs() <= 2 {
        score += 5;
    }

    score
}

/// The highest score `similarity` can produce
pub const MAX_SIMILARITY: i64 = 40 + 50 + 60 + 10 + 5;

/// Rank the catalog against a reference book (content-based filter).
///
/// Returns the 10 most similar books, never including the reference
/// itself. An unknown `book_id` yields an empty list rather than an
/// error; the caller treats both the same way.
pub fn related_books(book_id: &str, books: &[Book]) -> Vec<Book> {
    let reference = match books.iter().find(|b| b.id == book_id) {
        Some(book) => book,
        None => return Vec::new(),
    };

    let mut scored: Vec<(i64, &Book)> = books
        .iter()
        .filter(|b| b.id != reference.id)
        .map(|b| (similarity(reference, b), b))
        .collect();

    // Id is the secondary key so equal scores order deterministically
    scored.sort_by(|(score_a, a), (score_b, b)| score_b.cmp(score_a).then_with(|| a.id.cmp(&b.id)));

    scored.into_iter().take(10).map(|(_, b)| b.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str, author: &str, genre: &str) -> Book {
        Book::new(id, title, author, genre)
    }

    #[test]
    fn test_similarity_is_symmetric_and_maximal_for_twins() {
        let mut a = book("1", "Dune", "Frank Herbert", "Sci-Fi");
        a.series = Some("Dune".to_string());
        a.pages = Some(412);
        let mut b = a.clone();
        b.id = "2".to_string();
        b.title = "Dune Messiah".to_string();

        assert_eq!(similarity(&a, &b), similarity(&b, &a));
        assert_eq!(similarity(&a, &b), MAX_SIMILARITY);
    }

    #[test]
    fn test_dune_scenario() {
        let mut dune = book("1", "Dune", "Frank Herbert", "Sci-Fi");
        dune.pages = Some(412);

        let mut messiah = book("2", "Dune Messiah", "Frank Herbert", "Sci-Fi");
        messiah.pages = Some(256);
        messiah.series = Some("Dune".to_string());
        // imported four years apart so the year clause stays out
        messiah.created_at = dune.created_at - chrono::Duration::days(365 * 4);

        // author (+40) and genre (+50) match; page diff 156 misses the
        // window and only one book carries a series
        assert_eq!(similarity(&dune, &messiah), 90);
    }

    #[test]
    fn test_missing_fields_score_nothing() {
        let a = book("1", "A", "", "");
        let b = book("2", "B", "", "");
        // only the created-year proximity clause can fire
        assert_eq!(similarity(&a, &b), 5);
    }

    #[test]
    fn test_related_books_excludes_reference() {
        let books = vec![
            book("1", "Dune", "Frank Herbert", "Sci-Fi"),
            book("2", "Dune Messiah", "Frank Herbert", "Sci-Fi"),
            book("3", "Emma", "Jane Austen", "Romance"),
        ];

        let related = related_books("1", &books);
        assert!(related.iter().all(|b| b.id != "1"));
        assert_eq!(related[0].id, "2");
    }

    #[test]
    fn test_related_books_unknown_reference_is_empty() {
        let books = vec![book("1", "Dune", "Frank Herbert", "Sci-Fi")];
        assert!(related_books("nope", &books).is_empty());
    }

    #[test]
    fn test_related_books_caps_at_ten() {
        let mut books: Vec<Book> = (0..15)
            .map(|i| book(&i.to_string(), &format!("Book {i}"), "Same Author", "Same Genre"))
            .collect();
        books[0].id = "ref".to_string();

        assert_eq!(related_books("ref", &books).len(), 10);
    }

    #[test]
    fn test_tie_break_is_by_id() {
        let books = vec![
            book("ref", "Ref", "X", "Y"),
            book("b", "Two", "A1", "G1"),
            book("a", "One", "A2", "G2"),
        ];
        let related = related_books("ref", &books);
        // equal scores, ascending id
        assert_eq!(related[0].id, "a");
        assert_eq!(related[1].id, "b");
    }
}
