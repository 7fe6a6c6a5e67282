use std::collections::HashSet;

use chrono::{Datelike, Utc};

use crate::core::Book;
use crate::ranking::TasteProfile;

/// How many personalized picks one request returns
pub const RECOMMENDATION_LIMIT: usize = 6;

/// Weighted preference score for a single candidate.
///
/// - +10 per profile hit on the candidate's genre
/// - +8 per profile hit on the candidate's author
/// - +5 when featured
/// - +3 when released within the last two years
pub fn preference_score(book: &Book, profile: &TasteProfile, current_year: i32) -> i64 {
    let mut score = 0i64;

    score += 10 * i64::from(profile.genre_count(&book.genre));
    score += 8 * i64::from(profile.author_count(&book.author));

    if book.is_featured {
        score += 5;
    }

    if (current_year - book.year()).abs() <= 2 {
        score += 3;
    }

    score
}

/// Rank the catalog for a taste profile.
///
/// Books the user has already interacted with are excluded, zero-score
/// candidates are dropped, and the rest sort by score descending with
/// book id as the deterministic tiebreak. Returns at most
/// [`RECOMMENDATION_LIMIT`] books; an empty return is the caller's cue
/// to fall back to featured titles.
pub fn rank_for_profile(
    profile: &TasteProfile,
    interacted: &HashSet<String>,
    books: &[Book],
) -> Vec<Book> {
    let current_year = Utc::now().year();

    let mut scored: Vec<(i64, &Book)> = books
        .iter()
        .filter(|b| !interacted.contains(&b.id))
        .map(|b| (preference_score(b, profile, current_year), b))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| score_b.cmp(score_a).then_with(|| a.id.cmp(&b.id)));

    scored
        .into_iter()
        .take(RECOMMENDATION_LIMIT)
        .map(|(_, b)| b.clone())
        .collect()
}

/// Curated stand-in when personalization has nothing to say: featured
/// books the user has not already interacted with, in catalog order.
pub fn featured_fallback(books: &[Book], interacted: &HashSet<String>, limit: usize) -> Vec<Book> {
    books
        .iter()
        .filter(|b| b.is_featured && !interacted.contains(&b.id))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Like, Rating};
    use crate::ranking::TasteProfile;

    fn catalog() -> Vec<Book> {
        let mut sci_fi = Book::new("1", "Dune", "Frank Herbert", "Sci-Fi");
        sci_fi.pages = Some(412);
        let sci_fi_2 = Book::new("2", "Dune Messiah", "Frank Herbert", "Sci-Fi");
        let mut featured = Book::new("3", "Emma", "Jane Austen", "Romance");
        featured.is_featured = true;
        let stale = {
            let mut b = Book::new("4", "Old Tome", "Nobody", "History");
            b.release_date = "1901-01-01".to_string();
            b
        };
        vec![sci_fi, sci_fi_2, featured, stale]
    }

    #[test]
    fn test_interacted_books_never_recommended() {
        let books = catalog();
        let likes = vec![Like::new("1", "u1")];
        let profile = TasteProfile::from_signals(&likes, &[], &books);
        let interacted: HashSet<String> = ["1".to_string()].into();

        let picks = rank_for_profile(&profile, &interacted, &books);
        assert!(!picks.is_empty());
        assert!(picks.iter().all(|b| b.id != "1"));
    }

    #[test]
    fn test_profile_match_outranks_featured_bonus() {
        let books = catalog();
        let ratings = vec![Rating::new("1", "u1", 5)];
        let profile = TasteProfile::from_signals(&[], &ratings, &books);
        let interacted: HashSet<String> = ["1".to_string()].into();

        let picks = rank_for_profile(&profile, &interacted, &books);
        // genre (10) + author (8) + recency (3) beats featured (5) + recency (3)
        assert_eq!(picks[0].id, "2");
    }

    #[test]
    fn test_zero_signal_user_still_sees_featured_and_recent() {
        let books = catalog();
        let profile = TasteProfile::default();

        let picks = rank_for_profile(&profile, &HashSet::new(), &books);
        // stale non-featured book scores zero and is dropped
        assert!(picks.iter().all(|b| b.id != "4"));
    }

    #[test]
    fn test_featured_fallback_skips_interacted() {
        let books = catalog();
        let interacted: HashSet<String> = ["3".to_string()].into();

        assert!(featured_fallback(&books, &interacted, 6).is_empty());
        assert_eq!(featured_fallback(&books, &HashSet::new(), 6).len(), 1);
    }
}
