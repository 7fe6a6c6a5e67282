use std::collections::{HashMap, HashSet};

use crate::core::{Book, Like, Rating};

/// Genre/author frequency tables inferred from a user's positive signals.
///
/// A book contributes once per map key regardless of how many signals
/// point at it (a liked *and* five-star book still counts once).
#[derive(Debug, Clone, Default)]
pub struct TasteProfile {
    pub genre_counts: HashMap<String, u32>,
    pub author_counts: HashMap<String, u32>,
}

impl TasteProfile {
    /// Build a profile from the user's likes and ratings of 4 or above.
    pub fn from_signals(likes: &[Like], ratings: &[Rating], books: &[Book]) -> Self {
        let mut positive_ids: HashSet<&str> = likes.iter().map(|l| l.book_id.as_str()).collect();
        positive_ids.extend(
            ratings
                .iter()
                .filter(|r| r.is_positive())
                .map(|r| r.book_id.as_str()),
        );

        let mut profile = TasteProfile::default();
        for book in books.iter().filter(|b| positive_ids.contains(b.id.as_str())) {
            if !book.genre.is_empty() {
                *profile.genre_counts.entry(book.genre.clone()).or_default() += 1;
            }
            if !book.author.is_empty() {
                *profile.author_counts.entry(book.author.clone()).or_default() += 1;
            }
        }
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.genre_counts.is_empty() && self.author_counts.is_empty()
    }

    pub fn genre_count(&self, genre: &str) -> u32 {
        self.genre_counts.get(genre).copied().unwrap_or(0)
    }

    pub fn author_count(&self, author: &str) -> u32 {
        self.author_counts.get(author).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_counts_genres_and_authors() {
        let books = vec![
            Book::new("1", "Dune", "Frank Herbert", "Sci-Fi"),
            Book::new("2", "Dune Messiah", "Frank Herbert", "Sci-Fi"),
            Book::new("3", "Emma", "Jane Austen", "Romance"),
        ];
        let likes = vec![Like::new("1", "u1"), Like::new("3", "u1")];
        let ratings = vec![Rating::new("2", "u1", 5)];

        let profile = TasteProfile::from_signals(&likes, &ratings, &books);
        assert_eq!(profile.genre_count("Sci-Fi"), 2);
        assert_eq!(profile.genre_count("Romance"), 1);
        assert_eq!(profile.author_count("Frank Herbert"), 2);
    }

    #[test]
    fn test_low_ratings_do_not_count() {
        let books = vec![Book::new("1", "Dune", "Frank Herbert", "Sci-Fi")];
        let ratings = vec![Rating::new("1", "u1", 3)];

        let profile = TasteProfile::from_signals(&[], &ratings, &books);
        assert!(profile.is_empty());
    }

    #[test]
    fn test_book_counts_once_despite_multiple_signals() {
        let books = vec![Book::new("1", "Dune", "Frank Herbert", "Sci-Fi")];
        let likes = vec![Like::new("1", "u1")];
        let ratings = vec![Rating::new("1", "u1", 5)];

        let profile = TasteProfile::from_signals(&likes, &ratings, &books);
        assert_eq!(profile.genre_count("Sci-Fi"), 1);
        assert_eq!(profile.author_count("Frank Herbert"), 1);
    }
}
