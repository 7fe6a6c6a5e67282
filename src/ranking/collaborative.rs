use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::core::{Book, Like, Rating};
use crate::ranking::{preference_score, similarity, TasteProfile};

/// Which signal contributed to a hybrid pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Preference,
    Collaborative,
    Content,
}

/// One hybrid recommendation with its combined score and the signals
/// that actually fired for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridRecommendation {
    pub book: Book,
    pub score: i64,
    pub sources: Vec<RecommendationSource>,
}

/// "Liked together" co-occurrence counts across all users.
///
/// Built from likes and positive ratings grouped by user; every pair of
/// books one user endorsed bumps that pair's count. Pair keys are
/// stored id-ascending so lookup order does not matter.
#[derive(Debug, Clone, Default)]
pub struct CooccurrenceModel {
    pairs: HashMap<(String, String), u32>,
}

impl CooccurrenceModel {
    pub fn fit(likes: &[Like], ratings: &[Rating]) -> Self {
        let mut per_user: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for like in likes {
            per_user
                .entry(like.user_id.as_str())
                .or_default()
                .insert(like.book_id.as_str());
        }
        for rating in ratings.iter().filter(|r| r.is_positive()) {
            per_user
                .entry(rating.user_id.as_str())
                .or_default()
                .insert(rating.book_id.as_str());
        }

        let mut pairs: HashMap<(String, String), u32> = HashMap::new();
        for endorsed in per_user.values() {
            let ids: Vec<&str> = endorsed.iter().copied().collect();
            for (i, a) in ids.iter().enumerate() {
                for b in &ids[i + 1..] {
                    *pairs.entry((a.to_string(), b.to_string())).or_default() += 1;
                }
            }
        }

        Self { pairs }
    }

    /// How many users endorsed both books
    pub fn cooccurrence(&self, a: &str, b: &str) -> u32 {
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        self.pairs.get(&key).copied().unwrap_or(0)
    }

    /// Total co-occurrence between a candidate and a seed set
    pub fn score_against(&self, seeds: &HashSet<String>, candidate: &str) -> i64 {
        seeds
            .iter()
            .map(|seed| i64::from(self.cooccurrence(seed, candidate)))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Combine preference, collaborative and content signals into one
/// ranking. Each component is a real computation over interaction data,
/// and a pick's `sources` name exactly the components that scored.
///
/// - preference: the weighted genre/author/featured/recency sum
/// - collaborative: 4 x total co-occurrence with the user's endorsed books
/// - content: best similarity against any endorsed book, scaled down 5x
pub fn hybrid_rank(
    profile: &TasteProfile,
    model: &CooccurrenceModel,
    endorsed_books: &[Book],
    interacted: &HashSet<String>,
    books: &[Book],
    limit: usize,
) -> Vec<HybridRecommendation> {
    let current_year = chrono::Utc::now().year();
    let endorsed_ids: HashSet<String> = endorsed_books.iter().map(|b| b.id.clone()).collect();

    let mut ranked: Vec<HybridRecommendation> = books
        .iter()
        .filter(|b| !interacted.contains(&b.id))
        .filter_map(|candidate| {
            let preference = preference_score(candidate, profile, current_year);
            let collaborative = 4 * model.score_against(&endorsed_ids, &candidate.id);
            let content = endorsed_books
                .iter()
                .map(|seed| similarity(seed, candidate))
                .max()
                .unwrap_or(0)
                / 5;

            let score = preference + collaborative + content;
            if score <= 0 {
                return None;
            }

            let mut sources = Vec::new();
            if preference > 0 {
                sources.push(RecommendationSource::Preference);
            }
            if collaborative > 0 {
                sources.push(RecommendationSource::Collaborative);
            }
            if content > 0 {
                sources.push(RecommendationSource::Content);
            }

            Some(HybridRecommendation {
                book: candidate.clone(),
                score,
                sources,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.book.id.cmp(&b.book.id)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooccurrence_counts_shared_endorsements() {
        let likes = vec![
            Like::new("a", "u1"),
            Like::new("b", "u1"),
            Like::new("a", "u2"),
            Like::new("b", "u2"),
            Like::new("c", "u2"),
        ];

        let model = CooccurrenceModel::fit(&likes, &[]);
        assert_eq!(model.cooccurrence("a", "b"), 2);
        assert_eq!(model.cooccurrence("b", "a"), 2);
        assert_eq!(model.cooccurrence("a", "c"), 1);
        assert_eq!(model.cooccurrence("a", "z"), 0);
    }

    #[test]
    fn test_positive_ratings_join_the_matrix() {
        let likes = vec![Like::new("a", "u1")];
        let ratings = vec![Rating::new("b", "u1", 5), Rating::new("c", "u1", 2)];

        let model = CooccurrenceModel::fit(&likes, &ratings);
        assert_eq!(model.cooccurrence("a", "b"), 1);
        assert_eq!(model.cooccurrence("a", "c"), 0);
    }

    #[test]
    fn test_hybrid_rank_prefers_co_liked_books() {
        let books = vec![
            Book::new("a", "Dune", "Frank Herbert", "Sci-Fi"),
            Book::new("b", "Hyperion", "Dan Simmons", "Sci-Fi"),
            Book::new("c", "Emma", "Jane Austen", "Romance"),
        ];
        // other users who liked "a" also liked "b"
        let likes = vec![
            Like::new("a", "u2"),
            Like::new("b", "u2"),
            Like::new("a", "u3"),
            Like::new("b", "u3"),
            Like::new("a", "me"),
        ];

        let model = CooccurrenceModel::fit(&likes, &[]);
        let profile = TasteProfile::from_signals(
            &[Like::new("a", "me")],
            &[],
            &books,
        );
        let endorsed: Vec<Book> = vec![books[0].clone()];
        let interacted: HashSet<String> = ["a".to_string()].into();

        let picks = hybrid_rank(&profile, &model, &endorsed, &interacted, &books, 6);
        assert_eq!(picks[0].book.id, "b");
        assert!(picks[0].sources.contains(&RecommendationSource::Collaborative));
        assert!(picks[0].sources.contains(&RecommendationSource::Preference));
    }

    #[test]
    fn test_hybrid_rank_never_returns_interacted() {
        let books = vec![
            Book::new("a", "Dune", "Frank Herbert", "Sci-Fi"),
            Book::new("b", "Dune Messiah", "Frank Herbert", "Sci-Fi"),
        ];
        let likes = vec![Like::new("a", "me")];
        let model = CooccurrenceModel::fit(&likes, &[]);
        let profile = TasteProfile::from_signals(&likes, &[], &books);
        let interacted: HashSet<String> = ["a".to_string()].into();

        let picks = hybrid_rank(&profile, &model, &books[..1], &interacted, &books, 6);
        assert!(picks.iter().all(|p| p.book.id != "a"));
    }
}
