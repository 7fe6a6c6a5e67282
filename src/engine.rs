use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Book, Facets, RecommendationSet, SearchFilters, SearchResult, Suggestion};
use crate::error::Result;
use crate::ranking::{
    featured_fallback, hybrid_rank, rank_by_like_count, rank_for_profile, related_books,
    CooccurrenceModel, HybridRecommendation, TasteProfile, RECOMMENDATION_LIMIT,
    TRENDING_WINDOW_DAYS,
};
use crate::search::{books_by_mood, facets, search_books, Mood, SuggestionIndex};
use crate::service::DataService;

/// Main discovery orchestrator.
///
/// Fetches whole tables from the Data Service, runs the pure
/// scoring/filtering functions over them, and applies the fail-open
/// policy at this boundary: user-triggered operations (search) return
/// errors to the caller, background personalization (recommendations,
/// trending, related, suggestions) degrades to featured books or an
/// empty list rather than surfacing a failure.
pub struct DiscoveryEngine {
    service: Arc<dyn DataService>,
    suggestions: SuggestionIndex,
}

/// A search invocation's full outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    /// Facet counts over `results`, for the filter sidebar
    pub facets: Facets,
    pub total: usize,
    pub latency_ms: f64,
}

/// Hybrid recommendation response with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridSet {
    pub picks: Vec<HybridRecommendation>,
    pub fallback: bool,
    pub latency_ms: f64,
}

impl DiscoveryEngine {
    pub fn new(service: Arc<dyn DataService>) -> Self {
        Self {
            service,
            suggestions: SuggestionIndex::new(),
        }
    }

    /// Full catalog read; user-triggered, so errors propagate.
    pub async fn catalog(&self) -> Result<Vec<Book>> {
        self.service.all_books().await
    }

    /// Run one search. User-triggered: fetch failures propagate so the
    /// caller can show them.
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchOutcome> {
        let start = Instant::now();

        let books = self.service.all_books().await?;
        let results = search_books(&books, filters);
        let facets = facets(&results);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::debug!(
            query = %filters.query,
            results = results.len(),
            latency_ms,
            "search completed"
        );

        Ok(SearchOutcome {
            total: results.len(),
            results,
            facets,
            latency_ms,
        })
    }

    /// Personalized top-6 picks with the featured fallback chain.
    /// Never errors; a dead Data Service yields an empty fallback set.
    pub async fn recommendations(&self, user_id: &str) -> RecommendationSet {
        let start = Instant::now();

        match self.personalized(user_id).await {
            Ok((books, fallback)) => {
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                if fallback {
                    RecommendationSet::featured_fallback(books, latency_ms)
                } else {
                    RecommendationSet::personalized(books, latency_ms)
                }
            }
            Err(e) => {
                tracing::warn!("recommendations for {user_id} failed, serving featured: {e}");
                let books = self.featured_or_empty(RECOMMENDATION_LIMIT).await;
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                RecommendationSet::featured_fallback(books, latency_ms)
            }
        }
    }

    /// Hybrid picks combining preference, co-occurrence and content
    /// signals. Same fail-open policy as [`Self::recommendations`].
    pub async fn hybrid_recommendations(&self, user_id: &str, limit: usize) -> HybridSet {
        let start = Instant::now();

        match self.hybrid(user_id, limit).await {
            Ok(picks) if !picks.is_empty() => HybridSet {
                picks,
                fallback: false,
                latency_ms: start.elapsed().as_secs_f64() * 1000.0,
            },
            Ok(_) => {
                let picks = self
                    .featured_or_empty(limit)
                    .await
                    .into_iter()
                    .map(|book| HybridRecommendation {
                        book,
                        score: 0,
                        sources: Vec::new(),
                    })
                    .collect();
                HybridSet {
                    picks,
                    fallback: true,
                    latency_ms: start.elapsed().as_secs_f64() * 1000.0,
                }
            }
            Err(e) => {
                tracing::warn!("hybrid recommendations for {user_id} failed: {e}");
                let picks = self
                    .featured_or_empty(limit)
                    .await
                    .into_iter()
                    .map(|book| HybridRecommendation {
                        book,
                        score: 0,
                        sources: Vec::new(),
                    })
                    .collect();
                HybridSet {
                    picks,
                    fallback: true,
                    latency_ms: start.elapsed().as_secs_f64() * 1000.0,
                }
            }
        }
    }

    /// Books with the most likes inside the trending window, featured
    /// fallback when the window is quiet. Never errors.
    pub async fn trending(&self, limit: usize) -> RecommendationSet {
        let start = Instant::now();

        match self.trending_inner(limit).await {
            Ok(Some(books)) => {
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                RecommendationSet::personalized(books, latency_ms)
            }
            Ok(None) => {
                let books = self.featured_or_empty(limit).await;
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                RecommendationSet::featured_fallback(books, latency_ms)
            }
            Err(e) => {
                tracing::warn!("trending failed, serving featured: {e}");
                let books = self.featured_or_empty(limit).await;
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                RecommendationSet::featured_fallback(books, latency_ms)
            }
        }
    }

    /// Content-based picks for a book page. An unknown id or a fetch
    /// failure both yield an empty list.
    pub async fn related(&self, book_id: &str) -> Vec<Book> {
        match self.service.all_books().await {
            Ok(books) => related_books(book_id, &books),
            Err(e) => {
                tracing::warn!("related books for {book_id} failed: {e}");
                Vec::new()
            }
        }
    }

    /// Autocomplete suggestions; fetch failures degrade to empty.
    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        match self.service.all_books().await {
            Ok(books) => self.suggestions.suggest(query, &books),
            Err(e) => {
                tracing::warn!("suggestions for {query:?} failed: {e}");
                Vec::new()
            }
        }
    }

    /// Mood-based browse; fetch failures degrade to empty.
    pub async fn books_for_mood(&self, mood: Mood) -> Vec<Book> {
        match self.service.all_books().await {
            Ok(books) => books_by_mood(mood, &books),
            Err(e) => {
                tracing::warn!("mood browse failed: {e}");
                Vec::new()
            }
        }
    }

    /// Drop memoized suggestions after the catalog changes
    pub fn invalidate_suggestions(&self) {
        self.suggestions.clear();
    }

    async fn personalized(&self, user_id: &str) -> Result<(Vec<Book>, bool)> {
        let books = self.service.all_books().await?;
        let likes = self.service.likes_for_user(user_id).await?;
        let ratings = self.service.ratings_for_user(user_id).await?;
        let reading_list = self.service.reading_list_for_user(user_id).await?;

        let interacted = interacted_ids(&likes, &ratings, &reading_list);
        let profile = TasteProfile::from_signals(&likes, &ratings, &books);

        let picks = rank_for_profile(&profile, &interacted, &books);
        if picks.is_empty() {
            let fallback = featured_fallback(&books, &interacted, RECOMMENDATION_LIMIT);
            return Ok((fallback, true));
        }
        Ok((picks, false))
    }

    async fn hybrid(&self, user_id: &str, limit: usize) -> Result<Vec<HybridRecommendation>> {
        let books = self.service.all_books().await?;
        let likes = self.service.likes_for_user(user_id).await?;
        let ratings = self.service.ratings_for_user(user_id).await?;
        let reading_list = self.service.reading_list_for_user(user_id).await?;
        let all_likes = self.service.all_likes().await?;
        let all_ratings = self.service.all_ratings().await?;

        let interacted = interacted_ids(&likes, &ratings, &reading_list);
        let profile = TasteProfile::from_signals(&likes, &ratings, &books);
        let model = CooccurrenceModel::fit(&all_likes, &all_ratings);

        let endorsed: HashSet<&str> = likes
            .iter()
            .map(|l| l.book_id.as_str())
            .chain(
                ratings
                    .iter()
                    .filter(|r| r.is_positive())
                    .map(|r| r.book_id.as_str()),
            )
            .collect();
        let endorsed_books: Vec<Book> = books
            .iter()
            .filter(|b| endorsed.contains(b.id.as_str()))
            .cloned()
            .collect();

        Ok(hybrid_rank(
            &profile,
            &model,
            &endorsed_books,
            &interacted,
            &books,
            limit,
        ))
    }

    /// Trending core; `None` means the window had no likes.
    async fn trending_inner(&self, limit: usize) -> Result<Option<Vec<Book>>> {
        let cutoff = Utc::now() - Duration::days(TRENDING_WINDOW_DAYS);
        let likes = self.service.likes_since(cutoff).await?;

        let ranked = rank_by_like_count(&likes, limit);
        if ranked.is_empty() {
            return Ok(None);
        }

        let ids: Vec<String> = ranked.iter().map(|(id, _)| id.clone()).collect();
        let fetched = self.service.books_by_ids(&ids).await?;

        // Re-order fetched rows to match the like-count ranking
        let ordered: Vec<Book> = ids
            .iter()
            .filter_map(|id| fetched.iter().find(|b| &b.id == id).cloned())
            .collect();

        Ok(Some(ordered))
    }

    async fn featured_or_empty(&self, limit: usize) -> Vec<Book> {
        match self.service.featured_books(limit).await {
            Ok(books) => books,
            Err(e) => {
                tracing::warn!("featured fallback fetch failed: {e}");
                Vec::new()
            }
        }
    }
}

fn interacted_ids(
    likes: &[crate::core::Like],
    ratings: &[crate::core::Rating],
    reading_list: &[crate::core::ReadingListEntry],
) -> HashSet<String> {
    likes
        .iter()
        .map(|l| l.book_id.clone())
        .chain(ratings.iter().map(|r| r.book_id.clone()))
        .chain(reading_list.iter().map(|e| e.book_id.clone()))
        .collect()
}
