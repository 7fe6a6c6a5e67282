//! # TomeSphere Discovery Engine
//!
//! Book discovery layer for the TomeSphere reading community:
//! - Faceted full-catalog search with relevance scoring
//! - Personalized recommendations (preference, co-occurrence and
//!   content-similarity signals) with a featured-books fallback
//! - Trending ranking over a 30-day like window
//! - Mood-based browsing and autocomplete suggestions
//! - Pluggable Data Service boundary (hosted REST backend or a local
//!   SQLite snapshot)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tomesphere_discovery_engine::{DiscoveryEngine, SearchFilters, SqliteDataService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = Arc::new(SqliteDataService::new("tomesphere.db")?);
//!     let engine = DiscoveryEngine::new(service);
//!
//!     let outcome = engine.search(&SearchFilters::query("dune")).await?;
//!     for hit in &outcome.results {
//!         println!("{} ({})", hit.book.display_name(), hit.score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod engine;
pub mod error;
pub mod ranking;
pub mod search;
pub mod service;

// Re-export primary types
pub use crate::core::{
    Book, Facets, Like, MatchedField, Rating, ReadingListEntry, ReadingStatus, RecommendationSet,
    SearchFilters, SearchResult, SortBy, SortOrder, Suggestion, SuggestionKind,
};
pub use crate::engine::{DiscoveryEngine, HybridSet, SearchOutcome};
pub use crate::error::{DiscoveryError, Result};
pub use crate::ranking::{HybridRecommendation, RecommendationSource, TasteProfile};
pub use crate::search::{LengthBand, Mood, MoodProfile, SuggestionIndex};
pub use crate::service::{DataService, RestDataService, SqliteDataService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
