pub mod collaborative;
pub mod preferences;
pub mod recommend;
pub mod similarity;
pub mod trending;

pub use collaborative::{hybrid_rank, CooccurrenceModel, HybridRecommendation, RecommendationSource};
pub use preferences::TasteProfile;
pub use recommend::{featured_fallback, preference_score, rank_for_profile, RECOMMENDATION_LIMIT};
pub use similarity::{related_books, similarity, MAX_SIMILARITY};
pub use trending::{rank_by_like_count, TRENDING_WINDOW_DAYS};
