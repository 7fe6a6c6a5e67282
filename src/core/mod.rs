pub mod book;
pub mod search;
pub mod signal;

pub use book::Book;
pub use search::{
    FacetCount, Facets, MatchedField, RecommendationSet, SearchFilters, SearchResult, SortBy,
    SortOrder, Suggestion, SuggestionKind,
};
pub use signal::{Like, Rating, ReadingListEntry, ReadingStatus};
