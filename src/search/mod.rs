pub mod autocomplete;
pub mod mood;
pub mod query;

pub use autocomplete::SuggestionIndex;
pub use mood::{books_by_mood, detect_mood, mood_profile, LengthBand, Mood, MoodProfile, Pace};
pub use query::{facets, search_books};
