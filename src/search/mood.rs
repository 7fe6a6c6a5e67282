use serde::{Deserialize, Serialize};

use crate::core::Book;

/// Reader mood, as picked in the UI or detected from free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Stressed,
    Curious,
    Romantic,
    Adventurous,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Stressed,
        Mood::Curious,
        Mood::Romantic,
        Mood::Adventurous,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "happy" => Some(Mood::Happy),
            "sad" => Some(Mood::Sad),
            "stressed" => Some(Mood::Stressed),
            "curious" => Some(Mood::Curious),
            "romantic" => Some(Mood::Romantic),
            "adventurous" => Some(Mood::Adventurous),
            _ => None,
        }
    }
}

/// Reading pace a mood calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    Moderate,
    Fast,
}

/// Book length bucket.
///
/// Bands are exhaustive and non-overlapping: short is under 250 pages,
/// medium is 250 through 450, long is over 450. A book without a page
/// count matches no band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthBand {
    Short,
    Medium,
    Long,
}

impl LengthBand {
    pub fn contains(&self, pages: u32) -> bool {
        match self {
            LengthBand::Short => pages < 250,
            LengthBand::Medium => (250..=450).contains(&pages),
            LengthBand::Long => pages > 450,
        }
    }

    pub fn of(pages: u32) -> Self {
        if pages < 250 {
            LengthBand::Short
        } else if pages <= 450 {
            LengthBand::Medium
        } else {
            LengthBand::Long
        }
    }
}

/// What a mood maps to when browsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodProfile {
    pub preferred_genres: Vec<&'static str>,
    pub pace: Pace,
    pub emotional_tone: &'static str,
    pub length: LengthBand,
}

/// Static mood table
pub fn mood_profile(mood: Mood) -> MoodProfile {
    match mood {
        Mood::Happy => MoodProfile {
            preferred_genres: vec!["Comedy", "Romance", "Adventure"],
            pace: Pace::Fast,
            emotional_tone: "uplifting",
            length: LengthBand::Medium,
        },
        Mood::Sad => MoodProfile {
            preferred_genres: vec!["Drama", "Literary Fiction", "Poetry"],
            pace: Pace::Slow,
            emotional_tone: "cathartic",
            length: LengthBand::Medium,
        },
        Mood::Stressed => MoodProfile {
            preferred_genres: vec!["Fantasy", "Science Fiction", "Mystery", "Thriller"],
            pace: Pace::Fast,
            emotional_tone: "escapist",
            length: LengthBand::Short,
        },
        Mood::Curious => MoodProfile {
            preferred_genres: vec!["Non-Fiction", "Science", "History", "Biography"],
            pace: Pace::Moderate,
            emotional_tone: "informative",
            length: LengthBand::Medium,
        },
        Mood::Romantic => MoodProfile {
            preferred_genres: vec!["Romance", "Contemporary"],
            pace: Pace::Moderate,
            emotional_tone: "warm",
            length: LengthBand::Medium,
        },
        Mood::Adventurous => MoodProfile {
            preferred_genres: vec!["Adventure", "Fantasy", "Science Fiction"],
            pace: Pace::Fast,
            emotional_tone: "thrilling",
            length: LengthBand::Long,
        },
    }
}

/// Keyword dictionary for free-text mood detection
fn mood_keywords(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &["happy", "joy", "cheerful", "fun", "laugh", "light"],
        Mood::Sad => &["sad", "down", "melancholy", "cry", "grief", "loss"],
        Mood::Stressed => &["stressed", "anxious", "overwhelmed", "escape", "tired", "busy"],
        Mood::Curious => &["curious", "learn", "wonder", "why", "discover", "know"],
        Mood::Romantic => &["love", "romance", "romantic", "heart", "crush", "date"],
        Mood::Adventurous => &["adventure", "explore", "journey", "quest", "travel", "wild"],
    }
}

/// Filter the catalog by a mood's genre list and length band.
pub fn books_by_mood(mood: Mood, books: &[Book]) -> Vec<Book> {
    let profile = mood_profile(mood);

    books
        .iter()
        .filter(|book| profile.preferred_genres.iter().any(|g| *g == book.genre))
        .filter(|book| matches!(book.pages, Some(pages) if profile.length.contains(pages)))
        .cloned()
        .collect()
}

/// Naive keyword count over the fixed per-mood dictionaries; the mood
/// with the most hits wins and anything ambiguous defaults to Curious.
pub fn detect_mood(text: &str) -> Mood {
    let text = text.to_lowercase();

    let mut best = Mood::Curious;
    let mut best_hits = 0usize;
    let mut tied = false;

    for mood in Mood::ALL {
        let hits = mood_keywords(mood)
            .iter()
            .filter(|keyword| text.contains(*keyword))
            .count();

        match hits.cmp(&best_hits) {
            std::cmp::Ordering::Greater => {
                best = mood;
                best_hits = hits;
                tied = false;
            }
            std::cmp::Ordering::Equal if hits > 0 => tied = true,
            _ => {}
        }
    }

    if best_hits == 0 || tied {
        Mood::Curious
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, genre: &str, pages: u32) -> Book {
        let mut b = Book::new(id, format!("Book {id}"), "Author", genre);
        b.pages = Some(pages);
        b
    }

    #[test]
    fn test_length_bands_are_exhaustive_and_disjoint() {
        for pages in [0u32, 100, 249, 250, 300, 450, 451, 900] {
            let matching = [LengthBand::Short, LengthBand::Medium, LengthBand::Long]
                .iter()
                .filter(|band| band.contains(pages))
                .count();
            assert_eq!(matching, 1, "pages {pages} must land in exactly one band");
        }
        assert_eq!(LengthBand::of(249), LengthBand::Short);
        assert_eq!(LengthBand::of(250), LengthBand::Medium);
        assert_eq!(LengthBand::of(451), LengthBand::Long);
    }

    #[test]
    fn test_stressed_mood_filters_genre_and_length() {
        let books = vec![
            book("1", "Fantasy", 200),
            book("2", "Fantasy", 600),
            book("3", "Thriller", 180),
            book("4", "Romance", 150),
        ];

        let picks = books_by_mood(Mood::Stressed, &books);
        let profile = mood_profile(Mood::Stressed);

        assert_eq!(picks.len(), 2);
        for pick in &picks {
            assert!(profile.preferred_genres.contains(&pick.genre.as_str()));
            assert!(pick.pages.unwrap() < 250);
        }
    }

    #[test]
    fn test_books_without_page_count_excluded() {
        let mut no_pages = Book::new("1", "Book", "Author", "Fantasy");
        no_pages.pages = None;

        assert!(books_by_mood(Mood::Stressed, &[no_pages]).is_empty());
    }

    #[test]
    fn test_detect_mood_counts_keywords() {
        assert_eq!(detect_mood("I want to escape, so anxious and overwhelmed"), Mood::Stressed);
        assert_eq!(detect_mood("a grand journey, a quest to explore"), Mood::Adventurous);
    }

    #[test]
    fn test_detect_mood_defaults_to_curious() {
        assert_eq!(detect_mood(""), Mood::Curious);
        assert_eq!(detect_mood("nothing relevant here"), Mood::Curious);
        // one happy keyword, one sad keyword: tie
        assert_eq!(detect_mood("laugh and cry"), Mood::Curious);
    }

    #[test]
    fn test_mood_parse() {
        assert_eq!(Mood::parse(" Stressed "), Some(Mood::Stressed));
        assert_eq!(Mood::parse("bored"), None);
    }
}
