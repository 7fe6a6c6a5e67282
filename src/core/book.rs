use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "en".to_string()
}

/// A catalog book row as served by the Data Service.
///
/// Rows coming back from the hosted backend are frequently partial
/// (older imports miss pages, series, cover art), so every optional
/// column is serde-lenient and defaults rather than failing the whole
/// fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Unique row id (owned by the Data Service)
    #[serde(default)]
    pub id: String,

    /// Book title
    #[serde(default)]
    pub title: String,

    /// Author display name
    #[serde(default)]
    pub author: String,

    /// Primary genre label
    #[serde(default)]
    pub genre: String,

    /// Back-cover description
    #[serde(default)]
    pub description: String,

    /// Release date (YYYY-MM-DD or partial)
    #[serde(default)]
    pub release_date: String,

    /// Page count
    #[serde(default)]
    pub pages: Option<u32>,

    #[serde(default)]
    pub publisher: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Series name, when the book belongs to one
    #[serde(default)]
    pub series: Option<String>,

    /// Position within the series
    #[serde(default)]
    pub series_order: Option<u32>,

    /// Curated "featured" flag, drives every fallback path
    #[serde(default)]
    pub is_featured: bool,

    /// Cover image URL
    #[serde(default)]
    pub cover_url: String,

    /// PDF URL (when an e-book is attached)
    #[serde(default)]
    pub pdf_url: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Create a new Book with required fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            description: String::new(),
            release_date: String::new(),
            pages: None,
            publisher: String::new(),
            language: default_language(),
            series: None,
            series_order: None,
            is_featured: false,
            cover_url: String::new(),
            pdf_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Release year, derived from `release_date` when parseable and
    /// falling back to the row creation timestamp otherwise.
    pub fn year(&self) -> i32 {
        parse_year(&self.release_date).unwrap_or_else(|| self.created_at.year())
    }

    /// Year the row was created; the similarity scorer compares on this.
    pub fn created_year(&self) -> i32 {
        self.created_at.year()
    }

    /// Non-empty series name, if any
    pub fn series_name(&self) -> Option<&str> {
        self.series.as_deref().filter(|s| !s.is_empty())
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        if self.author.is_empty() {
            self.title.clone()
        } else {
            format!("{} — {}", self.title, self.author)
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new("0", "Untitled", "", "")
    }
}

/// Parse a year out of a date string ("2021-09-14", "Sep 14, 2021", "2021").
fn parse_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    if let Some(prefix) = date.get(..4) {
        if let Ok(year) = prefix.parse::<i32>() {
            return Some(year);
        }
    }
    date.split(',')
        .last()
        .and_then(|s| s.trim().parse::<i32>().ok())
}
