use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reading-list shelf a user placed a book on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    WantToRead,
    CurrentlyReading,
    Finished,
}

/// A "like" row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
    pub book_id: String,
    pub user_id: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A star rating row (1..=5)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub book_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A reading-list row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingListEntry {
    pub book_id: String,
    pub user_id: String,
    pub status: ReadingStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(book_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }
}

impl Rating {
    pub fn new(book_id: impl Into<String>, user_id: impl Into<String>, rating: u8) -> Self {
        Self {
            book_id: book_id.into(),
            user_id: user_id.into(),
            rating: rating.clamp(1, 5),
            created_at: Utc::now(),
        }
    }

    /// A rating of 4 or 5 counts as a positive taste signal.
    pub fn is_positive(&self) -> bool {
        self.rating >= 4
    }
}

impl ReadingListEntry {
    pub fn new(
        book_id: impl Into<String>,
        user_id: impl Into<String>,
        status: ReadingStatus,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            user_id: user_id.into(),
            status,
            created_at: Utc::now(),
        }
    }
}
