pub mod rest;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::{Book, Like, Rating, ReadingListEntry};
use crate::error::Result;

pub use rest::RestDataService;
pub use sqlite::SqliteDataService;

/// The hosted backend this layer treats as a black-box collaborator.
///
/// Every read the scoring/filtering functions need goes through here;
/// nothing above this trait issues its own queries.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Full catalog read
    async fn all_books(&self) -> Result<Vec<Book>>;

    /// Fetch specific rows; order of the result is unspecified
    async fn books_by_ids(&self, ids: &[String]) -> Result<Vec<Book>>;

    /// Curated featured rows, capped at `limit`
    async fn featured_books(&self, limit: usize) -> Result<Vec<Book>>;

    /// One user's likes
    async fn likes_for_user(&self, user_id: &str) -> Result<Vec<Like>>;

    /// One user's ratings
    async fn ratings_for_user(&self, user_id: &str) -> Result<Vec<Rating>>;

    /// One user's reading list
    async fn reading_list_for_user(&self, user_id: &str) -> Result<Vec<ReadingListEntry>>;

    /// Likes created at or after the cutoff (feeds trending)
    async fn likes_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Like>>;

    /// Every like row (feeds the co-occurrence model)
    async fn all_likes(&self) -> Result<Vec<Like>>;

    /// Every rating row (feeds the co-occurrence model)
    async fn all_ratings(&self) -> Result<Vec<Rating>>;

    /// Get service name for logging
    fn name(&self) -> &str;

    /// Check if the service is reachable
    async fn is_available(&self) -> bool;
}
