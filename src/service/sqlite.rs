use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::core::{Book, Like, Rating, ReadingListEntry, ReadingStatus};
use crate::error::{DiscoveryError, Result};
use crate::service::DataService;

const SERVICE_NAME: &str = "sqlite";

/// Local snapshot of the hosted Data Service.
///
/// Backs the CLI's offline mode and the test suite; the schema mirrors
/// the hosted tables this layer reads. Open with `":memory:"` for an
/// ephemeral store.
pub struct SqliteDataService {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDataService {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(DiscoveryError::Database)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS books (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT NOT NULL DEFAULT '',
                genre TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                release_date TEXT NOT NULL DEFAULT '',
                pages INTEGER,
                publisher TEXT NOT NULL DEFAULT '',
                language TEXT NOT NULL DEFAULT 'en',
                series TEXT,
                series_order INTEGER,
                is_featured INTEGER NOT NULL DEFAULT 0,
                cover_url TEXT NOT NULL DEFAULT '',
                pdf_url TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS likes (
                book_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (book_id, user_id)
            );
            CREATE TABLE IF NOT EXISTS ratings (
                book_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                rating INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (book_id, user_id)
            );
            CREATE TABLE IF NOT EXISTS reading_list (
                book_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (book_id, user_id)
            );
            CREATE INDEX IF NOT EXISTS idx_likes_created_at ON likes(created_at);",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert or replace a catalog row (seeding/tests)
    pub fn add_book(&self, book: &Book) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO books
             (id, title, author, genre, description, release_date, pages, publisher,
              language, series, series_order, is_featured, cover_url, pdf_url,
              created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                book.id,
                book.title,
                book.author,
                book.genre,
                book.description,
                book.release_date,
                book.pages,
                book.publisher,
                book.language,
                book.series,
                book.series_order,
                book.is_featured as i64,
                book.cover_url,
                book.pdf_url,
                book.created_at.to_rfc3339(),
                book.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn add_like(&self, like: &Like) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO likes (book_id, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![like.book_id, like.user_id, like.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn add_rating(&self, rating: &Rating) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO ratings (book_id, user_id, rating, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                rating.book_id,
                rating.user_id,
                rating.rating as i64,
                rating.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn add_reading_entry(&self, entry: &ReadingListEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO reading_list (book_id, user_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.book_id,
                entry.user_id,
                status_str(entry.status),
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn query_books(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Book>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, book_from_row)?;
        let mut books = Vec::new();
        for row in rows {
            books.push(row?);
        }
        Ok(books)
    }

    fn query_likes(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Like>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok(Like {
                book_id: row.get(0)?,
                user_id: row.get(1)?,
                created_at: parse_timestamp(row.get::<_, String>(2)?),
            })
        })?;
        let mut likes = Vec::new();
        for row in rows {
            likes.push(row?);
        }
        Ok(likes)
    }

    fn query_ratings(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Rating>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok(Rating {
                book_id: row.get(0)?,
                user_id: row.get(1)?,
                rating: row.get::<_, i64>(2)? as u8,
                created_at: parse_timestamp(row.get::<_, String>(3)?),
            })
        })?;
        let mut ratings = Vec::new();
        for row in rows {
            ratings.push(row?);
        }
        Ok(ratings)
    }
}

fn status_str(status: ReadingStatus) -> &'static str {
    match status {
        ReadingStatus::WantToRead => "want_to_read",
        ReadingStatus::CurrentlyReading => "currently_reading",
        ReadingStatus::Finished => "finished",
    }
}

fn parse_status(value: &str) -> ReadingStatus {
    match value {
        "currently_reading" => ReadingStatus::CurrentlyReading,
        "finished" => ReadingStatus::Finished,
        _ => ReadingStatus::WantToRead,
    }
}

fn parse_timestamp(value: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        genre: row.get(3)?,
        description: row.get(4)?,
        release_date: row.get(5)?,
        pages: row.get::<_, Option<i64>>(6)?.map(|p| p as u32),
        publisher: row.get(7)?,
        language: row.get(8)?,
        series: row.get(9)?,
        series_order: row.get::<_, Option<i64>>(10)?.map(|o| o as u32),
        is_featured: row.get::<_, i64>(11)? != 0,
        cover_url: row.get(12)?,
        pdf_url: row.get(13)?,
        created_at: parse_timestamp(row.get::<_, String>(14)?),
        updated_at: parse_timestamp(row.get::<_, String>(15)?),
    })
}

const BOOK_COLUMNS: &str = "id, title, author, genre, description, release_date, pages, publisher, \
     language, series, series_order, is_featured, cover_url, pdf_url, created_at, updated_at";

#[async_trait]
impl DataService for SqliteDataService {
    async fn all_books(&self) -> Result<Vec<Book>> {
        self.query_books(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"), &[])
    }

    async fn books_by_ids(&self, ids: &[String]) -> Result<Vec<Book>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id IN ({placeholders})");
        let args: Vec<&dyn rusqlite::ToSql> = ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();
        self.query_books(&sql, &args)
    }

    async fn featured_books(&self, limit: usize) -> Result<Vec<Book>> {
        self.query_books(
            &format!(
                "SELECT {BOOK_COLUMNS} FROM books WHERE is_featured = 1 ORDER BY id LIMIT ?"
            ),
            &[&(limit as i64)],
        )
    }

    async fn likes_for_user(&self, user_id: &str) -> Result<Vec<Like>> {
        self.query_likes(
            "SELECT book_id, user_id, created_at FROM likes WHERE user_id = ?",
            &[&user_id],
        )
    }

    async fn ratings_for_user(&self, user_id: &str) -> Result<Vec<Rating>> {
        self.query_ratings(
            "SELECT book_id, user_id, rating, created_at FROM ratings WHERE user_id = ?",
            &[&user_id],
        )
    }

    async fn reading_list_for_user(&self, user_id: &str) -> Result<Vec<ReadingListEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT book_id, user_id, status, created_at FROM reading_list WHERE user_id = ?",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok(ReadingListEntry {
                book_id: row.get(0)?,
                user_id: row.get(1)?,
                status: parse_status(&row.get::<_, String>(2)?),
                created_at: parse_timestamp(row.get::<_, String>(3)?),
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    async fn likes_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Like>> {
        self.query_likes(
            "SELECT book_id, user_id, created_at FROM likes WHERE created_at >= ?",
            &[&cutoff.to_rfc3339()],
        )
    }

    async fn all_likes(&self) -> Result<Vec<Like>> {
        self.query_likes("SELECT book_id, user_id, created_at FROM likes", &[])
    }

    async fn all_ratings(&self) -> Result<Vec<Rating>> {
        self.query_ratings("SELECT book_id, user_id, rating, created_at FROM ratings", &[])
    }

    fn name(&self) -> &str {
        SERVICE_NAME
    }

    async fn is_available(&self) -> bool {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)).is_ok()
    }
}
