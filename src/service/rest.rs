use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::core::{Book, Like, Rating, ReadingListEntry};
use crate::error::{DiscoveryError, Result};
use crate::service::DataService;

const SERVICE_NAME: &str = "rest";

/// Hosted Data Service client.
///
/// Speaks the PostgREST-style row API the hosted backend exposes:
/// `GET {base}/rest/v1/{table}?{filters}` with the project key in the
/// `apikey` header. Each method maps to exactly one filtered read.
pub struct RestDataService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestDataService {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(DiscoveryError::HttpRequest)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn table_url(&self, table: &str, params: &str) -> String {
        format!("{}/rest/v1/{}?{}", self.base_url, table, params)
    }

    async fn rows<T: DeserializeOwned>(&self, table: &str, params: &str) -> Result<Vec<T>> {
        let url = self.table_url(table, params);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| DiscoveryError::Service {
                service: SERVICE_NAME.to_string(),
                message: format!("{table} request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Service {
                service: SERVICE_NAME.to_string(),
                message: format!("{table}: HTTP {}", response.status()),
            });
        }

        response.json().await.map_err(|e| DiscoveryError::Service {
            service: SERVICE_NAME.to_string(),
            message: format!("{table}: invalid JSON: {e}"),
        })
    }
}

#[async_trait]
impl DataService for RestDataService {
    async fn all_books(&self) -> Result<Vec<Book>> {
        self.rows("books", "select=*").await
    }

    async fn books_by_ids(&self, ids: &[String]) -> Result<Vec<Book>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let list = ids.join(",");
        let params = format!("select=*&id=in.({})", urlencoding::encode(&list));
        self.rows("books", &params).await
    }

    async fn featured_books(&self, limit: usize) -> Result<Vec<Book>> {
        let params = format!("select=*&is_featured=eq.true&limit={limit}");
        self.rows("books", &params).await
    }

    async fn likes_for_user(&self, user_id: &str) -> Result<Vec<Like>> {
        let params = format!("select=*&user_id=eq.{}", urlencoding::encode(user_id));
        self.rows("likes", &params).await
    }

    async fn ratings_for_user(&self, user_id: &str) -> Result<Vec<Rating>> {
        let params = format!("select=*&user_id=eq.{}", urlencoding::encode(user_id));
        self.rows("ratings", &params).await
    }

    async fn reading_list_for_user(&self, user_id: &str) -> Result<Vec<ReadingListEntry>> {
        let params = format!("select=*&user_id=eq.{}", urlencoding::encode(user_id));
        self.rows("reading_list", &params).await
    }

    async fn likes_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Like>> {
        let params = format!(
            "select=*&created_at=gte.{}",
            urlencoding::encode(&cutoff.to_rfc3339())
        );
        self.rows("likes", &params).await
    }

    async fn all_likes(&self) -> Result<Vec<Like>> {
        self.rows("likes", "select=*").await
    }

    async fn all_ratings(&self) -> Result<Vec<Rating>> {
        self.rows("ratings", "select=*").await
    }

    fn name(&self) -> &str {
        SERVICE_NAME
    }

    async fn is_available(&self) -> bool {
        self.featured_books(1).await.is_ok()
    }
}
