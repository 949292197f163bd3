//! 書籍リスト取得
//!
//! 棚ごとに1回リクエストし、成功した棚の書籍を連結して返す

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::traits::BookSource;

use super::types::{BookRecord, Shelf};

const INCLUDE_COLUMNS: [&str; 3] = ["title", "authors", "bookHref"];
const BOOK_ARRAY_FIELD: &str = "bookArray";

pub struct BookListFetcher {
    client: reqwest::Client,
    endpoint_url: String,
}

impl BookListFetcher {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    /// 1つの棚を取得
    pub async fn fetch_shelf(
        &self,
        username: &str,
        shelf: Shelf,
    ) -> Result<Vec<BookRecord>, SyncError> {
        let columns = INCLUDE_COLUMNS.join(",");
        debug!("Requesting shelf {} for {}", shelf, username);

        let response = self
            .client
            .get(&self.endpoint_url)
            .query(&[
                ("username", username),
                ("pagename", shelf.as_str()),
                ("includeColumns", columns.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;

        parse_book_array(&data)
    }
}

#[async_trait]
impl BookSource for BookListFetcher {
    async fn fetch_books(&self, username: &str) -> Vec<BookRecord> {
        let mut all_books = Vec::new();

        for shelf in Shelf::ALL {
            match self.fetch_shelf(username, shelf).await {
                Ok(books) => {
                    info!("Fetched {} books from shelf {}", books.len(), shelf);
                    all_books.extend(books);
                }
                Err(SyncError::InvalidResponse(reason)) => {
                    warn!("Invalid data format for {}: {}", shelf, reason);
                }
                Err(SyncError::Json(e)) => {
                    warn!("Error parsing JSON for {}: {}", shelf, e);
                }
                Err(e) => {
                    warn!("Error fetching {}: {}", shelf, e);
                }
            }
        }

        all_books
    }
}

/// `bookArray` を取り出す。欠落・空・リスト以外は不正なレスポンス
fn parse_book_array(data: &Value) -> Result<Vec<BookRecord>, SyncError> {
    let items = match data.get(BOOK_ARRAY_FIELD) {
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(Value::Array(_)) => {
            return Err(SyncError::InvalidResponse(format!("{} is empty", BOOK_ARRAY_FIELD)))
        }
        Some(_) => {
            return Err(SyncError::InvalidResponse(format!(
                "{} is not a list",
                BOOK_ARRAY_FIELD
            )))
        }
        None => {
            return Err(SyncError::InvalidResponse(format!(
                "{} is missing",
                BOOK_ARRAY_FIELD
            )))
        }
    };

    let books = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item.clone()) {
            Ok(book) => Some(book),
            Err(e) => {
                warn!("Skipping malformed book record #{}: {}", i, e);
                None
            }
        })
        .collect();

    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_book_array() {
        let data = json!({
            "bookArray": [
                {"title": "A", "authors": [{"name": "Jane Doe", "href": "http://x/jane"}]},
                {"title": "B", "authors": []}
            ]
        });

        let books = parse_book_array(&data).unwrap();

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].authors[0].name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_invalid_shapes_are_rejected() {
        for data in [
            json!({}),
            json!({"bookArray": null}),
            json!({"bookArray": "nope"}),
            json!({"bookArray": {}}),
            json!({"bookArray": []}),
            json!([1, 2, 3]),
        ] {
            assert!(
                matches!(parse_book_array(&data), Err(SyncError::InvalidResponse(_))),
                "expected invalid: {}",
                data
            );
        }
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let data = json!({
            "bookArray": [
                {"title": "ok", "authors": [{"name": "A", "href": "http://x/a"}]},
                {"title": "bad", "authors": "not a list"},
                42
            ]
        });

        let books = parse_book_array(&data).unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title.as_deref(), Some("ok"));
    }
}
