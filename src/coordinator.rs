//! バッチ処理
//!
//! キャッシュ未登録の著者を一定数ずつ処理し、バッチごとにキャッシュを保存する。
//! 途中で中断されても、保存済みの著者は次回以降再取得されない。

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::sleep;
use tracing::info;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::livelib::extract_authors;
use crate::traits::{BookSource, PhotoScraper, PhotoStore};

/// 1回の実行結果
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub username: String,
    pub books: usize,
    pub authors: usize,
    /// キャッシュ未登録だった著者数
    pub pending: usize,
    pub added: usize,
    pub missing: usize,
    pub batches: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct BatchCoordinator<B, S, P> {
    books: B,
    scraper: S,
    store: P,
    config: SyncConfig,
}

impl<B, S, P> BatchCoordinator<B, S, P>
where
    B: BookSource,
    S: PhotoScraper,
    P: PhotoStore,
{
    pub fn new(books: B, scraper: S, store: P, config: SyncConfig) -> Self {
        Self {
            books,
            scraper,
            store,
            config,
        }
    }

    /// キャッシュの読み込みと保存のエラーだけが呼び出し元に返る
    pub async fn run(&self, username: &str) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();

        let mut photos = self.store.load()?;
        let books = self.books.fetch_books(username).await;
        info!("Fetched {} books from LiveLib", books.len());

        let authors = extract_authors(&books);
        info!("Found {} unique authors", authors.len());

        let pending: Vec<(String, String)> = authors
            .iter()
            .filter(|(name, _)| !photos.contains_key(&name.to_lowercase()))
            .map(|(name, url)| (name.clone(), url.clone()))
            .collect();
        info!("Found {} authors to process", pending.len());

        let mut report = SyncReport {
            username: username.to_string(),
            books: books.len(),
            authors: authors.len(),
            pending: pending.len(),
            added: 0,
            missing: 0,
            batches: 0,
            started_at,
            finished_at: started_at,
        };

        if pending.is_empty() {
            info!("No new authors to process");
            report.finished_at = Utc::now();
            return Ok(report);
        }

        let batch_size = self.config.effective_batch_size();
        let total_batches = pending.len().div_ceil(batch_size);

        for (index, batch) in pending.chunks(batch_size).enumerate() {
            let batch_num = index + 1;
            info!(
                "Processing batch {}/{} ({} authors)",
                batch_num,
                total_batches,
                batch.len()
            );

            for (name, url) in batch {
                info!("Fetching photo for {} from {}", name, url);

                match self.scraper.fetch_photo(url).await {
                    Some(photo_url) => {
                        info!("Added {}: {}", name, photo_url);
                        photos.insert(name.to_lowercase(), photo_url);
                        report.added += 1;
                    }
                    None => {
                        info!("Skipping {} (no valid photo found)", name);
                        report.missing += 1;
                    }
                }

                sleep(self.config.item_delay).await;
            }

            self.store.save(&photos)?;
            report.batches += 1;
            info!("Saved progress after batch {}", batch_num);

            if batch_num < total_batches {
                info!("Pausing for {:?}...", self.config.batch_delay);
                sleep(self.config.batch_delay).await;
            }
        }

        report.finished_at = Utc::now();
        info!(
            "Sync complete: {} added, {} without photo, {} cached in total",
            report.added,
            report.missing,
            photos.len()
        );

        Ok(report)
    }
}
