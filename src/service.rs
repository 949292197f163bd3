use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::SyncConfig;
use crate::coordinator::{BatchCoordinator, SyncReport};
use crate::error::SyncError;
use crate::livelib::BookListFetcher;
use crate::photo::{PhotoCache, ProfilePhotoScraper};

/// キャッシュ更新リクエスト
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub username: String,
    pub config: SyncConfig,
}

impl SyncRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            config: SyncConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }
}

/// tower::Serviceを実装したキャッシュ更新サービス
#[derive(Debug, Clone, Default)]
pub struct SyncService {}

impl SyncService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<SyncRequest> for SyncService {
    type Response = SyncReport;
    type Error = SyncError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SyncRequest) -> Self::Future {
        info!("Sync request received: username={}", req.username);

        Box::pin(async move {
            let SyncRequest { username, config } = req;

            let books = BookListFetcher::new(&config)?;
            let scraper = ProfilePhotoScraper::new(config.clone());
            let store = PhotoCache::new(&config.cache_path);

            let coordinator = BatchCoordinator::new(books, scraper, store, config);
            let report = coordinator.run(&username).await?;

            info!(
                "Sync finished: books={}, authors={}, added={}, batches={}",
                report.books, report.authors, report.added, report.batches
            );

            Ok(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sync_request_builder() {
        let req = SyncRequest::new("reader").with_config(
            SyncConfig::new()
                .with_batch_size(5)
                .with_delays(Duration::ZERO, Duration::ZERO),
        );

        assert_eq!(req.username, "reader");
        assert_eq!(req.config.batch_size, 5);
        assert_eq!(req.config.batch_delay, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_noop() {
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let dir = std::env::temp_dir().join(format!("sync-service-{}", unique_id));

        // 接続できないエンドポイント → 全棚スキップ → 処理対象なし
        let config = SyncConfig::new()
            .with_endpoint_url("http://127.0.0.1:9/exec")
            .with_request_timeout(Duration::from_secs(2))
            .with_cache_path(dir.join("author_photos.json"));

        let mut service = SyncService::new();
        let report = service
            .call(SyncRequest::new("nobody").with_config(config))
            .await
            .unwrap();

        assert_eq!(report.books, 0);
        assert_eq!(report.batches, 0);
        assert!(!dir.exists());
    }
}
