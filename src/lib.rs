//! 著者写真キャッシュライブラリ
//!
//! - LiveLib の棚（read / reading / wish）から書籍リストを取得
//! - 著者プロフィールページから写真URLを取得し、JSONファイルにキャッシュ
//!
//! # 使用例
//!
//! ```rust,ignore
//! use author_photo_cache::{SyncConfig, SyncRequest, SyncService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = SyncService::new();
//!
//!     let config = SyncConfig::new()
//!         .with_cache_path("./data/author_photos.json")
//!         .with_batch_size(10);
//!     let username = config.resolve_username();
//!
//!     let report = service
//!         .call(SyncRequest::new(username).with_config(config))
//!         .await
//!         .unwrap();
//!     println!("Added: {}", report.added);
//! }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod livelib;
pub mod photo;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use config::SyncConfig;
pub use coordinator::{BatchCoordinator, SyncReport};
pub use error::SyncError;
pub use livelib::{extract_authors, AuthorIndex, AuthorRef, BookListFetcher, BookRecord, Shelf};
pub use photo::{BrowserSession, PhotoCache, PhotoMap, ProfilePhotoScraper};
pub use service::{SyncRequest, SyncService};
pub use traits::{BookSource, PhotoScraper, PhotoStore};
