use async_trait::async_trait;

use crate::error::SyncError;
use crate::livelib::BookRecord;
use crate::photo::PhotoMap;

/// 書籍リストの取得元
#[async_trait]
pub trait BookSource: Send + Sync {
    /// 全棚の書籍を取得（失敗した棚はスキップ）
    async fn fetch_books(&self, username: &str) -> Vec<BookRecord>;
}

/// 著者プロフィール写真の取得
#[async_trait]
pub trait PhotoScraper: Send + Sync {
    /// 写真URLを取得。見つからない場合やエラー時は None
    async fn fetch_photo(&self, profile_url: &str) -> Option<String>;
}

/// 写真キャッシュの永続化
pub trait PhotoStore: Send + Sync {
    fn load(&self) -> Result<PhotoMap, SyncError>;

    fn save(&self, photos: &PhotoMap) -> Result<(), SyncError>;
}
