use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("JavaScript実行エラー: {0}")]
    JavaScript(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("不正なレスポンス: {0}")]
    InvalidResponse(String),

    #[error("JSONエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("キャッシュファイルエラー ({path:?}): {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    /// キャッシュファイルのパスでエラーを包む
    pub fn cache(path: impl Into<PathBuf>, source: impl Into<SyncError>) -> Self {
        SyncError::Cache {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_message_includes_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SyncError::cache("data/author_photos.json", io);

        let message = err.to_string();
        assert!(message.contains("author_photos.json"));
        assert!(message.contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
