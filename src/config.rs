use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

/// 書籍リストを返す Google Apps Script のエンドポイント
pub const DEFAULT_ENDPOINT_URL: &str = "https://script.google.com/macros/s/AKfycbxzTdo297yeLns95JN_h8xCKfIKNNvqKg8bk5NXrEOxeRD-gbQAqgxiB18IDDG2WbOO/exec";
pub const DEFAULT_USERNAME: &str = "AlyonaRanneva";
pub const USERNAME_ENV: &str = "LIVELIB_USERNAME";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub endpoint_url: String,
    pub cache_path: PathBuf,
    pub config_path: PathBuf,
    pub batch_size: usize,
    /// 著者ごとの待機時間
    pub item_delay: Duration,
    /// バッチ間の待機時間（最後のバッチの後は待たない）
    pub batch_delay: Duration,
    /// ページ遷移後、動的コンテンツのための待機時間
    pub settle_delay: Duration,
    pub page_load_timeout: Duration,
    pub request_timeout: Duration,
    pub headless: bool,
    pub user_agent: String,
    /// ブラウザのユーザーデータディレクトリを作る場所
    pub browser_data_dir: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            cache_path: PathBuf::from("data/author_photos.json"),
            config_path: PathBuf::from("data/config.json"),
            batch_size: 10,
            item_delay: Duration::from_secs(5),
            batch_delay: Duration::from_secs(120),
            settle_delay: Duration::from_secs(2),
            page_load_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            browser_data_dir: std::env::temp_dir(),
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = url.into();
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_delays(mut self, item_delay: Duration, batch_delay: Duration) -> Self {
        self.item_delay = item_delay;
        self.batch_delay = batch_delay;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_page_load_timeout(mut self, timeout: Duration) -> Self {
        self.page_load_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_browser_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.browser_data_dir = dir.into();
        self
    }

    /// 0 は 1 として扱う
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// 環境変数 → 設定ファイル → デフォルトの順でユーザー名を決定
    pub fn resolve_username(&self) -> String {
        resolve_username(std::env::var(USERNAME_ENV).ok(), &self.config_path)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "livelibUsername")]
    livelib_username: Option<String>,
}

pub fn resolve_username(env_value: Option<String>, config_path: &Path) -> String {
    if let Some(name) = env_value.filter(|v| !v.is_empty()) {
        debug!("Username from {}: {}", USERNAME_ENV, name);
        return name;
    }

    if config_path.exists() {
        match read_config_file(config_path) {
            Ok(Some(name)) => {
                debug!("Username from {:?}: {}", config_path, name);
                return name;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read config file {:?}: {}", config_path, e),
        }
    }

    DEFAULT_USERNAME.to_string()
}

fn read_config_file(path: &Path) -> Result<Option<String>, crate::SyncError> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = serde_json::from_str(&content)?;
    Ok(file.livelib_username.filter(|v| !v.is_empty()))
}
