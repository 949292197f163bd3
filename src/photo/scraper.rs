//! 著者プロフィール写真スクレイパー

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::traits::PhotoScraper;

use super::session::BrowserSession;

pub const AVATAR_SELECTOR: &str = "img#profile-avatar";

const READY_STATE_CHECK_INTERVAL_MS: u64 = 500;

/// プロフィールページの解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoLookup {
    Found(String),
    /// アバター画像要素なし
    MissingElement,
    /// src 属性なし
    MissingSrc,
    /// 絶対URLではない src
    InvalidUrl(String),
}

/// `http://` / `https://` で始まる src のみ採用
pub fn validate_photo_url(src: Option<&str>) -> PhotoLookup {
    match src {
        None => PhotoLookup::MissingSrc,
        Some(src) if src.starts_with("http://") || src.starts_with("https://") => {
            PhotoLookup::Found(src.to_string())
        }
        Some(src) => PhotoLookup::InvalidUrl(src.to_string()),
    }
}

pub struct ProfilePhotoScraper {
    config: SyncConfig,
}

impl ProfilePhotoScraper {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// プロフィールページを開いてアバター画像を探す
    pub async fn lookup(&self, profile_url: &str) -> Result<PhotoLookup, SyncError> {
        let url = profile_url.to_string();
        let settle_delay = self.config.settle_delay;
        let load_timeout = self.config.page_load_timeout;

        BrowserSession::scoped(&self.config, |page| async move {
            page.goto(url.as_str())
                .await
                .map_err(|e| SyncError::Navigation(e.to_string()))?;

            wait_for_load(&page, load_timeout).await;

            // 動的コンテンツの読み込みを待つ
            sleep(settle_delay).await;

            let elements = page
                .find_elements(AVATAR_SELECTOR)
                .await
                .map_err(|e| SyncError::JavaScript(e.to_string()))?;

            let Some(avatar) = elements.into_iter().next() else {
                return Ok(PhotoLookup::MissingElement);
            };

            let src = avatar
                .attribute("src")
                .await
                .map_err(|e| SyncError::JavaScript(e.to_string()))?;

            Ok(validate_photo_url(src.as_deref()))
        })
        .await
    }
}

#[async_trait]
impl PhotoScraper for ProfilePhotoScraper {
    async fn fetch_photo(&self, profile_url: &str) -> Option<String> {
        match self.lookup(profile_url).await {
            Ok(PhotoLookup::Found(url)) => Some(url),
            Ok(PhotoLookup::MissingElement) => {
                info!("No profile-avatar image found at {}", profile_url);
                None
            }
            Ok(PhotoLookup::MissingSrc) => {
                warn!("Profile-avatar image without src at {}", profile_url);
                None
            }
            Ok(PhotoLookup::InvalidUrl(src)) => {
                warn!("Invalid photo URL found at {}: {}", profile_url, src);
                None
            }
            Err(e) => {
                error!("Error fetching or parsing {}: {}", profile_url, e);
                None
            }
        }
    }
}

/// document.readyState が complete になるまで待機（タイムアウト時はそのまま進む）
async fn wait_for_load(page: &Page, timeout: Duration) {
    let start = Instant::now();

    while start.elapsed() < timeout {
        match page.evaluate("document.readyState").await {
            Ok(state) => {
                if state.into_value::<String>().unwrap_or_default() == "complete" {
                    debug!("Page load complete after {:?}", start.elapsed());
                    return;
                }
            }
            Err(e) => debug!("Ready state check error: {}", e),
        }

        sleep(Duration::from_millis(READY_STATE_CHECK_INTERVAL_MS)).await;
    }

    warn!("Page load timeout after {:?}, proceeding anyway", start.elapsed());
}
