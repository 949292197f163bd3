//! 著者写真モジュール
//!
//! - プロフィールページから写真URLを取得 (chromiumoxide)
//! - 取得結果をJSONファイルにキャッシュ

mod cache;
mod scraper;
mod session;

use std::collections::BTreeMap;

pub use cache::PhotoCache;
pub use scraper::{validate_photo_url, PhotoLookup, ProfilePhotoScraper, AVATAR_SELECTOR};
pub use session::BrowserSession;

/// 小文字の著者名 → 写真URL
pub type PhotoMap = BTreeMap<String, String>;
