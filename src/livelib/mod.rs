//! LiveLib 書籍リストモジュール
//!
//! Google Apps Script 経由で棚ごとの書籍を取得し、著者を抽出する

mod authors;
mod fetcher;
mod types;

pub use authors::{extract_authors, AuthorIndex};
pub use fetcher::BookListFetcher;
pub use types::{AuthorRef, BookRecord, Shelf};
