//! LiveLib 関連の型定義

use serde::{Deserialize, Serialize};

/// 書籍リストの棚
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Read,
    Reading,
    Wish,
}

impl Shelf {
    pub const ALL: [Shelf; 3] = [Shelf::Read, Shelf::Reading, Shelf::Wish];

    /// `pagename` パラメータの値
    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::Read => "read",
            Shelf::Reading => "reading",
            Shelf::Wish => "wish",
        }
    }
}

impl std::fmt::Display for Shelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 書籍の著者
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub name: Option<String>,
    /// 著者プロフィールページのURL
    #[serde(default)]
    pub href: Option<String>,
}

impl AuthorRef {
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            href: Some(href.into()),
        }
    }
}

/// 書籍レコード (`bookArray` の要素)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(rename = "bookHref", default)]
    pub book_href: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_names() {
        let names: Vec<_> = Shelf::ALL.iter().map(Shelf::as_str).collect();
        assert_eq!(names, vec!["read", "reading", "wish"]);
    }

    #[test]
    fn test_book_record_tolerates_missing_fields() {
        let book: BookRecord = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(book.title.is_none());
        assert!(book.authors.is_empty());

        let book: BookRecord = serde_json::from_str(
            r#"{"title": "Пикник на обочине", "authors": [{"name": "Аркадий Стругацкий"}], "bookHref": "https://www.livelib.ru/book/1"}"#,
        )
        .unwrap();
        assert_eq!(book.authors[0].name.as_deref(), Some("Аркадий Стругацкий"));
        assert!(book.authors[0].href.is_none());
        assert_eq!(book.book_href.as_deref(), Some("https://www.livelib.ru/book/1"));
    }
}
