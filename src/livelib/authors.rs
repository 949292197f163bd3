use std::collections::BTreeMap;

use super::types::BookRecord;

/// 著者名（大文字小文字はそのまま）→ プロフィールURL
pub type AuthorIndex = BTreeMap<String, String>;

/// 全書籍から著者を抽出する。
///
/// 名前とURLの両方が空でない著者だけを残し、同名の著者は後の出現で上書きする。
pub fn extract_authors(books: &[BookRecord]) -> AuthorIndex {
    let mut authors = AuthorIndex::new();

    for author in books.iter().flat_map(|book| &book.authors) {
        match (author.name.as_deref(), author.href.as_deref()) {
            (Some(name), Some(href)) if !name.is_empty() && !href.is_empty() => {
                authors.insert(name.to_string(), href.to_string());
            }
            _ => {}
        }
    }

    authors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::livelib::AuthorRef;

    fn book(authors: Vec<AuthorRef>) -> BookRecord {
        BookRecord {
            authors,
            ..Default::default()
        }
    }

    #[test]
    fn test_skips_incomplete_authors() {
        let books = vec![book(vec![
            AuthorRef::new("Jane Doe", "http://x/jane"),
            AuthorRef::new("", "http://x/empty"),
            AuthorRef::new("No Link", ""),
            AuthorRef {
                name: Some("Null Link".into()),
                href: None,
            },
            AuthorRef::default(),
        ])];

        let authors = extract_authors(&books);

        assert_eq!(authors.len(), 1);
        assert_eq!(authors.get("Jane Doe").map(String::as_str), Some("http://x/jane"));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let books = vec![
            book(vec![AuthorRef::new("Jane Doe", "http://x/old")]),
            book(vec![
                AuthorRef::new("John Roe", "http://x/john"),
                AuthorRef::new("Jane Doe", "http://x/new"),
            ]),
        ];

        let authors = extract_authors(&books);

        assert_eq!(authors.len(), 2);
        assert_eq!(authors["Jane Doe"], "http://x/new");
        assert_eq!(authors["John Roe"], "http://x/john");
    }

    #[test]
    fn test_names_are_case_preserving() {
        let books = vec![book(vec![
            AuthorRef::new("Jane Doe", "http://x/1"),
            AuthorRef::new("JANE DOE", "http://x/2"),
        ])];

        let authors = extract_authors(&books);

        assert_eq!(authors.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_authors(&[]).is_empty());
        assert!(extract_authors(&[BookRecord::default()]).is_empty());
    }
}
