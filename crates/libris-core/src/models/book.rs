use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub publication_year: i32,
    pub section: String,
    pub code: String,
    #[serde(default)]
    pub is_discarded: bool,
}

impl Book {
    pub fn status_display(&self) -> &'static str {
        if self.is_discarded {
            "discarded"
        } else {
            "active"
        }
    }
}

/// Body for creating a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub publication_year: i32,
    pub section: String,
    pub code: String,
}

/// Partial update; unset fields are left alone by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_discarded: Option<bool>,
}

/// A book with two or fewer copies left across all rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockEntry {
    pub book: LowStockBook,
    #[serde(default)]
    pub readers: Vec<Borrower>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockBook {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub current_code: String,
}

/// Reader currently holding a copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrower {
    pub id: i64,
    pub full_name: String,
    pub ticket_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_book() {
        let json = r#"{"id": 3, "title": "Мастер и Маргарита", "authors": "М. Булгаков", "publisher": "АСТ", "publication_year": 1967, "section": "Проза", "code": "84(2)-44", "is_discarded": false}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, 3);
        assert_eq!(book.publication_year, 1967);
        assert_eq!(book.status_display(), "active");
    }

    #[test]
    fn test_book_patch_only_sends_set_fields() {
        let patch = BookPatch {
            is_discarded: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"is_discarded": true})
        );
    }

    #[test]
    fn test_parse_low_stock_entry() {
        let json = r#"[{"book": {"id": 1, "title": "T", "authors": "A", "current_code": "C-1"}, "readers": [{"id": 4, "full_name": "Ivan", "ticket_number": "R-4"}]}]"#;
        let entries: Vec<LowStockEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].book.current_code, "C-1");
        assert_eq!(entries[0].readers[0].ticket_number, "R-4");
    }
}
