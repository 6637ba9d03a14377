use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Transaction type the backend records when a book is lent out.
pub const ISSUE_TRANSACTION: &str = "Выдача";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookTransaction {
    pub id: i64,
    pub book: i64,
    pub reader: i64,
    pub transaction_date: NaiveDate,
    pub transaction_type: String,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub returned: bool,
}

impl BookTransaction {
    /// An unreturned issue whose due date has passed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.returned
            && self.transaction_type == ISSUE_TRANSACTION
            && self.due_date.map(|due| due < today).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub book: i64,
    pub reader: i64,
    pub transaction_date: NaiveDate,
    pub transaction_type: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OverdueResponse {
    #[serde(default)]
    pub overdue_books: Vec<BookTransaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReaderBooksResponse {
    #[serde(default)]
    pub books_assigned_to_reader: Vec<BookTransaction>,
}
