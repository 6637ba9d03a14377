//! Library resource endpoints served under the `/api` prefix.

use anyhow::Result;
use serde_json::{json, Value};

use crate::models::transaction::{OverdueResponse, ReaderBooksResponse};
use crate::models::{
    Book, BookPatch, BookTransaction, ComplexReport, ComplexReportKind, LowStockEntry, MonthlyReport,
    NewBook, NewReader, NewReadingRoom, NewTransaction, Reader, ReaderStatistics, ReadingRoom,
    RoomReaders,
};

use super::ApiClient;

impl ApiClient {
    // ===== Books =====

    pub async fn fetch_books(&self) -> Result<Vec<Book>> {
        self.get("/books/").await
    }

    pub async fn fetch_book(&self, id: i64) -> Result<Book> {
        self.get(&format!("/books/{}/", id)).await
    }

    pub async fn create_book(&self, book: &NewBook) -> Result<Book> {
        self.post("/books/", book).await
    }

    pub async fn update_book(&self, id: i64, patch: &BookPatch) -> Result<Book> {
        self.patch(&format!("/books/{}/", id), patch).await
    }

    pub async fn delete_book(&self, id: i64) -> Result<()> {
        self.delete(&format!("/books/{}/", id)).await
    }

    /// Books with two or fewer copies left, with the readers holding them
    pub async fn fetch_low_stock_books(&self) -> Result<Vec<LowStockEntry>> {
        self.get("/books/low_stock/").await
    }

    /// Issues older than a month that were never returned
    pub async fn fetch_overdue(&self) -> Result<Vec<BookTransaction>> {
        let response: OverdueResponse = self.get("/books/late/").await?;
        Ok(response.overdue_books)
    }

    // ===== Readers =====

    pub async fn fetch_readers(&self) -> Result<Vec<Reader>> {
        self.get("/readers/").await
    }

    pub async fn fetch_reader(&self, id: i64) -> Result<Reader> {
        self.get(&format!("/readers/{}/", id)).await
    }

    pub async fn create_reader(&self, reader: &NewReader) -> Result<Reader> {
        self.post("/readers/", reader).await
    }

    pub async fn delete_reader(&self, id: i64) -> Result<()> {
        self.delete(&format!("/readers/{}/", id)).await
    }

    pub async fn assign_room(&self, reader_id: i64, room_id: i64) -> Result<Value> {
        self.patch(
            &format!("/readers/{}/assign_room/", reader_id),
            &json!({ "room_id": room_id }),
        )
        .await
    }

    pub async fn fetch_reader_books(&self, reader_id: i64) -> Result<Vec<BookTransaction>> {
        let response: ReaderBooksResponse = self.get(&format!("/readers/{}/books/", reader_id)).await?;
        Ok(response.books_assigned_to_reader)
    }

    // ===== Reading rooms =====

    pub async fn fetch_reading_rooms(&self) -> Result<Vec<ReadingRoom>> {
        self.get("/reading_rooms/").await
    }

    pub async fn create_reading_room(&self, room: &NewReadingRoom) -> Result<ReadingRoom> {
        self.post("/reading_rooms/", room).await
    }

    pub async fn delete_reading_room(&self, id: i64) -> Result<()> {
        self.delete(&format!("/reading_rooms/{}/", id)).await
    }

    pub async fn fetch_room_readers(&self, room_id: i64) -> Result<RoomReaders> {
        self.get(&format!("/reading_rooms/{}/readers/", room_id)).await
    }

    // ===== Transactions =====

    pub async fn fetch_transactions(&self) -> Result<Vec<BookTransaction>> {
        self.get("/book_transactions/").await
    }

    pub async fn create_transaction(&self, transaction: &NewTransaction) -> Result<BookTransaction> {
        self.post("/book_transactions/", transaction).await
    }

    pub async fn mark_returned(&self, id: i64) -> Result<Value> {
        self.patch(&format!("/book_transactions/{}/return/", id), &json!({}))
            .await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        self.delete(&format!("/book_transactions/{}/", id)).await
    }

    // ===== Reports =====

    /// Room visits, book total and new readers for a month, or for the
    /// whole year when `month` is `None`.
    pub async fn fetch_monthly_report(&self, year: i32, month: Option<u32>) -> Result<MonthlyReport> {
        let month = month.unwrap_or(0).to_string();
        let year = year.to_string();
        self.get_query(
            "/reports/",
            &[("report_type", "monthly"), ("year", year.as_str()), ("month", month.as_str())],
        )
        .await
    }

    pub async fn fetch_reader_statistics(&self) -> Result<ReaderStatistics> {
        self.get_query("/reports/", &[("report_type", "reader_statistics")])
            .await
    }

    pub async fn fetch_complex_report(
        &self,
        kind: ComplexReportKind,
        year: i32,
        month: Option<u32>,
    ) -> Result<ComplexReport> {
        let mut query = vec![
            ("report_type", kind.as_str().to_string()),
            ("year", year.to_string()),
        ];
        if let Some(month) = month {
            query.push(("month", month.to_string()));
        }
        self.get_query("/reports/complex/", &query).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiError;
    use crate::auth::storage::{MemoryStorage, Storage, TOKEN_KEY};

    async fn api_client(server: &MockServer) -> ApiClient {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").unwrap();
        ApiClient::new(&format!("{}/api", server.uri()), Arc::new(storage)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_books() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/books/"))
            .and(header("Authorization", "Token tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "T", "authors": "A", "publisher": "P", "publication_year": 2001,
                 "section": "S", "code": "C-1", "is_discarded": false}
            ])))
            .mount(&server)
            .await;

        let books = api_client(&server).await.fetch_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].code, "C-1");
    }

    #[tokio::test]
    async fn test_fetch_book_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/books/42/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Book not found."})))
            .mount(&server)
            .await;

        let err = api_client(&server).await.fetch_book(42).await.unwrap_err();
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::NotFound(body)) => assert!(body.contains("Book not found")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_assign_room_sends_room_id() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/readers/5/assign_room/"))
            .and(body_json(json!({"room_id": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let response = api_client(&server).await.assign_room(5, 2).await.unwrap();
        assert_eq!(response["message"], "ok");
    }

    #[tokio::test]
    async fn test_fetch_overdue_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/books/late/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"overdue_books": [
                {"id": 3, "book": 1, "reader": 2, "transaction_date": "2025-01-01",
                 "transaction_type": "Выдача", "due_date": "2025-01-15", "returned": false}
            ]})))
            .mount(&server)
            .await;

        let overdue = api_client(&server).await.fetch_overdue().await.unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, 3);
    }

    #[tokio::test]
    async fn test_monthly_report_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reports/"))
            .and(query_param("report_type", "monthly"))
            .and(query_param("year", "2025"))
            .and(query_param("month", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "room_data": [], "total_books": {"total": 7}, "new_readers": 2
            })))
            .mount(&server)
            .await;

        let report = api_client(&server).await.fetch_monthly_report(2025, None).await.unwrap();
        assert_eq!(report.total_books.total, 7);
        assert_eq!(report.new_readers, 2);
    }

    #[tokio::test]
    async fn test_complex_report_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reports/complex/"))
            .and(query_param("report_type", "summary"))
            .and(query_param("year", "2024"))
            .and(query_param("month", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "readers_under_20": 1, "education_statistics": {}, "room_data": [], "total_books": 4
            })))
            .mount(&server)
            .await;

        let report = api_client(&server)
            .await
            .fetch_complex_report(ComplexReportKind::Summary, 2024, Some(3))
            .await
            .unwrap();
        assert_eq!(report.total_books, Some(4));
    }

    #[tokio::test]
    async fn test_delete_transaction_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/book_transactions/8/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        api_client(&server).await.delete_transaction(8).await.unwrap();
    }

    fn book_json(id: i64) -> Value {
        json!({"id": id, "title": "T", "authors": "A", "publisher": "P", "publication_year": 2001,
               "section": "S", "code": "C-1", "is_discarded": false})
    }

    fn reader_json(id: i64) -> Value {
        json!({"id": id, "ticket_number": "R-1", "full_name": "Anna", "passport_number": "4000",
               "birth_date": "2001-02-03", "address": "Nevsky 1", "phone_number": "+7",
               "education_level": "higher", "has_academic_degree": true, "assigned_room": 2,
               "registration_date": "2024-09-01", "re_registered": false})
    }

    fn transaction_json(id: i64) -> Value {
        json!({"id": id, "book": 1, "reader": 2, "transaction_date": "2025-03-01",
               "transaction_type": "Выдача", "due_date": "2025-03-15", "returned": false})
    }

    #[tokio::test]
    async fn test_create_book_posts_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/books/"))
            .and(body_json(json!({"title": "T", "authors": "A", "publisher": "P",
                                  "publication_year": 2001, "section": "S", "code": "C-1"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(book_json(11)))
            .expect(1)
            .mount(&server)
            .await;

        let book = NewBook {
            title: "T".to_string(),
            authors: "A".to_string(),
            publisher: "P".to_string(),
            publication_year: 2001,
            section: "S".to_string(),
            code: "C-1".to_string(),
        };
        let created = api_client(&server).await.create_book(&book).await.unwrap();
        assert_eq!(created.id, 11);
    }

    #[tokio::test]
    async fn test_update_book_patches_only_set_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/books/11/"))
            .and(body_json(json!({"is_discarded": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(book_json(11)))
            .expect(1)
            .mount(&server)
            .await;

        let patch = BookPatch {
            is_discarded: Some(true),
            ..Default::default()
        };
        api_client(&server).await.update_book(11, &patch).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_book_and_reader_and_room() {
        let server = MockServer::start().await;
        for p in ["/api/books/1/", "/api/readers/2/", "/api/reading_rooms/3/"] {
            Mock::given(method("DELETE"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = api_client(&server).await;
        client.delete_book(1).await.unwrap();
        client.delete_reader(2).await.unwrap();
        client.delete_reading_room(3).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_reader_and_books() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/readers/2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reader_json(2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/readers/2/books/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "books_assigned_to_reader": [transaction_json(4)]
            })))
            .mount(&server)
            .await;

        let client = api_client(&server).await;
        let reader = client.fetch_reader(2).await.unwrap();
        assert_eq!(reader.assigned_room, Some(2));
        let held = client.fetch_reader_books(2).await.unwrap();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].id, 4);
    }

    #[tokio::test]
    async fn test_create_reader_sends_dates_as_iso() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/readers/"))
            .and(body_json(json!({"ticket_number": "R-1", "full_name": "Anna", "passport_number": "4000",
                                  "birth_date": "2001-02-03", "address": "Nevsky 1", "phone_number": "+7",
                                  "education_level": "higher", "has_academic_degree": true,
                                  "assigned_room": 2, "registration_date": "2024-09-01"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(reader_json(9)))
            .expect(1)
            .mount(&server)
            .await;

        let reader = NewReader {
            ticket_number: "R-1".to_string(),
            full_name: "Anna".to_string(),
            passport_number: "4000".to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
            address: "Nevsky 1".to_string(),
            phone_number: "+7".to_string(),
            education_level: "higher".to_string(),
            has_academic_degree: true,
            assigned_room: Some(2),
            registration_date: chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        };
        let created = api_client(&server).await.create_reader(&reader).await.unwrap();
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn test_reading_room_create_and_readers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reading_rooms/"))
            .and(body_json(json!({"number": 3, "name": "Hall", "capacity": 40})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 3, "number": 3, "name": "Hall", "capacity": 40
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/reading_rooms/3/readers/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "room": "Hall", "readers": [reader_json(2)]
            })))
            .mount(&server)
            .await;

        let client = api_client(&server).await;
        let room = client
            .create_reading_room(&NewReadingRoom {
                number: 3,
                name: "Hall".to_string(),
                capacity: 40,
            })
            .await
            .unwrap();
        assert_eq!(room.label(), "Hall (#3)");

        let in_room = client.fetch_room_readers(3).await.unwrap();
        assert_eq!(in_room.room, "Hall");
        assert_eq!(in_room.readers.len(), 1);
    }

    #[tokio::test]
    async fn test_create_transaction_and_mark_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/book_transactions/"))
            .and(body_json(json!({"book": 1, "reader": 2, "transaction_date": "2025-03-01",
                                  "transaction_type": "Выдача", "due_date": "2025-03-15"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(transaction_json(6)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/book_transactions/6/return/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": "Book 'T' marked as returned."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = api_client(&server).await;
        let created = client
            .create_transaction(&NewTransaction {
                book: 1,
                reader: 2,
                transaction_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                transaction_type: crate::models::ISSUE_TRANSACTION.to_string(),
                due_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 15),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 6);

        let response = client.mark_returned(6).await.unwrap();
        assert!(response["success"].as_str().unwrap().contains("returned"));
    }

    #[tokio::test]
    async fn test_reader_statistics_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reports/"))
            .and(query_param("report_type", "reader_statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "readers_under_20": 4, "education_statistics": {"higher": 50.0, "secondary": 50.0}
            })))
            .mount(&server)
            .await;

        let stats = api_client(&server).await.fetch_reader_statistics().await.unwrap();
        assert_eq!(stats.readers_under_20, 4);
        assert_eq!(stats.education_statistics.len(), 2);
    }
}
