//! Plain-text rendering of the library views.

use anyhow::Result;

use serde_json::Value;

use libris_core::models::{
    Book, BookTransaction, ComplexReport, ComplexReportKind, LowStockEntry, MonthlyReport, Reader,
    ReaderStatistics, ReadingRoom, RoomReaders, RoomVisits, UserProfile,
};
use libris_core::utils::{format_date, format_optional_date, format_percent, truncate_string};

const TITLE_WIDTH: usize = 40;
const NAME_WIDTH: usize = 30;

pub fn profile(user: &UserProfile) -> Result<()> {
    println!("{}", user.display_name());
    println!("{}", serde_json::to_string_pretty(user)?);
    Ok(())
}

pub fn books(books: &[Book]) -> Result<()> {
    if books.is_empty() {
        println!("No books");
        return Ok(());
    }
    println!("{:>5}  {:<12}  {:<40}  {:<24}  {:>4}  {}", "ID", "CODE", "TITLE", "AUTHORS", "YEAR", "STATUS");
    for book in books {
        println!(
            "{:>5}  {:<12}  {:<40}  {:<24}  {:>4}  {}",
            book.id,
            truncate_string(&book.code, 12),
            truncate_string(&book.title, TITLE_WIDTH),
            truncate_string(&book.authors, 24),
            book.publication_year,
            book.status_display(),
        );
    }
    Ok(())
}

pub fn readers(readers: &[Reader]) -> Result<()> {
    if readers.is_empty() {
        println!("No readers");
        return Ok(());
    }
    let today = chrono::Local::now().date_naive();
    println!("{:>5}  {:<10}  {:<30}  {:>3}  {:<14}  {}", "ID", "TICKET", "NAME", "AGE", "REGISTERED", "ROOM");
    for reader in readers {
        let room = reader
            .assigned_room
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<10}  {:<30}  {:>3}  {:<14}  {}",
            reader.id,
            truncate_string(&reader.ticket_number, 10),
            truncate_string(&reader.full_name, NAME_WIDTH),
            reader.age_on(today),
            format_date(reader.registration_date),
            room,
        );
    }
    Ok(())
}

pub fn rooms(rooms: &[ReadingRoom]) -> Result<()> {
    if rooms.is_empty() {
        println!("No reading rooms");
        return Ok(());
    }
    println!("{:>5}  {:<30}  {}", "ID", "ROOM", "CAPACITY");
    for room in rooms {
        println!("{:>5}  {:<30}  {}", room.id, truncate_string(&room.label(), NAME_WIDTH), room.capacity);
    }
    Ok(())
}

pub fn room_readers(room: &RoomReaders) -> Result<()> {
    println!("{}", room.room);
    readers(&room.readers)
}

/// Print the backend's `success`/`message` text, or the whole body.
pub fn message(body: &Value) -> Result<()> {
    match body.get("success").or_else(|| body.get("message")).and_then(Value::as_str) {
        Some(text) => println!("{}", text),
        None => println!("{}", serde_json::to_string_pretty(body)?),
    }
    Ok(())
}

pub fn transactions(transactions: &[BookTransaction]) -> Result<()> {
    if transactions.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    let today = chrono::Local::now().date_naive();
    println!(
        "{:>5}  {:>6}  {:>6}  {:<10}  {:<14}  {:<14}  {}",
        "ID", "BOOK", "READER", "TYPE", "DATE", "DUE", "STATE"
    );
    for t in transactions {
        let state = if t.returned {
            "returned"
        } else if t.is_overdue(today) {
            "OVERDUE"
        } else {
            "open"
        };
        println!(
            "{:>5}  {:>6}  {:>6}  {:<10}  {:<14}  {:<14}  {}",
            t.id,
            t.book,
            t.reader,
            truncate_string(&t.transaction_type, 10),
            format_date(t.transaction_date),
            format_optional_date(t.due_date, "-"),
            state,
        );
    }
    Ok(())
}

pub fn low_stock(entries: &[LowStockEntry]) -> Result<()> {
    if entries.is_empty() {
        println!("No books are running low");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{} [{}] - {}",
            entry.book.title, entry.book.current_code, entry.book.authors
        );
        for reader in &entry.readers {
            println!("    held by {} ({})", reader.full_name, reader.ticket_number);
        }
    }
    Ok(())
}

fn room_visits(rooms: &[RoomVisits]) {
    if rooms.is_empty() {
        println!("  no visits recorded");
    }
    for room in rooms {
        println!("  {:<30}  {:>6}", truncate_string(&room.room_name, NAME_WIDTH), room.count);
    }
}

pub fn monthly_report(year: i32, month: Option<u32>, report: &MonthlyReport) -> Result<()> {
    match month {
        Some(m) => println!("Report for {}-{:02}", year, m),
        None => println!("Report for {}", year),
    }
    println!("Total books: {}", report.total_books.total);
    println!("New readers: {}", report.new_readers);
    println!("Room visits:");
    room_visits(&report.room_data);
    Ok(())
}

pub fn complex_report(kind: ComplexReportKind, report: &ComplexReport) -> Result<()> {
    println!("Report: {}", kind);
    if let Some(total) = report.total_books {
        println!("Total books: {}", total);
    }
    if let Some(young) = report.readers_under_20 {
        println!("Readers under 20: {}", young);
    }
    if !report.education_statistics.is_empty() {
        println!("Education:");
        for (level, share) in &report.education_statistics {
            println!("  {:<30}  {:>8}", level, format_percent(*share));
        }
    }
    if kind == ComplexReportKind::Summary {
        println!("Room visits:");
        room_visits(&report.room_data);
    }
    Ok(())
}

pub fn reader_statistics(stats: &ReaderStatistics) -> Result<()> {
    println!("Readers under 20: {}", stats.readers_under_20);
    println!("Education:");
    for (level, share) in &stats.education_statistics {
        println!("  {:<30}  {:>8}", level, format_percent(*share));
    }
    Ok(())
}
