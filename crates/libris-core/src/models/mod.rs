//! Data models for library backend entities.
//!
//! - `UserProfile`, `Credentials`: account and session payloads
//! - `Book`, `LowStockEntry`: catalogue
//! - `Reader`, `ReadingRoom`: patrons and rooms
//! - `BookTransaction`: lending records
//! - Report types: `MonthlyReport`, `ReaderStatistics`, `ComplexReport`

pub mod book;
pub mod reader;
pub mod report;
pub mod room;
pub mod transaction;
pub mod user;

pub use book::{Book, BookPatch, Borrower, LowStockBook, LowStockEntry, NewBook};
pub use reader::{NewReader, Reader};
pub use report::{BookTotal, ComplexReport, ComplexReportKind, MonthlyReport, ReaderStatistics, RoomVisits};
pub use room::{NewReadingRoom, ReadingRoom, RoomReaders};
pub use transaction::{BookTransaction, NewTransaction, ISSUE_TRANSACTION};
pub use user::{Credentials, NewUser, PasswordChange, UserProfile};
