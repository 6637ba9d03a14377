//! Libris - a command line client for the library-management backend.
//!
//! Each subcommand is a navigation to one of the backend's views. The
//! navigation guard runs first, so every view except login and register
//! needs a stored session credential.

mod views;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use libris_core::api::ApiError;
use libris_core::auth::{FileStorage, KeyringStorage, SessionStore, SharedStorage};
use libris_core::config::{Config, StorageBackend};
use libris_core::models::{
    BookPatch, ComplexReportKind, Credentials, NewBook, NewReader, NewReadingRoom, NewTransaction,
    NewUser, PasswordChange, ISSUE_TRANSACTION,
};
use libris_core::{ApiClient, Navigation, Route, Router};

#[derive(Parser)]
#[command(name = "libris", version, about = "Library management from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long, env = "LIBRIS_USERNAME")]
        username: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Create an account
    Register {
        username: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Show the logged-in user's profile
    Whoami,
    /// Change the logged-in user's password
    ChangePassword,
    /// List or manage books
    Books {
        #[command(subcommand)]
        action: Option<BookAction>,
    },
    /// List or manage readers
    Readers {
        #[command(subcommand)]
        action: Option<ReaderAction>,
    },
    /// List or manage reading rooms
    Rooms {
        #[command(subcommand)]
        action: Option<RoomAction>,
    },
    /// List or record lending transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionAction>,
    },
    /// Books with two or fewer copies left
    LowStock,
    /// Issues older than a month that were never returned
    Overdue,
    /// Library reports
    Report {
        #[command(subcommand)]
        report: ReportCommand,
    },
    /// Navigate to a path, e.g. `/books` or `/reports/complex`
    Open { path: String },
}

#[derive(Subcommand)]
enum BookAction {
    /// Show one book
    Show { id: i64 },
    /// Add a book to the catalogue
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        authors: String,
        #[arg(long)]
        publisher: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        section: String,
        #[arg(long)]
        code: String,
    },
    /// Change fields of a book
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        authors: Option<String>,
        #[arg(long)]
        publisher: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        code: Option<String>,
        /// Mark the book as discarded
        #[arg(long)]
        discard: bool,
    },
    /// Delete a book
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ReaderAction {
    /// Show a reader and the books they hold
    Show { id: i64 },
    /// Register a reader
    Add {
        #[arg(long)]
        ticket: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        passport: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: NaiveDate,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        education: String,
        #[arg(long)]
        degree: bool,
        #[arg(long)]
        room: Option<i64>,
        /// YYYY-MM-DD; today when omitted
        #[arg(long)]
        registered: Option<NaiveDate>,
    },
    /// Delete a reader
    Delete { id: i64 },
    /// Assign a reader to a reading room
    AssignRoom { id: i64, room: i64 },
}

#[derive(Subcommand)]
enum RoomAction {
    /// Readers assigned to a room
    Readers { id: i64 },
    /// Add a reading room
    Add {
        #[arg(long)]
        number: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        capacity: i32,
    },
    /// Delete a reading room
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum TransactionAction {
    /// Lend a book to a reader, dated today
    Issue {
        #[arg(long)]
        book: i64,
        #[arg(long)]
        reader: i64,
        /// YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Mark a transaction's book as returned
    Return { id: i64 },
    /// Delete a transaction
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Room visits, book total and new readers
    Monthly {
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12; the whole year when omitted
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Readers under 20 and education shares
    Readers,
    /// Summary or reader statistics
    Complex {
        #[arg(long, value_enum, default_value_t = ReportKind::Summary)]
        kind: ReportKind,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    Summary,
    ReaderStatistics,
}

impl From<ReportKind> for ComplexReportKind {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Summary => ComplexReportKind::Summary,
            ReportKind::ReaderStatistics => ComplexReportKind::ReaderStatistics,
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Composition root: owns the session and everything that shares its storage.
struct App {
    config: Config,
    session: SessionStore,
    api: ApiClient,
    router: Router,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let storage = build_storage(&config)?;
        Self::with_storage(config, storage)
    }

    fn with_storage(config: Config, storage: SharedStorage) -> Result<Self> {
        let auth = ApiClient::new(&config.auth_base_url, storage.clone())?;
        let api = auth.with_base_url(&config.api_base_url);
        let session = SessionStore::new(auth)?;
        let router = Router::new(storage);
        Ok(Self {
            config,
            session,
            api,
            router,
        })
    }

    /// Load the profile for a persisted credential. A rejected credential is
    /// cleared by the session store; the app keeps going either way.
    async fn restore_session(&mut self) {
        if let Err(e) = self.session.fetch_current_user().await {
            warn!(error = %e, "Could not restore previous session");
        }
    }

    /// Run the guard for `route`, failing with a login hint on redirect.
    fn enter(&self, route: Route) -> Result<()> {
        match self.router.navigate_to(Some(route)) {
            Navigation::Allow(_) => Ok(()),
            Navigation::Redirect(to) => {
                bail!(
                    "{} requires a session; redirected to {}. Run `libris login` first.",
                    route,
                    to.path()
                )
            }
        }
    }

    async fn open(&mut self, path: &str) -> Result<()> {
        match self.router.navigate(path) {
            Navigation::Allow(Some(route)) => self.show(route).await,
            Navigation::Allow(None) => bail!("No page at {}", path),
            Navigation::Redirect(to) => {
                eprintln!("Not logged in; redirected to {}", to.path());
                self.show(to).await
            }
        }
    }

    async fn show(&mut self, route: Route) -> Result<()> {
        let year = chrono::Local::now().year();
        match route {
            Route::Login => self.login(self.config.last_username.clone()).await,
            Route::Register => {
                let username = prompt("Username")?;
                let email = prompt("Email (optional)")?;
                self.register(username, Some(email).filter(|e| !e.is_empty()))
                    .await
            }
            Route::Profile => self.whoami(),
            Route::ChangePassword => self.change_password().await,
            Route::Books => views::books(&self.api.fetch_books().await?),
            Route::Readers => views::readers(&self.api.fetch_readers().await?),
            Route::ReadingRooms => views::rooms(&self.api.fetch_reading_rooms().await?),
            Route::Transactions => views::transactions(&self.api.fetch_transactions().await?),
            Route::LowStockBooks => views::low_stock(&self.api.fetch_low_stock_books().await?),
            Route::MonthlyReports => {
                views::monthly_report(year, None, &self.api.fetch_monthly_report(year, None).await?)
            }
            Route::Reports => {
                let kind = ComplexReportKind::Summary;
                views::complex_report(kind, &self.api.fetch_complex_report(kind, year, None).await?)
            }
        }
    }

    async fn login(&mut self, username: Option<String>) -> Result<()> {
        self.enter(Route::Login)?;
        let username = match username {
            Some(u) if !u.is_empty() => u,
            _ => prompt("Username")?,
        };
        if username.is_empty() {
            bail!("Username is required");
        }
        let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
        if password.is_empty() {
            bail!("Password is required");
        }

        let credentials = Credentials::new(username.clone(), password);
        if let Err(e) = self.session.login(&credentials).await {
            let rejected = libris_core::api::is_unauthorized(&e)
                || e.chain()
                    .any(|c| matches!(c.downcast_ref::<ApiError>(), Some(ApiError::BadRequest(_))));
            if rejected {
                bail!("Invalid username or password");
            }
            return Err(e);
        }

        self.config.last_username = Some(username);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
        let name = self
            .session
            .current_user()
            .map(|u| u.display_name())
            .unwrap_or_default();
        println!("Logged in as {}", name);
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        println!("Logged out");
        Ok(())
    }

    async fn register(&mut self, username: String, email: Option<String>) -> Result<()> {
        self.enter(Route::Register)?;
        let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
        let confirm = rpassword::prompt_password("Repeat password: ").context("Failed to read password")?;
        if password != confirm {
            bail!("Passwords do not match");
        }
        let user = NewUser {
            username: username.clone(),
            password,
            email,
        };
        self.session.register(&user).await?;
        println!("Account {} created. Run `libris login` to sign in.", username);
        Ok(())
    }

    fn whoami(&self) -> Result<()> {
        self.enter(Route::Profile)?;
        match self.session.current_user() {
            Some(user) => views::profile(user),
            None => bail!("Session could not be restored. Run `libris login` again."),
        }
    }

    async fn change_password(&mut self) -> Result<()> {
        self.enter(Route::ChangePassword)?;
        let current_password =
            rpassword::prompt_password("Current password: ").context("Failed to read password")?;
        let new_password = rpassword::prompt_password("New password: ").context("Failed to read password")?;
        let change = PasswordChange {
            new_password,
            current_password,
        };
        self.session.change_password(&change).await?;
        println!("Password changed");
        Ok(())
    }

    async fn books(&self, action: Option<BookAction>) -> Result<()> {
        match action {
            None => views::books(&self.api.fetch_books().await?),
            Some(BookAction::Show { id }) => views::books(&[self.api.fetch_book(id).await?]),
            Some(BookAction::Add {
                title,
                authors,
                publisher,
                year,
                section,
                code,
            }) => {
                let book = NewBook {
                    title,
                    authors,
                    publisher,
                    publication_year: year,
                    section,
                    code,
                };
                views::books(&[self.api.create_book(&book).await?])
            }
            Some(BookAction::Update {
                id,
                title,
                authors,
                publisher,
                year,
                section,
                code,
                discard,
            }) => {
                let patch = BookPatch {
                    title,
                    authors,
                    publisher,
                    publication_year: year,
                    section,
                    code,
                    is_discarded: discard.then_some(true),
                };
                views::books(&[self.api.update_book(id, &patch).await?])
            }
            Some(BookAction::Delete { id }) => {
                self.api.delete_book(id).await?;
                println!("Book {} deleted", id);
                Ok(())
            }
        }
    }

    async fn readers(&self, action: Option<ReaderAction>) -> Result<()> {
        match action {
            None => views::readers(&self.api.fetch_readers().await?),
            Some(ReaderAction::Show { id }) => {
                views::readers(&[self.api.fetch_reader(id).await?])?;
                println!();
                views::transactions(&self.api.fetch_reader_books(id).await?)
            }
            Some(ReaderAction::Add {
                ticket,
                name,
                passport,
                birth_date,
                address,
                phone,
                education,
                degree,
                room,
                registered,
            }) => {
                let reader = NewReader {
                    ticket_number: ticket,
                    full_name: name,
                    passport_number: passport,
                    birth_date,
                    address,
                    phone_number: phone,
                    education_level: education,
                    has_academic_degree: degree,
                    assigned_room: room,
                    registration_date: registered.unwrap_or_else(|| chrono::Local::now().date_naive()),
                };
                views::readers(&[self.api.create_reader(&reader).await?])
            }
            Some(ReaderAction::Delete { id }) => {
                self.api.delete_reader(id).await?;
                println!("Reader {} deleted", id);
                Ok(())
            }
            Some(ReaderAction::AssignRoom { id, room }) => {
                views::message(&self.api.assign_room(id, room).await?)
            }
        }
    }

    async fn rooms(&self, action: Option<RoomAction>) -> Result<()> {
        match action {
            None => views::rooms(&self.api.fetch_reading_rooms().await?),
            Some(RoomAction::Readers { id }) => views::room_readers(&self.api.fetch_room_readers(id).await?),
            Some(RoomAction::Add {
                number,
                name,
                capacity,
            }) => {
                let room = NewReadingRoom {
                    number,
                    name,
                    capacity,
                };
                views::rooms(&[self.api.create_reading_room(&room).await?])
            }
            Some(RoomAction::Delete { id }) => {
                self.api.delete_reading_room(id).await?;
                println!("Reading room {} deleted", id);
                Ok(())
            }
        }
    }

    async fn transactions(&self, action: Option<TransactionAction>) -> Result<()> {
        match action {
            None => views::transactions(&self.api.fetch_transactions().await?),
            Some(TransactionAction::Issue { book, reader, due }) => {
                let transaction = NewTransaction {
                    book,
                    reader,
                    transaction_date: chrono::Local::now().date_naive(),
                    transaction_type: ISSUE_TRANSACTION.to_string(),
                    due_date: due,
                };
                views::transactions(&[self.api.create_transaction(&transaction).await?])
            }
            Some(TransactionAction::Return { id }) => views::message(&self.api.mark_returned(id).await?),
            Some(TransactionAction::Delete { id }) => {
                self.api.delete_transaction(id).await?;
                println!("Transaction {} deleted", id);
                Ok(())
            }
        }
    }

    async fn run(&mut self, command: Command) -> Result<()> {
        let year = chrono::Local::now().year();
        match command {
            Command::Login { username } => {
                let username = username.or_else(|| self.config.last_username.clone());
                self.login(username).await
            }
            Command::Logout => self.logout(),
            Command::Register { username, email } => self.register(username, email).await,
            Command::Whoami => self.whoami(),
            Command::ChangePassword => self.change_password().await,
            Command::Books { action } => {
                self.enter(Route::Books)?;
                self.books(action).await
            }
            Command::Readers { action } => {
                self.enter(Route::Readers)?;
                self.readers(action).await
            }
            Command::Rooms { action } => {
                self.enter(Route::ReadingRooms)?;
                self.rooms(action).await
            }
            Command::Transactions { action } => {
                self.enter(Route::Transactions)?;
                self.transactions(action).await
            }
            Command::LowStock => {
                self.enter(Route::LowStockBooks)?;
                views::low_stock(&self.api.fetch_low_stock_books().await?)
            }
            Command::Overdue => {
                self.enter(Route::Transactions)?;
                views::transactions(&self.api.fetch_overdue().await?)
            }
            Command::Report { report } => match report {
                ReportCommand::Monthly { year: y, month } => {
                    self.enter(Route::MonthlyReports)?;
                    let y = y.unwrap_or(year);
                    views::monthly_report(y, month, &self.api.fetch_monthly_report(y, month).await?)
                }
                ReportCommand::Readers => {
                    self.enter(Route::MonthlyReports)?;
                    views::reader_statistics(&self.api.fetch_reader_statistics().await?)
                }
                ReportCommand::Complex { kind, year: y, month } => {
                    self.enter(Route::Reports)?;
                    let kind = ComplexReportKind::from(kind);
                    let report = self
                        .api
                        .fetch_complex_report(kind, y.unwrap_or(year), month)
                        .await?;
                    views::complex_report(kind, &report)
                }
            },
            Command::Open { path } => self.open(&path).await,
        }
    }
}

fn build_storage(config: &Config) -> Result<SharedStorage> {
    Ok(match config.storage {
        StorageBackend::File => Arc::new(FileStorage::new(&config.data_dir()?)),
        StorageBackend::Keyring => Arc::new(KeyringStorage::new()),
    })
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    info!("Libris starting");

    let config = Config::load()?;
    let mut app = App::new(config)?;
    app.restore_session().await;

    app.run(cli.command).await
}
