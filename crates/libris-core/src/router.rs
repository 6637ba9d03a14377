//! Route table and the navigation guard.
//!
//! Every navigation is checked against the persisted credential before the
//! destination is shown: `Login` and `Register` are always reachable,
//! everything else requires a credential and otherwise redirects to
//! `Login`.

use std::fmt;

use tracing::{debug, warn};

use crate::auth::storage::{stored_token, SharedStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Profile,
    ChangePassword,
    Books,
    Readers,
    ReadingRooms,
    MonthlyReports,
    Reports,
    Transactions,
    LowStockBooks,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Login,
        Route::Register,
        Route::Profile,
        Route::ChangePassword,
        Route::Books,
        Route::Readers,
        Route::ReadingRooms,
        Route::MonthlyReports,
        Route::Reports,
        Route::Transactions,
        Route::LowStockBooks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Profile => "Profile",
            Route::ChangePassword => "ChangePassword",
            Route::Books => "Books",
            Route::Readers => "Readers",
            Route::ReadingRooms => "ReadingRooms",
            Route::MonthlyReports => "MonthlyReports",
            Route::Reports => "Reports",
            Route::Transactions => "Transactions",
            Route::LowStockBooks => "LowStockBooks",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Profile => "/profile",
            Route::ChangePassword => "/change-password",
            Route::Books => "/books",
            Route::Readers => "/readers",
            Route::ReadingRooms => "/reading-rooms",
            Route::MonthlyReports => "/reports",
            Route::Reports => "/reports/complex",
            Route::Transactions => "/transactions",
            Route::LowStockBooks => "/low-stock-books",
        }
    }

    /// Match a path to its route. `/` redirects to `Books`; a trailing
    /// slash, query string or fragment is ignored.
    pub fn resolve(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Route::Books);
        }
        Route::ALL.iter().copied().find(|r| r.path() == trimmed)
    }

    pub fn from_name(name: &str) -> Option<Route> {
        Route::ALL.iter().copied().find(|r| r.name() == name)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Continue to the destination. `None` for a path with no route.
    Allow(Option<Route>),
    /// Original navigation cancelled in favour of this route.
    Redirect(Route),
}

/// The guard decision for a destination route name.
pub fn guard(target: Option<&str>, has_credential: bool) -> Navigation {
    let route = target.and_then(Route::from_name);
    match route {
        Some(Route::Login) | Some(Route::Register) => Navigation::Allow(route),
        _ if !has_credential => Navigation::Redirect(Route::Login),
        _ => Navigation::Allow(route),
    }
}

/// Resolves paths and applies the guard using the persisted credential.
pub struct Router {
    storage: SharedStorage,
}

impl Router {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        self.navigate_to(Route::resolve(path))
    }

    pub fn navigate_to(&self, route: Option<Route>) -> Navigation {
        let has_credential = match stored_token(self.storage.as_ref()) {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted credential, treating as logged out");
                false
            }
        };
        let outcome = guard(route.map(|r| r.name()), has_credential);
        debug!(target = ?route, has_credential, ?outcome, "Navigation");
        outcome
    }
}
