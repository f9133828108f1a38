//! Console routes and the guard in front of the protected ones

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::models::TransactionKind;
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Users,
    User(String),
    Transactions,
    Transaction(String),
    Deposits,
    Investments,
    Withdrawals,
    Bots,
    Bot(String),
    CreateBot,
    NotFound(String),
}

impl Route {
    /// Parse a console path such as `/user/65f0c2`
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Login,
            ["dashboard"] => Route::Dashboard,
            ["users"] => Route::Users,
            ["user", id] => Route::User(id.to_string()),
            ["transactions"] => Route::Transactions,
            ["transaction", id] => Route::Transaction(id.to_string()),
            ["deposits"] => Route::Deposits,
            ["investments"] => Route::Investments,
            ["withdrawals"] => Route::Withdrawals,
            ["bots"] => Route::Bots,
            ["bot", id] => Route::Bot(id.to_string()),
            ["create-bot"] => Route::CreateBot,
            _ => Route::NotFound(path.trim().to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Users => "/users".to_string(),
            Route::User(id) => format!("/user/{}", id),
            Route::Transactions => "/transactions".to_string(),
            Route::Transaction(id) => format!("/transaction/{}", id),
            Route::Deposits => "/deposits".to_string(),
            Route::Investments => "/investments".to_string(),
            Route::Withdrawals => "/withdrawals".to_string(),
            Route::Bots => "/bots".to_string(),
            Route::Bot(id) => format!("/bot/{}", id),
            Route::CreateBot => "/create-bot".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Everything except the login and not-found views needs a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::NotFound(_))
    }

    /// Transaction list views scoped to one type
    pub fn transaction_scope(&self) -> Option<TransactionKind> {
        match self {
            Route::Deposits => Some(TransactionKind::Deposit),
            Route::Investments => Some(TransactionKind::Investment),
            Route::Withdrawals => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted(Route),
    /// Render this route instead; nothing was requested for the original one
    Redirect(Route),
}

/// Gates protected routes on the presence of a session token
///
/// Token expiry is not checked here; the server answers 401 for stale tokens.
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<dyn SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }

    pub fn state(&self) -> AuthState {
        if self.session.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    pub fn check(&self, route: Route) -> Access {
        if route.is_protected() && self.state() == AuthState::Unauthenticated {
            debug!("No session, redirecting {} to login", route);
            return Access::Redirect(Route::Login);
        }
        Access::Granted(route)
    }
}
