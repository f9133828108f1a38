pub mod auth;
pub mod create_bot;
pub mod detail;
pub mod help;
pub mod list;
pub mod navigate;
pub mod render;

use tracing::{debug, warn};

use crate::api::{AdminApi, Transport};
use crate::models::{Bot, Transaction, User};
use crate::router::{Access, Route, RouteGuard};
use crate::services::bot_service::BotDraft;
use crate::services::dashboard_service::{self, Summary};
use crate::services::detail_service::{DetailController, MutationOutcome};
use crate::services::list_service::ListController;
use crate::services::scope::ViewScope;

use list::ListPane;

/// The page currently mounted in the console, owning its controller
pub enum View<T> {
    Login,
    Dashboard(Summary),
    Users(ListController<User, T>),
    /// All transactions, or one type of them depending on the route
    Transactions(ListController<Transaction, T>),
    Bots(ListController<Bot, T>),
    User(DetailController<User, T>),
    Transaction(DetailController<Transaction, T>),
    Bot(DetailController<Bot, T>),
    CreateBot(BotDraft),
    NotFound(String),
}

impl<T: Transport> View<T> {
    fn scope(&self) -> Option<ViewScope> {
        match self {
            View::Users(list) => Some(list.view_scope()),
            View::Transactions(list) => Some(list.view_scope()),
            View::Bots(list) => Some(list.view_scope()),
            View::User(detail) => Some(detail.view_scope()),
            View::Transaction(detail) => Some(detail.view_scope()),
            View::Bot(detail) => Some(detail.view_scope()),
            _ => None,
        }
    }

    fn list_pane(&mut self) -> Option<&mut dyn ListPane> {
        match self {
            View::Users(list) => Some(list),
            View::Transactions(list) => Some(list),
            View::Bots(list) => Some(list),
            _ => None,
        }
    }
}

/// Output of one console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

impl Reply {
    fn text(output: String) -> Self {
        Self { output, quit: false }
    }
}

/// Line-oriented admin console: one mounted view, a back stack, and the
/// route guard in front of every navigation
pub struct Console<T> {
    api: AdminApi<T>,
    guard: RouteGuard,
    route: Route,
    view: View<T>,
    history: Vec<Route>,
}

impl<T: Transport> Console<T> {
    pub fn new(api: AdminApi<T>) -> Self {
        let guard = RouteGuard::new(api.session().clone());
        Self {
            api,
            guard,
            route: Route::Login,
            view: View::Login,
            history: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// First screen: the dashboard for a restored session, otherwise login
    pub async fn start(&mut self) -> String {
        self.show(Route::Dashboard, false).await
    }

    pub fn prompt(&self) -> String {
        match self.api.session().get() {
            Some(session) if !session.token.is_empty() => {
                let who = session.user.email.unwrap_or_else(|| session.user.role.clone());
                format!("{} {}> ", who, self.route)
            }
            _ => format!("{}> ", self.route),
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::text(String::new());
        }

        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();
        debug!("Command `{}` on {}", command, self.route);

        let result = match command {
            "help" | "?" => help::execute(),
            "quit" | "exit" => {
                return Reply {
                    output: "Goodbye".to_string(),
                    quit: true,
                }
            }
            "login" => auth::login(self, &args).await,
            "logout" => auth::logout(self).await,
            "whoami" => auth::whoami(self),
            "open" | "go" => navigate::open(self, &args).await,
            "back" => navigate::back(self).await,
            "refresh" | "r" => navigate::refresh(self).await,
            "search" | "/" => list::search(self, rest),
            "page" => list::page(self, &args),
            "next" | "n" => list::next(self),
            "prev" | "p" => list::previous(self),
            "first" => list::first(self),
            "last" => list::last(self),
            "view" | "v" => list::view(self, &args).await,
            "update" | "edit" => detail::update(self, rest).await,
            "status" => detail::status(self, rest).await,
            "fund" => detail::fund(self, rest).await,
            "delete" | "rm" => detail::delete(self, &args).await,
            "name" => create_bot::name(self, rest),
            "desc" | "description" => create_bot::description(self, rest),
            "price" => create_bot::price(self, rest),
            "submit" => create_bot::submit(self).await,
            _ => Err(format!(
                "Unknown command `{}`. Type `help` for a list of commands.",
                command
            )),
        };

        match result {
            Ok(output) => Reply::text(output),
            Err(e) => {
                warn!("Command `{}` failed: {}", command, e);
                Reply::text(format!("❌ {}", e))
            }
        }
    }

    /// Navigate and remember where we came from
    async fn navigate(&mut self, route: Route) -> String {
        self.show(route, true).await
    }

    /// Mount `route` behind the guard and render it
    ///
    /// The previous view's scope is unmounted first so any response still
    /// addressed to it is dropped.
    async fn show(&mut self, route: Route, remember: bool) -> String {
        let (route, notice) = match self.guard.check(route) {
            Access::Granted(route) => (route, None),
            Access::Redirect(route) => (route, Some("🔒 Please sign in first")),
        };

        if let Some(scope) = self.view.scope() {
            scope.unmount();
        }
        self.view = self.mount(&route).await;

        let previous = std::mem::replace(&mut self.route, route);
        if remember && previous != self.route {
            self.history.push(previous);
        }

        match notice {
            Some(notice) => format!("{}\n{}", notice, self.render()),
            None => self.render(),
        }
    }

    async fn mount(&self, route: &Route) -> View<T> {
        let api = self.api.clone();
        match route {
            Route::Login => View::Login,
            Route::Dashboard => View::Dashboard(dashboard_service::get_summary(&api).await),
            Route::Users => {
                let mut list = ListController::<User, T>::for_resource(api);
                list.load().await;
                View::Users(list)
            }
            Route::Transactions | Route::Deposits | Route::Investments | Route::Withdrawals => {
                let mut list = ListController::<Transaction, T>::for_resource(api);
                if let Some(kind) = route.transaction_scope() {
                    list = list.with_filter(move |tx: &Transaction| tx.is_kind(kind));
                }
                list.load().await;
                View::Transactions(list)
            }
            Route::Bots => {
                let mut list = ListController::<Bot, T>::for_resource(api);
                list.load().await;
                View::Bots(list)
            }
            Route::User(id) => {
                let detail = DetailController::<User, T>::new(api, id);
                detail.load().await;
                View::User(detail)
            }
            Route::Transaction(id) => {
                let detail = DetailController::<Transaction, T>::new(api, id);
                detail.load().await;
                View::Transaction(detail)
            }
            Route::Bot(id) => {
                let detail = DetailController::<Bot, T>::new(api, id);
                detail.load().await;
                View::Bot(detail)
            }
            Route::CreateBot => View::CreateBot(BotDraft::new()),
            Route::NotFound(path) => View::NotFound(path.clone()),
        }
    }

    fn render(&self) -> String {
        match &self.view {
            View::Login => render::login(),
            View::Dashboard(summary) => render::dashboard(summary),
            View::Users(list) => list.render(render::title(&self.route)),
            View::Transactions(list) => list.render(render::title(&self.route)),
            View::Bots(list) => list.render(render::title(&self.route)),
            View::User(detail) => render::detail(detail),
            View::Transaction(detail) => render::detail(detail),
            View::Bot(detail) => render::detail(detail),
            View::CreateBot(draft) => render::create_bot(draft),
            View::NotFound(path) => render::not_found(path),
        }
    }

    /// Show the mutation notice with the refreshed record, or follow a redirect
    async fn apply_outcome(&mut self, outcome: MutationOutcome) -> String {
        match outcome {
            MutationOutcome::Refreshed { notice } => format!("✅ {}\n{}", notice, self.render()),
            MutationOutcome::Removed { notice, redirect } => {
                let list = self.show(redirect, false).await;
                format!("✅ {}\n{}", notice, list)
            }
        }
    }
}
