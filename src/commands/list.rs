use super::render::{self, Row};
use super::Console;
use crate::api::Transport;
use crate::router::Route;
use crate::services::list_service::ListController;

/// What the console needs from any list view, whatever its record type
pub trait ListPane {
    fn set_search(&mut self, text: &str);
    fn go_to(&mut self, page: usize);
    fn next(&mut self);
    fn previous(&mut self);
    fn first(&mut self);
    fn last(&mut self);
    /// Detail route of the `row`th filtered record, counting from 1
    fn route_at(&self, row: usize) -> Option<Route>;
    fn render(&self, title: &str) -> String;
}

impl<R: Row, T: Transport> ListPane for ListController<R, T> {
    fn set_search(&mut self, text: &str) {
        ListController::set_search(self, text);
    }

    fn go_to(&mut self, page: usize) {
        self.page(page);
    }

    fn next(&mut self) {
        ListController::next(self);
    }

    fn previous(&mut self) {
        ListController::previous(self);
    }

    fn first(&mut self) {
        ListController::first(self);
    }

    fn last(&mut self) {
        ListController::last(self);
    }

    fn route_at(&self, row: usize) -> Option<Route> {
        let filtered = self.filtered();
        let record = filtered.get(row.checked_sub(1)?)?;
        Some(R::detail_route(record.id()))
    }

    fn render(&self, title: &str) -> String {
        if !self.is_loaded() {
            return format!(
                "== {} ==\nCould not load {}. Type `refresh` to try again.",
                title,
                R::NOUN
            );
        }
        render::list(title, &self.view(), self.search())
    }
}

fn on_list<T: Transport>(
    console: &mut Console<T>,
    action: impl FnOnce(&mut dyn ListPane),
) -> Result<String, String> {
    let pane = console
        .view
        .list_pane()
        .ok_or_else(|| "This command only works on a list page (users, transactions, bots)".to_string())?;
    action(pane);
    Ok(console.render())
}

pub fn search<T: Transport>(console: &mut Console<T>, text: &str) -> Result<String, String> {
    on_list(console, |pane| pane.set_search(text.trim()))
}

pub fn page<T: Transport>(console: &mut Console<T>, args: &[&str]) -> Result<String, String> {
    let n = args
        .first()
        .and_then(|arg| arg.parse::<usize>().ok())
        .ok_or_else(|| "Usage: page <number>".to_string())?;
    on_list(console, |pane| pane.go_to(n))
}

pub fn next<T: Transport>(console: &mut Console<T>) -> Result<String, String> {
    on_list(console, |pane| pane.next())
}

pub fn previous<T: Transport>(console: &mut Console<T>) -> Result<String, String> {
    on_list(console, |pane| pane.previous())
}

pub fn first<T: Transport>(console: &mut Console<T>) -> Result<String, String> {
    on_list(console, |pane| pane.first())
}

pub fn last<T: Transport>(console: &mut Console<T>) -> Result<String, String> {
    on_list(console, |pane| pane.last())
}

/// Open the detail page for a row number shown in the `#` column
pub async fn view<T: Transport>(console: &mut Console<T>, args: &[&str]) -> Result<String, String> {
    let row = args
        .first()
        .and_then(|arg| arg.parse::<usize>().ok())
        .ok_or_else(|| "Usage: view <row number>".to_string())?;

    let route = console
        .view
        .list_pane()
        .ok_or_else(|| "`view` works on a list page".to_string())?
        .route_at(row)
        .ok_or_else(|| format!("No row {} in this list", row))?;

    Ok(console.navigate(route).await)
}
