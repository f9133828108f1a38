//! Text rendering of each console view

use crate::api::Transport;
use crate::models::{
    Bot, BotStatus, Resource, Role, StatusValue, Transaction, TransactionStatus, User, PRICE_TIERS,
};
use crate::router::Route;
use crate::services::bot_service::BotDraft;
use crate::services::dashboard_service::Summary;
use crate::services::detail_service::{capitalize, DetailController, DetailState};
use crate::services::list_service::PageView;
use crate::utils::{
    color_for, format_date, format_money, initials, truncate, yes_no, Category, Table,
};

/// A record shown as one table row in its list view
pub trait Row: Resource {
    const HEADERS: &'static [&'static str];
    /// Plural noun for the page summary
    const NOUN: &'static str;

    fn cells(&self) -> Vec<String>;
    fn detail_route(id: &str) -> Route;
}

/// A record shown as a labelled card in its detail view
pub trait Detail: Resource {
    fn heading(&self) -> String;
    fn fields(&self) -> Vec<(&'static str, String)>;
    /// Commands available on the detail page
    fn actions() -> String;
}

fn badge(category: Category, value: &str) -> String {
    let text = if value.is_empty() { "unknown" } else { value };
    color_for(category, value).badge(text)
}

impl Row for User {
    const HEADERS: &'static [&'static str] =
        &["#", "Name", "Username", "Email", "Role", "Verified", "Balance"];
    const NOUN: &'static str = "users";

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.user_name.clone(),
            self.email.clone(),
            self.role.clone(),
            yes_no(self.is_verified).to_string(),
            format_money(self.balance),
        ]
    }

    fn detail_route(id: &str) -> Route {
        Route::User(id.to_string())
    }
}

impl Row for Transaction {
    const HEADERS: &'static [&'static str] = &["#", "User", "Type", "Amount", "Status", "Date"];
    const NOUN: &'static str = "transactions";

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_email().to_string(),
            badge(Category::TransactionType, &self.kind),
            format_money(self.amount),
            badge(Category::TransactionStatus, &self.status),
            format_date(self.created_at),
        ]
    }

    fn detail_route(id: &str) -> Route {
        Route::Transaction(id.to_string())
    }
}

impl Row for Bot {
    const HEADERS: &'static [&'static str] = &["#", "Name", "Description", "Price", "Status"];
    const NOUN: &'static str = "bots";

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            truncate(&self.description, 25),
            format_money(self.price),
            badge(Category::BotStatus, &self.status),
        ]
    }

    fn detail_route(id: &str) -> Route {
        Route::Bot(id.to_string())
    }
}

impl Detail for User {
    fn heading(&self) -> String {
        format!("[{}] {}", initials(&self.full_name), self.full_name)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let country = match (&self.country_flag, &self.country) {
            (Some(flag), Some(country)) => format!("{} {}", flag, country),
            (None, Some(country)) => country.clone(),
            _ => "N/A".to_string(),
        };
        vec![
            ("Picture", self.avatar().unwrap_or("None").to_string()),
            ("Username", self.user_name.clone()),
            ("Email", self.email.clone()),
            ("Phone", self.phone_number.clone().unwrap_or_else(|| "N/A".into())),
            ("Country", country),
            ("Role", self.role.clone()),
            ("Verified", yes_no(self.is_verified).to_string()),
            ("Balance", format_money(self.balance)),
            ("Joined", format_date(self.created_at)),
        ]
    }

    fn actions() -> String {
        format!(
            "update fullName=\"...\" phone=... role={}   |   fund <amount>   |   delete confirm",
            Role::describe_choices().replace(", ", "|")
        )
    }
}

impl Detail for Transaction {
    fn heading(&self) -> String {
        format!("Transaction {}", self.id)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let proof = if self.proof.is_empty() {
            "None".to_string()
        } else {
            self.proof.join("\n           ")
        };
        vec![
            ("User", self.owner()),
            ("Amount", format_money(self.amount)),
            ("Type", badge(Category::TransactionType, &self.kind)),
            ("Status", badge(Category::TransactionStatus, &self.status)),
            ("Mode", self.mode.clone().unwrap_or_else(|| "N/A".into())),
            ("Proof", proof),
            ("Date", format_date(self.created_at)),
        ]
    }

    fn actions() -> String {
        format!(
            "status <{}>   |   delete confirm",
            TransactionStatus::describe_choices().replace(", ", "|")
        )
    }
}

impl Detail for Bot {
    fn heading(&self) -> String {
        format!("Bot {}", self.name)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Description", self.description.clone()),
            ("Price", format_money(self.price)),
            ("Daily return", format!("{}%", self.daily_return_percent)),
            ("Duration", format!("{} days", self.duration_days)),
            ("Max return", format!("{}%", self.max_return_percent)),
            ("Status", badge(Category::BotStatus, &self.status)),
            ("Created", format_date(self.created_at)),
        ]
    }

    fn actions() -> String {
        format!(
            "update name=\"...\" description=\"...\"   |   status <{}>   |   delete confirm",
            BotStatus::describe_choices().replace(", ", "|")
        )
    }
}

pub fn title(route: &Route) -> &'static str {
    match route {
        Route::Users => "Users",
        Route::Transactions => "All Transactions",
        Route::Deposits => "Deposits",
        Route::Investments => "Investments",
        Route::Withdrawals => "Withdrawals",
        Route::Bots => "Bots",
        _ => "",
    }
}

pub fn list<R: Row>(title: &str, view: &PageView<'_, R>, search: &str) -> String {
    let mut output = format!("== {} ==\n", title);
    if !search.is_empty() {
        output.push_str(&format!("Search: \"{}\"\n", search));
    }

    if view.items.is_empty() {
        output.push_str(&format!("No {} found.", R::NOUN));
        return output;
    }

    let mut table = Table::new(R::HEADERS);
    for (i, item) in view.items.iter().enumerate() {
        let mut row = vec![(view.offset() + i + 1).to_string()];
        row.extend(item.cells());
        table.add_row(row);
    }
    output.push_str(&table.render());
    output.push_str(&format!(
        "\n{} (page {} of {})",
        view.pager.summary(R::NOUN),
        view.page(),
        view.total_pages()
    ));
    output
}

pub fn detail<R: Detail, T: Transport>(controller: &DetailController<R, T>) -> String {
    let state = controller.state();
    let record = match &*state {
        DetailState::Loading => return "Loading...".to_string(),
        DetailState::Absent => {
            return format!("{} not found. Type `back` to return.", capitalize(R::LABEL))
        }
        DetailState::Loaded(record) => record,
    };

    let width = record
        .fields()
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    let mut output = format!("== {} ==\n", record.heading());
    for (label, value) in record.fields() {
        output.push_str(&format!("{:<width$} : {}\n", label, value, width = width));
    }
    if let Some(kind) = controller.pending() {
        output.push_str(&format!("⏳ {} in progress...\n", kind));
    }
    output.push_str(&format!("Actions: {}", R::actions()));
    output
}

pub fn dashboard(summary: &Summary) -> String {
    let mut table = Table::new(&["Overview", "Count"]);
    for (label, count) in [
        ("Users", summary.users),
        ("Transactions", summary.transactions),
        ("Deposits", summary.deposits),
        ("Investments", summary.investments),
        ("Withdrawals", summary.withdrawals),
        ("Bots", summary.bots),
    ] {
        table.add_row(vec![label.to_string(), count.to_string()]);
    }

    format!(
        "== Dashboard ==\n{}\n{}",
        table.render(),
        summary.generated_at.format("%A, %-d %B %Y %H:%M")
    )
}

pub fn create_bot(draft: &BotDraft) -> String {
    let or_unset = |value: &str| {
        if value.trim().is_empty() {
            "(not set)".to_string()
        } else {
            value.to_string()
        }
    };

    let mut output = String::from("== Create Bot ==\n");
    output.push_str(&format!("Name        : {}\n", or_unset(&draft.name)));
    output.push_str(&format!("Description : {}\n", or_unset(&draft.description)));
    output.push_str(&format!("Price       : {}\n", or_unset(draft.price())));
    match draft.terms() {
        Some(terms) => output.push_str(&format!(
            "Returns     : {}% daily for {} days, up to {}%\n",
            terms.daily_return_percent, terms.duration_days, terms.max_return_percent
        )),
        None => output.push_str("Returns     : select a price to derive the terms\n"),
    }

    let mut tiers = Table::new(&["Price", "Daily %", "Days", "Max %"]);
    for (price, terms) in PRICE_TIERS.iter() {
        tiers.add_row(vec![
            format!("${}", price),
            terms.daily_return_percent.to_string(),
            terms.duration_days.to_string(),
            terms.max_return_percent.to_string(),
        ]);
    }
    output.push_str(&tiers.render());
    output.push_str("\nSet fields with `name <text>`, `desc <text>`, `price <amount>`, then `submit`.");
    output
}

pub fn login() -> String {
    "== Trove Admin ==\nSign in with `login <email> <password>`.".to_string()
}

pub fn not_found(path: &str) -> String {
    format!("404: nothing at {}. Try `open /dashboard`.", path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Pager;
    use serde_json::json;

    fn bot(name: &str, description: &str) -> Bot {
        serde_json::from_value(json!({
            "_id": name, "name": name, "description": description,
            "price": 1000, "status": "active"
        }))
        .unwrap()
    }

    #[test]
    fn test_list_numbers_rows_from_offset() {
        let bots = vec![bot("Alpha", "A very long description of a bot"), bot("Beta", "short")];
        let mut pager = Pager::with_page_size(12, 10);
        pager.go_to(2);
        let view = PageView {
            items: bots.iter().collect(),
            pager,
        };

        let rendered = list("Bots", &view, "");

        assert!(rendered.contains("11 | Alpha"));
        assert!(rendered.contains("A very long description o..."));
        assert!(rendered.contains("$1,000.00"));
        assert!(rendered.ends_with("Showing 11-12 of 12 bots (page 2 of 2)"));
    }

    #[test]
    fn test_empty_list_message() {
        let view: PageView<'_, Bot> = PageView {
            items: Vec::new(),
            pager: Pager::new(0),
        };
        assert_eq!(list("Bots", &view, "zeta"), "== Bots ==\nSearch: \"zeta\"\nNo bots found.");
    }

    #[test]
    fn test_create_bot_form_shows_derived_terms() {
        let mut draft = BotDraft::new();
        assert!(create_bot(&draft).contains("select a price"));

        draft.set_price("200");
        assert!(create_bot(&draft).contains("1.5% daily for 30 days, up to 145%"));
    }
}
