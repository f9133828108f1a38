//! Investment bots and their fixed price tiers

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{
    require, Editable, Resource, StatusValue, Statused, Validate, ValidationError,
};
use crate::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Active,
    Inactive,
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotStatus::Active => write!(f, "active"),
            BotStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for BotStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BotStatus::parse_choice("status", s)
    }
}

impl StatusValue for BotStatus {
    fn choices() -> &'static [Self] {
        &[BotStatus::Active, BotStatus::Inactive]
    }
}

/// Return profile derived from a bot's price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnTerms {
    pub daily_return_percent: f64,
    pub duration_days: u32,
    pub max_return_percent: f64,
}

/// Price options offered when creating a bot
pub const PRICE_TIERS: [(&str, ReturnTerms); 5] = [
    ("50", ReturnTerms { daily_return_percent: 1.0, duration_days: 30, max_return_percent: 130.0 }),
    ("100", ReturnTerms { daily_return_percent: 1.25, duration_days: 30, max_return_percent: 135.0 }),
    ("200", ReturnTerms { daily_return_percent: 1.5, duration_days: 30, max_return_percent: 145.0 }),
    ("500", ReturnTerms { daily_return_percent: 2.0, duration_days: 30, max_return_percent: 160.0 }),
    ("1000", ReturnTerms { daily_return_percent: 3.0, duration_days: 30, max_return_percent: 190.0 }),
];

/// Look up the return terms for a price option, exactly as selected
pub fn terms_for_price(price: &str) -> Option<ReturnTerms> {
    PRICE_TIERS
        .iter()
        .find(|(tier, _)| *tier == price)
        .map(|(_, terms)| *terms)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub daily_return_percent: f64,
    #[serde(default)]
    pub duration_days: u32,
    #[serde(default)]
    pub max_return_percent: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for Bot {
    const LABEL: &'static str = "bot";
    const COLLECTION_PATH: &'static str = "/admin/all-bots";
    const COLLECTION_KEY: &'static str = "bots";
    const RECORD_PATH: &'static str = "/admin/bot";
    const RECORD_KEY: &'static str = "bot";
    const DELETE_PATH: &'static str = "/admin/bot/delete";

    fn id(&self) -> &str {
        &self.id
    }

    /// Name, status and price joined, so one query may span them
    fn search_fields(&self) -> Vec<String> {
        vec![format!("{} {} {}", self.name, self.status, self.price)]
    }

    fn list_route() -> Route {
        Route::Bots
    }
}

impl Editable for Bot {
    type Changes = BotChanges;
    const UPDATE_PATH: &'static str = "/admin/bot/update";
}

impl Statused for Bot {
    type Status = BotStatus;
    const STATUS_PATH: &'static str = "/admin/bot/toggle-status";
}

/// Body of PATCH /admin/bot/update/:id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BotChanges {
    pub name: String,
    pub description: String,
}

impl BotChanges {
    pub fn from_bot(bot: &Bot) -> Self {
        Self {
            name: bot.name.clone(),
            description: bot.description.clone(),
        }
    }
}

impl Validate for BotChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("description", &self.description)
    }
}

/// Body of POST /admin/bot/create
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBot {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub daily_return_percent: f64,
    pub duration_days: u32,
    pub max_return_percent: f64,
}
