use tracing::info;

use super::detail_service::ControllerError;
use crate::api::admin::{message_of, AdminApi, Transport};
use crate::models::{require, terms_for_price, NewBot, ReturnTerms, ValidationError};
use crate::router::Route;

/// The create-bot form
///
/// Return terms are never typed in; they follow from the selected price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BotDraft {
    pub name: String,
    pub description: String,
    price: String,
    terms: Option<ReturnTerms>,
}

impl BotDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn terms(&self) -> Option<ReturnTerms> {
        self.terms
    }

    /// Select a price; an unknown price clears the derived terms
    pub fn set_price(&mut self, price: &str) {
        self.price = price.trim().to_string();
        self.terms = terms_for_price(&self.price);
    }

    fn to_request(&self) -> Result<NewBot, ValidationError> {
        require("name", &self.name)?;
        require("price", &self.price)?;
        let terms = self.terms.ok_or_else(|| ValidationError::NotOneOf {
            field: "price",
            value: self.price.clone(),
            expected: crate::models::PRICE_TIERS
                .iter()
                .map(|(price, _)| *price)
                .collect::<Vec<_>>()
                .join(", "),
        })?;
        let price = self
            .price
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidAmount(self.price.clone()))?;

        Ok(NewBot {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            daily_return_percent: terms.daily_return_percent,
            duration_days: terms.duration_days,
            max_return_percent: terms.max_return_percent,
        })
    }

    /// POST the bot; on success the caller navigates to the returned route
    pub async fn submit<T: Transport>(&self, api: &AdminApi<T>) -> Result<(String, Route), ControllerError> {
        let request = self.to_request()?;
        let response = api.post("/admin/bot/create", &request).await?;
        info!("Created bot {} at ${}", request.name, request.price);

        let notice = message_of(&response).unwrap_or_else(|| "Bot created successfully".to_string());
        Ok((notice, Route::Bots))
    }
}
