pub mod auth_service;
pub mod bot_service;
pub mod dashboard_service;
pub mod detail_service;
pub mod list_service;
pub mod scope;
