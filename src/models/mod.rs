//! Records served by the admin API and the request bodies sent back
//!
//! Server-side enumerations (roles, statuses, transaction types) are kept as
//! the strings the server sent; the typed enums describe what an operator is
//! allowed to submit.

pub mod bot;
pub mod resource;
pub mod session;
pub mod transaction;
pub mod user;

pub use bot::{terms_for_price, Bot, BotChanges, BotStatus, NewBot, ReturnTerms, PRICE_TIERS};
pub use resource::{require, Editable, Resource, StatusValue, Statused, Validate, ValidationError};
pub use session::{Session, SessionUser};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use user::{FundRequest, Role, User, UserChanges};
