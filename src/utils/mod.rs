pub mod color;
pub mod encryption;
pub mod errors;
pub mod format;
pub mod page;
pub mod table;

pub use color::{color_for, Category};
pub use encryption::{CryptoError, SessionCipher};
pub use errors::extract_api_message;
pub use format::{format_date, format_money, initials, truncate, yes_no};
pub use page::Pager;
pub use table::Table;
