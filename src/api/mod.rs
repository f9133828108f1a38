pub mod admin;

pub use admin::{AdminApi, ApiError, HttpTransport, Transport};
