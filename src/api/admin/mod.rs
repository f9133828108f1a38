pub mod client;
pub mod models;

#[cfg(test)]
pub mod fake;

pub use client::{AdminApi, HttpTransport, Transport};
pub use models::{message_of, take_field, ApiError, LoginRequest, LoginResponse};
