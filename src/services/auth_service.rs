use thiserror::Error;
use tracing::{info, warn};

use crate::api::admin::{AdminApi, ApiError, LoginRequest, LoginResponse, Transport};
use crate::models::{require, Session, ValidationError};
use crate::session::{SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Access denied: this account is not an administrator")]
    NotAdmin,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Exchange credentials for an admin session and store it
pub async fn login<T: Transport>(
    api: &AdminApi<T>,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    require("email", email)?;
    require("password", password)?;

    let body = api
        .post_public(
            "/auth/login",
            &LoginRequest {
                email: email.trim(),
                password,
            },
        )
        .await?;
    let response: LoginResponse = serde_json::from_value(body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;

    if !response.user.is_admin() {
        warn!("Rejected login for non-admin account {}", email.trim());
        return Err(AuthError::NotAdmin);
    }

    let session = Session {
        token: response.token,
        user: response.user,
    };
    api.session().set(session.clone())?;
    info!("Signed in as {}", session.user.email.as_deref().unwrap_or(email.trim()));
    Ok(session)
}

pub fn logout(store: &dyn SessionStore) -> Result<(), AuthError> {
    store.clear()?;
    info!("Signed out");
    Ok(())
}
