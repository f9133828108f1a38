use super::Console;
use crate::api::Transport;
use crate::router::Route;
use crate::services::auth_service;

pub async fn login<T: Transport>(console: &mut Console<T>, args: &[&str]) -> Result<String, String> {
    if args.len() < 2 {
        return Err("Usage: login <email> <password>".to_string());
    }
    let (email, password) = (args[0], args[1..].join(" "));

    let session = auth_service::login(&console.api, email, &password)
        .await
        .map_err(|e| e.to_string())?;

    let who = session.user.full_name.unwrap_or_else(|| email.to_string());
    let dashboard = console.navigate(Route::Dashboard).await;
    console.history.clear();
    Ok(format!("✅ Welcome, {}\n{}", who, dashboard))
}

pub async fn logout<T: Transport>(console: &mut Console<T>) -> Result<String, String> {
    auth_service::logout(console.api.session().as_ref()).map_err(|e| e.to_string())?;
    let login = console.navigate(Route::Login).await;
    console.history.clear();
    Ok(format!("👋 Signed out\n{}", login))
}

pub fn whoami<T: Transport>(console: &Console<T>) -> Result<String, String> {
    match console.api.session().get() {
        Some(session) if !session.token.is_empty() => Ok(format!(
            "Signed in as {} ({})",
            session
                .user
                .email
                .or(session.user.full_name)
                .unwrap_or_else(|| "unknown".to_string()),
            session.user.role
        )),
        _ => Ok("Not signed in".to_string()),
    }
}
