use super::Console;
use crate::api::Transport;
use crate::router::Route;

pub async fn open<T: Transport>(console: &mut Console<T>, args: &[&str]) -> Result<String, String> {
    let path = args.first().ok_or_else(|| "Usage: open <path>".to_string())?;
    Ok(console.navigate(Route::parse(path)).await)
}

pub async fn back<T: Transport>(console: &mut Console<T>) -> Result<String, String> {
    let previous = console
        .history
        .pop()
        .ok_or_else(|| "Nothing to go back to".to_string())?;
    Ok(console.show(previous, false).await)
}

/// Rebuild the current view from the server
pub async fn refresh<T: Transport>(console: &mut Console<T>) -> Result<String, String> {
    let current = console.route.clone();
    Ok(console.show(current, false).await)
}
