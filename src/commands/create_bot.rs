use super::{Console, View};
use crate::api::Transport;
use crate::services::bot_service::BotDraft;

fn draft<T>(console: &mut Console<T>) -> Result<&mut BotDraft, String> {
    match &mut console.view {
        View::CreateBot(draft) => Ok(draft),
        _ => Err("Open /create-bot first".to_string()),
    }
}

pub fn name<T: Transport>(console: &mut Console<T>, text: &str) -> Result<String, String> {
    draft(console)?.name = text.trim().to_string();
    Ok(console.render())
}

pub fn description<T: Transport>(console: &mut Console<T>, text: &str) -> Result<String, String> {
    draft(console)?.description = text.trim().to_string();
    Ok(console.render())
}

pub fn price<T: Transport>(console: &mut Console<T>, text: &str) -> Result<String, String> {
    draft(console)?.set_price(text.trim().trim_start_matches('$'));
    Ok(console.render())
}

pub async fn submit<T: Transport>(console: &mut Console<T>) -> Result<String, String> {
    let form = draft(console)?.clone();
    let (notice, route) = form
        .submit(&console.api)
        .await
        .map_err(|e| e.to_string())?;

    let list = console.show(route, false).await;
    Ok(format!("✅ {}\n{}", notice, list))
}
