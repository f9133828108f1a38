use serde_json::Value;

/// Extract a readable message from an error response body
///
/// The admin API answers failures with `{"success": false, "message": "..."}`
/// (sometimes `error` instead of `message`). Anything else is returned as the
/// trimmed raw body:
/// `{"success":false,"message":"User not found"}` -> `User not found`
pub fn extract_api_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        let message = ["message", "error"]
            .iter()
            .filter_map(|key| json.get(key).and_then(Value::as_str))
            .map(str::trim)
            .find(|m| !m.is_empty());
        if let Some(message) = message {
            return message.to_string();
        }
    }

    trimmed.to_string()
}
