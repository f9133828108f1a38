use super::{Console, View};
use crate::api::{ApiError, Transport};
use crate::models::{BotChanges, UserChanges};
use crate::services::detail_service::{ControllerError, MutationOutcome};

/// Split `key=value` pairs; double-quote a value to keep its spaces
pub fn parse_assignments(input: &str) -> Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let malformed = || format!("Expected key=value, got `{}`", rest);
        let (key, after) = rest.split_once('=').ok_or_else(malformed)?;
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(malformed());
        }

        let (value, remaining) = match after.strip_prefix('"') {
            Some(quoted) => {
                let end = quoted
                    .find('"')
                    .ok_or_else(|| format!("Unclosed quote after {}=", key))?;
                (&quoted[..end], &quoted[end + 1..])
            }
            None => match after.find(char::is_whitespace) {
                Some(end) => (&after[..end], &after[end..]),
                None => (after, ""),
            },
        };

        pairs.push((key.to_string(), value.to_string()));
        rest = remaining.trim_start();
    }

    Ok(pairs)
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "y" | "1" => Ok(true),
        "no" | "false" | "n" | "0" => Ok(false),
        _ => Err(format!("Expected yes or no, got `{}`", value)),
    }
}

fn describe(error: ControllerError) -> String {
    match error {
        ControllerError::Api(ApiError::Unauthorized(message)) => format!(
            "Session rejected by the server ({}). Use `login` to sign in again.",
            message
        ),
        other => other.to_string(),
    }
}

async fn finish<T: Transport>(
    console: &mut Console<T>,
    result: Result<MutationOutcome, ControllerError>,
) -> Result<String, String> {
    let outcome = result.map_err(describe)?;
    Ok(console.apply_outcome(outcome).await)
}

pub async fn update<T: Transport>(console: &mut Console<T>, input: &str) -> Result<String, String> {
    let pairs = parse_assignments(input)?;
    if pairs.is_empty() {
        return Err("Usage: update key=value [key=value ...]".to_string());
    }

    let result = match &console.view {
        View::User(detail) => {
            let user = detail
                .record()
                .ok_or_else(|| describe(ControllerError::NotLoaded("user")))?;
            let mut changes = UserChanges::from_user(&user);
            for (key, value) in pairs {
                match key.as_str() {
                    "fullName" | "name" => changes.full_name = value,
                    "phone" | "phoneNumber" => changes.phone_number = value,
                    "role" => changes.role = value.to_lowercase(),
                    "userName" | "username" => changes.user_name = Some(value),
                    "verified" | "isVerified" => changes.is_verified = Some(parse_flag(&value)?),
                    _ => {
                        return Err(format!(
                            "Unknown user field `{}` (fullName, phone, role, userName, verified)",
                            key
                        ))
                    }
                }
            }
            detail.update(&changes).await
        }
        View::Bot(detail) => {
            let bot = detail
                .record()
                .ok_or_else(|| describe(ControllerError::NotLoaded("bot")))?;
            let mut changes = BotChanges::from_bot(&bot);
            for (key, value) in pairs {
                match key.as_str() {
                    "name" => changes.name = value,
                    "description" | "desc" => changes.description = value,
                    _ => return Err(format!("Unknown bot field `{}` (name, description)", key)),
                }
            }
            detail.update(&changes).await
        }
        _ => return Err("`update` works on a user or bot page".to_string()),
    };

    finish(console, result).await
}

pub async fn status<T: Transport>(console: &mut Console<T>, value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Usage: status <value>".to_string());
    }

    let result = match &console.view {
        View::Transaction(detail) => detail.set_status(value).await,
        View::Bot(detail) => detail.set_status(value).await,
        _ => return Err("`status` works on a transaction or bot page".to_string()),
    };

    finish(console, result).await
}

pub async fn fund<T: Transport>(console: &mut Console<T>, amount: &str) -> Result<String, String> {
    let result = match &console.view {
        View::User(detail) => detail.fund(amount).await,
        _ => return Err("`fund` works on a user page".to_string()),
    };

    finish(console, result).await
}

pub async fn delete<T: Transport>(console: &mut Console<T>, args: &[&str]) -> Result<String, String> {
    let confirmed = args.first() == Some(&"confirm");

    let result = match &console.view {
        View::User(detail) if confirmed => detail.remove().await,
        View::Transaction(detail) if confirmed => detail.remove().await,
        View::Bot(detail) if confirmed => detail.remove().await,
        View::User(_) | View::Transaction(_) | View::Bot(_) => {
            return Err("This permanently deletes the record. Type `delete confirm` to proceed.".to_string())
        }
        _ => return Err("`delete` works on a user, transaction or bot page".to_string()),
    };

    finish(console, result).await
}
