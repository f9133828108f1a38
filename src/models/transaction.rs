//! Deposits, investments and withdrawals

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{Resource, StatusValue, Statused, ValidationError};
use crate::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Investment,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Investment => "investment",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statuses an operator may set. `rejected` can still arrive from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "declined")]
    Declined,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::InProgress => "in progress",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Declined => "declined",
        };
        f.write_str(text)
    }
}

impl FromStr for TransactionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionStatus::parse_choice("status", s)
    }
}

impl StatusValue for TransactionStatus {
    fn choices() -> &'static [Self] {
        &[
            TransactionStatus::Pending,
            TransactionStatus::InProgress,
            TransactionStatus::Approved,
            TransactionStatus::Declined,
        ]
    }
}

/// The owning user, populated by the server or left as a bare id
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated {
        #[serde(default)]
        email: String,
        #[serde(default, rename = "fullName")]
        full_name: Option<String>,
    },
    Id(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub proof: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn user_email(&self) -> &str {
        match &self.user {
            Some(UserRef::Populated { email, .. }) => email,
            _ => "",
        }
    }

    /// Owner as shown on the detail page: name and email when populated,
    /// otherwise the bare user id
    pub fn owner(&self) -> String {
        match &self.user {
            Some(UserRef::Populated { email, full_name: Some(name) }) if !name.is_empty() => {
                format!("{} <{}>", name, email)
            }
            Some(UserRef::Populated { email, .. }) => email.clone(),
            Some(UserRef::Id(id)) => format!("user {}", id),
            None => String::new(),
        }
    }

    pub fn is_kind(&self, kind: TransactionKind) -> bool {
        self.kind.eq_ignore_ascii_case(kind.as_str())
    }
}

impl Resource for Transaction {
    const LABEL: &'static str = "transaction";
    const COLLECTION_PATH: &'static str = "/admin/all-transactions";
    const COLLECTION_KEY: &'static str = "transactions";
    const RECORD_PATH: &'static str = "/admin/transaction";
    const RECORD_KEY: &'static str = "transaction";
    const DELETE_PATH: &'static str = "/admin/transaction/delete";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.user_email().to_string(),
            self.kind.clone(),
            self.status.clone(),
        ]
    }

    fn list_route() -> Route {
        Route::Transactions
    }
}

impl Statused for Transaction {
    type Status = TransactionStatus;
    const STATUS_PATH: &'static str = "/admin/transaction/update";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_populated_and_bare_user_refs() {
        let populated: Transaction = serde_json::from_value(json!({
            "_id": "t1",
            "user": {"_id": "u1", "email": "ada@trove.io"},
            "amount": 50,
            "type": "deposit",
            "status": "pending",
            "proof": ["https://cdn/p.png"]
        }))
        .unwrap();
        assert_eq!(populated.user_email(), "ada@trove.io");
        assert_eq!(populated.owner(), "ada@trove.io");
        assert!(populated.is_kind(TransactionKind::Deposit));

        let bare: Transaction = serde_json::from_value(json!({
            "_id": "t2",
            "user": "u1",
            "amount": 10.5,
            "type": "Withdrawal",
            "status": "rejected"
        }))
        .unwrap();
        assert_eq!(bare.user_email(), "");
        assert_eq!(bare.owner(), "user u1");

        let named: Transaction = serde_json::from_value(json!({
            "_id": "t3",
            "user": {"email": "ada@trove.io", "fullName": "Ada Obi"}
        }))
        .unwrap();
        assert_eq!(named.owner(), "Ada Obi <ada@trove.io>");
        assert!(bare.is_kind(TransactionKind::Withdrawal));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("In Progress".parse::<TransactionStatus>(), Ok(TransactionStatus::InProgress));
        assert_eq!("approved".parse::<TransactionStatus>(), Ok(TransactionStatus::Approved));
        assert!("rejected".parse::<TransactionStatus>().is_err());
        assert!("".parse::<TransactionStatus>().is_err());
        assert_eq!(
            serde_json::to_value(TransactionStatus::InProgress).unwrap(),
            json!("in progress")
        );
    }
}
