//! Platform user accounts

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{require, Editable, Resource, StatusValue, Validate, ValidationError};
use crate::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse_choice("role", s)
    }
}

impl StatusValue for Role {
    fn choices() -> &'static [Self] {
        &[Role::User, Role::Admin]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_flag: Option<String>,
    #[serde(default)]
    pub profile_picture: Vec<String>,
    /// Kept as sent; the server may know roles this console does not
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// First uploaded profile picture, if any
    pub fn avatar(&self) -> Option<&str> {
        self.profile_picture.first().map(String::as_str)
    }
}

impl Resource for User {
    const LABEL: &'static str = "user";
    const COLLECTION_PATH: &'static str = "/admin/all-users";
    const COLLECTION_KEY: &'static str = "users";
    const RECORD_PATH: &'static str = "/admin/user";
    const RECORD_KEY: &'static str = "user";
    const DELETE_PATH: &'static str = "/admin/user/delete";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.user_name.clone(),
            self.email.clone(),
        ]
    }

    fn list_route() -> Route {
        Route::Users
    }
}

impl Editable for User {
    type Changes = UserChanges;
    const UPDATE_PATH: &'static str = "/admin/user/update";
}

/// Body of PATCH /admin/user/update/:id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    pub full_name: String,
    pub phone_number: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

impl UserChanges {
    /// Pre-fill the edit form from the current record
    pub fn from_user(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            role: user.role.clone(),
            user_name: None,
            is_verified: None,
        }
    }
}

impl Validate for UserChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        require("fullName", &self.full_name)?;
        require("phoneNumber", &self.phone_number)?;
        require("role", &self.role)?;
        self.role.parse::<Role>()?;
        Ok(())
    }
}

/// Body of PATCH /admin/user/fund/:id
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundRequest {
    pub amount: f64,
}

impl FundRequest {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let amount = input
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidAmount(input.to_string()))?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(input.to_string()));
        }

        Ok(Self { amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_deserializes_from_wire_shape() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "fullName": "Ada Obi",
            "userName": "ada",
            "email": "ada@trove.io",
            "role": "admin",
            "isVerified": true,
            "balance": 1250.5,
            "createdAt": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.full_name, "Ada Obi");
        assert!(user.is_verified);
        assert!(user.phone_number.is_none());
        assert!(user.created_at.is_some());
        assert_eq!(user.avatar(), None);
    }

    #[test]
    fn test_avatar_is_first_picture() {
        let user: User = serde_json::from_value(json!({
            "_id": "u2",
            "profilePicture": ["https://cdn/a.png", "https://cdn/b.png"]
        }))
        .unwrap();
        assert_eq!(user.avatar(), Some("https://cdn/a.png"));
    }

    #[test]
    fn test_changes_require_name_phone_role() {
        let mut changes = UserChanges {
            full_name: "Ada Obi".into(),
            phone_number: "+2348000000".into(),
            role: "user".into(),
            ..Default::default()
        };
        assert!(changes.validate().is_ok());

        changes.phone_number = "  ".into();
        assert_eq!(changes.validate(), Err(ValidationError::Required("phoneNumber")));

        changes.phone_number = "+2348000000".into();
        changes.role = "owner".into();
        assert!(matches!(changes.validate(), Err(ValidationError::NotOneOf { field: "role", .. })));
    }

    #[test]
    fn test_changes_serialize_camel_case() {
        let changes = UserChanges {
            full_name: "Ada".into(),
            phone_number: "1".into(),
            role: "admin".into(),
            is_verified: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({"fullName": "Ada", "phoneNumber": "1", "role": "admin", "isVerified": true})
        );
    }

    #[test]
    fn test_fund_amount_must_be_positive_number() {
        assert_eq!(FundRequest::parse("100").unwrap().amount, 100.0);
        assert_eq!(FundRequest::parse("$1,500.25").unwrap().amount, 1500.25);
        assert!(FundRequest::parse("-5").is_err());
        assert!(FundRequest::parse("0").is_err());
        assert!(FundRequest::parse("ten").is_err());
        assert!(FundRequest::parse("NaN").is_err());
        assert!(FundRequest::parse("inf").is_err());
    }
}
