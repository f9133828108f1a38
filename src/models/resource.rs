//! Traits tying a record type to its admin endpoints.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::router::Route;

/// Client-side validation failure; the request is never sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Invalid {field}: {value:?} (expected one of: {expected})")]
    NotOneOf {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error("Amount must be a positive number, got {0:?}")]
    InvalidAmount(String),
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Reject blank (or whitespace-only) required text
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// A record served by the admin API under a collection and a detail endpoint
pub trait Resource: DeserializeOwned + Clone {
    /// Singular noun for notices and logs
    const LABEL: &'static str;
    /// `GET` returning `{COLLECTION_KEY: [...]}`
    const COLLECTION_PATH: &'static str;
    const COLLECTION_KEY: &'static str;
    /// `GET {RECORD_PATH}/:id` returning `{RECORD_KEY: {...}}`
    const RECORD_PATH: &'static str;
    const RECORD_KEY: &'static str;
    /// `DELETE {DELETE_PATH}/:id`
    const DELETE_PATH: &'static str;

    fn id(&self) -> &str;

    /// Stringified fields a search query is matched against
    fn search_fields(&self) -> Vec<String>;

    /// Where to go after the record is deleted
    fn list_route() -> Route;
}

/// Records accepting a partial `PATCH {UPDATE_PATH}/:id`
pub trait Editable: Resource {
    type Changes: Serialize + Validate;
    const UPDATE_PATH: &'static str;
}

/// Records with an enumerated status changed through `PATCH {STATUS_PATH}/:id`
pub trait Statused: Resource {
    type Status: StatusValue;
    const STATUS_PATH: &'static str;
}

/// Closed set of status constants an operator may choose from
pub trait StatusValue:
    Copy + PartialEq + Serialize + FromStr<Err = ValidationError> + fmt::Display + 'static
{
    fn choices() -> &'static [Self];

    /// Comma-separated list of choices for error messages and help text
    fn describe_choices() -> String {
        Self::choices()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Case-insensitive lookup over `choices()`
    fn parse_choice(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        let wanted = value.trim().to_lowercase();
        Self::choices()
            .iter()
            .copied()
            .find(|choice| choice.to_string() == wanted)
            .ok_or_else(|| ValidationError::NotOneOf {
                field,
                value: value.to_string(),
                expected: Self::describe_choices(),
            })
    }
}
