//! Signed-in operator session

use serde::{Deserialize, Serialize};

/// The user block returned with a login token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl SessionUser {
    /// Exact match; "Admin" or " admin" is not an admin
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Bearer token plus the minimal user info shown in the console prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_role(role: &str) -> SessionUser {
        SessionUser {
            role: role.to_string(),
            email: None,
            full_name: None,
        }
    }

    #[test]
    fn test_is_admin_requires_exact_role() {
        assert!(with_role("admin").is_admin());
        assert!(!with_role("Admin").is_admin());
        assert!(!with_role(" admin").is_admin());
        assert!(!with_role("user").is_admin());
        assert!(!with_role("").is_admin());
    }
}
