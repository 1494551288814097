//! User and session types.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// A storefront user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Email address used for login.
    pub email: String,
    /// Display name, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role assigned by the backend.
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Whether this user may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Backend-assigned user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper.
    #[default]
    Customer,
    /// Admin console access.
    Admin,
}

/// An authenticated session.
///
/// Created on successful login/register, destroyed on logout or when the
/// stored token fails verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated user.
    pub user: User,
    /// Bearer token for API requests.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_customer() {
        let json = r#"{"id":"u1","email":"shopper@example.com"}"#;
        let user: User = serde_json::from_str(json).expect("deserialize");
        assert_eq!(user.role, Role::Customer);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_admin_role() {
        let json = r#"{"id":"u2","email":"ops@example.com","role":"admin"}"#;
        let user: User = serde_json::from_str(json).expect("deserialize");
        assert!(user.is_admin());
    }
}
