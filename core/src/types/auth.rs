//! Session and server-identity operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{lenient, Operation, StatusContent};

/// `login`: exchange credentials for a session id.
#[derive(Clone, Serialize)]
pub struct Login {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Operation for Login {
    const NAME: &'static str = "login";
    type Content = LoginContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginContent {
    #[serde(deserialize_with = "lenient::text")]
    pub session_id: String,
    #[serde(deserialize_with = "lenient::int")]
    pub api_level: i64,
}

/// `logout`: invalidate the current session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Logout {}

impl Operation for Logout {
    const NAME: &'static str = "logout";
    type Content = StatusContent;
}

/// `isLoggedIn`: ask whether the current session id is still valid.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IsLoggedIn {}

impl Operation for IsLoggedIn {
    const NAME: &'static str = "isLoggedIn";
    type Content = IsLoggedInContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IsLoggedInContent {
    #[serde(deserialize_with = "lenient::flag")]
    pub status: bool,
}

/// `getApiLevel`: integer level bumped with each API change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetApiLevel {}

impl Operation for GetApiLevel {
    const NAME: &'static str = "getApiLevel";
    type Content = ApiLevelContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiLevelContent {
    #[serde(deserialize_with = "lenient::int")]
    pub level: i64,
}

/// `getVersion`: the server's release string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetVersion {}

impl Operation for GetVersion {
    const NAME: &'static str = "getVersion";
    type Content = VersionContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VersionContent {
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_serializes_user_and_password() {
        let login = Login {
            user: "admin".into(),
            password: "secret".into(),
        };
        let body = serde_json::to_value(&login).unwrap();
        assert_eq!(body, serde_json::json!({"user": "admin", "password": "secret"}));
        assert!(!format!("{login:?}").contains("secret"));
    }

    #[test]
    fn login_content_decodes() {
        let content: LoginContent =
            serde_json::from_str(r#"{"session_id":"abc123","api_level":8,"config":{}}"#).unwrap();
        assert_eq!(content.session_id, "abc123");
        assert_eq!(content.api_level, 8);
    }

    #[test]
    fn parameterless_ops_serialize_to_empty_objects() {
        assert_eq!(serde_json::to_string(&Logout {}).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&GetVersion {}).unwrap(), "{}");
    }

    #[test]
    fn is_logged_in_accepts_numeric_flag() {
        let content: IsLoggedInContent = serde_json::from_str(r#"{"status":1}"#).unwrap();
        assert!(content.status);
    }
}
