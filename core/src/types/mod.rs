//! Wire DTOs for the Tiny Tiny RSS JSON API.
//!
//! # Design
//! Each remote operation is a parameter struct implementing [`Operation`]:
//! its `Serialize` output is flattened next to the common `op`/`sid`/`seq`
//! envelope, and its associated `Content` type is what the `content` member
//! of a successful reply decodes into. Content types use `#[serde(default)]`
//! throughout so missing members take their type's default and unknown
//! members are ignored.
//!
//! Fields the server sends with varying JSON types are modelled as sum types
//! ([`StringOrInt`], [`PrefValue`]) or decoded through the `lenient` helpers
//! when the meaning is always numeric.

pub mod articles;
pub mod auth;
pub mod feeds;
pub mod prefs;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub use articles::*;
pub use auth::*;
pub use feeds::*;
pub use prefs::*;

/// `status` value of a successful reply.
pub const STATUS_OK: i32 = 0;
/// `status` value of a failed reply, also used for synthesized failures.
pub const STATUS_ERR: i32 = 1;

/// A named remote procedure with a fixed parameter set and reply shape.
pub trait Operation: Serialize {
    /// Value of the `op` member.
    const NAME: &'static str;
    /// Shape of the `content` member on success.
    type Content: DeserializeOwned + Default;
}

/// The request body: common envelope plus the operation's own fields.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, O: Operation> {
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<&'a str>,
    pub seq: u64,
    #[serde(flatten)]
    pub params: &'a O,
}

impl<'a, O: Operation> Envelope<'a, O> {
    pub fn new(params: &'a O, sid: Option<&'a str>, seq: u64) -> Self {
        Self {
            op: O::NAME,
            sid,
            seq,
            params,
        }
    }
}

/// A decoded or locally synthesized reply.
///
/// `error` is set whenever the call failed: to `ApiError::Application` with
/// the server's code when `status` is nonzero, or to the transport/decode
/// error for responses synthesized by the client. `content` then holds its
/// default value unless the server sent something decodable.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<C> {
    pub seq: u64,
    pub status: i32,
    pub content: C,
    pub error: Option<ApiError>,
}

impl<C: Default> ApiResponse<C> {
    /// A synthesized failure that never reached (or never came back from)
    /// the server.
    pub fn failure(seq: u64, error: ApiError) -> Self {
        Self {
            seq,
            status: STATUS_ERR,
            content: C::default(),
            error: Some(error),
        }
    }
}

impl<C> ApiResponse<C> {
    /// A synthesized reply carrying `content` without a server round-trip.
    pub fn local(status: i32, content: C) -> Self {
        Self {
            seq: 0,
            status,
            content,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK && self.error.is_none()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Collapse into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<C, ApiError> {
        match self.error {
            Some(err) => Err(err),
            None if self.status != STATUS_OK => {
                Err(ApiError::Application(format!("status {}", self.status)))
            }
            None => Ok(self.content),
        }
    }
}

/// `content` of operations that only acknowledge, e.g. `{"status":"OK"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusContent {
    pub status: String,
}

/// `content` of operations that acknowledge and report how many rows changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateContent {
    pub status: String,
    #[serde(deserialize_with = "lenient::int")]
    pub updated: i64,
}

/// A member the server sends either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrInt {
    Int(i64),
    Str(String),
}

impl StringOrInt {
    /// The numeric value, parsing string forms such as `"12"`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StringOrInt::Int(n) => Some(*n),
            StringOrInt::Str(s) => s.trim().parse().ok(),
        }
    }
}

impl Default for StringOrInt {
    fn default() -> Self {
        StringOrInt::Int(0)
    }
}

impl fmt::Display for StringOrInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringOrInt::Int(n) => write!(f, "{n}"),
            StringOrInt::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StringOrInt {
    fn from(n: i64) -> Self {
        StringOrInt::Int(n)
    }
}

impl From<&str> for StringOrInt {
    fn from(s: &str) -> Self {
        StringOrInt::Str(s.to_string())
    }
}

/// A preference value; its JSON type depends on the preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Join article ids into the comma-separated form the API expects.
pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Decoders for members that are numeric or boolean in meaning but arrive
/// as strings, numbers or `null` depending on the server version.
pub(crate) mod lenient {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    use super::StringOrInt;

    pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_int(deserializer)?.unwrap_or_default())
    }

    /// Integers that may arrive as strings or booleans; `null` and `""` are absent.
    pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Flag>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Flag::Bool(b)) => Ok(Some(i64::from(b))),
            Some(Flag::Int(n)) => Ok(Some(n)),
            Some(Flag::Str(s)) if s.trim().is_empty() => Ok(None),
            Some(Flag::Str(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
        }
    }

    /// A [`StringOrInt`] member that may also be `null` or a boolean.
    pub fn string_or_int<'de, D>(deserializer: D) -> Result<StringOrInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Flag>::deserialize(deserializer)? {
            None => StringOrInt::default(),
            Some(Flag::Bool(b)) => StringOrInt::Int(i64::from(b)),
            Some(Flag::Int(n)) => StringOrInt::Int(n),
            Some(Flag::Str(s)) => StringOrInt::Str(s),
        })
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Flag>::deserialize(deserializer)? {
            None => Ok(false),
            Some(Flag::Bool(b)) => Ok(b),
            Some(Flag::Int(n)) => Ok(n != 0),
            Some(Flag::Str(s)) => match s.as_str() {
                "t" | "true" | "1" => Ok(true),
                "f" | "false" | "0" | "" => Ok(false),
                other => Err(de::Error::custom(format!("not a boolean: {other}"))),
            },
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Text that the server replaces with `false` when there is none.
    pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Flag>::deserialize(deserializer)? {
            Some(Flag::Str(s)) => Ok(Some(s)),
            Some(Flag::Int(n)) => Ok(Some(n.to_string())),
            Some(Flag::Bool(_)) | None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Serialize)]
    struct Ping {
        feed_id: i64,
    }

    impl Operation for Ping {
        const NAME: &'static str = "ping";
        type Content = StatusContent;
    }

    #[test]
    fn envelope_flattens_params_after_common_fields() {
        let ping = Ping { feed_id: 7 };
        let body = serde_json::to_value(Envelope::new(&ping, Some("abc"), 3)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"op": "ping", "sid": "abc", "seq": 3, "feed_id": 7})
        );
    }

    #[test]
    fn envelope_omits_absent_session() {
        let ping = Ping::default();
        let body = serde_json::to_value(Envelope::new(&ping, None, 1)).unwrap();
        assert!(body.get("sid").is_none());
    }

    #[test]
    fn join_ids_uses_commas() {
        assert_eq!(join_ids(&[100, 200, 130]), "100,200,130");
        assert_eq!(join_ids(&[]), "");
    }

    #[test]
    fn string_or_int_accepts_both_forms() {
        let values: Vec<StringOrInt> =
            serde_json::from_str(r#"[12, "global-unread", "7"]"#).unwrap();
        assert_eq!(values[0], StringOrInt::Int(12));
        assert_eq!(values[1].as_i64(), None);
        assert_eq!(values[2].as_i64(), Some(7));
        assert_eq!(values[1].to_string(), "global-unread");
    }

    #[test]
    fn lenient_members_tolerate_null_and_booleans() {
        #[derive(Debug, Deserialize)]
        struct Row {
            #[serde(deserialize_with = "lenient::string_or_int")]
            unread: StringOrInt,
            #[serde(default, deserialize_with = "lenient::opt_int")]
            has_img: Option<i64>,
            #[serde(deserialize_with = "lenient::int")]
            order: i64,
        }

        let rows: Vec<Row> = serde_json::from_str(
            r#"[{"unread":null,"has_img":true,"order":false},
                {"unread":"12","has_img":null,"order":"3"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].unread, StringOrInt::Int(0));
        assert_eq!(rows[0].has_img, Some(1));
        assert_eq!(rows[0].order, 0);
        assert_eq!(rows[1].unread.as_i64(), Some(12));
        assert_eq!(rows[1].has_img, None);
        assert_eq!(rows[1].order, 3);
    }

    #[test]
    fn update_content_accepts_string_counts() {
        let content: UpdateContent =
            serde_json::from_str(r#"{"status":"OK","updated":"3"}"#).unwrap();
        assert_eq!(content.updated, 3);
    }

    #[test]
    fn into_result_surfaces_errors() {
        let failed: ApiResponse<StatusContent> =
            ApiResponse::failure(4, ApiError::Transport("refused".into()));
        assert!(!failed.is_ok());
        assert_eq!(failed.status, STATUS_ERR);
        assert!(matches!(failed.into_result(), Err(ApiError::Transport(_))));

        let ok = ApiResponse::local(STATUS_OK, StatusContent { status: "OK".into() });
        assert_eq!(ok.into_result().unwrap().status, "OK");
    }

    #[test]
    fn pref_values_keep_their_json_type() {
        let values: Vec<PrefValue> = serde_json::from_str(r#"[true, 30, "Europe/Rome"]"#).unwrap();
        assert_eq!(values[0], PrefValue::Bool(true));
        assert_eq!(values[1], PrefValue::Int(30));
        assert_eq!(values[2], PrefValue::Str("Europe/Rome".into()));
    }
}
