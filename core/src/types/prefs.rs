//! Server configuration and user preference lookups.

use serde::{Deserialize, Serialize};

use super::{lenient, Operation, PrefValue};

/// `getConfig`: installation settings visible to the client.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetConfig {}

impl Operation for GetConfig {
    const NAME: &'static str = "getConfig";
    type Content = ConfigContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigContent {
    #[serde(deserialize_with = "lenient::text")]
    pub icons_dir: String,
    #[serde(deserialize_with = "lenient::text")]
    pub icons_url: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub daemon_is_running: bool,
    #[serde(deserialize_with = "lenient::int")]
    pub num_feeds: i64,
}

/// `getPref`: one preference of the logged-in user.
#[derive(Debug, Clone, Serialize)]
pub struct GetPref {
    pub pref_name: String,
}

impl Operation for GetPref {
    const NAME: &'static str = "getPref";
    type Content = PrefContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrefContent {
    pub value: Option<PrefValue>,
}
