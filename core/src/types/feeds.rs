//! Feed, category and subscription operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{lenient, Operation, StatusContent, StringOrInt};
use crate::error::ApiError;

/// Category ids with a fixed meaning in `getFeeds`.
pub mod special_category {
    pub const UNCATEGORIZED: i64 = 0;
    /// Starred, Published, Archived and Fresh.
    pub const SPECIAL: i64 = -1;
    pub const LABELS: i64 = -2;
    pub const ALL_EXCLUDING_VIRTUAL: i64 = -3;
    pub const ALL_INCLUDING_VIRTUAL: i64 = -4;
}

/// `getUnread`: total number of unread articles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetUnread {}

impl Operation for GetUnread {
    const NAME: &'static str = "getUnread";
    type Content = UnreadContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UnreadContent {
    /// Sent as a string by most server versions.
    #[serde(deserialize_with = "lenient::string_or_int")]
    pub unread: StringOrInt,
}

/// Which counter families `getCounters` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterKinds {
    pub feeds: bool,
    pub labels: bool,
    pub categories: bool,
    pub tags: bool,
}

impl Default for CounterKinds {
    fn default() -> Self {
        Self {
            feeds: true,
            labels: true,
            categories: true,
            tags: false,
        }
    }
}

impl CounterKinds {
    /// Flags in the fixed order f, l, c, t.
    pub fn mode(&self) -> String {
        [
            (self.feeds, 'f'),
            (self.labels, 'l'),
            (self.categories, 'c'),
            (self.tags, 't'),
        ]
        .iter()
        .filter(|(wanted, _)| *wanted)
        .map(|(_, letter)| *letter)
        .collect()
    }
}

/// `getCounters`: unread counters for the requested families.
#[derive(Debug, Clone, Serialize)]
pub struct GetCounters {
    pub mode: String,
}

impl GetCounters {
    pub fn new(kinds: CounterKinds) -> Self {
        Self { mode: kinds.mode() }
    }
}

impl Operation for GetCounters {
    const NAME: &'static str = "getCounters";
    type Content = Vec<Counter>;
}

/// One counter. `id` is numeric for feeds and labels but a name such as
/// `"global-unread"` for the aggregate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Counter {
    #[serde(deserialize_with = "lenient::string_or_int")]
    pub id: StringOrInt,
    #[serde(deserialize_with = "lenient::string_or_int")]
    pub counter: StringOrInt,
    pub kind: Option<String>,
    pub updated: Option<String>,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub has_img: Option<i64>,
    pub description: Option<String>,
}

/// `getFeeds`: feeds under one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetFeeds {
    /// A category id or one of [`special_category`].
    pub cat_id: i64,
    pub unread_only: bool,
    /// Zero means no limit. Must stay zero when `unread_only` is set.
    pub limit: u32,
    /// Must stay zero when `unread_only` is set.
    pub offset: u32,
    /// Include child categories as entries with `is_cat` set.
    pub include_nested: bool,
}

impl GetFeeds {
    /// The server cannot page an unread-only listing.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.unread_only && (self.limit != 0 || self.offset != 0) {
            return Err(ApiError::InvalidArgument(
                "limit and offset must be zero when unread_only is set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Operation for GetFeeds {
    const NAME: &'static str = "getFeeds";
    type Content = Vec<Feed>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Feed {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string_or_int")]
    pub unread: StringOrInt,
    #[serde(deserialize_with = "lenient::int")]
    pub cat_id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub feed_url: String,
    pub has_icon: Option<bool>,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub last_updated: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub order_id: Option<i64>,
    /// Set on nested category entries.
    pub is_cat: Option<bool>,
}

/// `getCategories`: categories with unread counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetCategories {
    pub unread_only: bool,
    /// Return only topmost categories, with child counts folded in.
    pub enable_nested: bool,
    pub include_empty: bool,
}

impl Operation for GetCategories {
    const NAME: &'static str = "getCategories";
    type Content = Vec<Category>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Category {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string_or_int")]
    pub unread: StringOrInt,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub order_id: Option<i64>,
}

/// `updateFeed`: ask the server to refresh one feed.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateFeed {
    pub feed_id: i64,
}

impl Operation for UpdateFeed {
    const NAME: &'static str = "updateFeed";
    type Content = StatusContent;
}

/// `catchupFeed`: mark every article of a feed or category as read.
#[derive(Debug, Clone, Serialize)]
pub struct CatchupFeed {
    pub feed_id: i64,
    pub is_cat: bool,
}

impl Operation for CatchupFeed {
    const NAME: &'static str = "catchupFeed";
    type Content = StatusContent;
}

/// `subscribeToFeed`: add a feed, optionally with HTTP credentials for it.
#[derive(Clone, Default, Serialize)]
pub struct SubscribeToFeed {
    pub feed_url: String,
    pub category_id: i64,
    pub login: String,
    pub password: String,
}

impl fmt::Debug for SubscribeToFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscribeToFeed")
            .field("feed_url", &self.feed_url)
            .field("category_id", &self.category_id)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Operation for SubscribeToFeed {
    const NAME: &'static str = "subscribeToFeed";
    type Content = SubscribeContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubscribeContent {
    pub status: SubscribeStatus,
}

/// Outcome code of a subscription attempt: 0 already subscribed, 1 added,
/// 2 invalid URL, 3 no feed found at URL, 4 several feeds found,
/// 5 download failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubscribeStatus {
    #[serde(deserialize_with = "lenient::int")]
    pub code: i64,
    pub message: Option<String>,
    /// Id of the feed when one was added or already present.
    #[serde(deserialize_with = "lenient::opt_int")]
    pub feed_id: Option<i64>,
}

impl SubscribeStatus {
    pub const ALREADY_SUBSCRIBED: i64 = 0;
    pub const ADDED: i64 = 1;

    /// True when the feed is subscribed after the call.
    pub fn is_subscribed(&self) -> bool {
        self.code == Self::ALREADY_SUBSCRIBED || self.code == Self::ADDED
    }
}

/// `unsubscribeFeed`: remove a feed.
#[derive(Debug, Clone, Serialize)]
pub struct UnsubscribeFeed {
    pub feed_id: i64,
}

impl Operation for UnsubscribeFeed {
    const NAME: &'static str = "unsubscribeFeed";
    type Content = StatusContent;
}

/// `getFeedTree`: categories and feeds as a tree.
#[derive(Debug, Clone, Serialize)]
pub struct GetFeedTree {
    pub include_empty: bool,
}

impl Operation for GetFeedTree {
    const NAME: &'static str = "getFeedTree";
    type Content = FeedTreeContent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedTreeContent {
    pub categories: FeedTree,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedTree {
    pub identifier: String,
    pub label: String,
    pub items: Vec<FeedTreeItem>,
}

/// A category (`kind == "category"`) or a feed (`kind == "feed"`). Category
/// nodes hold their feeds and child categories in `items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedTreeItem {
    /// Prefixed id such as `"CAT:3"` or `"FEED:12"`.
    pub id: String,
    #[serde(deserialize_with = "lenient::int")]
    pub bare_id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::int")]
    pub unread: i64,
    #[serde(deserialize_with = "lenient::opt_int")]
    pub child_unread: Option<i64>,
    pub checkbox: Option<bool>,
    pub param: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub icon: Option<String>,
    pub updated: Option<String>,
    pub error: Option<String>,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
    pub items: Vec<FeedTreeItem>,
}

impl FeedTreeItem {
    pub fn is_category(&self) -> bool {
        self.kind == "category"
    }

    /// Every feed below this node, depth first.
    pub fn feeds(&self) -> Vec<&FeedTreeItem> {
        let mut out = Vec::new();
        for item in &self.items {
            if item.is_category() {
                out.extend(item.feeds());
            } else {
                out.push(item);
            }
        }
        out
    }
}
