//! Headline, article, label and publishing operations.

use serde::{Deserialize, Serialize, Serializer};

use super::{join_ids, lenient, Operation, StatusContent, StringOrInt, UpdateContent};

/// Feed ids with a fixed meaning in `getHeadlines` and `catchupFeed`.
/// Ids below -10 address labels.
pub mod special_feed {
    pub const ARCHIVED: i64 = 0;
    pub const STARRED: i64 = -1;
    pub const PUBLISHED: i64 = -2;
    pub const FRESH: i64 = -3;
    pub const ALL_ARTICLES: i64 = -4;
}

/// Which headlines `getHeadlines` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    AllArticles,
    UnreadOnly,
    Adaptive,
    MarkedOnly,
    UpdatedOnly,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::AllArticles => "all_articles",
            ViewMode::UnreadOnly => "unread",
            ViewMode::Adaptive => "adaptive",
            ViewMode::MarkedOnly => "marked",
            ViewMode::UpdatedOnly => "updated",
        }
    }
}

impl Serialize for ViewMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Sort override for `getHeadlines`. `NoSort` sends an empty string, which
/// leaves ordering to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NoSort,
    SortByFeedDateOldestFirst,
    SortByFeedDateNewestFirst,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::NoSort => "",
            SortOrder::SortByFeedDateNewestFirst => "feed_dates",
            SortOrder::SortByFeedDateOldestFirst => "date_reverse",
        }
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Caller-facing parameters of `getHeadlines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlinesQuery {
    /// A feed id, one of [`special_feed`], or a category id with `is_cat`.
    pub feed_id: i64,
    /// Zero leaves the cap to the server (60 before API level 6, 200 after).
    pub limit: u32,
    pub skip: u32,
    pub is_cat: bool,
    pub show_excerpt: bool,
    pub show_content: bool,
    pub view_mode: ViewMode,
    pub include_attachments: bool,
    /// Only articles with a greater id.
    pub since_id: i64,
    pub include_nested: bool,
    pub sanitize: bool,
    pub order_by: SortOrder,
}

impl Default for HeadlinesQuery {
    fn default() -> Self {
        Self {
            feed_id: special_feed::ALL_ARTICLES,
            limit: 0,
            skip: 0,
            is_cat: false,
            show_excerpt: false,
            show_content: false,
            view_mode: ViewMode::AllArticles,
            include_attachments: false,
            since_id: 0,
            include_nested: false,
            sanitize: true,
            order_by: SortOrder::NoSort,
        }
    }
}

/// `getHeadlines` request: the query plus an always-empty `filter`.
#[derive(Debug, Clone, Serialize)]
pub struct GetHeadlines {
    #[serde(flatten)]
    pub query: HeadlinesQuery,
    filter: &'static str,
}

impl GetHeadlines {
    pub fn new(query: HeadlinesQuery) -> Self {
        Self { query, filter: "" }
    }
}

impl Operation for GetHeadlines {
    const NAME: &'static str = "getHeadlines";
    type Content = Vec<Headline>;
}

/// A label reference as sent inside articles: `[id, caption, fg, bg]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleLabel(
    #[serde(deserialize_with = "lenient::int")] pub i64,
    pub String,
    pub String,
    pub String,
);

impl ArticleLabel {
    pub fn id(&self) -> i64 {
        self.0
    }

    pub fn caption(&self) -> &str {
        &self.1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Attachment {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub content_url: String,
    #[serde(deserialize_with = "lenient::text")]
    pub content_type: String,
    #[serde(deserialize_with = "lenient::int")]
    pub post_id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    /// Empty string or a number of seconds, depending on the enclosure.
    pub duration: Option<StringOrInt>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Headline {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::flag")]
    pub unread: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub marked: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub published: bool,
    #[serde(deserialize_with = "lenient::int")]
    pub updated: i64,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_updated: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub link: String,
    #[serde(deserialize_with = "lenient::int")]
    pub feed_id: i64,
    pub tags: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub labels: Vec<ArticleLabel>,
    #[serde(deserialize_with = "lenient::text")]
    pub feed_title: String,
    #[serde(deserialize_with = "lenient::int")]
    pub comments_count: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub comments_link: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub always_display_attachments: bool,
    pub author: Option<String>,
    pub note: Option<String>,
}

/// Value written by `updateArticle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UpdateMode {
    SetFalse = 0,
    SetTrue = 1,
    Toggle = 2,
}

impl Serialize for UpdateMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Article attribute touched by `updateArticle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UpdateField {
    Starred = 0,
    Published = 1,
    Unread = 2,
    Note = 3,
}

impl Serialize for UpdateField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// `updateArticle`: set, clear or toggle one attribute on several articles.
/// `data` is only read by the server for [`UpdateField::Note`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateArticle {
    pub article_ids: String,
    pub mode: UpdateMode,
    pub field: UpdateField,
    pub data: String,
}

impl UpdateArticle {
    pub fn new(article_ids: &[i64], mode: UpdateMode, field: UpdateField, data: &str) -> Self {
        Self {
            article_ids: join_ids(article_ids),
            mode,
            field,
            data: data.to_string(),
        }
    }
}

impl Operation for UpdateArticle {
    const NAME: &'static str = "updateArticle";
    type Content = UpdateContent;
}

/// `getArticle`: full articles. The member is named `article_id` on the
/// wire even though it carries a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetArticle {
    pub article_id: String,
}

impl GetArticle {
    pub fn new(article_ids: &[i64]) -> Self {
        Self {
            article_id: join_ids(article_ids),
        }
    }
}

impl Operation for GetArticle {
    const NAME: &'static str = "getArticle";
    type Content = Vec<Article>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub link: String,
    pub labels: Vec<ArticleLabel>,
    #[serde(deserialize_with = "lenient::flag")]
    pub unread: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub marked: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub published: bool,
    pub comments: Option<String>,
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub updated: i64,
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub feed_id: i64,
    pub feed_title: Option<String>,
    pub attachments: Vec<Attachment>,
    pub note: Option<String>,
}

/// `getLabels`: every label, with `checked` set for those on `article_id`.
#[derive(Debug, Clone, Serialize)]
pub struct GetLabels {
    /// Zero when no article is of interest.
    pub article_id: i64,
}

impl Operation for GetLabels {
    const NAME: &'static str = "getLabels";
    type Content = Vec<Label>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Label {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub caption: String,
    #[serde(deserialize_with = "lenient::text")]
    pub fg_color: String,
    #[serde(deserialize_with = "lenient::text")]
    pub bg_color: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub checked: bool,
}

/// `setArticleLabel`: assign or remove one label on several articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetArticleLabel {
    pub article_ids: String,
    pub label_id: i64,
    pub assign: bool,
}

impl SetArticleLabel {
    pub fn new(article_ids: &[i64], label_id: i64, assign: bool) -> Self {
        Self {
            article_ids: join_ids(article_ids),
            label_id,
            assign,
        }
    }
}

impl Operation for SetArticleLabel {
    const NAME: &'static str = "setArticleLabel";
    type Content = UpdateContent;
}

/// `shareToPublished`: create an article directly in the Published feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareToPublished {
    pub title: String,
    pub url: String,
    pub content: String,
}

impl Operation for ShareToPublished {
    const NAME: &'static str = "shareToPublished";
    type Content = StatusContent;
}
