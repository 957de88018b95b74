//! In-memory data behind the mock `/api/` endpoint.
//!
//! Every operation is a method returning the reply `content` as JSON or an
//! error code string. Member names and JSON types follow what a real server
//! sends, including its habit of returning some ids as strings.

use std::collections::{BTreeMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use uuid::Uuid;

pub const API_LEVEL: i64 = 8;
pub const VERSION: &str = "1.7.5";

/// Headline cap applied when the client asks for 0 or more than this.
const MAX_HEADLINES: usize = 200;
const FRESH_WINDOW_SECS: i64 = 24 * 60 * 60;

pub const STARRED: i64 = -1;
pub const PUBLISHED: i64 = -2;
pub const FRESH: i64 = -3;
pub const ALL_ARTICLES: i64 = -4;
pub const ARCHIVED: i64 = 0;
/// Feed ids at or below this address labels.
const LABEL_FEED_MAX: i64 = -11;

pub type ApiResult = Result<Value, &'static str>;

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub parent_id: Option<i64>,
    pub order_id: i64,
}

#[derive(Debug, Clone)]
pub struct Feed {
    pub id: i64,
    pub title: String,
    pub feed_url: String,
    pub cat_id: i64,
    pub last_updated: i64,
    pub order_id: i64,
    pub has_icon: bool,
}

#[derive(Debug, Clone)]
pub struct Article {
    pub id: i64,
    /// `ARCHIVED` for articles without a feed.
    pub feed_id: i64,
    pub title: String,
    pub link: String,
    pub content: String,
    pub author: String,
    pub updated: i64,
    pub unread: bool,
    pub marked: bool,
    pub published: bool,
    pub is_updated: bool,
    pub note: String,
    pub tags: Vec<String>,
    pub labels: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct Label {
    /// Feed-style id, always at or below `LABEL_FEED_MAX`.
    pub id: i64,
    pub caption: String,
    pub fg_color: String,
    pub bg_color: String,
}

#[derive(Debug, Clone)]
pub struct Store {
    pub user: String,
    pub password: String,
    pub sessions: HashSet<String>,
    pub categories: Vec<Category>,
    pub feeds: Vec<Feed>,
    pub articles: BTreeMap<i64, Article>,
    pub labels: Vec<Label>,
    pub prefs: BTreeMap<String, Value>,
}

impl Default for Store {
    fn default() -> Self {
        Self::seeded("admin", "password")
    }
}

/// Read typed parameters out of a request object, accepting the loose
/// encodings clients use (numbers as strings, booleans as 0/1).
pub struct Params<'a>(pub &'a Value);

impl Params<'_> {
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn int(&self, key: &str) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            Some(Value::Bool(b)) => i64::from(*b),
            _ => 0,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
            Some(Value::String(s)) => matches!(s.as_str(), "true" | "t" | "1"),
            _ => false,
        }
    }

    pub fn ids(&self, key: &str) -> Vec<i64> {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_i64().into_iter().collect(),
            Some(Value::String(s)) => s
                .split(',')
                .filter_map(|part| part.trim().parse().ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn clock(timestamp: i64) -> String {
    let secs = timestamp.rem_euclid(86_400);
    format!("{:02}:{:02}", secs / 3600, (secs % 3600) / 60)
}

impl Store {
    /// An account with no data.
    pub fn empty(user: &str, password: &str) -> Self {
        Self {
            user: user.to_string(),
            password: password.to_string(),
            sessions: HashSet::new(),
            categories: Vec::new(),
            feeds: Vec::new(),
            articles: BTreeMap::new(),
            labels: Vec::new(),
            prefs: BTreeMap::new(),
        }
    }

    /// An account with a few categories, feeds, articles and labels.
    pub fn seeded(user: &str, password: &str) -> Self {
        let mut store = Self::empty(user, password);

        let category = |id, title: &str, parent_id, order_id| Category {
            id,
            title: title.to_string(),
            parent_id,
            order_id,
        };
        store.categories = vec![
            category(1, "News", None, 1),
            category(2, "Tech", None, 2),
            category(3, "Rust", Some(2), 1),
            category(4, "Empty", None, 3),
        ];

        let feed = |id, title: &str, feed_url: &str, cat_id, has_icon| Feed {
            id,
            title: title.to_string(),
            feed_url: feed_url.to_string(),
            cat_id,
            last_updated: 1_381_920_000,
            order_id: id,
            has_icon,
        };
        store.feeds = vec![
            feed(1, "LWN.net", "https://lwn.net/headlines/rss", 2, true),
            feed(2, "This Week in Rust", "https://this-week-in-rust.org/rss.xml", 3, true),
            feed(3, "BBC News", "http://feeds.bbci.co.uk/news/rss.xml", 1, false),
            feed(4, "Personal blog", "https://blog.example.org/feed.xml", 0, false),
        ];

        store.labels = vec![
            Label {
                id: -1025,
                caption: "Later".to_string(),
                fg_color: "#ffffff".to_string(),
                bg_color: "#2f6fde".to_string(),
            },
            Label {
                id: -1026,
                caption: "Important".to_string(),
                fg_color: "#000000".to_string(),
                bg_color: "#f5c211".to_string(),
            },
        ];

        let seeds: [(i64, i64, &str, i64, bool, bool, bool, Vec<i64>); 8] = [
            (100, 1, "Kernel release notes", 1_381_910_000, true, false, false, vec![]),
            (110, 1, "Filesystem news", 1_381_900_000, false, true, false, vec![-1025]),
            (120, 2, "This Week in Rust 512", 1_381_915_000, true, true, true, vec![-1026]),
            (130, 2, "Async closures stabilized", 1_381_905_000, true, false, false, vec![]),
            (140, 3, "Weather warning", 1_381_800_000, false, false, false, vec![]),
            (200, 3, "Election results", 1_381_919_000, true, false, false, vec![-1025, -1026]),
            (210, 4, "Hello world", 1_381_700_000, false, false, true, vec![]),
            (220, 4, "Moving house", 1_381_600_000, true, false, false, vec![]),
        ];
        for (id, feed_id, title, updated, unread, marked, published, labels) in seeds {
            store.articles.insert(
                id,
                Article {
                    id,
                    feed_id,
                    title: title.to_string(),
                    link: format!("https://example.org/articles/{id}"),
                    content: format!("<p>{title}: full text of article {id}.</p>"),
                    author: "editor".to_string(),
                    updated,
                    unread,
                    marked,
                    published,
                    is_updated: id == 130,
                    note: String::new(),
                    tags: if feed_id == 2 { vec!["rust".to_string()] } else { Vec::new() },
                    labels,
                },
            );
        }

        store.prefs.insert("ENABLE_FEED_CATS".to_string(), json!(true));
        store.prefs.insert("DEFAULT_ARTICLE_LIMIT".to_string(), json!(30));
        store.prefs.insert("USER_TIMEZONE".to_string(), json!("UTC"));
        store
            .prefs
            .insert("SORT_HEADLINES_BY_FEED_DATE".to_string(), json!(false));
        store
    }

    pub fn has_session(&self, sid: &str) -> bool {
        self.sessions.contains(sid)
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    pub fn login(&mut self, p: &Params) -> ApiResult {
        if p.text("user") != self.user || p.text("password") != self.password {
            return Err("LOGIN_ERROR");
        }
        let session_id = Uuid::new_v4().simple().to_string();
        self.sessions.insert(session_id.clone());
        Ok(json!({"session_id": session_id, "api_level": API_LEVEL}))
    }

    pub fn logout(&mut self, sid: &str) -> ApiResult {
        self.sessions.remove(sid);
        Ok(json!({"status": "OK"}))
    }

    pub fn is_logged_in(&self, sid: &str) -> ApiResult {
        Ok(json!({"status": self.has_session(sid)}))
    }

    // -----------------------------------------------------------------------
    // Counters
    // -----------------------------------------------------------------------

    fn unread_where(&self, pred: impl Fn(&Article) -> bool) -> i64 {
        self.articles
            .values()
            .filter(|a| a.unread && pred(a))
            .count() as i64
    }

    fn feed_unread(&self, feed_id: i64) -> i64 {
        self.unread_where(|a| a.feed_id == feed_id)
    }

    /// Ids of `cat_id` and, when `nested`, of every category below it.
    fn category_ids(&self, cat_id: i64, nested: bool) -> Vec<i64> {
        let mut ids = vec![cat_id];
        if nested {
            for child in self.categories.iter().filter(|c| c.parent_id == Some(cat_id)) {
                ids.extend(self.category_ids(child.id, true));
            }
        }
        ids
    }

    fn category_unread(&self, cat_id: i64, nested: bool) -> i64 {
        let cats = self.category_ids(cat_id, nested);
        self.feeds
            .iter()
            .filter(|f| cats.contains(&f.cat_id))
            .map(|f| self.feed_unread(f.id))
            .sum()
    }

    fn category_feed_count(&self, cat_id: i64, nested: bool) -> usize {
        let cats = self.category_ids(cat_id, nested);
        self.feeds.iter().filter(|f| cats.contains(&f.cat_id)).count()
    }

    fn label(&self, id: i64) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    fn label_refs(&self, article: &Article) -> Value {
        Value::Array(
            article
                .labels
                .iter()
                .filter_map(|id| self.label(*id))
                .map(|l| json!([l.id, l.caption, l.fg_color, l.bg_color]))
                .collect(),
        )
    }

    pub fn get_unread(&self) -> ApiResult {
        Ok(json!({"unread": self.unread_where(|_| true).to_string()}))
    }

    pub fn get_counters(&self, p: &Params) -> ApiResult {
        let mode = p.text("mode");
        let mut counters = vec![
            json!({"id": "global-unread", "counter": self.unread_where(|_| true)}),
            json!({"id": "subscribed-feeds", "counter": self.feeds.len()}),
        ];
        if mode.contains('f') {
            for feed in &self.feeds {
                counters.push(json!({
                    "id": feed.id,
                    "updated": clock(feed.last_updated),
                    "counter": self.feed_unread(feed.id),
                    "has_img": i64::from(feed.has_icon),
                }));
            }
        }
        if mode.contains('l') {
            for label in &self.labels {
                counters.push(json!({
                    "id": label.id,
                    "counter": self.unread_where(|a| a.labels.contains(&label.id)),
                    "description": label.caption,
                }));
            }
        }
        if mode.contains('c') {
            for cat in &self.categories {
                counters.push(json!({
                    "id": cat.id,
                    "kind": "cat",
                    "counter": self.category_unread(cat.id, false),
                }));
            }
        }
        Ok(Value::Array(counters))
    }

    // -----------------------------------------------------------------------
    // Feeds and categories
    // -----------------------------------------------------------------------

    fn feed_json(&self, feed: &Feed) -> Value {
        json!({
            "feed_url": feed.feed_url,
            "title": feed.title,
            "id": feed.id,
            "unread": self.feed_unread(feed.id),
            "has_icon": feed.has_icon,
            "cat_id": feed.cat_id,
            "last_updated": feed.last_updated,
            "order_id": feed.order_id,
        })
    }

    fn virtual_feeds_json(&self) -> Vec<Value> {
        [
            (STARRED, "Starred articles"),
            (PUBLISHED, "Published articles"),
            (FRESH, "Fresh articles"),
            (ALL_ARTICLES, "All articles"),
            (ARCHIVED, "Archived articles"),
        ]
        .into_iter()
        .map(|(id, title)| {
            let unread = self.select(id, false, false).iter().filter(|a| a.unread).count();
            json!({"id": id, "title": title, "unread": unread, "cat_id": -1})
        })
        .collect()
    }

    fn label_feeds_json(&self) -> Vec<Value> {
        self.labels
            .iter()
            .map(|l| {
                json!({
                    "id": l.id,
                    "title": l.caption,
                    "unread": self.unread_where(|a| a.labels.contains(&l.id)),
                    "cat_id": -2,
                })
            })
            .collect()
    }

    pub fn get_feeds(&self, p: &Params) -> ApiResult {
        let cat_id = p.int("cat_id");
        let unread_only = p.flag("unread_only");
        let limit = p.int("limit").max(0) as usize;
        let offset = p.int("offset").max(0) as usize;
        let include_nested = p.flag("include_nested");

        let mut entries: Vec<Value> = match cat_id {
            -1 => self.virtual_feeds_json(),
            -2 => self.label_feeds_json(),
            -3 => self.feeds.iter().map(|f| self.feed_json(f)).collect(),
            -4 => {
                let mut all: Vec<Value> = self.feeds.iter().map(|f| self.feed_json(f)).collect();
                all.extend(self.virtual_feeds_json());
                all.extend(self.label_feeds_json());
                all
            }
            cat => {
                let mut entries = Vec::new();
                if include_nested {
                    for child in self.categories.iter().filter(|c| c.parent_id == Some(cat)) {
                        entries.push(json!({
                            "id": child.id,
                            "title": child.title,
                            "unread": self.category_unread(child.id, true),
                            "is_cat": true,
                            "order_id": child.order_id,
                        }));
                    }
                }
                entries.extend(
                    self.feeds
                        .iter()
                        .filter(|f| f.cat_id == cat)
                        .map(|f| self.feed_json(f)),
                );
                entries
            }
        };

        if unread_only {
            entries.retain(|e| e["unread"].as_i64().unwrap_or(0) > 0);
        }
        let entries = entries.into_iter().skip(offset);
        let entries: Vec<Value> = if limit > 0 {
            entries.take(limit).collect()
        } else {
            entries.collect()
        };
        Ok(Value::Array(entries))
    }

    pub fn get_categories(&self, p: &Params) -> ApiResult {
        let unread_only = p.flag("unread_only");
        let enable_nested = p.flag("enable_nested");
        let include_empty = p.flag("include_empty");

        let mut out = Vec::new();
        for cat in &self.categories {
            if enable_nested && cat.parent_id.is_some() {
                continue;
            }
            let unread = self.category_unread(cat.id, enable_nested);
            if !include_empty && self.category_feed_count(cat.id, enable_nested) == 0 {
                continue;
            }
            if unread_only && unread == 0 {
                continue;
            }
            out.push(json!({
                "id": cat.id,
                "title": cat.title,
                "unread": unread,
                "order_id": cat.order_id,
            }));
        }

        let uncategorized = self.category_unread(0, false);
        if (include_empty || self.category_feed_count(0, false) > 0)
            && !(unread_only && uncategorized == 0)
        {
            out.push(json!({"id": 0, "title": "Uncategorized", "unread": uncategorized}));
        }
        let special = self.unread_where(|a| a.marked || a.published);
        if !(unread_only && special == 0) {
            out.push(json!({"id": -1, "title": "Special", "unread": special}));
        }
        if !self.labels.is_empty() {
            let labelled = self.unread_where(|a| !a.labels.is_empty());
            if !(unread_only && labelled == 0) {
                out.push(json!({"id": -2, "title": "Labels", "unread": labelled}));
            }
        }
        Ok(Value::Array(out))
    }

    pub fn update_feed(&mut self, p: &Params) -> ApiResult {
        let feed_id = p.int("feed_id");
        if let Some(feed) = self.feeds.iter_mut().find(|f| f.id == feed_id) {
            feed.last_updated = now();
        }
        Ok(json!({"status": "OK"}))
    }

    pub fn catchup_feed(&mut self, p: &Params) -> ApiResult {
        let ids: Vec<i64> = self
            .select(p.int("feed_id"), p.flag("is_cat"), false)
            .iter()
            .map(|a| a.id)
            .collect();
        for id in ids {
            if let Some(article) = self.articles.get_mut(&id) {
                article.unread = false;
            }
        }
        Ok(json!({"status": "OK"}))
    }

    pub fn subscribe_to_feed(&mut self, p: &Params) -> ApiResult {
        let url = p.text("feed_url").trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Ok(json!({"status": {"code": 2, "message": "invalid URL"}}));
        }
        if let Some(existing) = self.feeds.iter().find(|f| f.feed_url == url) {
            return Ok(json!({"status": {"code": 0, "feed_id": existing.id}}));
        }
        let requested = p.int("category_id");
        let cat_id = if self.categories.iter().any(|c| c.id == requested) {
            requested
        } else {
            0
        };
        let id = self.feeds.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        let title = url
            .split("://")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .unwrap_or(url)
            .to_string();
        self.feeds.push(Feed {
            id,
            title,
            feed_url: url.to_string(),
            cat_id,
            last_updated: now(),
            order_id: id,
            has_icon: false,
        });
        Ok(json!({"status": {"code": 1, "feed_id": id}}))
    }

    pub fn unsubscribe_feed(&mut self, p: &Params) -> ApiResult {
        let feed_id = p.int("feed_id");
        let before = self.feeds.len();
        self.feeds.retain(|f| f.id != feed_id);
        if self.feeds.len() == before {
            return Err("FEED_NOT_FOUND");
        }
        self.articles.retain(|_, a| a.feed_id != feed_id);
        Ok(json!({"status": "OK"}))
    }

    fn tree_feed(&self, feed: &Feed) -> Value {
        json!({
            "id": format!("FEED:{}", feed.id),
            "bare_id": feed.id,
            "name": feed.title,
            "type": "feed",
            "unread": self.feed_unread(feed.id),
            "checkbox": false,
            "error": "",
            "updated": clock(feed.last_updated),
            "icon": if feed.has_icon { Value::from(format!("feed-icons/{}.ico", feed.id)) } else { Value::Bool(false) },
        })
    }

    fn tree_category(&self, cat_id: i64, name: &str, include_empty: bool) -> Option<Value> {
        let mut items: Vec<Value> = self
            .categories
            .iter()
            .filter(|c| c.parent_id == Some(cat_id))
            .filter_map(|c| self.tree_category(c.id, &c.title, include_empty))
            .collect();
        let feeds: Vec<Value> = self
            .feeds
            .iter()
            .filter(|f| f.cat_id == cat_id)
            .map(|f| self.tree_feed(f))
            .collect();
        let feed_count = feeds.len();
        items.extend(feeds);
        if items.is_empty() && !include_empty {
            return None;
        }
        Some(json!({
            "id": format!("CAT:{cat_id}"),
            "bare_id": cat_id,
            "name": name,
            "type": "category",
            "unread": self.category_unread(cat_id, false),
            "child_unread": self.category_unread(cat_id, true) - self.category_unread(cat_id, false),
            "checkbox": false,
            "param": format!("({feed_count} feeds)"),
            "items": items,
        }))
    }

    pub fn get_feed_tree(&self, p: &Params) -> ApiResult {
        let include_empty = p.flag("include_empty");

        let special_items: Vec<Value> = self
            .virtual_feeds_json()
            .into_iter()
            .map(|v| {
                json!({
                    "id": format!("FEED:{}", v["id"]),
                    "bare_id": v["id"],
                    "name": v["title"],
                    "type": "feed",
                    "unread": v["unread"],
                    "icon": false,
                })
            })
            .collect();
        let mut items = vec![json!({
            "id": "CAT:-1",
            "bare_id": -1,
            "name": "Special",
            "type": "category",
            "unread": 0,
            "items": special_items,
        })];
        items.extend(
            self.categories
                .iter()
                .filter(|c| c.parent_id.is_none())
                .filter_map(|c| self.tree_category(c.id, &c.title, include_empty)),
        );
        items.extend(self.tree_category(0, "Uncategorized", include_empty));

        Ok(json!({
            "categories": {"identifier": "id", "label": "name", "items": items}
        }))
    }

    // -----------------------------------------------------------------------
    // Headlines and articles
    // -----------------------------------------------------------------------

    /// Articles addressed by a feed id, special feed, label or category.
    fn select(&self, feed_id: i64, is_cat: bool, include_nested: bool) -> Vec<&Article> {
        let newest = self.articles.values().map(|a| a.updated).max().unwrap_or(0);
        let matches = |a: &Article| -> bool {
            if is_cat {
                let cats = self.category_ids(feed_id, include_nested);
                return self
                    .feeds
                    .iter()
                    .any(|f| f.id == a.feed_id && cats.contains(&f.cat_id));
            }
            match feed_id {
                STARRED => a.marked,
                PUBLISHED => a.published,
                FRESH => a.unread && a.updated >= newest - FRESH_WINDOW_SECS,
                ALL_ARTICLES => true,
                ARCHIVED => a.feed_id == ARCHIVED,
                id if id <= LABEL_FEED_MAX => a.labels.contains(&id),
                id => a.feed_id == id,
            }
        };
        self.articles.values().filter(|a| matches(*a)).collect()
    }

    fn feed_title(&self, feed_id: i64) -> String {
        self.feeds
            .iter()
            .find(|f| f.id == feed_id)
            .map(|f| f.title.clone())
            .unwrap_or_default()
    }

    pub fn get_headlines(&self, p: &Params) -> ApiResult {
        let feed_id = p.int("feed_id");
        if p.0.get("feed_id").is_none() {
            return Err("INCORRECT_USAGE");
        }
        let mut articles = self.select(feed_id, p.flag("is_cat"), p.flag("include_nested"));

        let since_id = p.int("since_id");
        articles.retain(|a| a.id > since_id);

        match p.text("view_mode") {
            "unread" => articles.retain(|a| a.unread),
            "marked" => articles.retain(|a| a.marked),
            "updated" => articles.retain(|a| a.is_updated),
            "adaptive" if articles.iter().any(|a| a.unread) => articles.retain(|a| a.unread),
            _ => {}
        }

        match p.text("order_by") {
            "date_reverse" => articles.sort_by_key(|a| (a.updated, a.id)),
            _ => articles.sort_by_key(|a| std::cmp::Reverse((a.updated, a.id))),
        }

        let limit = match p.int("limit") {
            n if n <= 0 || n as usize > MAX_HEADLINES => MAX_HEADLINES,
            n => n as usize,
        };
        let skip = p.int("skip").max(0) as usize;
        let show_excerpt = p.flag("show_excerpt");
        let show_content = p.flag("show_content");
        let include_attachments = p.flag("include_attachments");

        let headlines = articles
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|a| {
                let mut h = json!({
                    "id": a.id,
                    "unread": a.unread,
                    "marked": a.marked,
                    "published": a.published,
                    "updated": a.updated,
                    "is_updated": a.is_updated,
                    "title": a.title,
                    "link": a.link,
                    "feed_id": a.feed_id.to_string(),
                    "tags": a.tags,
                    "labels": self.label_refs(a),
                    "feed_title": self.feed_title(a.feed_id),
                    "comments_count": 0,
                    "comments_link": "",
                    "always_display_attachments": false,
                    "author": a.author,
                    "note": if a.note.is_empty() { Value::Null } else { Value::from(a.note.clone()) },
                });
                if show_excerpt {
                    let text = strip_tags(&a.content);
                    h["excerpt"] = Value::from(text.chars().take(100).collect::<String>());
                }
                if show_content {
                    h["content"] = Value::from(a.content.clone());
                }
                if include_attachments {
                    h["attachments"] = json!([]);
                }
                h
            })
            .collect();
        Ok(Value::Array(headlines))
    }

    pub fn update_article(&mut self, p: &Params) -> ApiResult {
        let ids = p.ids("article_ids");
        let mode = p.int("mode");
        let field = p.int("field");
        if ids.is_empty() || !(0..=3).contains(&field) {
            return Err("INCORRECT_USAGE");
        }
        let data = p.text("data").to_string();
        let apply = |current: bool| match mode {
            0 => false,
            1 => true,
            _ => !current,
        };

        let mut updated = 0;
        for id in ids {
            let Some(article) = self.articles.get_mut(&id) else {
                continue;
            };
            match field {
                0 => article.marked = apply(article.marked),
                1 => article.published = apply(article.published),
                2 => article.unread = apply(article.unread),
                _ => article.note = data.clone(),
            }
            updated += 1;
        }
        Ok(json!({"status": "OK", "updated": updated}))
    }

    pub fn get_article(&self, p: &Params) -> ApiResult {
        let ids = p.ids("article_id");
        if ids.is_empty() {
            return Err("INCORRECT_USAGE");
        }
        let articles = ids
            .iter()
            .filter_map(|id| self.articles.get(id))
            .map(|a| {
                json!({
                    "id": a.id.to_string(),
                    "title": a.title,
                    "link": a.link,
                    "labels": self.label_refs(a),
                    "unread": a.unread,
                    "marked": a.marked,
                    "published": a.published,
                    "comments": "",
                    "author": a.author,
                    "updated": a.updated,
                    "content": a.content,
                    "feed_id": a.feed_id.to_string(),
                    "feed_title": self.feed_title(a.feed_id),
                    "attachments": [],
                    "score": 0,
                    "note": a.note,
                })
            })
            .collect();
        Ok(Value::Array(articles))
    }

    // -----------------------------------------------------------------------
    // Labels and publishing
    // -----------------------------------------------------------------------

    pub fn get_labels(&self, p: &Params) -> ApiResult {
        let article = self.articles.get(&p.int("article_id"));
        let labels = self
            .labels
            .iter()
            .map(|l| {
                json!({
                    "id": l.id,
                    "caption": l.caption,
                    "fg_color": l.fg_color,
                    "bg_color": l.bg_color,
                    "checked": article.is_some_and(|a| a.labels.contains(&l.id)),
                })
            })
            .collect();
        Ok(Value::Array(labels))
    }

    pub fn set_article_label(&mut self, p: &Params) -> ApiResult {
        let ids = p.ids("article_ids");
        let label_id = p.int("label_id");
        let assign = p.flag("assign");
        let known = self.label(label_id).is_some();

        let mut updated = 0;
        for id in ids {
            let Some(article) = self.articles.get_mut(&id) else {
                continue;
            };
            if known {
                article.labels.retain(|l| *l != label_id);
                if assign {
                    article.labels.push(label_id);
                }
            }
            updated += 1;
        }
        Ok(json!({"status": "OK", "updated": updated}))
    }

    pub fn share_to_published(&mut self, p: &Params) -> ApiResult {
        let title = p.text("title");
        let url = p.text("url");
        if title.is_empty() || url.is_empty() {
            return Err("FAILED");
        }
        let id = self.articles.keys().max().copied().unwrap_or(0) + 1;
        self.articles.insert(
            id,
            Article {
                id,
                feed_id: ARCHIVED,
                title: title.to_string(),
                link: url.to_string(),
                content: p.text("content").to_string(),
                author: String::new(),
                updated: now(),
                unread: false,
                marked: false,
                published: true,
                is_updated: false,
                note: String::new(),
                tags: Vec::new(),
                labels: Vec::new(),
            },
        );
        Ok(json!({"status": "OK"}))
    }

    // -----------------------------------------------------------------------
    // Server information
    // -----------------------------------------------------------------------

    pub fn get_config(&self) -> ApiResult {
        Ok(json!({
            "icons_dir": "feed-icons",
            "icons_url": "feed-icons",
            "daemon_is_running": false,
            "num_feeds": self.feeds.len(),
        }))
    }

    pub fn get_pref(&self, p: &Params) -> ApiResult {
        let value = self.prefs.get(p.text("pref_name")).cloned().unwrap_or(Value::Null);
        Ok(json!({"value": value}))
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
