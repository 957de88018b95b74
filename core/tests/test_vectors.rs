//! Verify build/parse against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected request bodies, canned server
//! replies and the values they must decode to. Comparing parsed JSON (not
//! raw strings) avoids false negatives from member ordering.

use serde_json::Value;
use ttrss_core::{
    ApiClient, ApiError, GetApiLevel, GetArticle, GetCategories, GetConfig, GetCounters,
    GetFeedTree, GetFeeds, GetHeadlines, GetLabels, GetPref, GetUnread, GetVersion,
    HeadlinesQuery, HttpResponse, IsLoggedIn, Login, Logout, Operation, PrefValue, SortOrder,
    SubscribeToFeed, UpdateArticle, UpdateField, UpdateMode, ViewMode,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ApiClient {
    ApiClient::new(BASE_URL)
}

/// A canned reply; string bodies are sent verbatim, anything else as JSON.
fn response(status: u16, body: &Value) -> HttpResponse {
    let body = match body {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    };
    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn parse<O: Operation>(body: &Value) -> O::Content {
    let reply = client()
        .parse::<O>(response(200, body))
        .unwrap_or_else(|e| panic!("{}: {e}", O::NAME));
    assert!(reply.is_ok(), "{}: {:?}", O::NAME, reply.error);
    reply.content
}

fn i64s(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}

fn strs(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect()
}

fn view_mode(name: &str) -> ViewMode {
    match name {
        "all_articles" => ViewMode::AllArticles,
        "unread" => ViewMode::UnreadOnly,
        "adaptive" => ViewMode::Adaptive,
        "marked" => ViewMode::MarkedOnly,
        "updated" => ViewMode::UpdatedOnly,
        other => panic!("unknown view mode: {other}"),
    }
}

fn sort_order(name: &str) -> SortOrder {
    match name {
        "" => SortOrder::NoSort,
        "feed_dates" => SortOrder::SortByFeedDateNewestFirst,
        "date_reverse" => SortOrder::SortByFeedDateOldestFirst,
        other => panic!("unknown sort order: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn login_test_vectors() {
    let raw = include_str!("../../test-vectors/login.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let login = Login {
            user: input["user"].as_str().unwrap().to_string(),
            password: input["password"].as_str().unwrap().to_string(),
        };
        let seq = case["seq"].as_u64().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build(&login, None, seq).unwrap();
        assert_eq!(
            req.url,
            format!("{BASE_URL}{}", expected_req["url"].as_str().unwrap()),
            "{name}: url"
        );
        let expected_headers: Vec<(String, String)> =
            serde_json::from_value(expected_req["headers"].clone()).unwrap();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
        let body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body, expected_req["body"], "{name}: body");

        // Verify parse
        let resp = &case["response"];
        let status = resp["status"].as_u64().unwrap() as u16;
        let reply = c.parse::<Login>(response(status, &resp["body"])).unwrap();
        let expected = &case["expected"];
        assert_eq!(reply.seq, expected["seq"].as_u64().unwrap(), "{name}: seq");
        assert_eq!(reply.status as i64, expected["status"].as_i64().unwrap(), "{name}: status");
        assert_eq!(reply.content.session_id, expected["session_id"], "{name}: session_id");
        assert_eq!(reply.content.api_level, expected["api_level"].as_i64().unwrap(), "{name}: api_level");
        match expected["error"].as_str() {
            None => assert!(reply.error.is_none(), "{name}: unexpected error {:?}", reply.error),
            Some(code) => assert_eq!(
                reply.error,
                Some(ApiError::Application(code.to_string())),
                "{name}: error"
            ),
        }
    }

    for case in vectors["transport_errors"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let resp = &case["response"];
        let status = resp["status"].as_u64().unwrap() as u16;
        let err = c.parse::<Login>(response(status, &resp["body"])).unwrap_err();
        match case["expected_error"].as_str().unwrap() {
            "http" => assert!(
                matches!(err, ApiError::Http { status: s, .. } if s == status),
                "{name}: {err:?}"
            ),
            "deserialization" => {
                assert!(matches!(err, ApiError::Deserialization(_)), "{name}: {err:?}")
            }
            other => panic!("{name}: unknown expected_error {other}"),
        }
        assert!(err.is_transport() || matches!(err, ApiError::Deserialization(_)));
    }
}

// ---------------------------------------------------------------------------
// Headlines
// ---------------------------------------------------------------------------

#[test]
fn headlines_test_vectors() {
    let raw = include_str!("../../test-vectors/headlines.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let defaults = HeadlinesQuery::default();
        let int = |key: &str, default: i64| input[key].as_i64().unwrap_or(default);
        let flag = |key: &str, default: bool| input[key].as_bool().unwrap_or(default);
        let query = HeadlinesQuery {
            feed_id: int("feed_id", defaults.feed_id),
            limit: int("limit", 0) as u32,
            skip: int("skip", 0) as u32,
            is_cat: flag("is_cat", false),
            show_excerpt: flag("show_excerpt", false),
            show_content: flag("show_content", false),
            view_mode: view_mode(input["view_mode"].as_str().unwrap_or("all_articles")),
            include_attachments: flag("include_attachments", false),
            since_id: int("since_id", 0),
            include_nested: flag("include_nested", false),
            sanitize: flag("sanitize", defaults.sanitize),
            order_by: sort_order(input["order_by"].as_str().unwrap_or("")),
        };

        let sid = case["sid"].as_str();
        let seq = case["seq"].as_u64().unwrap();
        let req = c.build(&GetHeadlines::new(query), sid, seq).unwrap();
        let body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body, case["expected_body"], "{name}: body");
    }

    let headlines = parse::<GetHeadlines>(&vectors["reply"]);
    let expected = vectors["expected"].as_array().unwrap();
    assert_eq!(headlines.len(), expected.len());
    for (headline, exp) in headlines.iter().zip(expected) {
        let id = headline.id;
        assert_eq!(id, exp["id"].as_i64().unwrap());
        assert_eq!(headline.unread, exp["unread"].as_bool().unwrap(), "{id}: unread");
        assert_eq!(headline.marked, exp["marked"].as_bool().unwrap(), "{id}: marked");
        assert_eq!(headline.feed_id, exp["feed_id"].as_i64().unwrap(), "{id}: feed_id");
        assert_eq!(
            headline.comments_count,
            exp["comments_count"].as_i64().unwrap(),
            "{id}: comments_count"
        );
        let captions: Vec<&str> = headline.labels.iter().map(|l| l.caption()).collect();
        assert_eq!(captions, strs(&exp["labels"]), "{id}: labels");
        assert_eq!(
            headline.attachments.len() as u64,
            exp["attachments"].as_u64().unwrap(),
            "{id}: attachments"
        );
        assert_eq!(headline.note.as_deref(), exp["note"].as_str(), "{id}: note");
        assert_eq!(headline.content.as_deref(), exp["content"].as_str(), "{id}: content");
    }
}

// ---------------------------------------------------------------------------
// Update article
// ---------------------------------------------------------------------------

#[test]
fn update_article_test_vectors() {
    let raw = include_str!("../../test-vectors/update_article.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let mode = match input["mode"].as_str().unwrap() {
            "set_false" => UpdateMode::SetFalse,
            "set_true" => UpdateMode::SetTrue,
            "toggle" => UpdateMode::Toggle,
            other => panic!("{name}: unknown mode {other}"),
        };
        let field = match input["field"].as_str().unwrap() {
            "starred" => UpdateField::Starred,
            "published" => UpdateField::Published,
            "unread" => UpdateField::Unread,
            "note" => UpdateField::Note,
            other => panic!("{name}: unknown field {other}"),
        };
        let op = UpdateArticle::new(
            &i64s(&input["article_ids"]),
            mode,
            field,
            input["data"].as_str().unwrap(),
        );

        let req = c.build(&op, Some("s"), 2).unwrap();
        let body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body, case["expected_body"], "{name}: body");

        let reply = c
            .parse::<UpdateArticle>(response(200, &case["response"]))
            .unwrap();
        assert_eq!(
            reply.content.updated,
            case["expected_updated"].as_i64().unwrap(),
            "{name}: updated"
        );
    }
}

// ---------------------------------------------------------------------------
// Other replies
// ---------------------------------------------------------------------------

#[test]
fn reply_test_vectors() {
    let raw = include_str!("../../test-vectors/replies.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let body = &case["body"];
        let exp = &case["expected"];
        match case["op"].as_str().unwrap() {
            "getVersion" => {
                assert_eq!(parse::<GetVersion>(body).version, exp["version"]);
            }
            "getApiLevel" => {
                assert_eq!(parse::<GetApiLevel>(body).level, exp["level"].as_i64().unwrap());
            }
            "isLoggedIn" => {
                assert_eq!(parse::<IsLoggedIn>(body).status, exp["status"].as_bool().unwrap());
            }
            "logout" => {
                assert_eq!(parse::<Logout>(body).status, exp["status"]);
            }
            "getUnread" => {
                assert_eq!(parse::<GetUnread>(body).unread.as_i64(), exp["unread"].as_i64());
            }
            "getCounters" => {
                let counters = parse::<GetCounters>(body);
                assert_eq!(counters.len() as u64, exp["len"].as_u64().unwrap());
                let ids: Vec<String> = counters.iter().map(|c| c.id.to_string()).collect();
                assert_eq!(ids, strs(&exp["ids"]));
                let values: Vec<i64> = counters
                    .iter()
                    .map(|c| c.counter.as_i64().unwrap())
                    .collect();
                assert_eq!(values, i64s(&exp["counters"]));
                let kinds: Vec<Option<&str>> =
                    counters.iter().map(|c| c.kind.as_deref()).collect();
                let expected_kinds: Vec<Option<&str>> = exp["kinds"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(Value::as_str)
                    .collect();
                assert_eq!(kinds, expected_kinds);
                let has_img: Vec<Option<i64>> = counters.iter().map(|c| c.has_img).collect();
                let expected_img: Vec<Option<i64>> = exp["has_img"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(Value::as_i64)
                    .collect();
                assert_eq!(has_img, expected_img);
            }
            "getFeeds" => {
                let feeds = parse::<GetFeeds>(body);
                let ids: Vec<i64> = feeds.iter().map(|f| f.id).collect();
                assert_eq!(ids, i64s(&exp["ids"]));
                let unread: Vec<i64> = feeds.iter().map(|f| f.unread.as_i64().unwrap()).collect();
                assert_eq!(unread, i64s(&exp["unread"]));
                let cat_ids: Vec<i64> = feeds.iter().map(|f| f.cat_id).collect();
                assert_eq!(cat_ids, i64s(&exp["cat_ids"]));
                assert_eq!(feeds[0].has_icon, Some(true));
                assert_eq!(feeds[2].is_cat, Some(true));
            }
            "getCategories" => {
                let categories = parse::<GetCategories>(body);
                let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
                assert_eq!(ids, i64s(&exp["ids"]));
                let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
                assert_eq!(titles, strs(&exp["titles"]));
                assert_eq!(categories[1].order_id, None);
            }
            "getFeedTree" => {
                let tree = parse::<GetFeedTree>(body).categories;
                assert_eq!(tree.identifier, "id");
                assert_eq!(tree.label, "name");
                let tech = &tree.items[0];
                assert!(tech.is_category());
                assert_eq!(tech.child_unread, Some(2));
                let feeds = tech.feeds();
                let names: Vec<&str> = feeds.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, strs(&exp["feeds"]));
                let icons: Vec<Option<&str>> = feeds.iter().map(|f| f.icon.as_deref()).collect();
                let expected_icons: Vec<Option<&str>> = exp["icons"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(Value::as_str)
                    .collect();
                assert_eq!(icons, expected_icons);
            }
            "getConfig" => {
                let config = parse::<GetConfig>(body);
                assert_eq!(config.icons_dir, exp["icons_dir"]);
                assert_eq!(config.daemon_is_running, exp["daemon_is_running"].as_bool().unwrap());
                assert_eq!(config.num_feeds, exp["num_feeds"].as_i64().unwrap());
            }
            "getPref" => {
                let pref = parse::<GetPref>(body);
                assert_eq!(
                    pref.value,
                    Some(PrefValue::Str(exp["value"].as_str().unwrap().to_string()))
                );
            }
            "subscribeToFeed" => {
                let status = parse::<SubscribeToFeed>(body).status;
                assert_eq!(status.code, exp["code"].as_i64().unwrap());
                assert_eq!(status.feed_id, exp["feed_id"].as_i64());
                assert_eq!(status.is_subscribed(), exp["subscribed"].as_bool().unwrap());
            }
            "getArticle" => {
                let articles = parse::<GetArticle>(body);
                assert_eq!(articles.len(), 1);
                assert_eq!(articles[0].id, exp["id"].as_i64().unwrap());
                assert_eq!(articles[0].feed_id, exp["feed_id"].as_i64().unwrap());
                assert_eq!(articles[0].note.as_deref(), exp["note"].as_str());
            }
            "getLabels" => {
                let labels = parse::<GetLabels>(body);
                let ids: Vec<i64> = labels.iter().map(|l| l.id).collect();
                assert_eq!(ids, i64s(&exp["ids"]));
                let checked: Vec<bool> = labels.iter().map(|l| l.checked).collect();
                let expected_checked: Vec<bool> = exp["checked"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|v| v.as_bool().unwrap())
                    .collect();
                assert_eq!(checked, expected_checked);
            }
            other => panic!("no assertions for {other}"),
        }
    }
}
