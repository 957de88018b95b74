//! In-memory Tiny Tiny RSS `/api/` endpoint for exercising the client.
//!
//! Every request is a JSON object with an `op` member; every reply is
//! `{"seq", "status", "content"}` with HTTP 200, errors included.

pub mod store;

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

pub use store::{Params, Store};

pub type Db = Arc<RwLock<Store>>;

/// Operations that answer without a valid session.
const NO_AUTH: &[&str] = &["login", "isLoggedIn"];

pub fn app() -> Router {
    app_with(Store::default())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/", post(api))
        .route("/api", post(api))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn reply(seq: i64, result: Result<Value, &str>) -> Json<Value> {
    match result {
        Ok(content) => Json(json!({"seq": seq, "status": 0, "content": content})),
        Err(code) => Json(json!({"seq": seq, "status": 1, "content": {"error": code}})),
    }
}

async fn api(State(db): State<Db>, body: String) -> Json<Value> {
    let Ok(request) = serde_json::from_str::<Value>(&body) else {
        warn!("rejecting unparsable request body");
        return reply(0, Err("INCORRECT_USAGE"));
    };
    let p = Params(&request);
    let seq = p.int("seq");
    let op = p.text("op");
    let sid = p.text("sid");
    debug!(op, seq, "api request");

    if !NO_AUTH.contains(&op) && !db.read().await.has_session(sid) {
        return reply(seq, Err("NOT_LOGGED_IN"));
    }

    let result = match op {
        "login" => db.write().await.login(&p),
        "logout" => db.write().await.logout(sid),
        "isLoggedIn" => db.read().await.is_logged_in(sid),
        "getApiLevel" => Ok(json!({"level": store::API_LEVEL})),
        "getVersion" => Ok(json!({"version": store::VERSION})),
        "getConfig" => db.read().await.get_config(),
        "getPref" => db.read().await.get_pref(&p),
        "getUnread" => db.read().await.get_unread(),
        "getCounters" => db.read().await.get_counters(&p),
        "getFeeds" => db.read().await.get_feeds(&p),
        "getCategories" => db.read().await.get_categories(&p),
        "getFeedTree" => db.read().await.get_feed_tree(&p),
        "updateFeed" => db.write().await.update_feed(&p),
        "catchupFeed" => db.write().await.catchup_feed(&p),
        "subscribeToFeed" => db.write().await.subscribe_to_feed(&p),
        "unsubscribeFeed" => db.write().await.unsubscribe_feed(&p),
        "getHeadlines" => db.read().await.get_headlines(&p),
        "updateArticle" => db.write().await.update_article(&p),
        "getArticle" => db.read().await.get_article(&p),
        "getLabels" => db.read().await.get_labels(&p),
        "setArticleLabel" => db.write().await.set_article_label(&p),
        "shareToPublished" => db.write().await.share_to_published(&p),
        other => {
            warn!(op = other, "unknown method");
            Err("UNKNOWN_METHOD")
        }
    };
    reply(seq, result)
}
