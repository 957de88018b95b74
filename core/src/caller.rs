//! Session-aware client exposing every API operation as a typed method.
//!
//! # Design
//! `Caller` owns a `Session`, an `ApiClient` and a `Transport`. Each
//! operation method runs the same steps: `ensure_session` (implicit login
//! when no token is held), take the next sequence number, build, execute,
//! parse. Failures at any step come back as a synthesized `ApiResponse`
//! with a nonzero status and `error` set, so no method returns `Err`.
//!
//! Every method takes `&mut self`: the token and the counter have a single
//! owner, and sharing a `Caller` across threads means putting it behind a
//! lock of the caller's choosing.
//!
//! Three operations deviate from the common path: `logout` and `is_logged_in`
//! answer locally when no session is held (the latter without attempting a
//! login), and `get_feeds` validates its arguments before anything is sent.

use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};
use crate::types::*;

/// Content status of the synthesized reply to `logout` without a session.
pub const ALREADY_LOGGED_OUT: &str = "already logged out";

/// A Tiny Tiny RSS client bound to one endpoint and one set of credentials.
#[derive(Debug)]
pub struct Caller<T = UreqTransport> {
    config: ClientConfig,
    client: ApiClient,
    session: Session,
    transport: T,
}

impl Caller<UreqTransport> {
    /// A caller using blocking HTTP with the configured timeout.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Caller<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ApiClient::new(&config.base_url),
            config,
            session: Session::new(),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn has_session(&self) -> bool {
        self.session.is_active()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.token()
    }

    /// Log in with the configured credentials unless a session is held.
    ///
    /// On failure the session stays empty and the error explains why: the
    /// transport error, or `Application` with the server's code.
    pub fn ensure_session(&mut self) -> Result<(), ApiError> {
        if self.session.is_active() {
            return Ok(());
        }
        debug!("no session held, logging in");
        let reply = self.login();
        if self.session.is_active() {
            return Ok(());
        }
        Err(reply
            .error
            .unwrap_or_else(|| ApiError::Application("LOGIN_ERROR".to_string())))
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Log in with the configured credentials and remember the session id.
    pub fn login(&mut self) -> ApiResponse<LoginContent> {
        let login = Login {
            user: self.config.username.clone(),
            password: self.config.password.clone(),
        };
        self.send_login(&login)
    }

    /// Log in with explicit credentials instead of the configured ones.
    pub fn login_as(&mut self, user: &str, password: &str) -> ApiResponse<LoginContent> {
        let login = Login {
            user: user.to_string(),
            password: password.to_string(),
        };
        self.send_login(&login)
    }

    fn send_login(&mut self, login: &Login) -> ApiResponse<LoginContent> {
        let mut reply = self.dispatch(login);
        if reply.status != STATUS_OK || reply.error.is_some() {
            return reply;
        }
        if reply.content.session_id.is_empty() {
            warn!(user = %login.user, "login reply carried no session id");
            reply.status = STATUS_ERR;
            reply.error = Some(ApiError::Application("LOGIN_ERROR".to_string()));
            return reply;
        }
        info!(user = %login.user, api_level = reply.content.api_level, "logged in");
        self.session.begin(reply.content.session_id.clone());
        reply
    }

    /// Close the session. Without one, answers "already logged out" locally.
    pub fn logout(&mut self) -> ApiResponse<StatusContent> {
        if !self.session.is_active() {
            return ApiResponse::local(
                STATUS_OK,
                StatusContent {
                    status: ALREADY_LOGGED_OUT.to_string(),
                },
            );
        }
        let reply = self.dispatch(&Logout {});
        // A reply of any status ends the session; a lost request does not.
        if reply.error.as_ref().map_or(true, |e| !e.is_transport()) {
            info!("logged out");
            self.session.end();
        }
        reply
    }

    /// Ask the server whether the held session is valid. Without a session
    /// this fails locally and does not attempt a login.
    pub fn is_logged_in(&mut self) -> ApiResponse<IsLoggedInContent> {
        if !self.session.is_active() {
            return ApiResponse::local(STATUS_ERR, IsLoggedInContent { status: false });
        }
        self.dispatch(&IsLoggedIn {})
    }

    // -----------------------------------------------------------------------
    // Server information
    // -----------------------------------------------------------------------

    pub fn get_api_level(&mut self) -> ApiResponse<ApiLevelContent> {
        self.call(&GetApiLevel {})
    }

    pub fn get_version(&mut self) -> ApiResponse<VersionContent> {
        self.call(&GetVersion {})
    }

    pub fn get_config(&mut self) -> ApiResponse<ConfigContent> {
        self.call(&GetConfig {})
    }

    pub fn get_pref(&mut self, pref_name: &str) -> ApiResponse<PrefContent> {
        self.call(&GetPref {
            pref_name: pref_name.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Feeds and categories
    // -----------------------------------------------------------------------

    pub fn get_unread(&mut self) -> ApiResponse<UnreadContent> {
        self.call(&GetUnread {})
    }

    pub fn get_counters(&mut self, kinds: CounterKinds) -> ApiResponse<Vec<Counter>> {
        self.call(&GetCounters::new(kinds))
    }

    /// Rejected locally, before any login, when `unread_only` is combined
    /// with a nonzero `limit` or `offset`.
    pub fn get_feeds(&mut self, query: &GetFeeds) -> ApiResponse<Vec<Feed>> {
        if let Err(err) = query.validate() {
            warn!(error = %err, "getFeeds rejected locally");
            return ApiResponse::failure(0, err);
        }
        self.call(query)
    }

    pub fn get_categories(&mut self, query: &GetCategories) -> ApiResponse<Vec<Category>> {
        self.call(query)
    }

    pub fn get_feed_tree(&mut self, include_empty: bool) -> ApiResponse<FeedTreeContent> {
        self.call(&GetFeedTree { include_empty })
    }

    pub fn update_feed(&mut self, feed_id: i64) -> ApiResponse<StatusContent> {
        self.call(&UpdateFeed { feed_id })
    }

    pub fn catchup_feed(&mut self, feed_id: i64, is_cat: bool) -> ApiResponse<StatusContent> {
        self.call(&CatchupFeed { feed_id, is_cat })
    }

    pub fn subscribe_to_feed(&mut self, request: &SubscribeToFeed) -> ApiResponse<SubscribeContent> {
        self.call(request)
    }

    pub fn unsubscribe_feed(&mut self, feed_id: i64) -> ApiResponse<StatusContent> {
        self.call(&UnsubscribeFeed { feed_id })
    }

    // -----------------------------------------------------------------------
    // Headlines and articles
    // -----------------------------------------------------------------------

    pub fn get_headlines(&mut self, query: &HeadlinesQuery) -> ApiResponse<Vec<Headline>> {
        self.call(&GetHeadlines::new(query.clone()))
    }

    pub fn get_articles(&mut self, article_ids: &[i64]) -> ApiResponse<Vec<Article>> {
        self.call(&GetArticle::new(article_ids))
    }

    pub fn update_article(
        &mut self,
        article_ids: &[i64],
        mode: UpdateMode,
        field: UpdateField,
        data: &str,
    ) -> ApiResponse<UpdateContent> {
        self.call(&UpdateArticle::new(article_ids, mode, field, data))
    }

    pub fn star_articles(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::SetTrue, UpdateField::Starred, "")
    }

    pub fn unstar_articles(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::SetFalse, UpdateField::Starred, "")
    }

    pub fn toggle_starred(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::Toggle, UpdateField::Starred, "")
    }

    pub fn publish_articles(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::SetTrue, UpdateField::Published, "")
    }

    pub fn unpublish_articles(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::SetFalse, UpdateField::Published, "")
    }

    pub fn toggle_published(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::Toggle, UpdateField::Published, "")
    }

    pub fn mark_unread(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::SetTrue, UpdateField::Unread, "")
    }

    pub fn mark_read(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::SetFalse, UpdateField::Unread, "")
    }

    pub fn toggle_unread(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::Toggle, UpdateField::Unread, "")
    }

    pub fn set_note(&mut self, article_ids: &[i64], note: &str) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::SetTrue, UpdateField::Note, note)
    }

    pub fn clear_note(&mut self, article_ids: &[i64]) -> ApiResponse<UpdateContent> {
        self.update_article(article_ids, UpdateMode::SetFalse, UpdateField::Note, "")
    }

    // -----------------------------------------------------------------------
    // Labels and publishing
    // -----------------------------------------------------------------------

    /// Pass 0 as `article_id` to list labels without checking any article.
    pub fn get_labels(&mut self, article_id: i64) -> ApiResponse<Vec<Label>> {
        self.call(&GetLabels { article_id })
    }

    pub fn set_article_label(
        &mut self,
        article_ids: &[i64],
        label_id: i64,
        assign: bool,
    ) -> ApiResponse<UpdateContent> {
        self.call(&SetArticleLabel::new(article_ids, label_id, assign))
    }

    pub fn share_to_published(
        &mut self,
        title: &str,
        url: &str,
        content: &str,
    ) -> ApiResponse<StatusContent> {
        self.call(&ShareToPublished {
            title: title.to_string(),
            url: url.to_string(),
            content: content.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    /// Run any operation, logging in first when needed.
    pub fn call<O: Operation>(&mut self, op: &O) -> ApiResponse<O::Content> {
        if let Err(err) = self.ensure_session() {
            warn!(op = O::NAME, error = %err, "skipped: no session");
            return ApiResponse::failure(0, err);
        }
        self.dispatch(op)
    }

    /// Send one request with the current session, whatever its state.
    fn dispatch<O: Operation>(&mut self, op: &O) -> ApiResponse<O::Content> {
        let seq = self.session.next_seq();
        debug!(op = O::NAME, seq, "sending");
        match self.exchange(op, seq) {
            Ok(reply) => {
                if let Some(err) = &reply.error {
                    debug!(op = O::NAME, seq, error = %err, "server reported failure");
                }
                reply
            }
            Err(err) => {
                warn!(op = O::NAME, seq, error = %err, "request failed");
                ApiResponse::failure(seq, err)
            }
        }
    }

    fn exchange<O: Operation>(&self, op: &O, seq: u64) -> Result<ApiResponse<O::Content>, ApiError> {
        let request = self.client.build(op, self.session.token(), seq)?;
        let response = self.transport.execute(&request)?;
        self.client.parse::<O>(response)
    }
}
