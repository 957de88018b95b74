//! Typed client for the Tiny Tiny RSS JSON API.
//!
//! # Overview
//! Every remote operation (login, feeds, headlines, article updates, labels,
//! subscriptions, ...) is a parameter struct implementing [`Operation`] with
//! a typed reply content. [`Caller`] tracks the session id and sequence
//! counter and exposes each operation as a method returning an
//! [`ApiResponse`].
//!
//! # Design
//! - [`ApiClient`] is stateless: `build` produces an [`HttpRequest`] and
//!   `parse` consumes an [`HttpResponse`], so the wire format is testable
//!   without I/O.
//! - [`Transport`] performs the POST; [`UreqTransport`] is the blocking
//!   default and any `Fn(&HttpRequest) -> Result<HttpResponse, ApiError>`
//!   works as a test double.
//! - Failures are data: transport and decode errors are synthesized into
//!   responses with a nonzero status and [`ApiError`] attached; server-side
//!   errors keep the server's status and code.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use ttrss_core::{Caller, ClientConfig, HeadlinesQuery, ViewMode};
//!
//! let mut caller = Caller::new(ClientConfig::new("https://rss.example.org", "me", "secret"));
//! let headlines = caller.get_headlines(&HeadlinesQuery {
//!     view_mode: ViewMode::UnreadOnly,
//!     limit: 20,
//!     ..HeadlinesQuery::default()
//! });
//! for headline in &headlines.content {
//!     println!("{} {}", headline.id, headline.title);
//! }
//! ```

pub mod caller;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use caller::{Caller, ALREADY_LOGGED_OUT};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::*;
