//! HTTP exchange types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ApiClient` builds an
//! `HttpRequest` and parses an `HttpResponse` without touching the network;
//! a `Transport` performs the exchange in between. Every API call is a
//! JSON POST to the same endpoint, so there is no method field.

/// One JSON POST to the API endpoint, described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The server's reply, described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 reply carrying `body`, with no headers.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            url: "http://localhost/api/".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: "{}".to_string(),
        };
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
    }
}
