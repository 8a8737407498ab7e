//! A cookie-keeping HTTP session for talking to the ticketing site.

use reqwest::{Client, Response, header::HeaderMap};
use url::Url;

use super::HttpClientPoolError;
use crate::config::BaseHttpClientConfig;

/// One browser-like session: a client with its own cookie jar.
///
/// Dropping the session drops its cookies and connections. Strategies that
/// want a clean slate replace the session with [`HttpSession::renew`].
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    config: BaseHttpClientConfig,
    requests_made: usize,
}

impl HttpSession {
    /// Builds a new session with an empty cookie jar.
    pub fn new(config: &BaseHttpClientConfig) -> Result<Self, HttpClientPoolError> {
        let client = Client::builder()
            .cookie_store(true)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .pool_idle_timeout(Some(config.idle_timeout))
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| HttpClientPoolError::HttpClientBuildError(e.to_string()))?;
        Ok(Self { client, config: config.clone(), requests_made: 0 })
    }

    /// Discards this session and returns a fresh one with the same settings.
    pub fn renew(self) -> Result<Self, HttpClientPoolError> {
        tracing::debug!(requests_made = self.requests_made, "Discarding HTTP session.");
        Self::new(&self.config)
    }

    /// Number of requests sent through this session.
    pub fn requests_made(&self) -> usize {
        self.requests_made
    }

    /// Sends a GET with exactly the given headers (on top of the client's
    /// cookie handling).
    pub async fn get(&mut self, url: &Url, headers: HeaderMap) -> Result<Response, reqwest::Error> {
        self.requests_made += 1;
        tracing::debug!(%url, headers = headers.len(), "GET");
        self.client.get(url.clone()).headers(headers).send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_keeps_cookies_between_requests() {
        let mut server = mockito::Server::new_async().await;
        let set_cookie = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("set-cookie", "sid=abc123; Path=/")
            .create_async()
            .await;
        let needs_cookie = server
            .mock("GET", "/events/1")
            .match_header("cookie", "sid=abc123")
            .with_status(200)
            .create_async()
            .await;

        let mut session = HttpSession::new(&BaseHttpClientConfig::default()).unwrap();
        let root = Url::parse(&format!("{}/", server.url())).unwrap();
        let page = Url::parse(&format!("{}/events/1", server.url())).unwrap();

        session.get(&root, HeaderMap::new()).await.unwrap();
        let response = session.get(&page, HeaderMap::new()).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(session.requests_made(), 2);
        set_cookie.assert_async().await;
        needs_cookie.assert_async().await;
    }

    #[tokio::test]
    async fn test_renewed_session_forgets_cookies() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_header("set-cookie", "sid=abc123; Path=/")
            .create_async()
            .await;
        let without_cookie = server
            .mock("GET", "/events/1")
            .match_header("cookie", mockito::Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        let mut session = HttpSession::new(&BaseHttpClientConfig::default()).unwrap();
        let root = Url::parse(&format!("{}/", server.url())).unwrap();
        let page = Url::parse(&format!("{}/events/1", server.url())).unwrap();

        session.get(&root, HeaderMap::new()).await.unwrap();
        let mut session = session.renew().unwrap();
        assert_eq!(session.requests_made(), 0);
        session.get(&page, HeaderMap::new()).await.unwrap();

        without_cookie.assert_async().await;
    }
}
