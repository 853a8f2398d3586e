//! HTTP client abstraction for testability

use std::time::Duration;

use tracing::{debug, warn};

use super::types::{HttpResponse, NetworkError};
use crate::cache::BoxFuture;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("loppo/", env!("CARGO_PKG_VERSION"));

/// Trait for outbound HTTP requests.
///
/// An `Err` means no response arrived; every HTTP status is an `Ok`. Boxed
/// futures keep the trait usable as `Arc<dyn HttpClient>`.
pub trait HttpClient: Send + Sync {
    /// Performs a request with the given method.
    fn send(&self, method: &str, url: &str) -> BoxFuture<'_, Result<HttpResponse, NetworkError>>;

    /// Performs a GET request.
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, NetworkError>> {
        self.send("GET", url)
    }
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NetworkError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn classify(url: &str, error: reqwest::Error) -> NetworkError {
        if error.is_timeout() {
            NetworkError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_builder() {
            NetworkError::Client(error.to_string())
        } else {
            NetworkError::Connect {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, method: &str, url: &str) -> BoxFuture<'_, Result<HttpResponse, NetworkError>> {
        let url = url.to_string();
        let method = method.to_ascii_uppercase();
        Box::pin(async move {
            let method = reqwest::Method::from_bytes(method.as_bytes())
                .map_err(|e| NetworkError::Client(format!("Invalid method {}: {}", method, e)))?;

            let response = self
                .client
                .request(method, &url)
                .send()
                .await
                .map_err(|e| {
                    let err = Self::classify(&url, e);
                    warn!(url = %url, error = %err, "HTTP request failed");
                    err
                })?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            let body = response.bytes().await.map_err(|e| NetworkError::Body {
                url: url.clone(),
                reason: e.to_string(),
            })?;

            debug!(url = %url, status, bytes = body.len(), "HTTP response");

            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        })
    }
}

/// Client with network access disabled; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClient;

impl HttpClient for OfflineClient {
    fn send(&self, _method: &str, url: &str) -> BoxFuture<'_, Result<HttpResponse, NetworkError>> {
        let url = url.to_string();
        Box::pin(async move { Err(NetworkError::Offline { url }) })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    /// Mock HTTP client with per-URL scripted responses.
    ///
    /// Unscripted URLs fail with a connection error. Every request is
    /// recorded in order.
    #[derive(Default)]
    pub struct MockHttpClient {
        responses: Mutex<HashMap<String, Result<HttpResponse, NetworkError>>>,
        requests: Mutex<Vec<(String, String)>>,
        count: AtomicUsize,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, url: &str, response: HttpResponse) {
            self.responses.lock().insert(url.to_string(), Ok(response));
        }

        pub fn fail(&self, url: &str) {
            self.responses.lock().insert(
                url.to_string(),
                Err(NetworkError::Connect {
                    url: url.to_string(),
                    reason: "scripted failure".to_string(),
                }),
            );
        }

        pub fn request_count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests.lock().iter().map(|(_, url)| url.clone()).collect()
        }

        pub fn requests(&self) -> Vec<(String, String)> {
            self.requests.lock().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn send(
            &self,
            method: &str,
            url: &str,
        ) -> BoxFuture<'_, Result<HttpResponse, NetworkError>> {
            self.count.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .push((method.to_string(), url.to_string()));
            let result = self.responses.lock().get(url).cloned().unwrap_or_else(|| {
                Err(NetworkError::Connect {
                    url: url.to_string(),
                    reason: "no scripted response".to_string(),
                })
            });
            Box::pin(async move { result })
        }
    }

    #[tokio::test]
    async fn test_mock_client_scripted() {
        let mock = MockHttpClient::new();
        mock.respond("http://example.com", HttpResponse::new(200, None, vec![1, 2]));

        let response = mock.get("http://example.com").await.unwrap();
        assert_eq!(response.body.as_ref(), &[1, 2]);
        assert!(mock.get("http://other.com").await.is_err());
        assert_eq!(mock.request_count(), 2);
        assert_eq!(mock.requests()[0].0, "GET");
    }

    #[tokio::test]
    async fn test_offline_client_always_fails() {
        let result = OfflineClient.get("https://tile.openstreetmap.org/1/0/0.png").await;
        assert!(matches!(result, Err(NetworkError::Offline { .. })));
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}
