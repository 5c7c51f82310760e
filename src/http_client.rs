use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// `timeout` bounds this request alone, overriding any client-wide default.
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub is_success: bool,
}

impl HttpResponse {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }
}

pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();

        Ok(HttpResponse {
            status_code: status.as_u16(),
            is_success: status.is_success(),
        })
    }
}

#[derive(Clone)]
enum MockHttpResponse {
    Status(u16),
    ConnectionRefused,
}

/// Canned responses keyed by URL, for exercising probes without a network.
pub struct MockHttpClient {
    responses: HashMap<String, MockHttpResponse>,
    default_response: MockHttpResponse,
    delay: Option<Duration>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            default_response: MockHttpResponse::Status(404),
            delay: None,
        }
    }

    pub fn with_response(mut self, url: &str, status_code: u16) -> Self {
        self.responses
            .insert(url.to_string(), MockHttpResponse::Status(status_code));
        self
    }

    pub fn with_connection_refused(mut self, url: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockHttpResponse::ConnectionRefused);
        self
    }

    pub fn with_default_response(mut self, status_code: u16) -> Self {
        self.default_response = MockHttpResponse::Status(status_code);
        self
    }

    /// Every request takes this long to answer, and fails if that exceeds its timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(delay) = self.delay {
            if delay > timeout {
                tokio::time::sleep(timeout).await;
                return Err(format!("request to {url} timed out after {timeout:?}").into());
            }
            tokio::time::sleep(delay).await;
        }

        match self.responses.get(url).unwrap_or(&self.default_response) {
            MockHttpResponse::Status(status_code) => Ok(HttpResponse {
                status_code: *status_code,
                is_success: (200..300).contains(status_code),
            }),
            MockHttpResponse::ConnectionRefused => {
                Err(format!("connection refused: {url}").into())
            }
        }
    }
}
