//! HTTP client abstraction for testability

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Response body, `None` when the body could not be read
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Status line of a GET whose body has not been read yet
#[derive(Debug)]
pub struct ResponseHead {
    pub status: u16,
    body: PendingBody,
}

#[derive(Debug)]
enum PendingBody {
    Buffered(Option<String>),
    Streaming(reqwest::Response),
}

impl ResponseHead {
    /// A head whose body is already in memory
    pub fn buffered(status: u16, body: Option<String>) -> Self {
        Self {
            status,
            body: PendingBody::Buffered(body),
        }
    }

    fn streaming(response: reqwest::Response) -> Self {
        Self {
            status: response.status().as_u16(),
            body: PendingBody::Streaming(response),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the rest of the body. `None` when it cannot be read.
    pub async fn text(self) -> Option<String> {
        match self.body {
            PendingBody::Buffered(body) => body,
            PendingBody::Streaming(response) => {
                let url = response.url().to_string();
                match response.text().await {
                    Ok(body) => Some(body),
                    Err(e) => {
                        tracing::debug!("Reading response body from {} failed: {}", url, e);
                        None
                    }
                }
            }
        }
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request to the given URL and read the whole body
    async fn get(&self, url: &str) -> crate::Result<HttpResponse>;

    /// Send a GET request, returning once the status line and headers arrive
    async fn open(&self, url: &str) -> crate::Result<ResponseHead>;

    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read_body(url: &str, response: reqwest::Response) -> HttpResponse {
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!("Reading response body from {} failed: {}", url, e);
                None
            }
        };
        HttpResponse { status, body }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| crate::SitecheckError::Http(format!("GET {} failed: {}", url, e)))?;

        let response = Self::read_body(url, response).await;
        tracing::debug!(
            "GET {} -> {} ({} bytes)",
            url,
            response.status,
            response.body.as_ref().map_or(0, String::len)
        );
        Ok(response)
    }

    async fn open(&self, url: &str) -> crate::Result<ResponseHead> {
        tracing::debug!("GET {} (head)", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| crate::SitecheckError::Http(format!("GET {} failed: {}", url, e)))?;

        tracing::debug!("GET {} -> {}", url, response.status());
        Ok(ResponseHead::streaming(response))
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| crate::SitecheckError::Http(format!("POST {} failed: {}", url, e)))?;

        let response = Self::read_body(url, response).await;
        tracing::debug!("POST {} -> {}", url, response.status);
        Ok(response)
    }
}
