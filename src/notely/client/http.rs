use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::config::NotelyConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Production transport over HTTPS.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token_header: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, token_header: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_header: token_header.into(),
        }
    }

    pub fn from_config(config: &NotelyConfig) -> Self {
        Self::new(&config.api_url, &config.token_header)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method.into(), &url);
        if let Some(token) = &request.token {
            builder = builder.header(self.token_header.as_str(), token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::NetworkFailure(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkFailure(e.to_string()))?;

        debug!(status, "received response");
        Ok(ApiResponse { status, body })
    }
}
