//! HTTP API client with bearer-token auth.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stacks_shared::{classify_error_body, ApiError};

use crate::config::ApiConfig;

/// HTTP client for making JSON requests against the library API.
///
/// Every response is classified by status family: 2xx bodies are decoded per
/// the operation's expected shape (a decode failure is an [`ApiError::Decode`],
/// not a server error), and non-2xx bodies go through the structured error
/// classifier. Non-2xx is never silently treated as success.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ApiConfig,
}

impl HttpClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { client: Client::new(), config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn apply_auth(rb: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }

    /// GET with optional query parameters.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut rb = self.client.get(self.config.api_url(path));
        if !query.is_empty() {
            rb = rb.query(query);
        }
        let resp = Self::apply_auth(rb, token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }

    /// POST a JSON body, decoding the response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let rb = self.client.post(self.config.api_url(path)).json(body);
        let resp = Self::apply_auth(rb, token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }

    /// POST a JSON body where only success/failure matters.
    pub async fn post_unit<B: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<(), ApiError> {
        let rb = self.client.post(self.config.api_url(path)).json(body);
        let resp = Self::apply_auth(rb, token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_unit(resp).await
    }

    /// PUT a JSON body, decoding the response.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let rb = self.client.put(self.config.api_url(path)).json(body);
        let resp = Self::apply_auth(rb, token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }

    /// DELETE; the response body is ignored on success.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        let rb = self.client.delete(self.config.api_url(path));
        let resp = Self::apply_auth(rb, token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_unit(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

    if !status.is_success() {
        return Err(classify_error_body(status.as_u16(), &text));
    }

    let source = if text.is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(source).map_err(|e| {
        tracing::error!(error = %e, preview = %preview(&text), "response decode failed");
        ApiError::Decode(format!("{e} (body: {})", preview(&text)))
    })
}

async fn read_unit(resp: reqwest::Response) -> Result<(), ApiError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

    if !status.is_success() {
        return Err(classify_error_body(status.as_u16(), &text));
    }
    Ok(())
}

/// A short data preview for decode-error logs.
fn preview(text: &str) -> String {
    const LIMIT: usize = 200;
    if text.len() <= LIMIT {
        text.to_string()
    } else {
        let mut end = LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &text[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_bodies() {
        let long = "x".repeat(500);
        let p = preview(&long);
        assert!(p.len() < 250);
        assert!(p.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
