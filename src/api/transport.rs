//! The transport boundary: one trait method per request, plus a typed wrapper
//! that performs JSON decoding and error classification.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiResult, FailedResponse};
use super::params::QueryParams;
use crate::prelude::*;
use crate::settings::Settings;

/// Common prefix for all API calls.
pub const URL_PREFIX: &str = "/api/v2";

/// Client-identification header carried by every request.
pub const CLIENT_HEADER: &str = "x-user-agent";

const DEFAULT_USER_AGENT: &str = "fleetsync/1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
    Head,
}

/// One request, addressed relative to [`URL_PREFIX`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub params: QueryParams,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: QueryParams::new(),
            body: None,
        }
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A successful raw response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: Bytes,
}

/// Issues one request and returns either a successful raw response or the
/// captured failure. Implementations carry ambient credentials and the
/// client-identification header; retry and classification happen above.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<RawResponse, FailedResponse>;
}

/// Typed access on top of an [`HttpTransport`]: JSON decoding plus
/// status-code classification into [`ApiError`].
#[derive(Clone)]
pub struct Api {
    transport: Arc<dyn HttpTransport>,
}

impl Api {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse> {
        self.transport
            .request(request)
            .await
            .map_err(ApiError::classify)
    }

    fn decode<T: DeserializeOwned>(path: &str, raw: &RawResponse) -> ApiResult<T> {
        serde_json::from_slice(&raw.body)
            .map_err(|err| ApiError::Contract(format!("invalid response payload from {path}: {err}")))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: QueryParams) -> ApiResult<T> {
        let raw = self
            .send(ApiRequest::new(Method::Get, path).with_params(params))
            .await?;
        Self::decode(path, &raw)
    }

    pub async fn get_bytes(&self, path: &str, params: QueryParams) -> ApiResult<Bytes> {
        let raw = self
            .send(ApiRequest::new(Method::Get, path).with_params(params))
            .await?;
        Ok(raw.body)
    }

    pub async fn head(&self, path: &str, params: QueryParams) -> ApiResult<RawResponse> {
        self.send(ApiRequest::new(Method::Head, path).with_params(params))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|err| ApiError::Contract(format!("unencodable request body: {err}")))?;
        let raw = self
            .send(ApiRequest::new(Method::Post, path).with_body(body))
            .await?;
        Self::decode(path, &raw)
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|err| ApiError::Contract(format!("unencodable request body: {err}")))?;
        let raw = self
            .send(ApiRequest::new(Method::Patch, path).with_body(body))
            .await?;
        Self::decode(path, &raw)
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(ApiRequest::new(Method::Delete, path)).await?;
        Ok(())
    }
}

/// Production transport backed by reqwest. Credentials ride on the cookie
/// store; the client-identification header is installed as a default header.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(settings: &Settings) -> Result<Self> {
        let user_agent = settings
            .api
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            CLIENT_HEADER,
            reqwest::header::HeaderValue::from_str(user_agent)
                .context("invalid user agent header value")?,
        );

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api.base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(&self, request: ApiRequest) -> Result<RawResponse, FailedResponse> {
        let url = format!("{}{}{}", self.base_url, URL_PREFIX, request.path);
        debug!("{:?} {url}", request.method);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
            Method::Head => self.client.head(&url),
        };
        if !request.params.is_empty() {
            builder = builder.query(&request.params.to_pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| FailedResponse::unreachable(url.clone(), err))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let content_length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FailedResponse {
                url,
                status: Some(status.as_u16()),
                status_text: status.canonical_reason().unwrap_or("").to_owned(),
                content_type,
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FailedResponse::unreachable(url, err))?;

        Ok(RawResponse {
            status: status.as_u16(),
            content_type,
            content_length,
            body,
        })
    }
}
