//! API client for the CTFd REST API.
//!
//! There is a single dispatch function, `ApiClient::request`, which takes the
//! HTTP verb as data. `post`, `patch` and `delete` are shorthands for it.

use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use super::ApiError;
use crate::error::{Error, Result};
use crate::models::CreatedResponse;

/// Path prefix of every CTFd API endpoint
pub const API_PREFIX: &str = "/api/v1";

/// API client for CTFd.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    host: String,
    headers: header::HeaderMap,
}

impl ApiClient {
    /// Create a new API client. Trailing `/` on `host` is stripped.
    pub fn new(admin_token: &str, host: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            headers: Self::auth_headers(admin_token)?,
        })
    }

    fn auth_headers(admin_token: &str) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let token = header::HeaderValue::from_str(&format!("Token {}", admin_token))
            .map_err(|_| Error::Config("admin token is not a valid header value".to_string()))?;
        headers.insert(header::AUTHORIZATION, token);
        Ok(headers)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full URL for an API path, e.g. `/users` -> `<host>/api/v1/users`
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}{}", self.host, API_PREFIX, path)
        } else {
            format!("{}{}/{}", self.host, API_PREFIX, path)
        }
    }

    /// Send one authenticated request. Only 200 and 201 count as success;
    /// any other status is logged and returned as `ApiError::Status`.
    pub async fn request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(method = %method, url = %url, "Dispatching CTFd request");

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .headers(self.headers.clone());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        Self::check_response(&method, &url, response).await
    }

    /// Check the status of a response, returning an error with the body if it failed.
    async fn check_response(method: &Method, url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(method, url, status, body);
        warn!(method = %method, url = url, status = status.as_u16(), "{}", err);
        Err(err.into())
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.request::<()>(Method::DELETE, path, None).await
    }

    pub async fn delete_with<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        self.request(Method::DELETE, path, Some(body)).await
    }

    /// Extract `data.id` from a successful create response
    pub async fn created_id(response: Response) -> Result<i64> {
        let url = response.url().to_string();
        let text = response.text().await.map_err(ApiError::from)?;
        let created: CreatedResponse = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "expected {{\"data\": {{\"id\": ...}}}} from {}: {}",
                url, e
            ))
        })?;
        Ok(created.data.id)
    }
}
