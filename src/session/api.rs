//! HTTP helpers for the JSON API with a consistent timeout and error mapping.
//! Every request carries `Content-Type: application/json` and, when a session
//! token is stored, `Authorization: Bearer <token>`. Caller-supplied headers
//! override the defaults. Non-2xx responses become `AppError::Request` with the
//! server's `error` message (or a generic fallback); network failures are
//! logged and returned as `Transport`/`Timeout`.

use crate::{errors::AppError, session::token::TokenStore};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Response,
};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Maximum number of error characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;
const FALLBACK_ERROR: &str = "Request failed";

/// Per-call options merged over the defaults.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Vec<u8>>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    /// # Errors
    /// Returns `AppError::Transport` if the body cannot be encoded.
    pub fn post_json<B: Serialize>(body: &B) -> Result<Self, AppError> {
        let body = serde_json::to_vec(body)
            .map_err(|err| AppError::Transport(format!("Failed to encode request: {err}")))?;
        Ok(Self {
            method: Method::POST,
            body: Some(body),
            headers: Vec::new(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, tokens: TokenStore) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            tokens,
        })
    }

    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Sends a request and decodes the JSON response body.
    ///
    /// # Errors
    /// `Request` for non-2xx statuses, `Transport`/`Timeout` for network and
    /// decode failures.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, AppError> {
        let url = build_url_with_base(&self.base_url, path);
        let headers = self.merged_headers(&options.headers)?;

        let mut builder = self.http.request(options.method, &url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|err| {
            error!("API request failed: {err}");
            map_request_error(&err)
        })?;

        handle_json_response(response).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.request(path, RequestOptions::default()).await
    }

    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        self.request(path, RequestOptions::post_json(body)?).await
    }

    /// Posts without a body, used to clear the server-side session.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn post_empty(&self, path: &str) -> Result<Value, AppError> {
        let options = RequestOptions {
            method: Method::POST,
            ..RequestOptions::default()
        };
        self.request(path, options).await
    }

    fn merged_headers(&self, overrides: &[(String, String)]) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.tokens.get_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| AppError::Config("Stored token is not a valid header".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in overrides {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| AppError::Config(format!("Invalid header name {name}: {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| AppError::Config(format!("Invalid header value: {err}")))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

/// Builds a URL from an explicit base URL and the provided path.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn map_request_error(err: &reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout
    } else {
        AppError::Transport(err.to_string())
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|err| {
            error!("API request failed: {err}");
            AppError::Transport(format!("Failed to decode response: {err}"))
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    debug!("API returned {status}: {message}");

    Err(AppError::Request {
        status: status.as_u16(),
        message,
    })
}

/// Extracts `{ "error": "..." }` from an error body, trimmed and truncated.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("error").and_then(Value::as_str).map(str::to_string))
        .map(|message| message.trim().chars().take(MAX_ERROR_CHARS).collect::<String>())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}
