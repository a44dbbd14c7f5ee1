// Panel client: wraps a blocking reqwest client, the panel's base URL and
// the status-code translation. One method call is one HTTP request; there
// are no retries. Callers pass the credential explicitly on every call.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{Credential, Settings};
use crate::error::PanelError;
use crate::models::{self, Account, PowerSignal, ResourceSnapshot, Server};

/// Upper bound for a whole request, mapped to `PanelError::Transport`.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct PanelClient {
    client: Client,
    base_url: String,
}

impl PanelClient {
    /// Create a client for the panel URL in `settings`.
    pub fn new(settings: &Settings) -> Result<Self, PanelError> {
        Self::with_timeout(&settings.panel_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, PanelError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coldshard-cli/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(PanelError::Transport)?;
        Ok(PanelClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one authenticated request and classify the result.
    ///
    /// `path` is appended to the base URL as-is and must start with `/`.
    /// A success status yields the parsed JSON body (`Value::Null` for an
    /// empty body); every other outcome is exactly one `PanelError` variant.
    pub fn call(
        &self,
        method: Method,
        path: &str,
        credential: &Credential,
        body: Option<&Value>,
    ) -> Result<Value, PanelError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "panel request");

        let mut req = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(credential.api_key());
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().map_err(PanelError::Transport)?;
        let status = res.status();
        debug!(%method, %url, status = status.as_u16(), "panel response");
        classify(status, &url)?;

        let text = res.text().map_err(PanelError::Transport)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| PanelError::malformed("JSON", e))
    }

    /// `GET /account`.
    ///
    /// Also used by login to verify a candidate key before it is saved.
    pub fn account(&self, credential: &Credential) -> Result<Account, PanelError> {
        let payload = self.call(Method::GET, "/account", credential, None)?;
        models::parse_account(payload)
    }

    /// `GET /`: every server visible to the credential, in panel order.
    pub fn list_servers(&self, credential: &Credential) -> Result<Vec<Server>, PanelError> {
        let payload = self.call(Method::GET, "/", credential, None)?;
        models::parse_server_list(payload)
    }

    /// `GET /servers/{id}`
    pub fn server(&self, credential: &Credential, identifier: &str) -> Result<Server, PanelError> {
        let payload = self.call(Method::GET, &format!("/servers/{identifier}"), credential, None)?;
        models::parse_server(payload)
    }

    /// `GET /servers/{id}/resources`
    pub fn resources(
        &self,
        credential: &Credential,
        identifier: &str,
    ) -> Result<ResourceSnapshot, PanelError> {
        let path = format!("/servers/{identifier}/resources");
        let payload = self.call(Method::GET, &path, credential, None)?;
        models::parse_resources(payload)
    }

    /// `POST /servers/{id}/power` with `{"signal": ...}`.
    pub fn send_power(
        &self,
        credential: &Credential,
        identifier: &str,
        signal: PowerSignal,
    ) -> Result<(), PanelError> {
        let path = format!("/servers/{identifier}/power");
        let body = json!({ "signal": signal });
        self.call(Method::POST, &path, credential, Some(&body))?;
        Ok(())
    }
}

/// Map an HTTP status to `Ok` (2xx) or the matching failure.
pub fn classify(status: StatusCode, url: &str) -> Result<(), PanelError> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        StatusCode::UNAUTHORIZED => PanelError::InvalidCredential,
        StatusCode::FORBIDDEN => PanelError::InsufficientPermission,
        StatusCode::NOT_FOUND => PanelError::ResourceNotFound {
            path: url.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => PanelError::RateLimited,
        s if s.is_server_error() => PanelError::PanelUnavailable { status: s.as_u16() },
        s => PanelError::UnexpectedStatus { status: s.as_u16() },
    })
}
