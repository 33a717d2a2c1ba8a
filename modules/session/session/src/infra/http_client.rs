use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Request, header};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use session_sdk::{Preflight, SessionApi, SessionError, User, UserPatch};

use crate::config::SessionConfig;

const CURRENT_USER_PATH: &str = "api/users/@me/";
const PREFLIGHT_PATH: &str = "_preflight/";
const BODY_PREVIEW_LIMIT: usize = 256;

/// HTTP adapter implementing [`SessionApi`] against the console backend.
///
/// The underlying hyper client is `Clone + Send + Sync` and pools
/// connections, so one instance is shared by the whole process.
pub struct HttpSessionApi {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    base_url: Url,
    auth_token: Option<SecretString>,
    request_timeout: Duration,
}

impl HttpSessionApi {
    /// Build the adapter from module configuration.
    ///
    /// Plain `http` origins are accepted so a local backend can be used
    /// during development.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the base URL cannot be parsed or TLS
    /// initialization fails.
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        let base_url = parse_base_url(&config.base_url)?;

        let provider = rustls::crypto::CryptoProvider::get_default()
            .cloned()
            .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(provider)
            .map_err(|e| SessionError::InvalidConfig(format!("TLS setup failed: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build::<_, Full<Bytes>>(https);

        Ok(Self {
            client,
            base_url,
            auth_token: config
                .auth_token
                .as_ref()
                .map(|token| SecretString::from(token.expose_secret().to_owned())),
            request_timeout: config.request_timeout(),
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, SessionError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| SessionError::InvalidConfig(format!("invalid API path '{path}': {e}")))?;

        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.auth_token {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }
        let body = match body {
            Some(bytes) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Full::new(Bytes::from(bytes))
            }
            None => Full::new(Bytes::new()),
        };
        let request = builder
            .body(body)
            .map_err(|e| SessionError::Transport(format!("failed to build request: {e}")))?;

        let response = tokio::time::timeout(self.request_timeout, self.client.request(request))
            .await
            .map_err(|_| SessionError::Timeout(self.request_timeout))?
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| SessionError::Transport(format!("failed to read body: {e}")))?
            .to_bytes();
        debug!(status = status.as_u16(), len = bytes.len(), "response received");

        if !status.is_success() {
            return Err(SessionError::Status {
                status: status.as_u16(),
                body_preview: body_preview(&bytes),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    #[instrument(skip_all, fields(base_url = %self.base_url))]
    async fn get_current_user(&self) -> Result<User, SessionError> {
        self.send(Method::GET, CURRENT_USER_PATH, None).await
    }

    #[instrument(skip_all, fields(base_url = %self.base_url))]
    async fn update_current_user(&self, patch: &UserPatch) -> Result<User, SessionError> {
        let body = serde_json::to_vec(patch)?;
        self.send(Method::PATCH, CURRENT_USER_PATH, Some(body)).await
    }

    #[instrument(skip_all, fields(base_url = %self.base_url))]
    async fn get_preflight(&self) -> Result<Preflight, SessionError> {
        self.send(Method::GET, PREFLIGHT_PATH, None).await
    }
}

// Relative API paths are joined onto the base, which therefore must end in '/'.
fn parse_base_url(raw: &str) -> Result<Url, SessionError> {
    let mut url = Url::parse(raw)
        .map_err(|e| SessionError::InvalidConfig(format!("invalid base_url '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SessionError::InvalidConfig(format!(
            "base_url '{raw}' must use http or https"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn body_preview(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.chars().take(BODY_PREVIEW_LIMIT).collect()
}
