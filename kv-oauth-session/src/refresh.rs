//! OAuth 2.0 refresh grant client.
use crate::config::OAuthConfig;
use crate::constants::INVALID_GRANT;
use crate::types::{
    OAuthErrorResponse, OAuthTokenResponse, RefreshRequestParameters, TokenGrantType, TokenSet,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use kv_oauth_common::http_client::HttpClient;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum Error {
    #[error("refresh grant rejected: {}", .0.as_deref().unwrap_or(INVALID_GRANT))]
    InvalidGrant(Option<String>),
    #[error(transparent)]
    Http(#[from] http::Error),
    #[error("http client error: {0}")]
    HttpClient(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("http status: {0}")]
    HttpStatus(StatusCode),
    #[error("http status: {0}, body: {1:?}")]
    HttpStatusWithBody(StatusCode, OAuthErrorResponse),
    #[error(transparent)]
    SerdeHtmlForm(#[from] serde_html_form::ser::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    /// Whether the provider explicitly declared the refresh token unusable.
    pub fn is_invalid_grant(&self) -> bool {
        matches!(self, Self::InvalidGrant(_))
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// Exchanges a refresh token for a new [`TokenSet`].
///
/// Implementations must report a provider's `invalid_grant` answer as
/// [`Error::InvalidGrant`] and every other failure as some other variant.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait RefreshClient {
    fn refresh(&self, refresh_token: &str) -> impl Future<Output = Result<TokenSet>>;
}

impl<T> RefreshClient for Arc<T>
where
    T: RefreshClient + Send + Sync + 'static,
{
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        self.as_ref().refresh(refresh_token).await
    }
}

#[derive(Debug, Serialize)]
struct RequestPayload<T>
where
    T: Serialize,
{
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(flatten)]
    parameters: T,
}

/// [`RefreshClient`] speaking the standard refresh grant to the configured token endpoint.
///
/// Confidential clients authenticate with HTTP Basic, public clients send
/// `client_id` in the form body.
pub struct OAuthRefreshClient<T> {
    config: OAuthConfig,
    http_client: Arc<T>,
}

impl<T> OAuthRefreshClient<T> {
    pub fn new(config: OAuthConfig, http_client: Arc<T>) -> Self {
        Self { config, http_client }
    }
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }
    fn build_body<S>(&self, parameters: S) -> Result<String>
    where
        S: Serialize,
    {
        let client_id = match self.config.client_secret {
            Some(_) => None,
            None => Some(self.config.client_id.clone()),
        };
        Ok(serde_html_form::to_string(RequestPayload { client_id, parameters })?)
    }
    // https://datatracker.ietf.org/doc/html/rfc6749#section-2.3.1
    fn basic_auth(&self) -> Option<String> {
        self.config.client_secret.as_ref().map(|secret| {
            format!("Basic {}", STANDARD.encode(format!("{}:{secret}", self.config.client_id)))
        })
    }
}

#[cfg(feature = "default-client")]
impl OAuthRefreshClient<kv_oauth_common::http_client::default::DefaultHttpClient> {
    pub fn with_default_client(config: OAuthConfig) -> Self {
        Self::new(config, Arc::default())
    }
}

impl<T> Clone for OAuthRefreshClient<T> {
    fn clone(&self) -> Self {
        Self { config: self.config.clone(), http_client: Arc::clone(&self.http_client) }
    }
}

impl<T> RefreshClient for OAuthRefreshClient<T>
where
    T: HttpClient + Send + Sync + 'static,
{
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        let body = self.build_body(RefreshRequestParameters {
            grant_type: TokenGrantType::RefreshToken,
            refresh_token: refresh_token.into(),
            scope: (!self.config.scope.is_empty()).then(|| self.config.scope.join(" ")),
        })?;
        let mut builder = Request::builder()
            .uri(self.config.token_endpoint.as_str())
            .method(Method::POST)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json");
        if let Some(authorization) = self.basic_auth() {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        let req = builder.body(body.into_bytes())?;
        let res = self.http_client.send_http(req).await.map_err(Error::HttpClient)?;
        let status = res.status();
        debug!(%status, endpoint = %self.config.token_endpoint, "refresh grant response");
        if status.is_success() {
            Ok(serde_json::from_slice::<OAuthTokenResponse>(res.body())?.into())
        } else if status.is_client_error() {
            match serde_json::from_slice::<OAuthErrorResponse>(res.body()) {
                Ok(body) if body.error == INVALID_GRANT => {
                    Err(Error::InvalidGrant(body.error_description))
                }
                Ok(body) => Err(Error::HttpStatusWithBody(status, body)),
                Err(_) => Err(Error::HttpStatus(status)),
            }
        } else {
            Err(Error::HttpStatus(status))
        }
    }
}
