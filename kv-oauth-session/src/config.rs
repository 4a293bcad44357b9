//! Provider and resolver configuration.
use crate::constants::DEFAULT_REFRESH_MARGIN_SECS;
use http::Uri;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("environment variable `{0}` is not set")]
    MissingEnv(String),
    #[error("`client_id` must not be empty")]
    EmptyClientId,
    #[error("`{name}` is not an absolute URL: {value}")]
    InvalidEndpoint { name: &'static str, value: String },
}

/// OAuth 2.0 client registration for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,
}

impl OAuthConfig {
    /// Reads the configuration from `{PREFIX}_*` environment variables.
    ///
    /// `{PREFIX}_CLIENT_ID`, `{PREFIX}_AUTHORIZATION_ENDPOINT` and `{PREFIX}_TOKEN_ENDPOINT`
    /// are required. `{PREFIX}_CLIENT_SECRET`, `{PREFIX}_REDIRECT_URI` and the
    /// space separated `{PREFIX}_SCOPE` are optional.
    pub fn from_env(prefix: &str) -> Result<Self, Error> {
        Self::from_lookup(prefix, |name| std::env::var(name).ok())
    }
    pub(crate) fn from_lookup(
        prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let optional = |suffix: &str| lookup(&format!("{prefix}_{suffix}"));
        let required = |suffix: &str| {
            let name = format!("{prefix}_{suffix}");
            lookup(&name).ok_or(Error::MissingEnv(name))
        };
        let config = Self {
            client_id: required("CLIENT_ID")?,
            client_secret: optional("CLIENT_SECRET"),
            authorization_endpoint: required("AUTHORIZATION_ENDPOINT")?,
            token_endpoint: required("TOKEN_ENDPOINT")?,
            redirect_uri: optional("REDIRECT_URI"),
            scope: optional("SCOPE")
                .map(|s| s.split_whitespace().map(String::from).collect())
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), Error> {
        if self.client_id.is_empty() {
            return Err(Error::EmptyClientId);
        }
        for (name, value) in [
            ("authorization_endpoint", &self.authorization_endpoint),
            ("token_endpoint", &self.token_endpoint),
        ] {
            let absolute = value
                .parse::<Uri>()
                .is_ok_and(|uri| uri.scheme().is_some() && uri.authority().is_some());
            if !absolute {
                return Err(Error::InvalidEndpoint { name, value: value.clone() });
            }
        }
        Ok(())
    }
}

/// Tuning for [`AccessTokenResolver`](crate::AccessTokenResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// A refreshable token whose `expires_in` is at or below this many seconds is refreshed.
    pub refresh_margin_secs: i64,
    /// Serialize refreshes per session id so concurrent callers share one refresh.
    pub serialize_refreshes: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { refresh_margin_secs: DEFAULT_REFRESH_MARGIN_SECS, serialize_refreshes: false }
    }
}
