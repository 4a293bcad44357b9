//! Server-side OAuth 2.0 session tokens backed by a key-value store.
//!
//! Each session id maps to a [`TokenSet`] in a [`TokenStore`]. The
//! [`AccessTokenResolver`] hands out the stored access token, refreshing it
//! against the provider when it is about to expire and a refresh token is
//! available:
//!
//! - no stored tokens: `Ok(None)`
//! - no refresh token: the stored access token, whatever its expiry
//! - `expires_in` absent or above the margin (5 seconds by default): the stored access token
//! - otherwise: a refresh grant; the new [`TokenSet`] replaces the stored one,
//!   and an `invalid_grant` answer yields `Ok(None)`
//!
//! Any other refresh or store failure is returned as an [`Error`].
mod constants;
mod error;
mod freshness;
mod resolver;
mod types;

pub mod config;
pub mod refresh;
pub mod store;


pub use config::{OAuthConfig, ResolverConfig};
pub use constants::DEFAULT_REFRESH_MARGIN_SECS;
pub use error::{Error, Result};
pub use freshness::{Freshness, RefreshPolicy};
pub use refresh::{OAuthRefreshClient, RefreshClient};
pub use resolver::AccessTokenResolver;
pub use store::{KvTokenStore, TokenStore};
pub use types::{
    OAuthErrorResponse, OAuthTokenResponse, RefreshRequestParameters, TokenGrantType, TokenSet,
};

/// Resolves an access token for `session_id` with a one-off reqwest-backed refresh client.
///
/// Convenient for request handlers that do not keep an [`AccessTokenResolver`] around.
#[cfg(feature = "default-client")]
pub async fn get_session_access_token<S>(
    config: &OAuthConfig,
    store: S,
    session_id: &str,
) -> Result<Option<String>>
where
    S: TokenStore + Send + Sync + 'static,
{
    config.validate()?;
    AccessTokenResolver::new(store, OAuthRefreshClient::with_default_client(config.clone()))
        .resolve(session_id)
        .await
}
