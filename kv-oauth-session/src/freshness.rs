use crate::constants::DEFAULT_REFRESH_MARGIN_SECS;
use crate::types::TokenSet;

/// What a stored [`TokenSet`] allows the resolver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// The access token has more than the margin of nominal validity left, or never expires.
    Fresh,
    /// There is no refresh token, so the access token is handed out as is.
    NotRefreshable,
    /// The access token is expired or about to be, and can be renewed with this refresh token.
    Stale { refresh_token: String },
}

/// Decides when a stored access token must be refreshed.
///
/// `expires_in` is compared as stored, not against elapsed wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    margin_secs: i64,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_MARGIN_SECS)
    }
}

impl RefreshPolicy {
    pub fn new(margin_secs: i64) -> Self {
        Self { margin_secs }
    }
    pub fn margin_secs(&self) -> i64 {
        self.margin_secs
    }
    pub fn evaluate(&self, tokens: &TokenSet) -> Freshness {
        let Some(refresh_token) = &tokens.refresh_token else {
            return Freshness::NotRefreshable;
        };
        match tokens.expires_in {
            Some(expires_in) if expires_in <= self.margin_secs => {
                Freshness::Stale { refresh_token: refresh_token.clone() }
            }
            _ => Freshness::Fresh,
        }
    }
}
