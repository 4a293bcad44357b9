use crate::config::ResolverConfig;
use crate::error::Result;
use crate::freshness::{Freshness, RefreshPolicy};
use crate::refresh::RefreshClient;
use crate::store::TokenStore;
use crate::types::TokenSet;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

type RefreshGuards = DashMap<String, Arc<Mutex<()>>>;

/// A handle on one session's refresh mutex.
///
/// Dropping it, including when the owning future is cancelled, removes the
/// map entry once no other caller holds the mutex.
struct SessionGuard<'a> {
    guards: &'a RefreshGuards,
    session_id: &'a str,
    mutex: Arc<Mutex<()>>,
}

impl<'a> SessionGuard<'a> {
    fn acquire(guards: &'a RefreshGuards, session_id: &'a str) -> Self {
        let mutex = Arc::clone(&guards.entry(session_id.to_string()).or_default());
        Self { guards, session_id, mutex }
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // one reference in the map, one here
        self.guards.remove_if(self.session_id, |_, mutex| Arc::strong_count(mutex) == 2);
    }
}

/// Hands out a usable access token for a session, refreshing it lazily.
///
/// Nothing is cached between calls: every [`resolve`](Self::resolve) reads the
/// store, so several processes can share one store consistently.
pub struct AccessTokenResolver<S, R> {
    store: S,
    refresh_client: R,
    policy: RefreshPolicy,
    guards: Option<RefreshGuards>,
}

impl<S, R> AccessTokenResolver<S, R> {
    pub fn new(store: S, refresh_client: R) -> Self {
        Self::with_config(store, refresh_client, ResolverConfig::default())
    }
    pub fn with_config(store: S, refresh_client: R, config: ResolverConfig) -> Self {
        Self {
            store,
            refresh_client,
            policy: RefreshPolicy::new(config.refresh_margin_secs),
            guards: config.serialize_refreshes.then(DashMap::new),
        }
    }
    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }
}

impl<S, R> AccessTokenResolver<S, R>
where
    S: TokenStore + Send + Sync + 'static,
    R: RefreshClient + Send + Sync + 'static,
{
    /// Returns a currently usable access token for `session_id`.
    ///
    /// `Ok(None)` means the session cannot produce a token: nothing is stored,
    /// or the provider answered the refresh with `invalid_grant`. Store failures
    /// and any other refresh failure are returned as errors and leave the stored
    /// tokens untouched.
    pub async fn resolve(&self, session_id: &str) -> Result<Option<String>> {
        let Some(tokens) = self.store.get_tokens(session_id).await? else {
            debug!(session_id, "no tokens stored for session");
            return Ok(None);
        };
        let refresh_token = match self.policy.evaluate(&tokens) {
            Freshness::Stale { refresh_token } => refresh_token,
            freshness => {
                debug!(session_id, ?freshness, "using stored access token");
                return Ok(Some(tokens.access_token));
            }
        };
        match &self.guards {
            Some(guards) => self.resolve_serialized(guards, session_id).await,
            None => self.refresh(session_id, &refresh_token).await,
        }
    }
    async fn resolve_serialized(
        &self,
        guards: &RefreshGuards,
        session_id: &str,
    ) -> Result<Option<String>> {
        let guard = SessionGuard::acquire(guards, session_id);
        let _lock = guard.mutex.lock().await;
        // re-read: another caller may have refreshed while we waited
        let Some(tokens) = self.store.get_tokens(session_id).await? else {
            return Ok(None);
        };
        self.refresh_if_stale(session_id, tokens).await
    }
    async fn refresh_if_stale(&self, session_id: &str, tokens: TokenSet) -> Result<Option<String>> {
        match self.policy.evaluate(&tokens) {
            Freshness::Stale { refresh_token } => self.refresh(session_id, &refresh_token).await,
            _ => Ok(Some(tokens.access_token)),
        }
    }
    async fn refresh(&self, session_id: &str, refresh_token: &str) -> Result<Option<String>> {
        match self.refresh_client.refresh(refresh_token).await {
            Ok(tokens) => {
                let access_token = tokens.access_token.clone();
                self.store.set_tokens(session_id, tokens).await?;
                debug!(session_id, "refreshed session tokens");
                Ok(Some(access_token))
            }
            Err(e) if e.is_invalid_grant() => {
                warn!(session_id, error = %e, "refresh token is no longer usable");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
