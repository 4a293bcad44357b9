//! Token Store Adapter: per-session [`TokenSet`] persistence.
mod kv;

pub use self::kv::KvTokenStore;
use crate::types::TokenSet;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("token store backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("stored tokens could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Reads and writes the [`TokenSet`] of a session, keyed by an opaque session id.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait TokenStore {
    fn get_tokens(&self, session_id: &str) -> impl Future<Output = Result<Option<TokenSet>>>;
    /// Replaces whatever was stored for `session_id`.
    fn set_tokens(&self, session_id: &str, tokens: TokenSet) -> impl Future<Output = Result<()>>;
    fn delete_tokens(&self, session_id: &str) -> impl Future<Output = Result<()>>;
}

impl<T> TokenStore for Arc<T>
where
    T: TokenStore + Send + Sync + 'static,
{
    async fn get_tokens(&self, session_id: &str) -> Result<Option<TokenSet>> {
        self.as_ref().get_tokens(session_id).await
    }
    async fn set_tokens(&self, session_id: &str, tokens: TokenSet) -> Result<()> {
        self.as_ref().set_tokens(session_id, tokens).await
    }
    async fn delete_tokens(&self, session_id: &str) -> Result<()> {
        self.as_ref().delete_tokens(session_id).await
    }
}
