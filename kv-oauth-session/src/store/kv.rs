use super::{Error, Result, TokenStore};
use crate::constants::TOKENS_KEY_PREFIX;
use crate::types::TokenSet;
use kv_oauth_common::store::Store;

/// A [`TokenStore`] over any string-valued [`Store`].
///
/// Token sets are JSON-encoded and kept under `tokens/{session_id}`, so the
/// backing store can be shared with unrelated data.
#[derive(Debug, Clone, Default)]
pub struct KvTokenStore<S> {
    store: S,
}

impl<S> KvTokenStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
    pub fn inner(&self) -> &S {
        &self.store
    }
    fn key(session_id: &str) -> String {
        format!("{TOKENS_KEY_PREFIX}{session_id}")
    }
}

impl<S> TokenStore for KvTokenStore<S>
where
    S: Store<String, String> + Send + Sync + 'static,
{
    async fn get_tokens(&self, session_id: &str) -> Result<Option<TokenSet>> {
        let Some(encoded) =
            self.store.get(&Self::key(session_id)).await.map_err(|e| Error::Backend(Box::new(e)))?
        else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&encoded)?))
    }
    async fn set_tokens(&self, session_id: &str, tokens: TokenSet) -> Result<()> {
        let encoded = serde_json::to_string(&tokens)?;
        self.store.set(Self::key(session_id), encoded).await.map_err(|e| Error::Backend(Box::new(e)))
    }
    async fn delete_tokens(&self, session_id: &str) -> Result<()> {
        self.store.del(&Self::key(session_id)).await.map_err(|e| Error::Backend(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_oauth_common::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_round_trip() {
        let store = KvTokenStore::new(MemoryStore::default());
        assert!(store.get_tokens("s1").await.expect("get should succeed").is_none());

        let tokens = TokenSet::new("a1", "Bearer").with_refresh_token("r1").with_expires_in(3);
        store.set_tokens("s1", tokens.clone()).await.expect("set should succeed");
        assert_eq!(store.get_tokens("s1").await.expect("get should succeed"), Some(tokens));
        assert!(store.get_tokens("s2").await.expect("get should succeed").is_none());
    }

    #[tokio::test]
    async fn test_set_replaces_whole_token_set() {
        let store = KvTokenStore::new(MemoryStore::default());
        store
            .set_tokens("s1", TokenSet::new("a1", "Bearer").with_refresh_token("r1").with_expires_in(3))
            .await
            .expect("set should succeed");
        store.set_tokens("s1", TokenSet::new("a2", "Bearer")).await.expect("set should succeed");
        assert_eq!(
            store.get_tokens("s1").await.expect("get should succeed"),
            Some(TokenSet::new("a2", "Bearer"))
        );
    }

    #[tokio::test]
    async fn test_delete_tokens() {
        let store = KvTokenStore::new(MemoryStore::default());
        store.set_tokens("s1", TokenSet::new("a1", "Bearer")).await.expect("set should succeed");
        store.delete_tokens("s1").await.expect("delete should succeed");
        assert!(store.get_tokens("s1").await.expect("get should succeed").is_none());
        // deleting an absent session is not an error
        store.delete_tokens("s1").await.expect("delete should succeed");
    }

    #[tokio::test]
    async fn test_key_layout_and_corrupt_value() {
        let store = KvTokenStore::new(MemoryStore::<String, String>::default());
        let backend = store.inner();
        store.set_tokens("s1", TokenSet::new("a1", "Bearer")).await.expect("set should succeed");
        assert_eq!(
            backend.get(&String::from("tokens/s1")).await.expect("get should succeed").as_deref(),
            Some(r#"{"access_token":"a1","token_type":"Bearer"}"#)
        );

        backend
            .set(String::from("tokens/s2"), String::from("not json"))
            .await
            .expect("set should succeed");
        assert!(matches!(store.get_tokens("s2").await, Err(Error::Codec(_))));
    }
}
