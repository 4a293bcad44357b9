use super::response::OAuthTokenResponse;
use serde::{Deserialize, Serialize};

/// The credential state persisted for one session.
///
/// A stored `TokenSet` is never patched in place: a refresh produces a new
/// value that replaces the old one under the same session id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Seconds of validity, as reported by the provider when the set was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl TokenSet {
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            refresh_token: None,
            expires_in: None,
        }
    }
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }
    pub fn with_expires_in(mut self, expires_in: i64) -> Self {
        self.expires_in = Some(expires_in);
        self
    }
}

impl From<OAuthTokenResponse> for TokenSet {
    fn from(response: OAuthTokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omits_absent_fields() {
        let tokens = TokenSet::new("a1", "Bearer");
        assert_eq!(
            serde_json::to_string(&tokens).expect("failed to serialize"),
            r#"{"access_token":"a1","token_type":"Bearer"}"#
        );
        let decoded: TokenSet = serde_json::from_str(r#"{"access_token":"a1","token_type":"Bearer"}"#)
            .expect("failed to deserialize");
        assert_eq!(decoded, tokens);
    }

    #[test]
    fn test_from_token_response_without_rotation() {
        let response: OAuthTokenResponse =
            serde_json::from_str(r#"{"access_token":"a2","token_type":"Bearer"}"#)
                .expect("failed to deserialize");
        assert_eq!(TokenSet::from(response), TokenSet::new("a2", "Bearer"));
    }

    #[test]
    fn test_from_token_response_with_rotation() {
        let response: OAuthTokenResponse = serde_json::from_str(
            r#"{"access_token":"a2","token_type":"Bearer","expires_in":3600,"refresh_token":"r2","scope":"read"}"#,
        )
        .expect("failed to deserialize");
        assert_eq!(
            TokenSet::from(response),
            TokenSet::new("a2", "Bearer").with_refresh_token("r2").with_expires_in(3600)
        );
    }
}
