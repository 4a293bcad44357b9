/// Seconds of remaining nominal validity at or below which a refreshable access token is renewed.
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 5;

pub(crate) const TOKENS_KEY_PREFIX: &str = "tokens/";

// https://datatracker.ietf.org/doc/html/rfc6749#section-5.2
pub(crate) const INVALID_GRANT: &str = "invalid_grant";
