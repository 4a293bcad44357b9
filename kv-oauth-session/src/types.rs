mod request;
mod response;
mod token;

pub use request::{RefreshRequestParameters, TokenGrantType};
pub use response::{OAuthErrorResponse, OAuthTokenResponse};
pub use token::TokenSet;
