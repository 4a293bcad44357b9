//! Shared abstractions for the kv-oauth crates.
//!
//! - [`store::Store`]: an async key-value store, the persistence seam for session state.
//! - [`http_client::HttpClient`]: an async HTTP transport, the seam for talking to OAuth providers.
pub mod http_client;
pub mod store;
