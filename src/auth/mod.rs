//! Authentication module
//!
//! Supplies OAuth2 bearer tokens for the warehouse API: either a static
//! token or one exchanged from a service-account key (JWT bearer grant).
//!
//! The `TokenProvider` caches exchanged tokens until shortly before expiry.

mod authenticator;
mod types;

pub use authenticator::{sign_assertion, AssertionClaims, TokenProvider};
pub use types::{CachedToken, ServiceAccountKey, BIGQUERY_SCOPE, GOOGLE_TOKEN_URI};

#[cfg(test)]
mod tests;
