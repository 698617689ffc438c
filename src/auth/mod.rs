//! Authentication module
//!
//! Implements the Search Ads client-credentials flow: an ES256-signed
//! assertion stands in for the client secret and is exchanged once for a
//! bearer token that is cached for the rest of the process.

mod authenticator;
mod types;

pub use authenticator::TokenProvider;
pub use types::{
    AuthConfig, Credential, DEFAULT_AUDIENCE, DEFAULT_TOKEN_URL, MAX_ASSERTION_LIFETIME_SECONDS,
    ORG_CONTEXT_HEADER, SEARCH_ADS_SCOPE,
};
