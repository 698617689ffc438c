//! HTTP client module
//!
//! Thin wrapper around reqwest that resolves API paths against a base URL,
//! attaches the bearer credential and hands back status plus raw body.
//! Status classification is left to callers, since a 400 can be a normal
//! "nothing to report" answer for report endpoints.

mod client;

pub use client::{ApiResponse, HttpClient, HttpClientConfig, RequestConfig};

#[cfg(test)]
mod tests;
