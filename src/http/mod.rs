//! HTTP client module
//!
//! Provides the single-shot HTTP client used for every remote call.
//!
//! # Features
//!
//! - **Default Headers**: user agent and per-client headers
//! - **Request Builder**: query, header, JSON and form bodies per request
//! - **Status Handling**: non-2xx responses surface as typed errors

mod client;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
