//! HTTP plumbing for the proxy transport: `ProxyHttp` and retry policies.

pub mod client;
pub mod retry;

pub use client::{ProxyHttp, ProxyResponse};
pub use retry::{RetryConfig, RetryPolicy};
