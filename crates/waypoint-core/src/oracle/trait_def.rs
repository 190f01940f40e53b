//! The `Oracle` trait -- the adapter interface for generative providers.
//!
//! Each concrete transport (provider CLI subprocess, HTTP API, test stub)
//! implements this trait. It is intentionally object-safe so the gateway
//! can hold a `Box<dyn Oracle>`.

use anyhow::Result;
use async_trait::async_trait;

/// One request to the provider: prompt text plus the JSON schema the
/// response must conform to.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub prompt: String,
    pub response_schema: serde_json::Value,
}

/// Adapter interface for issuing a single generation request.
///
/// Implementors return the raw response text; parsing and validation
/// happen in the gateway. Failures are raw `anyhow` errors here -- the
/// gateway classifies them (quota vs. transport) from the message.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Human-readable transport name (e.g. "provider-cli").
    fn name(&self) -> &str;

    /// Issue the request and return the raw response text.
    async fn complete(&self, request: &OracleRequest) -> Result<String>;
}

// Compile-time assertion: Oracle must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Oracle) {}
};
