//! Protocol constants: endpoint paths, environment variables and headers

/// Facilitator endpoint paths, relative to the configured base URL
pub mod endpoints {
    pub const VERIFY: &str = "/verify";
    pub const SETTLE: &str = "/settle";
    pub const SUPPORTED: &str = "/supported";
    pub const HEALTH: &str = "/";
}

/// Environment variables read by [`ClientConfig::from_env`](crate::types::ClientConfig::from_env)
pub mod env {
    /// Base URL of the facilitator
    pub const FACILITATOR_URL: &str = "X402_FACILITATOR_URL";
    /// Protocol version sent as `x402Version`
    pub const VERSION: &str = "X402_VERSION";
    /// Request timeout in whole seconds
    pub const TIMEOUT_SECONDS: &str = "X402_TIMEOUT_SECONDS";
}

/// Header carrying a caller-chosen idempotency key on POST requests
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
