//! Facilitator configuration and response types

use super::constants::env as env_vars;
use super::payment::X402_VERSION;
use crate::{Result, X402Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use url::Url;

/// Default facilitator URL
pub const DEFAULT_FACILITATOR_URL: &str = "http://localhost:8402";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Facilitator client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the facilitator service, without trailing slash
    pub facilitator_url: String,
    /// Protocol version sent as `x402Version`
    pub x402_version: u32,
    /// Upper bound for every request, including connecting
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new client config; trailing slashes are stripped from the URL
    pub fn new(facilitator_url: impl Into<String>) -> Self {
        let facilitator_url = facilitator_url.into();
        Self {
            facilitator_url: facilitator_url.trim_end_matches('/').to_string(),
            x402_version: X402_VERSION,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build a config from `X402_FACILITATOR_URL`, `X402_VERSION` and
    /// `X402_TIMEOUT_SECONDS`, falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from variables resolved by `lookup`, with the same
    /// names and defaults as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(env_vars::FACILITATOR_URL)
            .unwrap_or_else(|| DEFAULT_FACILITATOR_URL.to_string());
        let mut config = Self::new(url);

        if let Some(version) = lookup(env_vars::VERSION) {
            config.x402_version = version.trim().parse().map_err(|_| {
                X402Error::config(format!(
                    "{} must be an integer, got {:?}",
                    env_vars::VERSION,
                    version
                ))
            })?;
        }

        if let Some(seconds) = lookup(env_vars::TIMEOUT_SECONDS) {
            let seconds: u64 = seconds.trim().parse().map_err(|_| {
                X402Error::config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    env_vars::TIMEOUT_SECONDS,
                    seconds
                ))
            })?;
            config.timeout = Duration::from_secs(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the client configuration
    pub fn validate(&self) -> Result<()> {
        if self.facilitator_url.is_empty() {
            return Err(X402Error::config("Facilitator URL cannot be empty"));
        }

        let url = Url::parse(&self.facilitator_url)
            .map_err(|e| X402Error::config(format!("Invalid facilitator URL: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(X402Error::config(
                "Facilitator URL must start with http:// or https://",
            ));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(X402Error::config(
                "Facilitator URL must not carry a query or fragment",
            ));
        }

        if self.timeout.is_zero() {
            return Err(X402Error::config("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Set the protocol version
    pub fn with_x402_version(mut self, version: u32) -> Self {
        self.x402_version = version;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the request timeout in whole seconds
    pub fn with_timeout_secs(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }

    /// Full URL of an endpoint path such as `/verify`
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.facilitator_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FACILITATOR_URL)
    }
}

/// Per-call options for verify and settle requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Sent as the `Idempotency-Key` header
    pub idempotency_key: Option<String>,
    /// ERC-8004 agent token ID; only sent with settle requests
    pub agent_id: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit idempotency key
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Use a fresh random UUID as the idempotency key
    pub fn with_generated_idempotency_key(self) -> Self {
        self.with_idempotency_key(uuid::Uuid::new_v4().to_string())
    }

    /// Set the agent ID for proof-of-agency settlement
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }
}

/// Payment verification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResult {
    /// Whether the payment is valid
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    /// Reason for invalidity; present iff `is_valid` is false
    #[serde(rename = "invalidReason", skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
    /// Opaque consensus attestation from the facilitator
    #[serde(rename = "consensusProof", skip_serializing_if = "Option::is_none")]
    pub consensus_proof: Option<String>,
    /// Report identifier
    #[serde(rename = "reportId", skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    /// Unix timestamp in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Fee in atomic units (managed mode)
    #[serde(rename = "feeAmount", skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<String>,
    /// Amount forwarded to the merchant (managed mode)
    #[serde(rename = "netAmount", skip_serializing_if = "Option::is_none")]
    pub net_amount: Option<String>,
    /// Fee in basis points (managed mode)
    #[serde(rename = "feeBps", skip_serializing_if = "Option::is_none")]
    pub fee_bps: Option<u32>,
}

impl VerifyResult {
    /// Check the `isValid`/`invalidReason` pairing
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        match (self.is_valid, &self.invalid_reason) {
            (false, None) => Err("invalidReason is required when isValid is false".to_string()),
            (true, Some(reason)) => Err(format!(
                "invalidReason {:?} present on a valid payment",
                reason
            )),
            _ => Ok(()),
        }
    }

    /// Timestamp as a UTC date-time
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Settlement progress reported by a managed facilitator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    PartialSettlement,
    Confirmed,
    Failed,
}

/// Payment settlement result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleResult {
    /// Whether the settlement succeeded
    pub success: bool,
    /// Error message; present iff `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Settlement transaction hash
    #[serde(rename = "txHash", skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Fee transfer transaction hash (managed mode)
    #[serde(rename = "txHashFee", skip_serializing_if = "Option::is_none")]
    pub tx_hash_fee: Option<String>,
    /// Network the transaction landed on
    #[serde(rename = "networkId", skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    /// Opaque consensus attestation from the facilitator
    #[serde(rename = "consensusProof", skip_serializing_if = "Option::is_none")]
    pub consensus_proof: Option<String>,
    /// Unix timestamp in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Fee in atomic units (managed mode)
    #[serde(rename = "feeAmount", skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<String>,
    /// Amount forwarded to the merchant (managed mode)
    #[serde(rename = "netAmount", skip_serializing_if = "Option::is_none")]
    pub net_amount: Option<String>,
    /// Settlement progress (managed mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SettlementStatus>,
    /// Evidence hash for proof of agency
    #[serde(rename = "evidenceHash", skip_serializing_if = "Option::is_none")]
    pub evidence_hash: Option<String>,
    /// Validation registry transaction hash
    #[serde(rename = "proofOfAgency", skip_serializing_if = "Option::is_none")]
    pub proof_of_agency: Option<String>,
}

impl SettleResult {
    /// Check the `success`/`error` pairing
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        match (self.success, &self.error) {
            (false, None) => Err("error is required when success is false".to_string()),
            (true, Some(error)) => Err(format!(
                "error {:?} present on a successful settlement",
                error
            )),
            _ => Ok(()),
        }
    }

    /// Timestamp as a UTC date-time
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// A (scheme, network) pair supported by the facilitator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemeNetworkPair {
    /// Payment scheme identifier
    pub scheme: String,
    /// Blockchain network identifier
    pub network: String,
}

impl SchemeNetworkPair {
    pub fn new(scheme: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            network: network.into(),
        }
    }
}

/// Supported payment schemes and networks, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedSchemes {
    pub kinds: Vec<SchemeNetworkPair>,
}

impl SupportedSchemes {
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        for (index, kind) in self.kinds.iter().enumerate() {
            if kind.scheme.trim().is_empty() {
                return Err(format!("kinds[{}].scheme is blank", index));
            }
            if kind.network.trim().is_empty() {
                return Err(format!("kinds[{}].network is blank", index));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemeNetworkPair> {
        self.kinds.iter()
    }

    /// Whether the facilitator advertises the given scheme on the given network
    pub fn supports(&self, scheme: &str, network: &str) -> bool {
        self.kinds
            .iter()
            .any(|kind| kind.scheme == scheme && kind.network == network)
    }
}

impl<'a> IntoIterator for &'a SupportedSchemes {
    type Item = &'a SchemeNetworkPair;
    type IntoIter = std::slice::Iter<'a, SchemeNetworkPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.kinds.iter()
    }
}

/// Service information returned by the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Operating mode (e.g., "simulate", "remote", "managed")
    pub mode: String,
    /// Endpoint descriptions keyed by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<HashMap<String, String>>,
    /// Documentation URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

impl ServiceInfo {
    /// Check that the mandatory fields are non-blank
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        let mandatory = [
            ("service", &self.service),
            ("version", &self.version),
            ("mode", &self.mode),
        ];

        for (field, value) in mandatory {
            if value.trim().is_empty() {
                return Err(format!("{} is blank", field));
            }
        }
        Ok(())
    }
}

/// Error body sent by the facilitator alongside 4xx/5xx statuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error code (e.g., "VERIFICATION_ERROR")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
