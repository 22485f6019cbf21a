//! Facilitator client for payment verification and settlement
//!
//! This module provides a client for interacting with x402 facilitator services.
//! A facilitator verifies payment authorizations and settles them on chain; any
//! consensus it runs internally is opaque to this client, which only sees the
//! resulting attestation string.
//!
//! Every call is a single attempt bounded by the configured timeout. The client
//! keeps no cache and never retries; [`X402Error::is_retryable`] helps callers
//! that want their own retry policy.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use x402_facilitator_client::facilitator::FacilitatorClient;
//! use x402_facilitator_client::types::{ClientConfig, PaymentRequirements};
//!
//! # async fn example() -> x402_facilitator_client::Result<()> {
//! let client = FacilitatorClient::new(ClientConfig::new("http://localhost:8402"))?;
//!
//! let requirements = PaymentRequirements::new(
//!     "exact",
//!     "base-sepolia",
//!     "1000000",
//!     "/api/weather",
//!     "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",
//!     "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
//! );
//!
//! let verified = client.verify("eyJ4NDAyVmVyc2lvbiI6MX0=", &requirements).await?;
//! if verified.is_valid {
//!     let settled = client.settle("eyJ4NDAyVmVyc2lvbiI6MX0=", &requirements).await?;
//!     println!("Payment settled: {:?}", settled.tx_hash);
//! }
//!
//! client.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Scoped Usage
//!
//! ```no_run
//! use x402_facilitator_client::facilitator::FacilitatorClient;
//! use x402_facilitator_client::types::ClientConfig;
//!
//! # async fn example() -> x402_facilitator_client::Result<()> {
//! let supported = FacilitatorClient::scoped(ClientConfig::from_env()?, |client| async move {
//!     client.health_check().await?;
//!     client.supported_schemes().await
//! })
//! .await?;
//!
//! for kind in &supported {
//!     println!("{} on {}", kind.scheme, kind.network);
//! }
//! # Ok(())
//! # }
//! ```

use crate::types::constants::{endpoints, IDEMPOTENCY_KEY_HEADER};
use crate::types::{
    ClientConfig, FacilitatorRequest, PaymentRequirements, RequestOptions, ServiceInfo,
    SettleResult, SupportedSchemes, VerifyResult,
};
use crate::{Result, X402Error};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;


/// A facilitator route together with the label used in errors and logs
#[derive(Debug, Clone, Copy)]
struct Endpoint {
    label: &'static str,
    path: &'static str,
}

const VERIFY: Endpoint = Endpoint {
    label: "POST /verify",
    path: endpoints::VERIFY,
};

const SETTLE: Endpoint = Endpoint {
    label: "POST /settle",
    path: endpoints::SETTLE,
};

const SUPPORTED: Endpoint = Endpoint {
    label: "GET /supported",
    path: endpoints::SUPPORTED,
};

const HEALTH: Endpoint = Endpoint {
    label: "GET /",
    path: endpoints::HEALTH,
};

/// Operations a remote facilitator offers
///
/// [`FacilitatorClient`] is the HTTP implementation; code that only needs to
/// talk to "a facilitator" can take `&dyn Facilitator` and be tested against
/// an in-process fake.
#[async_trait]
pub trait Facilitator: Send + Sync {
    /// Verify a payment without settling it
    async fn verify(
        &self,
        payment_header: &str,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResult>;

    /// Settle a payment
    async fn settle(
        &self,
        payment_header: &str,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResult>;

    /// Supported (scheme, network) pairs
    async fn supported_schemes(&self) -> Result<SupportedSchemes>;

    /// Service information; an `Ok` answer means the facilitator is up
    async fn health_check(&self) -> Result<ServiceInfo>;
}

/// Facilitator client for verifying and settling payments
///
/// The client owns one pooled HTTP connection resource from construction
/// until [`close`](Self::close). It is `Send + Sync`; share it behind an
/// [`Arc`] for concurrent calls.
pub struct FacilitatorClient {
    config: ClientConfig,
    /// Pooled HTTP client; `None` once closed
    client: RwLock<Option<Client>>,
}

impl std::fmt::Debug for FacilitatorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacilitatorClient")
            .field("url", &self.config.facilitator_url)
            .field("x402_version", &self.config.x402_version)
            .field("timeout", &self.config.timeout)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl FacilitatorClient {
    /// Create a new facilitator client
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Validate configuration first
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| X402Error::config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(
            "Created facilitator client for {} (x402Version {}, timeout {:?})",
            config.facilitator_url,
            config.x402_version,
            config.timeout
        );

        Ok(Self {
            config,
            client: RwLock::new(Some(client)),
        })
    }

    /// Run `f` with a fresh client and close the client afterwards.
    ///
    /// The client is closed whether `f` succeeds or fails, so a handle that
    /// escapes the block only yields [`X402Error::ClientClosed`].
    pub async fn scoped<F, Fut, T>(config: ClientConfig, f: F) -> Result<T>
    where
        F: FnOnce(Arc<FacilitatorClient>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let client = Arc::new(Self::new(config)?);
        let result = f(Arc::clone(&client)).await;
        client.close();
        result
    }

    /// Verify a payment without executing the transaction
    pub async fn verify(
        &self,
        payment_header: &str,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResult> {
        self.verify_with_options(payment_header, requirements, &RequestOptions::default())
            .await
    }

    /// Verify a payment, sending the given idempotency key.
    ///
    /// `options.agent_id` is ignored; it only applies to settlement.
    pub async fn verify_with_options(
        &self,
        payment_header: &str,
        requirements: &PaymentRequirements,
        options: &RequestOptions,
    ) -> Result<VerifyResult> {
        let result: VerifyResult = self
            .post_payment(
                VERIFY,
                payment_header,
                requirements,
                None,
                options.idempotency_key.as_deref(),
            )
            .await?;
        result
            .check()
            .map_err(|message| protocol_violation(VERIFY, message))?;

        if !result.is_valid {
            tracing::debug!(
                "Facilitator rejected payment: {}",
                result.invalid_reason.as_deref().unwrap_or_default()
            );
        }

        Ok(result)
    }

    /// Settle a verified payment by executing the transaction
    pub async fn settle(
        &self,
        payment_header: &str,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResult> {
        self.settle_with_options(payment_header, requirements, &RequestOptions::default())
            .await
    }

    /// Settle a payment with an idempotency key and/or agent ID
    pub async fn settle_with_options(
        &self,
        payment_header: &str,
        requirements: &PaymentRequirements,
        options: &RequestOptions,
    ) -> Result<SettleResult> {
        let result: SettleResult = self
            .post_payment(
                SETTLE,
                payment_header,
                requirements,
                options.agent_id.as_deref(),
                options.idempotency_key.as_deref(),
            )
            .await?;
        result
            .check()
            .map_err(|message| protocol_violation(SETTLE, message))?;

        if !result.success {
            tracing::warn!(
                "Facilitator settlement failed: {}",
                result.error.as_deref().unwrap_or_default()
            );
        }

        Ok(result)
    }

    /// Get supported payment schemes and networks
    pub async fn supported_schemes(&self) -> Result<SupportedSchemes> {
        let supported: SupportedSchemes = self.get(SUPPORTED).await?;
        supported
            .check()
            .map_err(|message| protocol_violation(SUPPORTED, message))?;
        Ok(supported)
    }

    /// Query the facilitator's service endpoint.
    ///
    /// Any successful answer counts as healthy regardless of `mode`; a down
    /// facilitator surfaces as a timeout, transport or HTTP status error.
    pub async fn health_check(&self) -> Result<ServiceInfo> {
        let info: ServiceInfo = self.get(HEALTH).await?;
        info.check().map_err(|message| protocol_violation(HEALTH, message))?;
        Ok(info)
    }

    /// Release the pooled connections.
    ///
    /// Idempotent. Later calls fail with [`X402Error::ClientClosed`] without
    /// touching the network; calls already in flight finish normally.
    pub fn close(&self) {
        if self.client.write().take().is_some() {
            tracing::debug!(
                "Closed facilitator client for {}",
                self.config.facilitator_url
            );
        }
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }

    /// Get the base URL of this facilitator
    pub fn url(&self) -> &str {
        &self.config.facilitator_url
    }

    /// Get the configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Clone the pooled client out of its slot; the lock is never held across an await
    fn http(&self) -> Result<Client> {
        self.client.read().clone().ok_or(X402Error::ClientClosed)
    }

    async fn post_payment<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        payment_header: &str,
        requirements: &PaymentRequirements,
        agent_id: Option<&str>,
        idempotency_key: Option<&str>,
    ) -> Result<T> {
        let client = self.http()?;

        if payment_header.trim().is_empty() {
            return Err(X402Error::validation("paymentHeader", "must not be empty"));
        }
        requirements.validate()?;

        let request_body = FacilitatorRequest {
            x402_version: self.config.x402_version,
            payment_header,
            payment_requirements: requirements,
            agent_id,
        };

        let url = self.config.endpoint_url(endpoint.path);
        tracing::debug!("Sending request to: {}", url);
        tracing::debug!(
            "Facilitator {} request body: {}",
            endpoint.label,
            serde_json::to_string_pretty(&request_body).unwrap_or_default()
        );

        let mut request = client.post(url).json(&request_body);
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key);
        }

        self.execute(endpoint, request).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let client = self.http()?;
        let url = self.config.endpoint_url(endpoint.path);
        tracing::debug!("Sending request to: {}", url);

        self.execute(endpoint, client.get(url)).await
    }

    /// Send the request and decode a 2xx JSON body into `T`
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<T> {
        let timeout = self.config.timeout;

        let response = request
            .send()
            .await
            .map_err(|e| X402Error::from_reqwest(endpoint.label, timeout, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| X402Error::from_reqwest(endpoint.label, timeout, e))?;

        if !status.is_success() {
            tracing::error!(
                "Facilitator {} failed with status: {}. Response body: {}",
                endpoint.label,
                status,
                body
            );
            return Err(X402Error::HttpStatus {
                endpoint: endpoint.label,
                status,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            protocol_violation(endpoint, format!("unexpected response body ({}): {}", e, body))
        })
    }
}

fn protocol_violation(endpoint: Endpoint, message: impl Into<String>) -> X402Error {
    let err = X402Error::protocol(endpoint.label, message);
    tracing::warn!("{}", err);
    err
}

#[async_trait]
impl Facilitator for FacilitatorClient {
    async fn verify(
        &self,
        payment_header: &str,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResult> {
        FacilitatorClient::verify(self, payment_header, requirements).await
    }

    async fn settle(
        &self,
        payment_header: &str,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResult> {
        FacilitatorClient::settle(self, payment_header, requirements).await
    }

    async fn supported_schemes(&self) -> Result<SupportedSchemes> {
        FacilitatorClient::supported_schemes(self).await
    }

    async fn health_check(&self) -> Result<ServiceInfo> {
        FacilitatorClient::health_check(self).await
    }
}
