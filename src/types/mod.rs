//! Core types for the x402 facilitator protocol
//!
//! This module defines the request and response shapes exchanged with a
//! facilitator. Every response type encodes the optionality of its fields in
//! the type itself, so a body that deserializes is known to carry the fields
//! the protocol requires.
//!
//! # Architecture
//!
//! - [`payment`] - Payment requirements, the request body and the payment header
//! - [`facilitator`] - Client configuration and facilitator response types
//! - [`constants`] - Protocol constants (endpoints, environment variables)
//!
//! # Examples
//!
//! ## Creating Payment Requirements
//!
//! ```
//! use x402_facilitator_client::types::PaymentRequirements;
//!
//! # fn example() -> x402_facilitator_client::Result<()> {
//! let requirements = PaymentRequirements::new(
//!     "exact",                                          // scheme
//!     "base-sepolia",                                   // network
//!     "1000000",                                        // amount (1 USDC)
//!     "/api/weather",                                   // resource
//!     "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",   // recipient
//!     "0x036CbD53842c5426634e7929541eC2318f3dCF7e",   // USDC contract
//! )
//! .with_description("Weather data");
//!
//! requirements.validate()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client Configuration
//!
//! ```
//! use x402_facilitator_client::types::ClientConfig;
//!
//! # fn example() -> x402_facilitator_client::Result<()> {
//! let config = ClientConfig::new("http://localhost:8402/").with_timeout_secs(10);
//! assert_eq!(config.facilitator_url, "http://localhost:8402");
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod facilitator;
pub mod payment;

// Re-export commonly used types
pub use constants::endpoints;
pub use facilitator::{
    ClientConfig, ErrorResponse, RequestOptions, SchemeNetworkPair, ServiceInfo, SettleResult,
    SettlementStatus, SupportedSchemes, VerifyResult, DEFAULT_FACILITATOR_URL, DEFAULT_TIMEOUT,
};
pub use payment::{FacilitatorRequest, PaymentHeader, PaymentRequirements, X402_VERSION};
