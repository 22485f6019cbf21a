//! # x402 Facilitator Client
//!
//! A **type-safe** Rust client for x402 payment facilitators: services that
//! verify and settle HTTP-native micropayments on behalf of a resource server.
//!
//! ## Features
//!
//! - **Payment verification and settlement**: `POST /verify` and `POST /settle`
//! - **Discovery**: query the (scheme, network) pairs a facilitator supports
//! - **Health checks**: tell a live facilitator from an unreachable one
//! - **Strict responses**: every response is checked against the wire contract;
//!   deviations surface as [`X402Error::Protocol`] instead of half-filled results
//! - **Uniform errors**: validation, timeout, transport, HTTP status and
//!   protocol failures are distinct [`X402Error`] variants
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use x402_facilitator_client::{ClientConfig, FacilitatorClient, PaymentRequirements};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FacilitatorClient::new(
//!         ClientConfig::new("http://localhost:8402").with_timeout_secs(10),
//!     )?;
//!
//!     let info = client.health_check().await?;
//!     println!("{} {} ({})", info.service, info.version, info.mode);
//!
//!     let requirements = PaymentRequirements::new(
//!         "exact",
//!         "base-sepolia",
//!         "1000000",
//!         "/api/weather",
//!         "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",
//!         "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
//!     );
//!
//!     let result = client.verify("eyJ4NDAyVmVyc2lvbiI6MX0=", &requirements).await?;
//!     if result.is_valid {
//!         println!("verified, proof: {:?}", result.consensus_proof);
//!     }
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`types`**: Request/response structures, client configuration and constants
//! - **`facilitator`**: The HTTP client and the [`Facilitator`] trait
//! - **`error`**: The [`X402Error`] taxonomy
//!
//! The client is a single-attempt primitive: no caching, no retries. Every call
//! is bounded by the configured timeout, and retry policy belongs to the caller.

pub mod error;
pub mod facilitator;
pub mod types;

// Re-exports for convenience
pub use error::{Result, X402Error};
pub use facilitator::{Facilitator, FacilitatorClient};
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
