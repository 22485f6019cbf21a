//! Payment-related types

use crate::{Result, X402Error};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// x402 protocol version
pub const X402_VERSION: u32 = 1;

/// Payment requirements for a resource
///
/// Field names serialize to the camelCase names the facilitator expects.
/// Optional fields that are unset are omitted from the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequirements {
    /// Payment scheme identifier (e.g., "exact")
    pub scheme: String,
    /// Blockchain network identifier (e.g., "base-sepolia")
    pub network: String,
    /// Maximum amount in atomic token units, kept as a string to avoid overflow
    #[serde(rename = "maxAmountRequired")]
    pub max_amount_required: String,
    /// Resource identifier or URL
    pub resource: String,
    /// Recipient wallet address
    #[serde(rename = "payTo")]
    pub pay_to: String,
    /// Token contract address
    pub asset: String,
    /// Human-readable description of the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Maximum time allowed for payment completion in seconds
    #[serde(rename = "maxTimeoutSeconds", skip_serializing_if = "Option::is_none")]
    pub max_timeout_seconds: Option<u64>,
    /// Scheme-specific data, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

impl PaymentRequirements {
    /// Create payment requirements from the mandatory fields
    pub fn new(
        scheme: impl Into<String>,
        network: impl Into<String>,
        max_amount_required: impl Into<String>,
        resource: impl Into<String>,
        pay_to: impl Into<String>,
        asset: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            network: network.into(),
            max_amount_required: max_amount_required.into(),
            resource: resource.into(),
            pay_to: pay_to.into(),
            asset: asset.into(),
            description: None,
            mime_type: None,
            max_timeout_seconds: None,
            extra: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the maximum timeout in seconds
    pub fn with_max_timeout_seconds(mut self, seconds: u64) -> Self {
        self.max_timeout_seconds = Some(seconds);
        self
    }

    /// Set the scheme-specific extra data
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Check that every mandatory field is present and non-blank.
    ///
    /// Fields are checked in wire order and the first offender is reported
    /// by its wire name.
    pub fn validate(&self) -> Result<()> {
        let mandatory = [
            ("scheme", &self.scheme),
            ("network", &self.network),
            ("maxAmountRequired", &self.max_amount_required),
            ("resource", &self.resource),
            ("payTo", &self.pay_to),
            ("asset", &self.asset),
        ];

        for (field, value) in mandatory {
            if value.trim().is_empty() {
                return Err(X402Error::validation(field, "must not be empty"));
            }
        }

        Ok(())
    }

    /// Get the amount as a decimal
    pub fn amount_as_decimal(&self) -> Result<Decimal> {
        self.max_amount_required.parse().map_err(|_| {
            X402Error::validation("maxAmountRequired", "not a decimal number")
        })
    }

    /// Get the amount in whole token units (e.g., 1.5 for 1_500_000 at 6 decimals)
    pub fn amount_in_decimal_units(&self, decimals: u32) -> Result<Decimal> {
        let too_precise =
            || X402Error::validation("maxAmountRequired", "too many decimal places");
        let mut amount = self.amount_as_decimal()?;
        let scale = amount
            .scale()
            .checked_add(decimals)
            .ok_or_else(too_precise)?;
        amount.set_scale(scale).map_err(|_| too_precise())?;
        Ok(amount.normalize())
    }
}

/// JSON body of `POST /verify` and `POST /settle`
#[derive(Debug, Clone, Serialize)]
pub struct FacilitatorRequest<'a> {
    #[serde(rename = "x402Version")]
    pub x402_version: u32,
    #[serde(rename = "paymentHeader")]
    pub payment_header: &'a str,
    #[serde(rename = "paymentRequirements")]
    pub payment_requirements: &'a PaymentRequirements,
    /// ERC-8004 agent token ID, only sent with settle requests
    #[serde(rename = "agentId", skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<&'a str>,
}

/// Decoded form of the base64 payment header the facilitator accepts
///
/// The client forwards payment headers as opaque strings; this type is a
/// convenience for callers that assemble the header themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHeader {
    /// Payer address
    pub sender: String,
    /// Authorization nonce
    pub nonce: String,
    /// Unix timestamp when the authorization becomes valid
    #[serde(rename = "validAfter", skip_serializing_if = "Option::is_none")]
    pub valid_after: Option<String>,
    /// Unix timestamp when the authorization expires
    #[serde(rename = "validBefore", skip_serializing_if = "Option::is_none")]
    pub valid_before: Option<String>,
    /// Signature over the authorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl PaymentHeader {
    /// Create a payment header for a sender and nonce
    pub fn new(sender: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            nonce: nonce.into(),
            valid_after: None,
            valid_before: None,
            signature: None,
        }
    }

    /// Set the validity window
    pub fn with_validity(
        mut self,
        valid_after: impl Into<String>,
        valid_before: impl Into<String>,
    ) -> Self {
        self.valid_after = Some(valid_after.into());
        self.valid_before = Some(valid_before.into());
        self
    }

    /// Set the signature
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Decode a base64-encoded payment header
    pub fn from_base64(encoded: &str) -> Result<Self> {
        use base64::{engine::general_purpose, Engine as _};
        let decoded = general_purpose::STANDARD.decode(encoded)?;
        let header: PaymentHeader = serde_json::from_slice(&decoded)?;
        Ok(header)
    }

    /// Encode the payment header to base64
    pub fn to_base64(&self) -> Result<String> {
        use base64::{engine::general_purpose, Engine as _};
        let json = serde_json::to_string(self)?;
        Ok(general_purpose::STANDARD.encode(json))
    }
}
