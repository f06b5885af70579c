//! Pricing service errors.

use std::error::Error as StdError;

use thiserror::Error;

/// Failure to obtain authoritative cart totals.
///
/// Always recoverable: the cart keeps its line items and reports pricing as unavailable.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The pricing service could not be reached.
    #[error("pricing service unreachable")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The pricing service answered with a non-success status.
    #[error("pricing service returned status {status}: {message}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,

        /// Response body or reason.
        message: String,
    },

    /// The pricing response body could not be decoded.
    #[error("failed to decode pricing response")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),
}
