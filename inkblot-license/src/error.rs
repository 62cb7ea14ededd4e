//! Error types for the license gate.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The trial store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// No billing capability in the running build.
    #[error("billing is not available in this build")]
    BillingUnavailable,

    /// The billing collaborator does not know the product.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The billing collaborator reported a failure.
    #[error("billing error: {0}")]
    Billing(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
