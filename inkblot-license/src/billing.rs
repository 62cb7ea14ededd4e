//! Platform billing collaborator.
//!
//! Purchase and restore requests go out through [`BillingClient`]; their
//! results come back later as [`TransactionEvent`]s on a channel consumed by
//! the gate task.

use crate::error::{LicenseError, LicenseResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A purchasable product as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store product identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Localized price string.
    pub formatted_price: String,
}

/// Lifecycle state of a store transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    /// Payment is being processed.
    Purchasing,
    /// Payment completed.
    Purchased,
    /// Payment failed or was cancelled.
    Failed,
    /// A previous purchase was replayed by a restore.
    Restored,
    /// Awaiting external approval.
    Deferred,
}

impl TransactionState {
    /// Returns true for the states that grant the product.
    #[must_use]
    pub fn grants_product(&self) -> bool {
        matches!(self, Self::Purchased | Self::Restored)
    }

    /// Returns true for states that must be finished with the store.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Purchased | Self::Restored | Self::Failed)
    }
}

/// A "transaction updated" notification from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEvent {
    /// Store transaction identifier.
    pub transaction_id: String,
    /// Product the transaction is for.
    pub product_id: String,
    /// Current state.
    pub state: TransactionState,
    /// Store-provided failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionEvent {
    /// Creates an event without an error message.
    pub fn new(
        transaction_id: impl Into<String>,
        product_id: impl Into<String>,
        state: TransactionState,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            product_id: product_id.into(),
            state,
            error: None,
        }
    }
}

/// Abstract in-app purchase interface.
#[async_trait]
pub trait BillingClient: Send + Sync {
    /// Returns whether this build can talk to a store at all.
    fn is_available(&self) -> bool;

    /// Looks up product information.
    async fn product(&self, product_id: &str) -> LicenseResult<Option<Product>>;

    /// Queues a payment. Completion is reported later as a [`TransactionEvent`].
    async fn add_payment(&self, product: &Product) -> LicenseResult<()>;

    /// Asks the store to replay completed transactions as events.
    async fn restore_completed(&self) -> LicenseResult<()>;

    /// Acknowledges a terminal transaction so the store stops replaying it.
    async fn finish(&self, transaction_id: &str) -> LicenseResult<()>;
}

/// Billing for builds without a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBilling;

#[async_trait]
impl BillingClient for NoBilling {
    fn is_available(&self) -> bool {
        false
    }

    async fn product(&self, _product_id: &str) -> LicenseResult<Option<Product>> {
        Err(LicenseError::BillingUnavailable)
    }

    async fn add_payment(&self, _product: &Product) -> LicenseResult<()> {
        Err(LicenseError::BillingUnavailable)
    }

    async fn restore_completed(&self) -> LicenseResult<()> {
        Err(LicenseError::BillingUnavailable)
    }

    async fn finish(&self, _transaction_id: &str) -> LicenseResult<()> {
        Err(LicenseError::BillingUnavailable)
    }
}
