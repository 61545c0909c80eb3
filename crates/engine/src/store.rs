//! Capability interfaces the engine is built against.
//!
//! The engine never talks to a database or the network directly: it reaches
//! durable state through [`BalanceStore`] and the conversion-rate source
//! through [`RateLookup`], so the whole core can be exercised with in-memory
//! fakes.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{Account, Currency, Transaction};

/// A store failure, wrapped with the operation that raised it.
///
/// The engine passes these through unmodified and never retries.
#[derive(Debug, Error)]
#[error("{op}: {source}")]
pub struct StoreError {
    op: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl StoreError {
    pub fn new(
        op: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            op,
            source: source.into(),
        }
    }

    /// Store operation that raised the failure.
    #[must_use]
    pub fn op(&self) -> &'static str {
        self.op
    }
}

/// Input for [`BalanceStore::insert_transaction`]. The store assigns the id
/// and the insertion time.
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub who: String,
    pub description: String,
    pub amount_minor: i64,
    pub currency: Currency,
}

/// Durable balances plus the append-only transaction log.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Point lookup of an account. `None` means the account does not exist
    /// yet (implicit zero balance).
    async fn get_balance(&self, user_id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Atomic `balance += delta` against an existing row.
    ///
    /// Returns the updated account, or `None` when no row matched. This is
    /// the primitive concurrent mutations rely on; implementations must not
    /// emulate it with a read followed by a write.
    async fn conditional_adjust(
        &self,
        user_id: Uuid,
        delta_minor: i64,
    ) -> Result<Option<Account>, StoreError>;

    /// Inserts a new account row with the given opening balance.
    async fn create_account(
        &self,
        user_id: Uuid,
        balance_minor: i64,
    ) -> Result<Account, StoreError>;

    /// Appends a transaction record to `user_id`'s log.
    async fn insert_transaction(
        &self,
        user_id: Uuid,
        draft: TransactionDraft,
    ) -> Result<Transaction, StoreError>;

    /// Point lookup of one of `user_id`'s transactions.
    async fn get_transaction(
        &self,
        user_id: Uuid,
        trx_id: Uuid,
    ) -> Result<Option<Transaction>, StoreError>;

    /// One page of `user_id`'s transactions in store order, unsorted.
    async fn list_transactions(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Transaction>, StoreError>;
}

/// A rate lookup failure.
///
/// Conversion degrades to the reference currency instead of failing the
/// balance read, so this error never escapes the engine.
#[derive(Debug, Error)]
#[error("rate lookup: {source}")]
pub struct RateError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl RateError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Remote conversion-rate source.
#[async_trait]
pub trait RateLookup: Send + Sync {
    /// Number of reference-currency units one unit of `target` is worth.
    ///
    /// The stored balance is divided by this rate for display.
    async fn rate(&self, target: &Currency) -> Result<f64, RateError>;
}
