//! The module contains the error the engine can throw.
//!
//! Domain refusals are distinguishable kinds the transport maps to stable
//! responses; store failures pass through wrapped with the operation that
//! raised them and are never retried here.

use thiserror::Error;

use crate::store::StoreError;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The referenced account or transaction does not exist.
    #[error("user not found")]
    NotFound,
    /// A debit would drive the balance below zero.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// A negative-amount mutation targeted a nonexistent account.
    #[error("the user does not exist, it is impossible to create a user with a negative balance")]
    NegativeCreate,
    /// The transfer sender cannot cover the amount at pre-check time.
    #[error("transfer is prohibited, insufficient funds")]
    NegativeBalance,
    #[error("invalid currency: {0}")]
    InvalidCurrency(String),
    /// The engine was built without a balance store.
    #[error("no balance store configured")]
    MissingStore,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound, Self::NotFound)
            | (Self::InsufficientFunds, Self::InsufficientFunds)
            | (Self::NegativeCreate, Self::NegativeCreate)
            | (Self::NegativeBalance, Self::NegativeBalance)
            | (Self::MissingStore, Self::MissingStore) => true,
            (Self::InvalidCurrency(a), Self::InvalidCurrency(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
