//! Transaction records.
//!
//! A transaction is the immutable trace of exactly one committed balance
//! mutation. Records are append-only: corrections are new reversal records,
//! never edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Currency;

/// Actor recorded on automatically generated reversals.
pub const SYSTEM_ACTOR: &str = "server";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the store at insert time.
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Actor attribution: the account owner, the counterpart of a transfer,
    /// or [`SYSTEM_ACTOR`] for reversals.
    pub who: String,
    pub description: String,
    /// Signed amount in minor units; negative for debits.
    pub amount_minor: i64,
    pub currency: Currency,
}

impl Transaction {
    /// Unix timestamp used for date ordering.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.occurred_at.timestamp()
    }
}
