//! Command structs for engine operations.
//!
//! These types group parameters for the engine entry points, keeping call
//! sites readable and avoiding long argument lists.

use uuid::Uuid;

use crate::{Currency, SortBy, SortDir};

/// Apply a signed balance change to one account.
#[derive(Clone, Debug)]
pub struct BalanceUpdateCmd {
    pub user_id: Uuid,
    /// Actor attribution recorded on the transaction.
    pub who: String,
    pub description: String,
    /// Signed change in minor units; negative amounts are debits.
    pub amount_minor: i64,
    /// Currency recorded on the transaction. The balance mutation itself is
    /// always in the reference currency.
    pub currency: Currency,
}

impl BalanceUpdateCmd {
    #[must_use]
    pub fn new(user_id: Uuid, who: impl Into<String>, amount_minor: i64) -> Self {
        Self {
            user_id,
            who: who.into(),
            description: String::new(),
            amount_minor,
            currency: Currency::reference(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// Move an amount from one account to another.
///
/// Never persisted as its own entity: a transfer is realised as exactly two
/// balance updates, each producing its own transaction record.
#[derive(Clone, Copy, Debug)]
pub struct TransferCmd {
    pub from: Uuid,
    pub to: Uuid,
    /// Strictly positive amount in minor units of the reference currency.
    pub amount_minor: i64,
}

/// Read one page of an account's transactions.
#[derive(Clone, Copy, Debug)]
pub struct TransactionsListCmd {
    pub user_id: Uuid,
    pub limit: u64,
    pub offset: u64,
    /// `None` leaves the page in store order.
    pub sort_by: Option<SortBy>,
    /// `None` leaves the page in store order.
    pub direction: Option<SortDir>,
}
