//! In-page ordering of transaction lists.
//!
//! Paging happens at the store, ordering happens here, so the order is
//! correct only within the retrieved page and independent of storage layout.

use crate::Transaction;

/// Recognized sort keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortBy {
    /// Compares insertion timestamps.
    Date,
    /// Compares signed amounts in minor units.
    Amount,
}

impl SortBy {
    /// Parses a sort key; unrecognized or empty input means "no sorting".
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            _ => None,
        }
    }
}

/// Sort directions. `d` and `i` are the wire tokens (decreasing and
/// increasing); the spelled-out forms are accepted as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Descending,
    Ascending,
}

impl SortDir {
    /// Parses a direction; unrecognized or empty input means "no sorting".
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "d" | "desc" => Some(Self::Descending),
            "i" | "asc" => Some(Self::Ascending),
            _ => None,
        }
    }
}

/// Stable sort of one page of transactions.
///
/// Needs both a key and a direction; otherwise the page keeps the order the
/// store returned it in. Ties keep their retrieval order.
pub fn sort_transactions(list: &mut [Transaction], by: Option<SortBy>, dir: Option<SortDir>) {
    let (Some(by), Some(dir)) = (by, dir) else {
        return;
    };

    match (by, dir) {
        (SortBy::Date, SortDir::Descending) => {
            list.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        }
        (SortBy::Date, SortDir::Ascending) => {
            list.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));
        }
        (SortBy::Amount, SortDir::Descending) => {
            list.sort_by(|a, b| b.amount_minor.cmp(&a.amount_minor));
        }
        (SortBy::Amount, SortDir::Ascending) => {
            list.sort_by(|a, b| a.amount_minor.cmp(&b.amount_minor));
        }
    }
}
