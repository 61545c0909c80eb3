//! Account state: one balance per user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Currency;

/// A user's balance tagged with the currency it is expressed in.
///
/// The stored balance is always in the reference currency; `currency` only
/// differs after a display conversion on the read path. An account with no
/// row in the store has an implicit balance of zero and is created by the
/// first non-negative mutation targeting it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Balance in minor units of `currency`.
    pub balance_minor: i64,
    pub currency: Currency,
}

impl Account {
    /// An account as stored, i.e. in the reference currency.
    #[must_use]
    pub fn new(id: Uuid, balance_minor: i64) -> Self {
        Self {
            id,
            balance_minor,
            currency: Currency::reference(),
        }
    }
}
