//! Currency codes.
//!
//! The ledger is mono-currency at rest: balances and transaction amounts are
//! stored in the reference currency. Other codes appear only as display
//! targets on the balance-read conversion path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Upper-case ISO-like currency code.
///
/// The engine keeps no closed list of currencies: any three-letter ASCII
/// code parses, and the rate source decides whether it can serve it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Code of the currency every balance and ledger amount is stored in.
    pub const REFERENCE_CODE: &'static str = "RUB";

    /// Returns the reference currency.
    #[must_use]
    pub fn reference() -> Self {
        Self(Self::REFERENCE_CODE.to_string())
    }

    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the currency balances are stored in.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.0 == Self::REFERENCE_CODE
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::reference()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(EngineError::InvalidCurrency(format!(
                "unsupported currency code: {value}"
            )));
        }
        Ok(Self(code))
    }
}
