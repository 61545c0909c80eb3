//! The balance engine: decides legality of balance changes, pairs every
//! committed mutation with its transaction record, and runs the two-leg
//! transfer protocol with a compensating reversal.
//!
//! The engine holds no state of its own. Persistence and the remote
//! conversion-rate source are reached through the capability traits in
//! [`store`], so the whole core can run against in-memory fakes.

pub use accounts::Account;
pub use commands::{BalanceUpdateCmd, TransactionsListCmd, TransferCmd};
pub use currency::Currency;
pub use error::EngineError;
pub use ops::{BalanceUpdate, Engine, EngineBuilder};
pub use sort::{SortBy, SortDir, sort_transactions};
pub use transactions::{SYSTEM_ACTOR, Transaction};

mod accounts;
mod commands;
mod currency;
mod error;
mod ops;
mod sort;
pub mod store;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
