use std::fmt;
use std::sync::Arc;

use crate::{
    EngineError, ResultEngine,
    store::{BalanceStore, RateLookup},
};

mod queries;
mod transfer;
mod update;

pub use update::BalanceUpdate;

/// Stateless coordinator for balance mutations and reads.
///
/// Holds its collaborators and nothing else, so any number of requests may
/// run through one `Engine` concurrently; consistency comes from the store's
/// conditional update, not from application-level locking.
pub struct Engine {
    store: Arc<dyn BalanceStore>,
    rates: Option<Arc<dyn RateLookup>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("rates", &self.rates.is_some())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) fn store(&self) -> &dyn BalanceStore {
        self.store.as_ref()
    }

    pub(crate) fn rates(&self) -> Option<&dyn RateLookup> {
        self.rates.as_deref()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn BalanceStore>>,
    rates: Option<Arc<dyn RateLookup>>,
}

impl EngineBuilder {
    /// Pass the required balance store.
    pub fn store(mut self, store: Arc<dyn BalanceStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Pass the optional conversion-rate source. Without one every balance
    /// read answers in the reference currency.
    pub fn rates(mut self, rates: Arc<dyn RateLookup>) -> EngineBuilder {
        self.rates = Some(rates);
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self.store.ok_or(EngineError::MissingStore)?;
        Ok(Engine {
            store,
            rates: self.rates,
        })
    }
}
