use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use engine::{
    Account, BalanceUpdateCmd, Currency, Engine, EngineError, SYSTEM_ACTOR, SortBy, SortDir,
    Transaction, TransactionsListCmd, TransferCmd,
    store::{BalanceStore, RateError, RateLookup, StoreError, TransactionDraft},
};

/// In-memory [`BalanceStore`] fake.
///
/// `poison_adjust` makes `conditional_adjust` fail for one account after a
/// given number of remaining successes, which is how the tests force a
/// credit leg (or a compensation) to fail mid-transfer.
#[derive(Default)]
struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<Uuid, i64>,
    log: HashMap<Uuid, Vec<Transaction>>,
    clock: i64,
    adjust_quota: HashMap<Uuid, u32>,
}

impl MemoryStore {
    fn with_account(self, user_id: Uuid, balance_minor: i64) -> Self {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .insert(user_id, balance_minor);
        self
    }

    fn poison_adjust(&self, user_id: Uuid, successes_left: u32) {
        self.inner
            .lock()
            .unwrap()
            .adjust_quota
            .insert(user_id, successes_left);
    }

    fn balance(&self, user_id: Uuid) -> Option<i64> {
        self.inner.lock().unwrap().accounts.get(&user_id).copied()
    }

    fn log(&self, user_id: Uuid) -> Vec<Transaction> {
        self.inner
            .lock()
            .unwrap()
            .log
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl BalanceStore for MemoryStore {
    async fn get_balance(&self, user_id: Uuid) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .accounts
            .get(&user_id)
            .map(|balance| Account::new(user_id, *balance)))
    }

    async fn conditional_adjust(
        &self,
        user_id: Uuid,
        delta_minor: i64,
    ) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(quota) = inner.adjust_quota.get_mut(&user_id) {
            if *quota == 0 {
                return Err(StoreError::new("conditional_adjust", "injected failure"));
            }
            *quota -= 1;
        }
        Ok(match inner.accounts.get_mut(&user_id) {
            Some(balance) => {
                *balance += delta_minor;
                let balance = *balance;
                Some(Account::new(user_id, balance))
            }
            None => None,
        })
    }

    async fn create_account(
        &self,
        user_id: Uuid,
        balance_minor: i64,
    ) -> Result<Account, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.accounts.insert(user_id, balance_minor);
        Ok(Account::new(user_id, balance_minor))
    }

    async fn insert_transaction(
        &self,
        user_id: Uuid,
        draft: TransactionDraft,
    ) -> Result<Transaction, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.clock += 1;
        let occurred_at = Utc
            .timestamp_opt(1_700_000_000 + inner.clock, 0)
            .single()
            .ok_or_else(|| StoreError::new("insert_transaction", "clock out of range"))?;
        let trx = Transaction {
            id: Uuid::new_v4(),
            occurred_at,
            who: draft.who,
            description: draft.description,
            amount_minor: draft.amount_minor,
            currency: draft.currency,
        };
        inner.log.entry(user_id).or_default().push(trx.clone());
        Ok(trx)
    }

    async fn get_transaction(
        &self,
        user_id: Uuid,
        trx_id: Uuid,
    ) -> Result<Option<Transaction>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .log
            .get(&user_id)
            .and_then(|log| log.iter().find(|trx| trx.id == trx_id))
            .cloned())
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .log
            .get(&user_id)
            .map(|log| {
                log.iter()
                    .skip(offset as usize)
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

struct FixedRate(f64);

#[async_trait]
impl RateLookup for FixedRate {
    async fn rate(&self, _target: &Currency) -> Result<f64, RateError> {
        Ok(self.0)
    }
}

struct UnreachableRates;

#[async_trait]
impl RateLookup for UnreachableRates {
    async fn rate(&self, _target: &Currency) -> Result<f64, RateError> {
        Err(RateError::new("connection refused"))
    }
}

fn engine_with(store: Arc<MemoryStore>) -> Engine {
    Engine::builder().store(store).build().unwrap()
}

fn update(user_id: Uuid, amount_minor: i64) -> BalanceUpdateCmd {
    BalanceUpdateCmd::new(user_id, user_id.to_string(), amount_minor).description("top-up")
}

#[tokio::test]
async fn positive_update_creates_missing_account() {
    let store = Arc::new(MemoryStore::default());
    let engine = engine_with(store.clone());
    let user = Uuid::new_v4();

    let result = engine.update_account(update(user, 1500)).await.unwrap();

    assert_eq!(result.account.balance_minor, 1500);
    assert_eq!(result.account.currency, Currency::reference());
    assert_eq!(result.transaction.amount_minor, 1500);
    assert_eq!(store.balance(user), Some(1500));
    assert_eq!(store.log(user).len(), 1);
}

#[tokio::test]
async fn update_applies_exactly_once_to_existing_balance() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(user, 1000));
    let engine = engine_with(store.clone());

    let result = engine.update_account(update(user, -400)).await.unwrap();

    assert_eq!(result.account.balance_minor, 600);
    assert_eq!(store.balance(user), Some(600));

    let log = store.log(user);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].amount_minor, -400);
    assert_eq!(log[0].currency, Currency::reference());
}

#[tokio::test]
async fn transaction_record_keeps_requested_currency() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default());
    let engine = engine_with(store.clone());

    let cmd = BalanceUpdateCmd::new(user, "payroll", 5000)
        .description("salary")
        .currency(Currency::try_from("USD").unwrap());
    let result = engine.update_account(cmd).await.unwrap();

    assert_eq!(result.transaction.currency.code(), "USD");
    assert_eq!(result.transaction.who, "payroll");
    assert_eq!(result.transaction.description, "salary");
}

#[tokio::test]
async fn negative_update_cannot_create_an_account() {
    let store = Arc::new(MemoryStore::default());
    let engine = engine_with(store.clone());
    let user = Uuid::new_v4();

    let err = engine.update_account(update(user, -100)).await.unwrap_err();

    assert_eq!(err, EngineError::NegativeCreate);
    assert_eq!(store.balance(user), None);
    assert!(store.log(user).is_empty());
}

#[tokio::test]
async fn overdraw_is_rejected_without_side_effects() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(user, 300));
    let engine = engine_with(store.clone());

    let err = engine.update_account(update(user, -301)).await.unwrap_err();

    assert_eq!(err, EngineError::InsufficientFunds);
    assert_eq!(store.balance(user), Some(300));
    assert!(store.log(user).is_empty());
}

#[tokio::test]
async fn exact_drain_to_zero_is_allowed() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(user, 300));
    let engine = engine_with(store.clone());

    let result = engine.update_account(update(user, -300)).await.unwrap();

    assert_eq!(result.account.balance_minor, 0);
}

#[tokio::test]
async fn transfer_moves_funds_between_accounts() {
    let sender = Uuid::new_v4();
    let recipient = Uuid::new_v4();
    let store = Arc::new(
        MemoryStore::default()
            .with_account(sender, 10000)
            .with_account(recipient, 5000),
    );
    let engine = engine_with(store.clone());

    engine
        .transfer(TransferCmd {
            from: sender,
            to: recipient,
            amount_minor: 3000,
        })
        .await
        .unwrap();

    assert_eq!(store.balance(sender), Some(7000));
    assert_eq!(store.balance(recipient), Some(8000));

    let sender_log = store.log(sender);
    assert_eq!(sender_log.len(), 1);
    assert_eq!(sender_log[0].amount_minor, -3000);
    assert_eq!(sender_log[0].who, sender.to_string());

    let recipient_log = store.log(recipient);
    assert_eq!(recipient_log.len(), 1);
    assert_eq!(recipient_log[0].amount_minor, 3000);
    assert_eq!(recipient_log[0].who, sender.to_string());
}

#[tokio::test]
async fn failed_credit_leg_restores_sender_balance() {
    let sender = Uuid::new_v4();
    let recipient = Uuid::new_v4();
    let store = Arc::new(
        MemoryStore::default()
            .with_account(sender, 10000)
            .with_account(recipient, 0),
    );
    store.poison_adjust(recipient, 0);
    let engine = engine_with(store.clone());

    let err = engine
        .transfer(TransferCmd {
            from: sender,
            to: recipient,
            amount_minor: 4000,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Store(_)));
    assert_eq!(store.balance(sender), Some(10000));
    assert_eq!(store.balance(recipient), Some(0));

    // Debit plus its reversal, attributed to the system actor.
    let sender_log = store.log(sender);
    assert_eq!(sender_log.len(), 2);
    assert_eq!(sender_log[0].amount_minor, -4000);
    assert_eq!(sender_log[1].amount_minor, 4000);
    assert_eq!(sender_log[1].who, SYSTEM_ACTOR);
    assert_eq!(
        sender_log[1].description,
        format!("abort transaction {}", sender_log[0].id)
    );

    assert!(store.log(recipient).is_empty());
}

#[tokio::test]
async fn failed_compensation_still_returns_credit_error() {
    let sender = Uuid::new_v4();
    let recipient = Uuid::new_v4();
    let store = Arc::new(
        MemoryStore::default()
            .with_account(sender, 10000)
            .with_account(recipient, 0),
    );
    // The debit leg succeeds, the credit leg fails, then the reversal's own
    // adjust fails as well: the inconsistency stays visible in the store.
    store.poison_adjust(sender, 1);
    store.poison_adjust(recipient, 0);
    let engine = engine_with(store.clone());

    let err = engine
        .transfer(TransferCmd {
            from: sender,
            to: recipient,
            amount_minor: 4000,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Store(_)));
    assert_eq!(store.balance(sender), Some(6000));
    assert_eq!(store.log(sender).len(), 1);
}

#[tokio::test]
async fn transfer_requires_both_accounts() {
    let sender = Uuid::new_v4();
    let recipient = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(sender, 10000));
    let engine = engine_with(store.clone());

    let err = engine
        .transfer(TransferCmd {
            from: sender,
            to: recipient,
            amount_minor: 100,
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound);

    let err = engine
        .transfer(TransferCmd {
            from: recipient,
            to: sender,
            amount_minor: 100,
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound);

    assert_eq!(store.balance(sender), Some(10000));
    assert!(store.log(sender).is_empty());
}

#[tokio::test]
async fn transfer_rejects_uncovered_amount() {
    let sender = Uuid::new_v4();
    let recipient = Uuid::new_v4();
    let store = Arc::new(
        MemoryStore::default()
            .with_account(sender, 999)
            .with_account(recipient, 0),
    );
    let engine = engine_with(store.clone());

    let err = engine
        .transfer(TransferCmd {
            from: sender,
            to: recipient,
            amount_minor: 1000,
        })
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::NegativeBalance);
    assert_eq!(store.balance(sender), Some(999));
    assert!(store.log(sender).is_empty());
    assert!(store.log(recipient).is_empty());
}

#[tokio::test]
async fn balance_read_reports_missing_account() {
    let engine = engine_with(Arc::new(MemoryStore::default()));

    let err = engine.user_balance(Uuid::new_v4(), None).await.unwrap_err();

    assert_eq!(err, EngineError::NotFound);
}

#[tokio::test]
async fn balance_conversion_divides_by_rate() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(user, 10000));
    let engine = Engine::builder()
        .store(store)
        .rates(Arc::new(FixedRate(2.5)))
        .build()
        .unwrap();

    let account = engine
        .user_balance(user, Some(Currency::try_from("USD").unwrap()))
        .await
        .unwrap();

    assert_eq!(account.balance_minor, 4000);
    assert_eq!(account.currency.code(), "USD");
}

#[tokio::test]
async fn reference_currency_request_skips_conversion() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(user, 10000));
    let engine = Engine::builder()
        .store(store)
        .rates(Arc::new(FixedRate(2.5)))
        .build()
        .unwrap();

    let account = engine
        .user_balance(user, Some(Currency::reference()))
        .await
        .unwrap();
    assert_eq!(account.balance_minor, 10000);
    assert_eq!(account.currency, Currency::reference());

    let account = engine.user_balance(user, None).await.unwrap();
    assert_eq!(account.balance_minor, 10000);
}

#[tokio::test]
async fn unreachable_rate_source_degrades_to_reference() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(user, 10000));
    let engine = Engine::builder()
        .store(store)
        .rates(Arc::new(UnreachableRates))
        .build()
        .unwrap();

    let account = engine
        .user_balance(user, Some(Currency::try_from("USD").unwrap()))
        .await
        .unwrap();

    assert_eq!(account.balance_minor, 10000);
    assert_eq!(account.currency, Currency::reference());
}

#[tokio::test]
async fn unusable_rate_degrades_to_reference() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(user, 10000));
    let engine = Engine::builder()
        .store(store)
        .rates(Arc::new(FixedRate(0.0)))
        .build()
        .unwrap();

    let account = engine
        .user_balance(user, Some(Currency::try_from("USD").unwrap()))
        .await
        .unwrap();

    assert_eq!(account.balance_minor, 10000);
    assert_eq!(account.currency, Currency::reference());
}

#[tokio::test]
async fn missing_rate_source_degrades_to_reference() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_account(user, 10000));
    let engine = engine_with(store);

    let account = engine
        .user_balance(user, Some(Currency::try_from("USD").unwrap()))
        .await
        .unwrap();

    assert_eq!(account.balance_minor, 10000);
    assert_eq!(account.currency, Currency::reference());
}

async fn seed_transactions(engine: &Engine, user: Uuid, amounts: &[i64]) {
    for amount in amounts {
        engine
            .update_account(update(user, *amount))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn transactions_list_empty_page_is_not_found() {
    let engine = engine_with(Arc::new(MemoryStore::default()));

    let err = engine
        .transactions_list(TransactionsListCmd {
            user_id: Uuid::new_v4(),
            limit: 10,
            offset: 0,
            sort_by: None,
            direction: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::NotFound);
}

#[tokio::test]
async fn transactions_list_sorts_within_the_page() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default());
    let engine = engine_with(store);
    seed_transactions(&engine, user, &[500, 200, 900, 100]).await;

    let list = engine
        .transactions_list(TransactionsListCmd {
            user_id: user,
            limit: 10,
            offset: 0,
            sort_by: SortBy::parse("amount"),
            direction: SortDir::parse("d"),
        })
        .await
        .unwrap();

    let amounts: Vec<i64> = list.iter().map(|t| t.amount_minor).collect();
    assert_eq!(amounts, [900, 500, 200, 100]);
}

#[tokio::test]
async fn transactions_list_unrecognized_sort_keeps_store_order() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default());
    let engine = engine_with(store);
    seed_transactions(&engine, user, &[500, 200, 900]).await;

    let list = engine
        .transactions_list(TransactionsListCmd {
            user_id: user,
            limit: 10,
            offset: 0,
            sort_by: SortBy::parse("weight"),
            direction: SortDir::parse("d"),
        })
        .await
        .unwrap();

    let amounts: Vec<i64> = list.iter().map(|t| t.amount_minor).collect();
    assert_eq!(amounts, [500, 200, 900]);
}

#[tokio::test]
async fn transactions_list_pages_before_sorting() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default());
    let engine = engine_with(store);
    seed_transactions(&engine, user, &[500, 200, 900, 100, 700]).await;

    let list = engine
        .transactions_list(TransactionsListCmd {
            user_id: user,
            limit: 3,
            offset: 1,
            sort_by: SortBy::parse("date"),
            direction: SortDir::parse("i"),
        })
        .await
        .unwrap();

    // Page is [200, 900, 100] by insertion; date ascending keeps it.
    let amounts: Vec<i64> = list.iter().map(|t| t.amount_minor).collect();
    assert_eq!(amounts, [200, 900, 100]);
    assert!(list.windows(2).all(|w| w[0].occurred_at <= w[1].occurred_at));
}

#[tokio::test]
async fn builder_requires_a_store() {
    let err = Engine::builder().build().unwrap_err();
    assert_eq!(err, EngineError::MissingStore);
}
