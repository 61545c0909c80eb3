//! sea-orm implementation of the engine's [`BalanceStore`] capability.
//!
//! The balance mutation is a single `UPDATE ... RETURNING` statement: that
//! statement's atomicity is what concurrent debits against one account rely
//! on, so it must never be split into a read followed by a write.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QuerySelect, Statement,
};
use uuid::Uuid;

use engine::{
    Account, Currency, Transaction,
    store::{BalanceStore, StoreError, TransactionDraft},
};

pub mod accounts;
pub mod transactions;

/// [`BalanceStore`] backed by a sea-orm [`DatabaseConnection`].
///
/// Connection pooling and per-call acquire/release are delegated to
/// sea-orm; no connection outlives a single operation here.
#[derive(Clone, Debug)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn account_from_model(op: &'static str, model: accounts::Model) -> Result<Account, StoreError> {
    let id = Uuid::parse_str(&model.id)
        .map_err(|err| StoreError::new(op, format!("invalid account id in row: {err}")))?;
    Ok(Account::new(id, model.balance_minor))
}

fn transaction_from_model(
    op: &'static str,
    model: transactions::Model,
) -> Result<Transaction, StoreError> {
    let id = Uuid::parse_str(&model.id)
        .map_err(|err| StoreError::new(op, format!("invalid transaction id in row: {err}")))?;
    Ok(Transaction {
        id,
        occurred_at: model.occurred_at,
        who: model.who,
        description: model.description,
        amount_minor: model.amount_minor,
        currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
    })
}

#[async_trait]
impl BalanceStore for SqlStore {
    async fn get_balance(&self, user_id: Uuid) -> Result<Option<Account>, StoreError> {
        let model = accounts::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|err| StoreError::new("get_balance", err))?;

        model.map(|m| account_from_model("get_balance", m)).transpose()
    }

    async fn conditional_adjust(
        &self,
        user_id: Uuid,
        delta_minor: i64,
    ) -> Result<Option<Account>, StoreError> {
        let backend = self.db.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "UPDATE accounts SET balance_minor = balance_minor + ? WHERE id = ? \
             RETURNING id, balance_minor",
            [delta_minor.into(), user_id.to_string().into()],
        );

        let row = self
            .db
            .query_one(stmt)
            .await
            .map_err(|err| StoreError::new("conditional_adjust", err))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row
            .try_get("", "id")
            .map_err(|err| StoreError::new("conditional_adjust", err))?;
        let balance_minor: i64 = row
            .try_get("", "balance_minor")
            .map_err(|err| StoreError::new("conditional_adjust", err))?;
        let id = Uuid::parse_str(&id)
            .map_err(|err| StoreError::new("conditional_adjust", format!("invalid account id in row: {err}")))?;

        Ok(Some(Account::new(id, balance_minor)))
    }

    async fn create_account(
        &self,
        user_id: Uuid,
        balance_minor: i64,
    ) -> Result<Account, StoreError> {
        let model = accounts::ActiveModel {
            id: ActiveValue::Set(user_id.to_string()),
            balance_minor: ActiveValue::Set(balance_minor),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|err| StoreError::new("create_account", err))?;

        account_from_model("create_account", inserted)
    }

    async fn insert_transaction(
        &self,
        user_id: Uuid,
        draft: TransactionDraft,
    ) -> Result<Transaction, StoreError> {
        let model = transactions::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            account_id: ActiveValue::Set(user_id.to_string()),
            occurred_at: ActiveValue::Set(Utc::now()),
            who: ActiveValue::Set(draft.who),
            description: ActiveValue::Set(draft.description),
            amount_minor: ActiveValue::Set(draft.amount_minor),
            currency: ActiveValue::Set(draft.currency.code().to_string()),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|err| StoreError::new("insert_transaction", err))?;

        transaction_from_model("insert_transaction", inserted)
    }

    async fn get_transaction(
        &self,
        user_id: Uuid,
        trx_id: Uuid,
    ) -> Result<Option<Transaction>, StoreError> {
        let model = transactions::Entity::find_by_id(trx_id.to_string())
            .filter(transactions::Column::AccountId.eq(user_id.to_string()))
            .one(&self.db)
            .await
            .map_err(|err| StoreError::new("get_transaction", err))?;

        model
            .map(|m| transaction_from_model("get_transaction", m))
            .transpose()
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Transaction>, StoreError> {
        // No ORDER BY: paging follows storage order, sorting happens in the
        // engine per page.
        let models = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(user_id.to_string()))
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|err| StoreError::new("list_transactions", err))?;

        models
            .into_iter()
            .map(|m| transaction_from_model("list_transactions", m))
            .collect()
    }
}
