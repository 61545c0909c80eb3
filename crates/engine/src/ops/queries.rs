use uuid::Uuid;

use crate::{
    Account, Currency, EngineError, ResultEngine, Transaction, TransactionsListCmd,
    sort_transactions,
};

use super::Engine;

impl Engine {
    /// Reads an account's balance, optionally converted for display.
    ///
    /// An empty target or the reference currency returns the stored balance
    /// as-is. Any other target is priced through the rate source; when the
    /// lookup fails in any way the read degrades to the stored balance in
    /// the reference currency instead of failing the request.
    pub async fn user_balance(
        &self,
        user_id: Uuid,
        currency: Option<Currency>,
    ) -> ResultEngine<Account> {
        let account = self
            .store()
            .get_balance(user_id)
            .await?
            .ok_or(EngineError::NotFound)?;

        match currency {
            Some(target) if !target.is_reference() => Ok(self.convert_balance(account, target).await),
            _ => Ok(account),
        }
    }

    /// Reads one page of an account's transactions, ordered in-process.
    ///
    /// An empty page is reported as [`EngineError::NotFound`], matching the
    /// behavior for an unknown account.
    pub async fn transactions_list(
        &self,
        cmd: TransactionsListCmd,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut list = self
            .store()
            .list_transactions(cmd.user_id, cmd.limit, cmd.offset)
            .await?;

        if list.is_empty() {
            return Err(EngineError::NotFound);
        }

        sort_transactions(&mut list, cmd.sort_by, cmd.direction);

        Ok(list)
    }

    /// Prices `account` in `target`, falling back to the stored balance on
    /// any lookup failure or unusable rate.
    async fn convert_balance(&self, account: Account, target: Currency) -> Account {
        let Some(rates) = self.rates() else {
            tracing::warn!(
                currency = %target,
                "no rate source configured, returning reference-currency balance",
            );
            return account;
        };

        let rate = match rates.rate(&target).await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
            Ok(rate) => {
                tracing::warn!(
                    currency = %target,
                    rate,
                    "unusable conversion rate, returning reference-currency balance",
                );
                return account;
            }
            Err(err) => {
                tracing::warn!(
                    currency = %target,
                    error = %err,
                    "rate lookup failed, returning reference-currency balance",
                );
                return account;
            }
        };

        let converted = (account.balance_minor as f64 / rate).round();
        if !converted.is_finite() || converted.abs() >= i64::MAX as f64 {
            tracing::warn!(
                currency = %target,
                rate,
                "converted balance out of range, returning reference-currency balance",
            );
            return account;
        }

        Account {
            id: account.id,
            balance_minor: converted as i64,
            currency: target,
        }
    }
}
