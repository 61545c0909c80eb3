use serde::Serialize;

use crate::{
    Account, BalanceUpdateCmd, EngineError, ResultEngine, Transaction, store::TransactionDraft,
};

use super::Engine;

/// Result of a committed balance mutation: the account after the change and
/// the transaction record written for it.
#[derive(Clone, Debug, Serialize)]
pub struct BalanceUpdate {
    pub account: Account,
    pub transaction: Transaction,
}

impl Engine {
    /// Applies one signed balance change and writes its transaction record.
    ///
    /// Negative amounts are checked first: they can never create an account
    /// and can never drive a balance below zero. Non-negative amounts for an
    /// unknown account fall through the conditional update into the
    /// create-new-account path.
    ///
    /// Every successful call writes exactly one account row and one
    /// transaction record.
    pub async fn update_account(&self, cmd: BalanceUpdateCmd) -> ResultEngine<BalanceUpdate> {
        if cmd.amount_minor < 0 {
            match self.store().get_balance(cmd.user_id).await? {
                None => return Err(EngineError::NegativeCreate),
                Some(account) if account.balance_minor + cmd.amount_minor < 0 => {
                    return Err(EngineError::InsufficientFunds);
                }
                Some(_) => {}
            }
        }

        let draft = TransactionDraft {
            who: cmd.who,
            description: cmd.description,
            amount_minor: cmd.amount_minor,
            currency: cmd.currency,
        };

        let account = match self
            .store()
            .conditional_adjust(cmd.user_id, cmd.amount_minor)
            .await?
        {
            Some(account) => account,
            // No matching row: only reachable for non-negative amounts, the
            // negative-create case was rejected above.
            None => {
                self.store()
                    .create_account(cmd.user_id, cmd.amount_minor)
                    .await?
            }
        };

        let transaction = self.store().insert_transaction(cmd.user_id, draft).await?;

        tracing::debug!(
            user_id = %account.id,
            amount_minor = transaction.amount_minor,
            transaction = %transaction.id,
            "balance updated",
        );

        Ok(BalanceUpdate {
            account,
            transaction,
        })
    }
}
