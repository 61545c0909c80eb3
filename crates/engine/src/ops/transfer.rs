use uuid::Uuid;

use crate::{
    BalanceUpdateCmd, EngineError, ResultEngine, SYSTEM_ACTOR, TransferCmd,
    store::TransactionDraft,
};

use super::Engine;

const SENDER_TRANSFER_DESCRIPTION: &str = "transfer to another user";
const RECIPIENT_TRANSFER_DESCRIPTION: &str = "transfer from another user";

impl Engine {
    /// Moves `cmd.amount_minor` from `cmd.from` to `cmd.to` as two balance
    /// updates: a debit leg on the sender, then a credit leg on the
    /// recipient.
    ///
    /// The legs are sequential mutations, not one atomic scope. If the
    /// credit leg fails after the debit committed, the debit is reversed
    /// with a compensating transaction attributed to [`SYSTEM_ACTOR`]; the
    /// credit-leg error is returned either way.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<()> {
        self.ensure_transfer_possible(&cmd).await?;

        // Debit leg. A concurrent debit may have raced past the pre-check;
        // the update re-validates and nothing is persisted on failure.
        let debit = self
            .update_account(
                BalanceUpdateCmd::new(cmd.from, cmd.from.to_string(), -cmd.amount_minor)
                    .description(SENDER_TRANSFER_DESCRIPTION),
            )
            .await?;

        // Credit leg.
        if let Err(err) = self
            .update_account(
                BalanceUpdateCmd::new(cmd.to, cmd.from.to_string(), cmd.amount_minor)
                    .description(RECIPIENT_TRANSFER_DESCRIPTION),
            )
            .await
        {
            if !self.reverse_debit(cmd.from, debit.transaction.id).await {
                // The sender is debited but the recipient was never
                // credited: operational alert, not a normal request error.
                tracing::error!(
                    sender = %cmd.from,
                    recipient = %cmd.to,
                    debit_transaction = %debit.transaction.id,
                    amount_minor = cmd.amount_minor,
                    "transfer reversal failed, sender balance left inconsistent",
                );
            }
            return Err(err);
        }

        Ok(())
    }

    /// Advisory affordability check run before any mutation.
    ///
    /// Both accounts must exist and the sender must cover the amount. The
    /// authoritative enforcement stays with the conditional debit itself.
    async fn ensure_transfer_possible(&self, cmd: &TransferCmd) -> ResultEngine<()> {
        let sender = self
            .store()
            .get_balance(cmd.from)
            .await?
            .ok_or(EngineError::NotFound)?;
        self.store()
            .get_balance(cmd.to)
            .await?
            .ok_or(EngineError::NotFound)?;

        if sender.balance_minor < cmd.amount_minor {
            return Err(EngineError::NegativeBalance);
        }

        Ok(())
    }

    /// Best-effort inverse of a committed debit leg, written straight
    /// against the store: the reversal must not be re-rejected by the
    /// affordability checks of `update_account`.
    ///
    /// Returns `false` when any step fails; the caller decides how to
    /// surface the inconsistency.
    async fn reverse_debit(&self, user_id: Uuid, trx_id: Uuid) -> bool {
        let Ok(Some(debit)) = self.store().get_transaction(user_id, trx_id).await else {
            return false;
        };

        let reversal = TransactionDraft {
            who: SYSTEM_ACTOR.to_string(),
            description: format!("abort transaction {trx_id}"),
            amount_minor: -debit.amount_minor,
            currency: debit.currency,
        };

        match self
            .store()
            .conditional_adjust(user_id, reversal.amount_minor)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => return false,
        }

        if self
            .store()
            .insert_transaction(user_id, reversal)
            .await
            .is_err()
        {
            return false;
        }

        tracing::info!(
            user_id = %user_id,
            reversed_transaction = %trx_id,
            "debit leg reversed after failed credit leg",
        );

        true
    }
}
