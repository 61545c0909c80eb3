//! Balance API endpoints

use api_types::balance::{AccountView, BalanceQuery};
use api_types::update::{BalanceUpdateNew, BalanceUpdateResponse};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::{Account, BalanceUpdateCmd, Currency};

use crate::{ServerError, parse_uuid, server::ServerState, transactions::transaction_view};

pub(crate) fn account_view(account: Account) -> AccountView {
    AccountView {
        uuid: account.id,
        balance_minor: account.balance_minor,
        currency: account.currency.code().to_string(),
    }
}

pub async fn get(
    State(state): State<ServerState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<AccountView>, ServerError> {
    let user_id = parse_uuid(&query.uuid, "uuid")?;
    let currency = match query.currency.as_deref() {
        None => None,
        Some(code) if code.trim().is_empty() => None,
        Some(code) => Some(Currency::try_from(code)?),
    };

    let account = state.engine.user_balance(user_id, currency).await?;

    Ok(Json(account_view(account)))
}

pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<BalanceUpdateNew>,
) -> Result<Json<BalanceUpdateResponse>, ServerError> {
    let user_id = parse_uuid(&payload.uuid, "uuid")?;
    if payload.who.trim().is_empty() {
        return Err(ServerError::Generic("who must not be empty".to_string()));
    }
    if payload.amount_minor == 0 {
        return Err(ServerError::Generic(
            "amount_minor must not be zero".to_string(),
        ));
    }
    let currency = Currency::try_from(payload.currency.as_str())?;

    let cmd = BalanceUpdateCmd::new(user_id, payload.who, payload.amount_minor)
        .description(payload.description.unwrap_or_default())
        .currency(currency);

    let update = state.engine.update_account(cmd).await?;

    Ok(Json(BalanceUpdateResponse {
        user: account_view(update.account),
        transaction: transaction_view(update.transaction),
    }))
}
