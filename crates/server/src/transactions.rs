//! Transactions API endpoints

use api_types::transaction::{TransactionView, TransactionsListQuery, TransactionsListResponse};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::{SortBy, SortDir, Transaction, TransactionsListCmd};

use crate::{ServerError, parse_uuid, server::ServerState};

pub(crate) fn transaction_view(trx: Transaction) -> TransactionView {
    TransactionView {
        id: trx.id,
        date: trx.occurred_at.format("%Y-%m-%d").to_string(),
        time: trx.occurred_at.format("%H:%M:%S").to_string(),
        timestamp: trx.timestamp(),
        who: trx.who,
        description: trx.description,
        amount_minor: trx.amount_minor,
        currency: trx.currency.code().to_string(),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionsListQuery>,
) -> Result<Json<TransactionsListResponse>, ServerError> {
    let user_id = parse_uuid(&query.uuid, "uuid")?;

    let limit = query
        .limit
        .ok_or_else(|| ServerError::Generic("limit is required".to_string()))?;
    if !(10..=100).contains(&limit) {
        return Err(ServerError::Generic(
            "limit must be between 10 and 100".to_string(),
        ));
    }

    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ServerError::Generic(
            "offset must not be negative".to_string(),
        ));
    }

    let sort_by = match query.sort_by.as_deref() {
        None | Some("") => None,
        Some(value) => Some(
            SortBy::parse(value)
                .ok_or_else(|| ServerError::Generic("sort_by must be date or amount".to_string()))?,
        ),
    };
    let direction = match query.cmp.as_deref() {
        None | Some("") => None,
        Some(value) => Some(
            SortDir::parse(value)
                .ok_or_else(|| ServerError::Generic("cmp must be d or i".to_string()))?,
        ),
    };

    let list = state
        .engine
        .transactions_list(TransactionsListCmd {
            user_id,
            limit: limit as u64,
            offset: offset as u64,
            sort_by,
            direction,
        })
        .await?;

    Ok(Json(TransactionsListResponse {
        transactions: list.into_iter().map(transaction_view).collect(),
    }))
}
