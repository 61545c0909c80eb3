//! Transfer API endpoint

use api_types::transfer::{TransferNew, TransferResponse};
use axum::{Json, extract::State};
use engine::TransferCmd;

use crate::{ServerError, parse_uuid, server::ServerState};

pub async fn transfer(
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<Json<TransferResponse>, ServerError> {
    let from = parse_uuid(&payload.from, "from")?;
    let to = parse_uuid(&payload.to, "to")?;
    if payload.amount_minor <= 0 {
        return Err(ServerError::Generic(
            "amount_minor must be positive".to_string(),
        ));
    }
    if from == to {
        return Err(ServerError::Generic("from and to must differ".to_string()));
    }

    state
        .engine
        .transfer(TransferCmd {
            from,
            to,
            amount_minor: payload.amount_minor,
        })
        .await?;

    Ok(Json(TransferResponse {
        success: "true".to_string(),
    }))
}
