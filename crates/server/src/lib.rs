use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;
use uuid::Uuid;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod balance;
mod server;
mod transactions;
mod transfer;

pub mod types {
    pub mod balance {
        pub use api_types::balance::{AccountView, BalanceQuery};
    }

    pub mod update {
        pub use api_types::update::{BalanceUpdateNew, BalanceUpdateResponse};
    }

    pub mod transfer {
        pub use api_types::transfer::{TransferNew, TransferResponse};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionView, TransactionsListQuery, TransactionsListResponse,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound => StatusCode::NOT_FOUND,
        EngineError::InsufficientFunds
        | EngineError::NegativeCreate
        | EngineError::NegativeBalance => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InvalidCurrency(_) => StatusCode::BAD_REQUEST,
        EngineError::MissingStore | EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Store(store_err) => {
            tracing::error!("store error: {store_err}");
            "internal server error".to_string()
        }
        EngineError::MissingStore => {
            tracing::error!("engine has no store configured");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ServerError::Generic(format!("{field} must be a valid uuid")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::store::StoreError;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn domain_refusals_map_to_422() {
        for err in [
            EngineError::InsufficientFunds,
            EngineError::NegativeCreate,
            EngineError::NegativeBalance,
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn invalid_currency_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidCurrency("XXXX".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_error_maps_to_500() {
        let err = EngineError::Store(StoreError::new("get_balance", "boom"));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_uuid_rejects_garbage() {
        assert!(parse_uuid("not-a-uuid", "uuid").is_err());
        assert!(parse_uuid("d9b7e3a2-3f67-4f5a-9f0c-0a1b2c3d4e5f", "uuid").is_ok());
    }
}
