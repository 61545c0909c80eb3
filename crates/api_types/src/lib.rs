//! Wire types shared by the server and its clients.
//!
//! Request ids arrive as strings and are validated by the transport layer;
//! responses carry typed ids. All monetary values are integer minor units of
//! the currency they are tagged with.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod balance {
    use super::*;

    /// Query string of `GET /balance`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceQuery {
        pub uuid: String,
        /// Display currency; empty or absent means the reference currency.
        pub currency: Option<String>,
    }

    /// An account balance tagged with the currency it is expressed in.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub uuid: Uuid,
        pub balance_minor: i64,
        pub currency: String,
    }
}

pub mod update {
    use super::*;

    /// Body of `POST /balance/update`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceUpdateNew {
        pub uuid: String,
        /// Actor attribution recorded on the transaction.
        pub who: String,
        pub description: Option<String>,
        /// Signed change in minor units; negative amounts are debits.
        pub amount_minor: i64,
        pub currency: String,
    }

    /// Response of `POST /balance/update`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceUpdateResponse {
        pub user: super::balance::AccountView,
        pub transaction: super::transaction::TransactionView,
    }
}

pub mod transfer {
    use super::*;

    /// Body of `POST /balance/transfer`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from: String,
        pub to: String,
        /// Strictly positive amount in reference-currency minor units.
        pub amount_minor: i64,
    }

    /// Response of `POST /balance/transfer`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferResponse {
        pub success: String,
    }
}

pub mod transaction {
    use super::*;

    /// Query string of `GET /trx_list`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsListQuery {
        pub uuid: String,
        pub limit: Option<i64>,
        pub offset: Option<i64>,
        /// `date` or `amount`; absent means store order.
        pub sort_by: Option<String>,
        /// `d`/`desc` or `i`/`asc`; absent means store order.
        pub cmp: Option<String>,
    }

    /// One transaction record.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub date: String,
        pub time: String,
        /// Unix timestamp of the insertion instant, used for date ordering.
        pub timestamp: i64,
        pub who: String,
        pub description: String,
        pub amount_minor: i64,
        pub currency: String,
    }

    /// Response of `GET /trx_list`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsListResponse {
        pub transactions: Vec<TransactionView>,
    }
}
