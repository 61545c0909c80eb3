//! Transactions table: append-only log of balance mutations.
//!
//! Rows are inserted and read, never updated; corrections land as new rows.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Transaction uuid, assigned at insert time.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning account uuid.
    pub account_id: String,
    pub occurred_at: DateTimeUtc,
    pub who: String,
    pub description: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
