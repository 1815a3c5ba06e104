//! Archive of canceled ledger entries.
//!
//! Rows are copied verbatim from `ledger_entries` (same id, same fields)
//! plus the cancellation time. Nothing in here takes part in derivations.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use super::ledger_entries;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "canceled_ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub jan: String,
    pub amount: i64,
    pub recorded_at: DateTimeUtc,
    pub canceled_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn archived(entry: &ledger_entries::Model, canceled_at: DateTime<Utc>) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(entry.id.clone()),
        account_id: ActiveValue::Set(entry.account_id.clone()),
        jan: ActiveValue::Set(entry.jan.clone()),
        amount: ActiveValue::Set(entry.amount),
        recorded_at: ActiveValue::Set(entry.recorded_at),
        canceled_at: ActiveValue::Set(canceled_at),
    }
}

impl TryFrom<Model> for crate::LedgerEntry {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        ledger_entries::Model {
            id: model.id,
            account_id: model.account_id,
            jan: model.jan,
            amount: model.amount,
            recorded_at: model.recorded_at,
        }
        .try_into()
    }
}
