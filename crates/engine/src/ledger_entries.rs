//! Consumption records.
//!
//! A [`LedgerEntry`] is exactly one unit of one catalog item consumed by one
//! account. Its `amount` is the item price at recording time, so the sum of
//! an account's active entries is its balance.
//!
//! Lifecycle: created by a sale, counted while active, and archived by a
//! cancellation (see `canceled_entries`). Entries are never edited.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CatalogItem, EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub account_id: String,
    pub jan: String,
    /// Signed amount applied to the account balance.
    pub amount: i64,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(account_id: &str, jan: &str, amount: i64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id: account_id.to_string(),
            jan: jan.to_string(),
            amount,
            recorded_at,
        }
    }
}

/// A ledger entry together with the catalog item it refers to.
///
/// `item` is `None` when the jan is no longer in the catalog (for example
/// after a re-import) or never was (guest charges).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub entry: LedgerEntry,
    pub item: Option<CatalogItem>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub jan: String,
    pub amount: i64,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LedgerEntry> for ActiveModel {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            account_id: ActiveValue::Set(entry.account_id.clone()),
            jan: ActiveValue::Set(entry.jan.clone()),
            amount: ActiveValue::Set(entry.amount),
            recorded_at: ActiveValue::Set(entry.recorded_at),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidData("invalid ledger entry id".to_string()))?,
            account_id: model.account_id,
            jan: model.jan,
            amount: model.amount,
            recorded_at: model.recorded_at,
        })
    }
}
