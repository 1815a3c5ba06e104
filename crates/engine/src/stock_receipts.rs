//! Restock batches.
//!
//! A receipt is immutable once written. One item usually accumulates many
//! receipts with differing cost and divisor; the weighted cost basis is
//! derived in [`ItemStatistics`](crate::ItemStatistics), never stored.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// One line of a restock request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockBatch {
    pub jan: String,
    /// Cost paid per restock unit.
    pub unit_cost: i64,
    pub quantity: i64,
    /// Consumable units per restock unit.
    pub divisor: i64,
}

impl RestockBatch {
    /// Units this batch adds to the item's stock, `None` on overflow.
    #[must_use]
    pub fn units(&self) -> Option<i64> {
        self.quantity.checked_mul(self.divisor)
    }

    /// Rejects batches that cannot be counted: quantity and divisor must be
    /// positive, cost non-negative, and both products must fit in an `i64`.
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        let jan = &self.jan;
        if self.quantity <= 0 {
            return Err(EngineError::InvalidAmount(format!(
                "quantity of '{jan}' must be positive"
            )));
        }
        if self.divisor <= 0 {
            return Err(EngineError::InvalidAmount(format!(
                "divisor of '{jan}' must be positive"
            )));
        }
        if self.unit_cost < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "cost of '{jan}' must not be negative"
            )));
        }
        if self.units().is_none() || self.quantity.checked_mul(self.unit_cost).is_none() {
            return Err(EngineError::InvalidAmount(format!(
                "restock of '{jan}' is out of range"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReceipt {
    pub id: Uuid,
    pub jan: String,
    pub cost: i64,
    pub quantity: i64,
    pub divide: i64,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
}

impl StockReceipt {
    pub fn new(batch: &RestockBatch, recorded_by: &str, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            jan: batch.jan.clone(),
            cost: batch.unit_cost,
            quantity: batch.quantity,
            divide: batch.divisor,
            recorded_by: recorded_by.to_string(),
            recorded_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub jan: String,
    pub cost: i64,
    pub quantity: i64,
    pub divide: i64,
    pub recorded_by: String,
    pub recorded_at: DateTimeUtc,
}

impl Model {
    pub(crate) fn units(&self) -> ResultEngine<i64> {
        self.quantity
            .checked_mul(self.divide)
            .ok_or_else(|| self.out_of_range())
    }

    pub(crate) fn total_cost(&self) -> ResultEngine<i64> {
        self.quantity
            .checked_mul(self.cost)
            .ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(&self) -> EngineError {
        EngineError::InvalidData(format!("stock receipt {} is out of range", self.id))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&StockReceipt> for ActiveModel {
    fn from(receipt: &StockReceipt) -> Self {
        Self {
            id: ActiveValue::Set(receipt.id.to_string()),
            jan: ActiveValue::Set(receipt.jan.clone()),
            cost: ActiveValue::Set(receipt.cost),
            quantity: ActiveValue::Set(receipt.quantity),
            divide: ActiveValue::Set(receipt.divide),
            recorded_by: ActiveValue::Set(receipt.recorded_by.clone()),
            recorded_at: ActiveValue::Set(receipt.recorded_at),
        }
    }
}

impl TryFrom<Model> for StockReceipt {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidData("invalid stock receipt id".to_string()))?,
            jan: model.jan,
            cost: model.cost,
            quantity: model.quantity,
            divide: model.divide,
            recorded_by: model.recorded_by,
            recorded_at: model.recorded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(unit_cost: i64, quantity: i64, divisor: i64) -> RestockBatch {
        RestockBatch {
            jan: "CHIPS".to_string(),
            unit_cost,
            quantity,
            divisor,
        }
    }

    #[test]
    fn valid_batch_counts_divided_units() {
        let batch = batch(300, 2, 6);
        assert_eq!(batch.validate(), Ok(()));
        assert_eq!(batch.units(), Some(12));
    }

    #[test]
    fn non_positive_counts_are_rejected() {
        assert_eq!(
            batch(300, 0, 6).validate(),
            Err(EngineError::InvalidAmount(
                "quantity of 'CHIPS' must be positive".to_string()
            ))
        );
        assert_eq!(
            batch(300, 2, -1).validate(),
            Err(EngineError::InvalidAmount(
                "divisor of 'CHIPS' must be positive".to_string()
            ))
        );
        assert_eq!(
            batch(-1, 2, 6).validate(),
            Err(EngineError::InvalidAmount(
                "cost of 'CHIPS' must not be negative".to_string()
            ))
        );
    }

    #[test]
    fn overflowing_products_are_rejected() {
        let expected = Err(EngineError::InvalidAmount(
            "restock of 'CHIPS' is out of range".to_string(),
        ));
        assert_eq!(batch(1, i64::MAX, 2).validate(), expected);
        assert_eq!(batch(i64::MAX, 2, 1).validate(), expected);
    }
}
