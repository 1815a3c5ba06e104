//! Cash movements ("bank" lines).
//!
//! The drawer total is the sum of every row here. Two kinds share the
//! table:
//!
//! - [`CashMovementKind::Drawer`]: a single row keyed by [`DRAWER_LABEL`],
//!   overwritten whenever currency-denomination sales change. Its amount
//!   is the cash taken in at the counter.
//! - [`CashMovementKind::Withdrawal`]: one appended row per withdrawal,
//!   carrying the signed amount the caller passed (negative when cash
//!   leaves the drawer).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Operator label owning the aggregated drawer row.
pub const DRAWER_LABEL: &str = "labshop";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashMovementKind {
    Drawer,
    Withdrawal,
}

impl CashMovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drawer => "drawer",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl TryFrom<&str> for CashMovementKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "drawer" => Ok(Self::Drawer),
            "withdrawal" => Ok(Self::Withdrawal),
            other => Err(EngineError::InvalidData(format!(
                "invalid cash movement kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashMovement {
    pub id: Uuid,
    pub kind: CashMovementKind,
    pub account_label: String,
    pub amount: i64,
    pub recorded_at: DateTime<Utc>,
}

impl CashMovement {
    pub fn withdrawal(account_label: &str, amount: i64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: CashMovementKind::Withdrawal,
            account_label: account_label.to_string(),
            amount,
            recorded_at,
        }
    }

    pub fn drawer(amount: i64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: CashMovementKind::Drawer,
            account_label: DRAWER_LABEL.to_string(),
            amount,
            recorded_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub account_label: String,
    pub amount: i64,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CashMovement> for ActiveModel {
    fn from(movement: &CashMovement) -> Self {
        Self {
            id: ActiveValue::Set(movement.id.to_string()),
            kind: ActiveValue::Set(movement.kind.as_str().to_string()),
            account_label: ActiveValue::Set(movement.account_label.clone()),
            amount: ActiveValue::Set(movement.amount),
            recorded_at: ActiveValue::Set(movement.recorded_at),
        }
    }
}

impl TryFrom<Model> for CashMovement {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidData("invalid cash movement id".to_string()))?,
            kind: CashMovementKind::try_from(model.kind.as_str())?,
            account_label: model.account_label,
            amount: model.amount,
            recorded_at: model.recorded_at,
        })
    }
}
