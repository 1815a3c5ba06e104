use chrono::Utc;
use sea_orm::{QueryOrder, TransactionTrait, prelude::*};

use crate::{CashMovement, ResultEngine, cash_movements};

use super::{Engine, derive::checked_total, with_tx};

impl Engine {
    /// Appends a withdrawal line with the signed `amount` as given.
    ///
    /// The drawer row is left alone; the cash total is the sum of both.
    pub async fn record_withdrawal(&self, uid: &str, amount: i64) -> ResultEngine<CashMovement> {
        with_tx!(self, |db_tx| {
            let movement = CashMovement::withdrawal(uid, amount, Utc::now());
            cash_movements::ActiveModel::from(&movement)
                .insert(&db_tx)
                .await?;
            tracing::info!(uid, amount, "withdrawal recorded");
            Ok(movement)
        })
    }

    /// Drawer row and withdrawals, oldest first.
    pub async fn cash_movements(&self) -> ResultEngine<Vec<CashMovement>> {
        cash_movements::Entity::find()
            .order_by_asc(cash_movements::Column::RecordedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(CashMovement::try_from)
            .collect()
    }

    /// Cash the drawer should hold: the sum of every cash movement.
    pub async fn current_cash_total(&self) -> ResultEngine<i64> {
        let rows = cash_movements::Entity::find().all(&self.database).await?;
        checked_total(rows.iter().map(|row| row.amount), "cash total")
    }
}
