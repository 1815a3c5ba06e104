use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{ResultEngine, RestockBatch, StockReceipt, stock_receipts};

use super::{Engine, invalidation::Invalidation, with_tx};

impl Engine {
    /// Writes one receipt per batch and recomputes the stock of every
    /// touched jan.
    ///
    /// Every batch is checked before anything is written; one bad batch
    /// rejects the whole request with [`InvalidAmount`](crate::EngineError::InvalidAmount).
    ///
    /// Receipts for a jan that is not (yet) in the catalog are kept; they
    /// count as soon as an import brings the item in.
    pub async fn restock(
        &self,
        uid: &str,
        batches: &[RestockBatch],
    ) -> ResultEngine<Vec<StockReceipt>> {
        for batch in batches {
            batch.validate()?;
        }

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let mut dirty = Invalidation::default();
            let mut receipts = Vec::with_capacity(batches.len());

            for batch in batches {
                let receipt = StockReceipt::new(batch, uid, now);
                stock_receipts::ActiveModel::from(&receipt)
                    .insert(&db_tx)
                    .await?;
                dirty.item(&batch.jan);
                receipts.push(receipt);
            }

            let touched = dirty.items().len();
            dirty.flush(&db_tx).await?;

            tracing::info!(uid, batches = receipts.len(), items = touched, "restocked");
            Ok(receipts)
        })
    }

    /// Receipts recorded for `jan`, oldest first.
    pub async fn stock_receipts(&self, jan: &str) -> ResultEngine<Vec<StockReceipt>> {
        stock_receipts::Entity::find()
            .filter(stock_receipts::Column::Jan.eq(jan))
            .order_by_asc(stock_receipts::Column::RecordedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(StockReceipt::try_from)
            .collect()
    }
}
