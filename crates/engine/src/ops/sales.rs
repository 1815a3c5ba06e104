use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CatalogItem, EngineError, EntryView, LedgerEntry, ResultEngine, accounts, canceled_entries,
    catalog, ledger_entries,
};

use super::{Engine, invalidation::Invalidation, with_tx};

/// Account charged by [`Engine::charge_guest`].
pub const GUEST_ACCOUNT: &str = "guest";
/// Pseudo jan used for guest charges. It is not a catalog item.
pub const GUEST_JAN: &str = "guest";

/// How many entries [`Engine::recent_entries`] returns by default.
pub const RECENT_ENTRIES_LIMIT: u64 = 20;

impl Engine {
    /// Records one ledger entry per jan, at the item's current price.
    /// Entries are stamped one by one, in the order of `jans`.
    ///
    /// Repeated jans are repeated units. The batch is all-or-nothing: an
    /// unknown account or jan aborts the whole sale. Afterwards the stock of
    /// every touched item, the account balance and the cash drawer are
    /// recomputed.
    pub async fn record_sale<S: AsRef<str>>(
        &self,
        uid: &str,
        jans: &[S],
    ) -> ResultEngine<Vec<LedgerEntry>> {
        with_tx!(self, |db_tx| {
            if accounts::Entity::find_by_id(uid.to_string())
                .one(&db_tx)
                .await?
                .is_none()
            {
                return Err(EngineError::KeyNotFound(uid.to_string()));
            }

            let mut prices: HashMap<&str, i64> = HashMap::new();
            let mut dirty = Invalidation::default();
            let mut entries = Vec::with_capacity(jans.len());

            for jan in jans {
                let jan = jan.as_ref();
                let price = match prices.get(jan) {
                    Some(price) => *price,
                    None => {
                        let item = catalog::Entity::find_by_id(jan.to_string())
                            .one(&db_tx)
                            .await?
                            .ok_or_else(|| EngineError::KeyNotFound(jan.to_string()))?;
                        prices.insert(jan, item.price);
                        item.price
                    }
                };

                let entry = LedgerEntry::new(uid, jan, price, Utc::now());
                ledger_entries::ActiveModel::from(&entry)
                    .insert(&db_tx)
                    .await?;
                dirty.item(jan);
                entries.push(entry);
            }

            dirty.account(uid);
            dirty.drawer();
            dirty.flush(&db_tx).await?;

            tracing::info!(uid, units = entries.len(), "sale recorded");
            Ok(entries)
        })
    }

    /// Moves an active entry of `uid` to the archive.
    ///
    /// Returns `false` and changes nothing when no such active entry
    /// exists, including when it was already canceled. The item stock and
    /// the account balance are recomputed; the drawer row is not.
    pub async fn cancel_sale(&self, uid: &str, entry_id: Uuid) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            let Some(entry) = ledger_entries::Entity::find_by_id(entry_id.to_string())
                .filter(ledger_entries::Column::AccountId.eq(uid))
                .one(&db_tx)
                .await?
            else {
                tracing::debug!(uid, %entry_id, "nothing to cancel");
                return Ok(false);
            };

            canceled_entries::archived(&entry, Utc::now())
                .insert(&db_tx)
                .await?;
            ledger_entries::Entity::delete_by_id(entry.id.clone())
                .exec(&db_tx)
                .await?;

            let mut dirty = Invalidation::default();
            dirty.item(&entry.jan);
            dirty.account(uid);
            dirty.flush(&db_tx).await?;

            tracing::info!(uid, %entry_id, jan = entry.jan.as_str(), "sale canceled");
            Ok(true)
        })
    }

    /// Charges the shared guest account by `amount` (signed, like any
    /// ledger amount).
    pub async fn charge_guest(&self, amount: i64) -> ResultEngine<LedgerEntry> {
        with_tx!(self, |db_tx| {
            let entry = LedgerEntry::new(GUEST_ACCOUNT, GUEST_JAN, amount, Utc::now());
            ledger_entries::ActiveModel::from(&entry)
                .insert(&db_tx)
                .await?;

            let mut dirty = Invalidation::default();
            dirty.account(GUEST_ACCOUNT);
            dirty.flush(&db_tx).await?;

            tracing::info!(amount, "guest charged");
            Ok(entry)
        })
    }

    /// The newest active entries of an account, joined with their catalog
    /// item.
    pub async fn recent_entries(&self, uid: &str, limit: u64) -> ResultEngine<Vec<EntryView>> {
        let db = &self.database;
        let items: HashMap<String, CatalogItem> = catalog::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.jan.clone(), CatalogItem::from(model)))
            .collect();

        ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(uid))
            .order_by_desc(ledger_entries::Column::RecordedAt)
            .order_by_desc(ledger_entries::Column::Id)
            .limit(limit)
            .all(db)
            .await?
            .into_iter()
            .map(|model| -> ResultEngine<EntryView> {
                let entry = LedgerEntry::try_from(model)?;
                let item = items.get(&entry.jan).cloned();
                Ok(EntryView { entry, item })
            })
            .collect()
    }

    /// Canceled entries of an account, oldest first.
    pub async fn canceled_entries(&self, uid: &str) -> ResultEngine<Vec<LedgerEntry>> {
        canceled_entries::Entity::find()
            .filter(canceled_entries::Column::AccountId.eq(uid))
            .order_by_asc(canceled_entries::Column::RecordedAt)
            .order_by_asc(canceled_entries::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(LedgerEntry::try_from)
            .collect()
    }
}
