//! Derived state.
//!
//! Stock levels, balances and the drawer row are caches over the ledger
//! tables. Each routine here recomputes one of them from scratch and writes
//! it back; running one twice without intervening writes is a no-op.
//!
//! - stock(jan) = Σ receipt.quantity × receipt.divide − count(active entries)
//!   (a currency jan reports its fixed sentinel instead)
//! - balance(uid) = Σ active entry.amount for the account
//! - drawer = Σ active entry.amount over currency jans
//!
//! Stock may go negative when an item is oversold; nothing clamps it.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    CashMovement, CashMovementKind, DRAWER_LABEL, Denomination, EngineError, ItemStatistics,
    ResultEngine,
    accounts, cash_movements, catalog,
    denomination::CHARGE_CATEGORY,
    ledger_entries,
    statistics::ItemTally,
    stock_receipts,
};

use super::{Engine, catalog::ordered_items, invalidation::Invalidation, with_tx};

/// Sums ledger values, reporting overflow as corrupt stored data.
pub(super) fn checked_total<I>(values: I, what: &str) -> ResultEngine<i64>
where
    I: IntoIterator<Item = i64>,
{
    values
        .into_iter()
        .try_fold(0i64, i64::checked_add)
        .ok_or_else(|| EngineError::InvalidData(format!("{what} is out of range")))
}

pub(super) async fn stock_level<C: ConnectionTrait>(db: &C, jan: &str) -> ResultEngine<i64> {
    if let Some(denomination) = Denomination::from_jan(jan) {
        return Ok(denomination.stock_sentinel());
    }

    let receipts = stock_receipts::Entity::find()
        .filter(stock_receipts::Column::Jan.eq(jan))
        .all(db)
        .await?;
    let units = receipts
        .iter()
        .map(stock_receipts::Model::units)
        .collect::<ResultEngine<Vec<_>>>()?;
    let acquired = checked_total(units, &format!("stock of '{jan}'"))?;
    let consumed = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::Jan.eq(jan))
        .count(db)
        .await?;

    i64::try_from(consumed)
        .ok()
        .and_then(|consumed| acquired.checked_sub(consumed))
        .ok_or_else(|| EngineError::InvalidData(format!("stock of '{jan}' is out of range")))
}

pub(super) async fn write_stock<C: ConnectionTrait>(db: &C, jan: &str) -> ResultEngine<i64> {
    let stock = stock_level(db, jan).await?;
    catalog::Entity::update_many()
        .col_expr(catalog::Column::Stock, Expr::value(stock))
        .filter(catalog::Column::Jan.eq(jan))
        .exec(db)
        .await?;
    tracing::debug!(jan, stock, "stock recomputed");
    Ok(stock)
}

pub(super) async fn write_balance<C: ConnectionTrait>(db: &C, uid: &str) -> ResultEngine<i64> {
    let entries = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::AccountId.eq(uid))
        .all(db)
        .await?;
    let balance = checked_total(
        entries.iter().map(|entry| entry.amount),
        &format!("balance of '{uid}'"),
    )?;

    accounts::Entity::update_many()
        .col_expr(accounts::Column::Balance, Expr::value(balance))
        .filter(accounts::Column::Uid.eq(uid))
        .exec(db)
        .await?;
    tracing::debug!(uid, balance, "balance recomputed");
    Ok(balance)
}

/// Upsert the drawer row with the cash taken in through denomination sales.
pub(super) async fn write_drawer<C: ConnectionTrait>(db: &C) -> ResultEngine<i64> {
    let entries = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::Jan.is_in(Denomination::jans()))
        .all(db)
        .await?;
    let amount = checked_total(entries.iter().map(|entry| entry.amount), "cash drawer")?;

    let existing = cash_movements::Entity::find()
        .filter(cash_movements::Column::Kind.eq(CashMovementKind::Drawer.as_str()))
        .filter(cash_movements::Column::AccountLabel.eq(DRAWER_LABEL))
        .one(db)
        .await?;

    match existing {
        Some(model) => {
            let mut row: cash_movements::ActiveModel = model.into();
            row.amount = ActiveValue::Set(amount);
            row.recorded_at = ActiveValue::Set(Utc::now());
            row.update(db).await?;
        }
        None => {
            cash_movements::ActiveModel::from(&CashMovement::drawer(amount, Utc::now()))
                .insert(db)
                .await?;
        }
    }
    tracing::debug!(amount, "cash drawer recomputed");
    Ok(amount)
}

pub(super) async fn all_jans<C: ConnectionTrait>(db: &C) -> ResultEngine<Vec<String>> {
    let items = catalog::Entity::find().all(db).await?;
    Ok(items.into_iter().map(|item| item.jan).collect())
}

impl Engine {
    /// Recomputes and stores the stock level of one catalog item.
    pub async fn recompute_stock(&self, jan: &str) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| write_stock(&db_tx, jan).await)
    }

    /// Recomputes the stock level of every catalog item.
    pub async fn recompute_all_stock(&self) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let mut dirty = Invalidation::default();
            for jan in all_jans(&db_tx).await? {
                dirty.item(&jan);
            }
            dirty.flush(&db_tx).await
        })
    }

    /// Recomputes and stores the balance of one account.
    pub async fn recompute_balance(&self, uid: &str) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| write_balance(&db_tx, uid).await)
    }

    /// Recomputes the balance of every account.
    pub async fn recompute_all_balances(&self) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let mut dirty = Invalidation::default();
            for account in accounts::Entity::find().all(&db_tx).await? {
                dirty.account(&account.uid);
            }
            dirty.flush(&db_tx).await
        })
    }

    /// Recomputes the drawer row from currency-denomination sales.
    pub async fn recompute_cash_drawer(&self) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| write_drawer(&db_tx).await)
    }

    /// Recomputes every cached aggregate in a single transaction.
    pub async fn rebuild(&self) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let mut dirty = Invalidation::default();
            for jan in all_jans(&db_tx).await? {
                dirty.item(&jan);
            }
            for account in accounts::Entity::find().all(&db_tx).await? {
                dirty.account(&account.uid);
            }
            dirty.drawer();
            tracing::info!(
                items = dirty.items().len(),
                accounts = dirty.accounts().len(),
                "rebuilding derived state"
            );
            dirty.flush(&db_tx).await
        })
    }

    /// Profit report for every catalog item that is a good.
    ///
    /// Cash denominations and the items of the `charge` category are left
    /// out. Only active ledger entries count as sales; every receipt counts
    /// as acquisition.
    pub async fn item_statistics(&self) -> ResultEngine<Vec<ItemStatistics>> {
        let db = &self.database;
        let items = ordered_items(db).await?;

        let mut tallies: HashMap<String, ItemTally> = HashMap::new();
        for receipt in stock_receipts::Entity::find().all(db).await? {
            let cost = receipt.total_cost()?;
            let units = receipt.units()?;
            tallies
                .entry(receipt.jan)
                .or_default()
                .acquire(cost, units)?;
        }
        for entry in ledger_entries::Entity::find().all(db).await? {
            tallies.entry(entry.jan).or_default().sell(entry.amount)?;
        }

        items
            .into_iter()
            .filter(|item| item.category_id != CHARGE_CATEGORY)
            .filter(|item| !Denomination::is_currency(&item.jan))
            .map(|item| {
                tallies
                    .remove(&item.jan)
                    .unwrap_or_default()
                    .into_statistics(item.jan, item.name, item.price)
            })
            .collect()
    }
}
