//! Dirty set carried through a write.
//!
//! Each write marks the aggregates whose inputs it touched, then flushes
//! the set before committing. Flush order is fixed: stock, balances,
//! drawer.

use std::collections::BTreeSet;

use sea_orm::ConnectionTrait;

use crate::ResultEngine;

use super::derive::{write_balance, write_drawer, write_stock};

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct Invalidation {
    items: BTreeSet<String>,
    accounts: BTreeSet<String>,
    drawer: bool,
}

impl Invalidation {
    pub(super) fn item(&mut self, jan: &str) {
        self.items.insert(jan.to_string());
    }

    pub(super) fn account(&mut self, uid: &str) {
        self.accounts.insert(uid.to_string());
    }

    pub(super) fn drawer(&mut self) {
        self.drawer = true;
    }

    pub(super) fn items(&self) -> &BTreeSet<String> {
        &self.items
    }

    pub(super) fn accounts(&self) -> &BTreeSet<String> {
        &self.accounts
    }

    pub(super) async fn flush<C: ConnectionTrait>(self, db: &C) -> ResultEngine<()> {
        for jan in &self.items {
            write_stock(db, jan).await?;
        }
        for uid in &self.accounts {
            write_balance(db, uid).await?;
        }
        if self.drawer {
            write_drawer(db).await?;
        }
        Ok(())
    }
}
