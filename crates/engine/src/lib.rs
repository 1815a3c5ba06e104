//! Ledger engine for a walk-up shop.
//!
//! Accounts buy catalog items on credit against a point balance, goods are
//! restocked in batches and an operator reconciles a cash drawer. Stock
//! levels, balances and the drawer total are cached on their rows but are
//! always derived from the append-only ledger tables (see [`Engine`]).

pub use accounts::{Account, AccountGroup};
pub use cash_movements::{CashMovement, CashMovementKind, DRAWER_LABEL};
pub use catalog::CatalogItem;
pub use categories::Category;
pub use denomination::{
    CHARGE_CATEGORY, Denomination, LARGE_DENOMINATION_STOCK, SMALL_DENOMINATION_STOCK,
};
pub use error::EngineError;
pub use feed::{FeedCategory, FeedGood, FeedScalar, parse_feed};
pub use ledger_entries::{EntryView, LedgerEntry};
pub use ops::{Engine, EngineBuilder, GUEST_ACCOUNT, GUEST_JAN, RECENT_ENTRIES_LIMIT};
pub use statistics::ItemStatistics;
pub use stock_receipts::{RestockBatch, StockReceipt};

mod accounts;
mod canceled_entries;
mod cash_movements;
mod catalog;
mod categories;
mod credentials;
mod denomination;
mod error;
mod feed;
mod ledger_entries;
mod ops;
mod statistics;
mod stock_receipts;

type ResultEngine<T> = Result<T, EngineError>;
