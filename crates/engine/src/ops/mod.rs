use sea_orm::DatabaseConnection;

mod accounts;
mod cash;
mod catalog;
mod derive;
mod invalidation;
mod sales;
mod stock;

pub use sales::{GUEST_ACCOUNT, GUEST_JAN, RECENT_ENTRIES_LIMIT};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The shop ledger.
///
/// Every write runs in one database transaction: the ledger rows are
/// inserted first, then every cached aggregate they feed (stock levels,
/// balances, the drawer row) is recomputed from the ledger before commit.
/// A failed operation leaves nothing behind.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> crate::ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
