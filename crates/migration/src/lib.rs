pub use sea_orm_migration::prelude::*;

mod m20240401_000000_init;

/// Database the `migration` binary targets when `LABSHOP_DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./labshop.db?mode=rwc";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240401_000000_init::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, Database, Statement};

    use super::*;

    async fn table_count(db: &sea_orm::DatabaseConnection) -> i64 {
        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'seaql_%' AND name NOT LIKE 'sqlite_%'",
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn init_migration_goes_down_and_up_again() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        assert_eq!(table_count(&db).await, 7);

        Migrator::down(&db, Some(1)).await.unwrap();
        assert_eq!(table_count(&db).await, 0);

        Migrator::up(&db, None).await.unwrap();
        assert_eq!(table_count(&db).await, 7);
    }
}
