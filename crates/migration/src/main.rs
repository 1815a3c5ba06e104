//! Schema tool for the labshop database.
//!
//! `migration [up|down|fresh|status]`, against `LABSHOP_DATABASE_URL` or the
//! `./labshop.db` file the `labshop` binary uses by default.
use sea_orm::Database;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cmd = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let db_url = std::env::var("LABSHOP_DATABASE_URL")
        .unwrap_or_else(|_| migration::DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&db_url).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        "down" => migration::Migrator::down(&db, Some(1)).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        other => {
            eprintln!("unknown command '{other}'; expected up, down, fresh or status");
            std::process::exit(2);
        }
    }

    Ok(())
}
