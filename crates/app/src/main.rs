use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{AccountGroup, Engine, GUEST_ACCOUNT, RECENT_ENTRIES_LIMIT, RestockBatch};
use migration::{Migrator, MigratorTrait};

mod settings;

#[derive(Parser, Debug)]
#[command(name = "labshop")]
#[command(about = "Operator tool for the labshop ledger")]
struct Cli {
    /// Settings file name, without extension.
    #[arg(long, default_value = settings::DEFAULT_FILE)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations and exit.
    Migrate,
    Account(Account),
    Catalog(Catalog),
    Restock(RestockArgs),
    Withdraw(WithdrawArgs),
    /// Print the cash total and every cash movement.
    Cash,
    /// Print the per-item profit report as JSON.
    Stats,
    /// Recompute every stock level, balance and the cash drawer.
    Rebuild,
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Create(AccountCreateArgs),
    /// Create the shared guest account.
    Guest,
    List,
    /// Show the newest active entries of an account.
    Entries {
        uid: String,
        #[arg(long, default_value_t = RECENT_ENTRIES_LIMIT)]
        limit: u64,
    },
}

#[derive(Args, Debug)]
struct AccountCreateArgs {
    #[arg(long)]
    uid: String,
    #[arg(long)]
    name: String,
    #[arg(long, env = "LABSHOP_PASSWORD")]
    password: String,
    #[arg(long, default_value = "user", value_parser = parse_group)]
    group: AccountGroup,
}

#[derive(Args, Debug)]
struct Catalog {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Replace the catalog with a JSON feed.
    Import { feed: std::path::PathBuf },
    List,
}

#[derive(Args, Debug)]
struct RestockArgs {
    #[arg(long)]
    uid: String,
    #[arg(long)]
    jan: String,
    #[arg(long)]
    cost: i64,
    #[arg(long, default_value_t = 1)]
    quantity: i64,
    #[arg(long, default_value_t = 1)]
    divide: i64,
}

#[derive(Args, Debug)]
struct WithdrawArgs {
    #[arg(long)]
    uid: String,
    /// Signed amount; money taken out of the drawer is negative.
    #[arg(long, allow_negative_numbers = true)]
    amount: i64,
}

fn parse_group(raw: &str) -> Result<AccountGroup, String> {
    AccountGroup::try_from(raw)
        .map_err(|_| format!("unknown account group: {raw} (expected guest, user or labshop)"))
}

async fn connect_db(
    database: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = sea_orm::Database::connect(database.url()).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "labshop={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect_db(&settings.database).await?;
    tracing::debug!(database = ?settings.database, "database ready");
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Migrate => {
            tracing::info!("migrations applied");
        }
        Command::Account(Account { command }) => match command {
            AccountCommand::Create(args) => {
                let account = engine
                    .register_account(&args.uid, &args.password, args.group, &args.name)
                    .await?;
                println!("created account: {} ({})", account.uid, account.group.as_str());
            }
            AccountCommand::Guest => {
                let account = engine
                    .register_account(GUEST_ACCOUNT, "", AccountGroup::Guest, "Guest")
                    .await?;
                println!("created account: {}", account.uid);
            }
            AccountCommand::List => {
                for account in engine.accounts().await? {
                    println!(
                        "{}\t{}\t{}\t{}",
                        account.uid,
                        account.group.as_str(),
                        account.balance,
                        account.name
                    );
                }
            }
            AccountCommand::Entries { uid, limit } => {
                for view in engine.recent_entries(&uid, limit).await? {
                    let name = view.item.map(|item| item.name).unwrap_or_default();
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        view.entry.recorded_at.to_rfc3339(),
                        view.entry.id,
                        view.entry.jan,
                        view.entry.amount,
                        name
                    );
                }
            }
        },
        Command::Catalog(Catalog { command }) => match command {
            CatalogCommand::Import { feed } => {
                let raw = tokio::fs::read_to_string(&feed).await?;
                let categories = engine::parse_feed(&raw)?;
                let installed = engine.import_catalog(&categories).await?;
                println!("imported {installed} items from {}", feed.display());
            }
            CatalogCommand::List => {
                for item in engine.catalog().await? {
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        item.category_id,
                        item.jan,
                        item.shelf_price(),
                        item.stock,
                        item.name
                    );
                }
            }
        },
        Command::Restock(args) => {
            let batch = RestockBatch {
                jan: args.jan,
                unit_cost: args.cost,
                quantity: args.quantity,
                divisor: args.divide,
            };
            let receipts = engine.restock(&args.uid, &[batch]).await?;
            for receipt in receipts {
                println!("receipt {} for {}", receipt.id, receipt.jan);
            }
        }
        Command::Withdraw(args) => {
            engine.record_withdrawal(&args.uid, args.amount).await?;
            println!("cash total: {}", engine.current_cash_total().await?);
        }
        Command::Cash => {
            for movement in engine.cash_movements().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    movement.recorded_at.to_rfc3339(),
                    movement.kind.as_str(),
                    movement.account_label,
                    movement.amount
                );
            }
            println!("cash total: {}", engine.current_cash_total().await?);
        }
        Command::Stats => {
            let stats = engine.item_statistics().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Rebuild => {
            engine.rebuild().await?;
            println!("derived state rebuilt");
        }
    }

    Ok(())
}
