use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    AccountGroup, CashMovementKind, Engine, EngineError, FeedCategory, FeedGood, FeedScalar,
    RestockBatch,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn good(jan: &str, name: &str, price: i64, cost: i64, divide: i64) -> FeedGood {
    FeedGood {
        jan: jan.into(),
        name: name.into(),
        price: price.into(),
        cost: cost.into(),
        divide: divide.into(),
    }
}

fn shop_feed() -> Vec<FeedCategory> {
    vec![
        FeedCategory {
            id: "drinks".into(),
            title: "Drinks".into(),
            goods: vec![
                good("SODA", "Soda", 150, 80, 1),
                good("TEA", "Tea", 120, 60, 1),
            ],
        },
        FeedCategory {
            id: "snacks".into(),
            title: "Snacks".into(),
            goods: vec![good("CHIPS", "Chips", 100, 300, 6)],
        },
        FeedCategory {
            id: "charge".into(),
            title: "Charge".into(),
            goods: vec![
                good("1000yen", "1000 yen", -1000, 0, 1),
                good("100yen", "100 yen", -100, 0, 1),
            ],
        },
    ]
}

async fn shop() -> (Engine, DatabaseConnection) {
    let (engine, db) = engine_with_db().await;
    engine
        .register_account("alice", "password", AccountGroup::User, "Alice")
        .await
        .unwrap();
    engine
        .register_account("bob", "hunter2", AccountGroup::User, "Bob")
        .await
        .unwrap();
    engine.import_catalog(&shop_feed()).await.unwrap();
    (engine, db)
}

fn batch(jan: &str, unit_cost: i64, quantity: i64, divisor: i64) -> RestockBatch {
    RestockBatch {
        jan: jan.to_string(),
        unit_cost,
        quantity,
        divisor,
    }
}

async fn stock(engine: &Engine, jan: &str) -> i64 {
    engine.item(jan).await.unwrap().stock
}

async fn balance(engine: &Engine, uid: &str) -> i64 {
    engine.account(uid).await.unwrap().balance
}

#[tokio::test]
async fn soda_sale_and_cancellation() {
    let (engine, _db) = engine_with_db().await;
    engine
        .register_account("userA", "pw", AccountGroup::User, "User A")
        .await
        .unwrap();
    engine
        .import_catalog(&[FeedCategory {
            id: "drinks".into(),
            title: "Drinks".into(),
            goods: vec![good("SODA", "Soda", 150, 80, 1)],
        }])
        .await
        .unwrap();

    engine
        .restock("userA", &[batch("SODA", 80, 24, 1)])
        .await
        .unwrap();
    assert_eq!(stock(&engine, "SODA").await, 24);

    let entries = engine.record_sale("userA", &["SODA"]).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, -150);
    assert_eq!(stock(&engine, "SODA").await, 23);
    assert_eq!(balance(&engine, "userA").await, -150);

    let canceled = engine.cancel_sale("userA", entries[0].id).await.unwrap();
    assert!(canceled);
    assert_eq!(stock(&engine, "SODA").await, 24);
    assert_eq!(balance(&engine, "userA").await, 0);
}

#[tokio::test]
async fn repeated_jans_are_separate_units() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("SODA", 80, 10, 1), batch("CHIPS", 300, 1, 6)])
        .await
        .unwrap();

    engine
        .record_sale("alice", &["SODA", "CHIPS", "SODA", "SODA"])
        .await
        .unwrap();

    assert_eq!(stock(&engine, "SODA").await, 7);
    assert_eq!(stock(&engine, "CHIPS").await, 5);
    assert_eq!(balance(&engine, "alice").await, -550);
    assert_eq!(balance(&engine, "bob").await, 0);
}

#[tokio::test]
async fn sale_with_unknown_jan_writes_nothing() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("SODA", 80, 5, 1)])
        .await
        .unwrap();

    let err = engine
        .record_sale("alice", &["SODA", "NOPE", "TEA"])
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("NOPE".to_string()));
    assert_eq!(stock(&engine, "SODA").await, 5);
    assert_eq!(balance(&engine, "alice").await, 0);
    assert!(engine.recent_entries("alice", 20).await.unwrap().is_empty());
}

#[tokio::test]
async fn sale_for_unknown_account_is_rejected() {
    let (engine, _db) = shop().await;

    let err = engine.record_sale("mallory", &["SODA"]).await.unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("mallory".to_string()));
    assert_eq!(stock(&engine, "SODA").await, 0);
}

#[tokio::test]
async fn overselling_drives_stock_negative() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("TEA", 60, 1, 1)])
        .await
        .unwrap();

    engine.record_sale("alice", &["TEA", "TEA", "TEA"]).await.unwrap();

    assert_eq!(stock(&engine, "TEA").await, -2);
}

#[tokio::test]
async fn stock_counts_divided_units_across_receipts() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("CHIPS", 300, 2, 6)])
        .await
        .unwrap();
    engine
        .restock("bob", &[batch("CHIPS", 280, 1, 8)])
        .await
        .unwrap();
    engine.record_sale("bob", &["CHIPS"]).await.unwrap();

    assert_eq!(stock(&engine, "CHIPS").await, 12 + 8 - 1);
    assert_eq!(engine.stock_receipts("CHIPS").await.unwrap().len(), 2);
}

#[tokio::test]
async fn second_cancellation_is_a_no_op() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("SODA", 80, 3, 1)])
        .await
        .unwrap();
    let entries = engine.record_sale("alice", &["SODA", "TEA"]).await.unwrap();
    let soda = entries[0].clone();

    assert!(engine.cancel_sale("alice", soda.id).await.unwrap());
    assert_eq!(stock(&engine, "SODA").await, 3);
    assert_eq!(balance(&engine, "alice").await, -120);

    assert!(!engine.cancel_sale("alice", soda.id).await.unwrap());
    assert_eq!(stock(&engine, "SODA").await, 3);
    assert_eq!(balance(&engine, "alice").await, -120);

    let archived = engine.canceled_entries("alice").await.unwrap();
    assert_eq!(archived, vec![soda]);
}

#[tokio::test]
async fn cancelling_unknown_or_foreign_entry_changes_nothing() {
    let (engine, _db) = shop().await;
    let entries = engine.record_sale("alice", &["SODA"]).await.unwrap();

    assert!(!engine.cancel_sale("alice", Uuid::new_v4()).await.unwrap());
    assert!(!engine.cancel_sale("bob", entries[0].id).await.unwrap());

    assert_eq!(stock(&engine, "SODA").await, -1);
    assert_eq!(balance(&engine, "alice").await, -150);
    assert!(engine.canceled_entries("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn currency_items_report_fixed_stock() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("1000yen", 0, 10, 1), batch("100yen", 0, 3, 1)])
        .await
        .unwrap();
    engine
        .record_sale("alice", &["1000yen", "1000yen", "100yen"])
        .await
        .unwrap();

    assert_eq!(stock(&engine, "1000yen").await, 1);
    assert_eq!(stock(&engine, "100yen").await, 4);
    assert_eq!(engine.recompute_stock("1000yen").await.unwrap(), 1);
}

#[tokio::test]
async fn cash_sale_moves_drawer_and_withdrawal_moves_total() {
    let (engine, _db) = shop().await;
    assert_eq!(engine.current_cash_total().await.unwrap(), 0);

    engine
        .record_sale("alice", &["SODA", "1000yen"])
        .await
        .unwrap();
    assert_eq!(balance(&engine, "alice").await, 850);
    assert_eq!(engine.current_cash_total().await.unwrap(), 1000);

    engine.record_withdrawal("bob", -500).await.unwrap();
    assert_eq!(engine.current_cash_total().await.unwrap(), 500);

    let movements = engine.cash_movements().await.unwrap();
    assert_eq!(movements.len(), 2);
    let drawer = movements
        .iter()
        .find(|m| m.kind == CashMovementKind::Drawer)
        .unwrap();
    assert_eq!(drawer.amount, 1000);
    assert_eq!(drawer.account_label, "labshop");
    let withdrawal = movements
        .iter()
        .find(|m| m.kind == CashMovementKind::Withdrawal)
        .unwrap();
    assert_eq!(withdrawal.amount, -500);
    assert_eq!(withdrawal.account_label, "bob");
}

#[tokio::test]
async fn drawer_row_is_upserted_not_appended() {
    let (engine, _db) = shop().await;

    engine.record_sale("alice", &["1000yen"]).await.unwrap();
    engine.record_sale("bob", &["100yen", "100yen"]).await.unwrap();
    engine.record_sale("bob", &["TEA"]).await.unwrap();

    let movements = engine.cash_movements().await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].amount, 1200);
    assert_eq!(engine.current_cash_total().await.unwrap(), 1200);
}

#[tokio::test]
async fn cancellation_does_not_touch_the_drawer() {
    let (engine, _db) = shop().await;
    let entries = engine.record_sale("alice", &["1000yen"]).await.unwrap();

    assert!(engine.cancel_sale("alice", entries[0].id).await.unwrap());
    assert_eq!(balance(&engine, "alice").await, 0);
    assert_eq!(engine.current_cash_total().await.unwrap(), 1000);

    assert_eq!(engine.recompute_cash_drawer().await.unwrap(), 0);
    assert_eq!(engine.current_cash_total().await.unwrap(), 0);
}

#[tokio::test]
async fn recomputation_is_idempotent() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("SODA", 80, 6, 1)])
        .await
        .unwrap();
    engine.record_sale("alice", &["SODA", "TEA"]).await.unwrap();

    let first = engine.recompute_stock("SODA").await.unwrap();
    let second = engine.recompute_stock("SODA").await.unwrap();
    assert_eq!(first, 5);
    assert_eq!(first, second);

    let first = engine.recompute_balance("alice").await.unwrap();
    let second = engine.recompute_balance("alice").await.unwrap();
    assert_eq!(first, -270);
    assert_eq!(first, second);
    assert_eq!(balance(&engine, "alice").await, -270);
}

#[tokio::test]
async fn rebuild_repairs_tampered_caches() {
    let (engine, db) = shop().await;
    engine
        .restock("alice", &[batch("SODA", 80, 4, 1)])
        .await
        .unwrap();
    engine
        .record_sale("alice", &["SODA", "1000yen"])
        .await
        .unwrap();

    let backend = db.get_database_backend();
    for sql in [
        "UPDATE catalog_items SET stock = 999",
        "UPDATE accounts SET balance = 42",
        "UPDATE cash_movements SET amount = 7",
    ] {
        db.execute(Statement::from_string(backend, sql)).await.unwrap();
    }

    engine.rebuild().await.unwrap();

    assert_eq!(stock(&engine, "SODA").await, 3);
    assert_eq!(stock(&engine, "TEA").await, 0);
    assert_eq!(stock(&engine, "100yen").await, 4);
    assert_eq!(balance(&engine, "alice").await, 850);
    assert_eq!(balance(&engine, "bob").await, 0);
    assert_eq!(engine.current_cash_total().await.unwrap(), 1000);
}

#[tokio::test]
async fn bulk_recomputation_covers_every_row() {
    let (engine, db) = shop().await;
    engine
        .restock("alice", &[batch("TEA", 60, 2, 1)])
        .await
        .unwrap();
    engine.record_sale("bob", &["TEA"]).await.unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "UPDATE catalog_items SET stock = -5;",
    ))
    .await
    .unwrap();
    db.execute(Statement::from_string(backend, "UPDATE accounts SET balance = 1;"))
        .await
        .unwrap();

    engine.recompute_all_stock().await.unwrap();
    engine.recompute_all_balances().await.unwrap();

    assert_eq!(stock(&engine, "TEA").await, 1);
    assert_eq!(stock(&engine, "SODA").await, 0);
    assert_eq!(stock(&engine, "1000yen").await, 1);
    assert_eq!(balance(&engine, "alice").await, 0);
    assert_eq!(balance(&engine, "bob").await, -120);
}

#[tokio::test]
async fn registration_and_credentials() {
    let (engine, _db) = engine_with_db().await;

    let account = engine
        .register_account("alice", "password", AccountGroup::Labshop, "Alice")
        .await
        .unwrap();
    assert_eq!(account.balance, 0);
    assert_eq!(account.group, AccountGroup::Labshop);

    let err = engine
        .register_account("alice", "other", AccountGroup::User, "Impostor")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
    assert_eq!(engine.account("alice").await.unwrap().name, "Alice");

    assert_eq!(
        engine.authenticate("alice", "password").await.unwrap().uid,
        "alice"
    );
    assert_eq!(
        engine.authenticate("alice", "wrong").await.unwrap_err(),
        EngineError::Unauthorized("bad credential for alice".to_string())
    );
    assert_eq!(
        engine.authenticate("nobody", "password").await.unwrap_err(),
        EngineError::KeyNotFound("nobody".to_string())
    );
}

#[tokio::test]
async fn change_credential_requires_old_credential() {
    let (engine, _db) = engine_with_db().await;
    engine
        .register_account("alice", "password", AccountGroup::User, "Alice")
        .await
        .unwrap();

    let err = engine
        .change_credential("alice", "not-it", "new")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized("bad credential for alice".to_string())
    );
    engine.authenticate("alice", "password").await.unwrap();

    engine
        .change_credential("alice", "password", "new")
        .await
        .unwrap();
    engine.authenticate("alice", "new").await.unwrap();
    assert!(matches!(
        engine.authenticate("alice", "password").await,
        Err(EngineError::Unauthorized(_))
    ));

    assert_eq!(
        engine
            .change_credential("nobody", "a", "b")
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("nobody".to_string())
    );
}

#[tokio::test]
async fn import_replaces_catalog_and_keeps_ledger() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("SODA", 80, 10, 1), batch("TEA", 60, 4, 1)])
        .await
        .unwrap();
    engine.record_sale("alice", &["SODA", "TEA"]).await.unwrap();

    let installed = engine
        .import_catalog(&[FeedCategory {
            id: FeedScalar::Integer(7),
            title: "Everything".into(),
            goods: vec![good("TEA", "Green tea", 130, 65, 1)],
        }])
        .await
        .unwrap();
    assert_eq!(installed, 1);

    assert_eq!(
        engine.item("SODA").await.unwrap_err(),
        EngineError::KeyNotFound("SODA".to_string())
    );
    let tea = engine.item("TEA").await.unwrap();
    assert_eq!(tea.name, "Green tea");
    assert_eq!(tea.price, -130);
    assert_eq!(tea.category_id, "7");
    assert_eq!(tea.stock, 3);

    let categories = engine.categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].title, "Everything");

    // Past entries keep the price they were recorded with.
    assert_eq!(balance(&engine, "alice").await, -270);
}

#[tokio::test]
async fn malformed_feed_leaves_catalog_untouched() {
    let (engine, _db) = shop().await;

    let err = engine
        .import_catalog(&[FeedCategory {
            id: "drinks".into(),
            title: "Drinks".into(),
            goods: vec![FeedGood {
                jan: "COLA".into(),
                name: "Cola".into(),
                price: "one fifty".into(),
                cost: 80.into(),
                divide: 1.into(),
            }],
        }])
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidFeed(_)));
    assert_eq!(engine.catalog().await.unwrap().len(), 5);
    assert_eq!(engine.categories().await.unwrap().len(), 3);
}

#[tokio::test]
async fn catalog_is_listed_in_shelf_order() {
    let (engine, _db) = shop().await;

    let jans: Vec<String> = engine
        .catalog()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.jan)
        .collect();
    assert_eq!(jans, vec!["SODA", "TEA", "CHIPS", "1000yen", "100yen"]);

    let categories: Vec<String> = engine
        .categories()
        .await
        .unwrap()
        .into_iter()
        .map(|category| category.id)
        .collect();
    assert_eq!(categories, vec!["drinks", "snacks", "charge"]);
}

#[tokio::test]
async fn item_statistics_report_profit_per_good() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("CHIPS", 300, 2, 6), batch("SODA", 80, 10, 1)])
        .await
        .unwrap();
    engine
        .restock("alice", &[batch("CHIPS", 360, 1, 6)])
        .await
        .unwrap();
    let entries = engine
        .record_sale("bob", &["CHIPS", "CHIPS", "SODA", "1000yen"])
        .await
        .unwrap();
    engine.cancel_sale("bob", entries[1].id).await.unwrap();

    let stats = engine.item_statistics().await.unwrap();
    let jans: Vec<&str> = stats.iter().map(|s| s.jan.as_str()).collect();
    assert_eq!(jans, vec!["SODA", "TEA", "CHIPS"]);

    let chips = &stats[2];
    assert_eq!(chips.selling_price, 100);
    assert_eq!(chips.total_acquisition_cost, 960);
    assert_eq!(chips.total_units_acquired, 18);
    assert!((chips.weighted_unit_cost - 960.0 / 18.0).abs() < f64::EPSILON);
    assert_eq!(chips.total_revenue, 100);
    assert_eq!(chips.total_units_sold, 1);
    assert_eq!(chips.profit, -860);

    let tea = &stats[1];
    assert_eq!(tea.total_units_acquired, 0);
    assert_eq!(tea.weighted_unit_cost, 0.0);
    assert_eq!(tea.profit, 0);
}

#[tokio::test]
async fn recent_entries_are_newest_first_with_items() {
    let (engine, _db) = shop().await;
    engine.record_sale("alice", &["SODA"]).await.unwrap();
    engine.record_sale("alice", &["TEA"]).await.unwrap();
    engine.record_sale("bob", &["CHIPS"]).await.unwrap();

    let recent = engine.recent_entries("alice", 20).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].entry.jan, "TEA");
    assert_eq!(recent[0].item.as_ref().unwrap().name, "Tea");
    assert_eq!(recent[1].entry.jan, "SODA");

    let limited = engine.recent_entries("alice", 1).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].entry.jan, "TEA");
}

#[tokio::test]
async fn guest_charges_hit_the_guest_balance() {
    let (engine, _db) = shop().await;
    engine
        .register_account(engine::GUEST_ACCOUNT, "", AccountGroup::Guest, "Guest")
        .await
        .unwrap();

    engine.charge_guest(-300).await.unwrap();
    engine.charge_guest(-200).await.unwrap();

    assert_eq!(balance(&engine, "guest").await, -500);
    let recent = engine.recent_entries("guest", 20).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|view| view.item.is_none()));
    assert_eq!(engine.current_cash_total().await.unwrap(), 0);
}

#[tokio::test]
async fn restock_rejects_uncountable_batches() {
    let (engine, _db) = shop().await;
    engine
        .restock("alice", &[batch("CHIPS", 300, 1, 6)])
        .await
        .unwrap();

    let err = engine
        .restock("alice", &[batch("SODA", 80, i64::MAX, 2)])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("restock of 'SODA' is out of range".to_string())
    );

    let err = engine
        .restock("alice", &[batch("CHIPS", 300, 1, 6), batch("TEA", 60, 4, 0)])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("divisor of 'TEA' must be positive".to_string())
    );

    assert!(matches!(
        engine.restock("alice", &[batch("TEA", 60, -3, 1)]).await,
        Err(EngineError::InvalidAmount(_))
    ));

    assert!(engine.stock_receipts("SODA").await.unwrap().is_empty());
    assert!(engine.stock_receipts("TEA").await.unwrap().is_empty());
    assert_eq!(engine.stock_receipts("CHIPS").await.unwrap().len(), 1);
    assert_eq!(stock(&engine, "CHIPS").await, 6);
    assert_eq!(stock(&engine, "SODA").await, 0);
}

#[tokio::test]
async fn overflowing_cash_total_is_an_error() {
    let (engine, _db) = shop().await;
    engine.record_withdrawal("alice", i64::MIN).await.unwrap();
    engine.record_withdrawal("bob", -1).await.unwrap();

    assert_eq!(
        engine.current_cash_total().await.unwrap_err(),
        EngineError::InvalidData("cash total is out of range".to_string())
    );
}

#[tokio::test]
async fn entries_of_one_sale_keep_their_order() {
    let (engine, _db) = shop().await;
    let entries = engine
        .record_sale("alice", &["SODA", "TEA", "CHIPS"])
        .await
        .unwrap();
    assert!(entries.windows(2).all(|pair| pair[0].recorded_at < pair[1].recorded_at));

    let jans: Vec<String> = engine
        .recent_entries("alice", 20)
        .await
        .unwrap()
        .into_iter()
        .map(|view| view.entry.jan)
        .collect();
    assert_eq!(jans, vec!["CHIPS", "TEA", "SODA"]);
}
