use chrono::{Duration, Utc};
use sea_orm::Database;

use engine::{
    Engine, EngineError, NewTransaction, TransactionKind, TransactionPatch, TransactionStatus,
    WatchedTable,
};
use migration::MigratorTrait;
use uuid::Uuid;

const USER: &str = "alice@example.com";

async fn engine_with_user() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.sign_up(USER, "password1").await.unwrap();
    engine
}

fn new_tx(
    title: &str,
    amount_minor: i64,
    kind: TransactionKind,
    days_ago: i64,
) -> NewTransaction {
    NewTransaction {
        title: title.to_string(),
        description: None,
        amount_minor,
        kind,
        category: "General".to_string(),
        payment_method: "card".to_string(),
        status: TransactionStatus::Completed,
        date: Utc::now() - Duration::days(days_ago),
        is_recurring: false,
        recurring_day: None,
    }
}

#[tokio::test]
async fn list_returns_newest_first() {
    let engine = engine_with_user().await;
    engine
        .create_transaction(USER, new_tx("old", 100, TransactionKind::Expense, 10))
        .await
        .unwrap();
    engine
        .create_transaction(USER, new_tx("new", 200, TransactionKind::Expense, 1))
        .await
        .unwrap();

    let list = engine.list_transactions(USER).await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].title, "new");
    assert_eq!(list[1].title, "old");

    let recent = engine.recent_transactions(USER, 1).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].title, "new");
}

#[tokio::test]
async fn create_validates_input() {
    let engine = engine_with_user().await;

    let err = engine
        .create_transaction(USER, new_tx("  ", 100, TransactionKind::Expense, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    let err = engine
        .create_transaction(USER, new_tx("x", 0, TransactionKind::Expense, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let mut cmd = new_tx("rent", 100, TransactionKind::Expense, 0);
    cmd.is_recurring = true;
    let err = engine.create_transaction(USER, cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let mut cmd = new_tx("rent", 100, TransactionKind::Expense, 0);
    cmd.recurring_day = Some(5);
    let err = engine.create_transaction(USER, cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn blank_descriptions_collapse_to_none() {
    let engine = engine_with_user().await;

    let mut cmd = new_tx("market", 100, TransactionKind::Expense, 0);
    cmd.description = Some("   ".to_string());
    let id = engine.create_transaction(USER, cmd).await.unwrap();

    let list = engine.list_transactions(USER).await.unwrap();
    assert_eq!(list[0].id, id);
    assert_eq!(list[0].description, None);
}

#[tokio::test]
async fn update_patches_and_reconciles_recurrence() {
    let engine = engine_with_user().await;
    let mut cmd = new_tx("rent", 100, TransactionKind::Expense, 0);
    cmd.is_recurring = true;
    cmd.recurring_day = Some(5);
    let id = engine.create_transaction(USER, cmd).await.unwrap();

    let updated = engine
        .update_transaction(
            USER,
            id,
            TransactionPatch {
                title: Some("Rent".to_string()),
                amount_minor: Some(250),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Rent");
    assert_eq!(updated.amount_minor, 250);
    // Untouched recurrence survives a partial patch.
    assert!(updated.is_recurring);
    assert_eq!(updated.recurring_day, Some(5));

    // Turning recurrence off clears the day.
    let updated = engine
        .update_transaction(
            USER,
            id,
            TransactionPatch {
                is_recurring: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!updated.is_recurring);
    assert_eq!(updated.recurring_day, None);
}

#[tokio::test]
async fn operations_are_scoped_to_the_user() {
    let engine = engine_with_user().await;
    engine.sign_up("bob@example.com", "password1").await.unwrap();
    let id = engine
        .create_transaction(USER, new_tx("mine", 100, TransactionKind::Expense, 0))
        .await
        .unwrap();

    let err = engine
        .delete_transaction("bob@example.com", id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.list_transactions("bob@example.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_the_row() {
    let engine = engine_with_user().await;
    let id = engine
        .create_transaction(USER, new_tx("gone", 100, TransactionKind::Expense, 0))
        .await
        .unwrap();

    engine.delete_transaction(USER, id).await.unwrap();
    assert!(engine.list_transactions(USER).await.unwrap().is_empty());

    let err = engine.delete_transaction(USER, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn recompute_balance_ignores_failed_and_tracks_last_income() {
    let engine = engine_with_user().await;
    engine
        .create_transaction(USER, new_tx("salary", 1000, TransactionKind::Income, 1))
        .await
        .unwrap();
    engine
        .create_transaction(USER, new_tx("bonus", 700, TransactionKind::Income, 10))
        .await
        .unwrap();
    engine
        .create_transaction(USER, new_tx("market", 300, TransactionKind::Expense, 2))
        .await
        .unwrap();
    let mut failed = new_tx("declined", 500, TransactionKind::Expense, 0);
    failed.status = TransactionStatus::Failed;
    engine.create_transaction(USER, failed).await.unwrap();

    let balance = engine.recompute_balance(USER).await.unwrap();
    assert_eq!(balance.total_balance_minor, 1400);
    assert_eq!(balance.last_earned_minor, 1000);
    assert_eq!(balance.total_bonus_minor, 0);
}

#[tokio::test]
async fn writes_emit_change_events() {
    let engine = engine_with_user().await;
    let mut events = engine.subscribe();

    let id = engine
        .create_transaction(USER, new_tx("market", 100, TransactionKind::Expense, 0))
        .await
        .unwrap();
    assert_eq!(events.recv().await.unwrap().table, WatchedTable::Transactions);

    engine.delete_transaction(USER, id).await.unwrap();
    assert_eq!(events.recv().await.unwrap().table, WatchedTable::Transactions);

    engine.recompute_balance(USER).await.unwrap();
    assert_eq!(events.recv().await.unwrap().table, WatchedTable::Balances);
}
