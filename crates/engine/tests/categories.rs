use sea_orm::Database;

use engine::{CategoryPatch, Engine, EngineError, NewCategory, TransactionKind};
use migration::MigratorTrait;

const USER: &str = "alice@example.com";

async fn engine_with_user() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.sign_up(USER, "password1").await.unwrap();
    engine
}

fn new_category(name: &str, kind: TransactionKind) -> NewCategory {
    NewCategory {
        name: name.to_string(),
        kind,
        icon: None,
        color: None,
        is_default: false,
    }
}

#[tokio::test]
async fn list_is_ordered_by_name() {
    let engine = engine_with_user().await;
    for name in ["Market", "Bills", "Salary"] {
        engine
            .create_category(USER, new_category(name, TransactionKind::Expense))
            .await
            .unwrap();
    }

    let names: Vec<String> = engine
        .list_categories(USER)
        .await
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, ["Bills", "Market", "Salary"]);
}

#[tokio::test]
async fn names_are_unique_per_user_after_normalization() {
    let engine = engine_with_user().await;
    engine
        .create_category(USER, new_category("Market", TransactionKind::Expense))
        .await
        .unwrap();

    // Case and surrounding whitespace do not make a new name.
    let err = engine
        .create_category(USER, new_category("  MARKET ", TransactionKind::Expense))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
    assert_eq!(err.to_string(), "category already exists");

    // Another user is free to reuse it.
    engine.sign_up("bob@example.com", "password1").await.unwrap();
    engine
        .create_category("bob@example.com", new_category("Market", TransactionKind::Expense))
        .await
        .unwrap();
}

#[tokio::test]
async fn rename_checks_uniqueness_but_allows_self() {
    let engine = engine_with_user().await;
    let market = engine
        .create_category(USER, new_category("Market", TransactionKind::Expense))
        .await
        .unwrap();
    engine
        .create_category(USER, new_category("Bills", TransactionKind::Expense))
        .await
        .unwrap();

    let err = engine
        .update_category(
            USER,
            market.id,
            CategoryPatch {
                name: Some("bills".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    // Re-casing a category's own name is not a conflict.
    let updated = engine
        .update_category(
            USER,
            market.id,
            CategoryPatch {
                name: Some("MARKET".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "MARKET");
}

#[tokio::test]
async fn update_and_delete_round_trip() {
    let engine = engine_with_user().await;
    let category = engine
        .create_category(USER, new_category("Market", TransactionKind::Expense))
        .await
        .unwrap();

    let updated = engine
        .update_category(
            USER,
            category.id,
            CategoryPatch {
                icon: Some("cart".to_string()),
                color: Some("#ff8800".to_string()),
                is_default: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.icon.as_deref(), Some("cart"));
    assert_eq!(updated.color.as_deref(), Some("#ff8800"));
    assert!(updated.is_default);

    engine.delete_category(USER, category.id).await.unwrap();
    assert!(engine.list_categories(USER).await.unwrap().is_empty());

    let err = engine.delete_category(USER, category.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
