//! End-to-end hook tests against an in-process server on a random port.

use std::time::Duration;

use api_types::category::{CategoryCreate, CategoryKind};
use api_types::entry::EntryNew;
use api_types::transaction::{TransactionCreate, TransactionKind, TransactionStatus};
use chrono::Utc;
use kasa_client::hooks::{CategoriesHook, DashboardHook, SettingsHook, TransactionsHook};
use kasa_client::{ApiClient, ChangeFeed, ClientError};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

const EMAIL: &str = "mina@example.com";
const PASSWORD: &str = "secret1";

async fn spawn_server() -> ApiClient {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder().database(db).build().await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, listener).unwrap();

    ApiClient::new(&format!("http://{addr}/")).unwrap()
}

async fn signed_in_client() -> ApiClient {
    let api = spawn_server().await;
    api.sign_up(EMAIL, PASSWORD).await.unwrap();
    let session = api.sign_in(EMAIL, PASSWORD).await.unwrap();
    api.with_token(&session.token)
}

fn expense_create(title: &str, amount_minor: i64) -> TransactionCreate {
    TransactionCreate {
        title: title.to_string(),
        description: None,
        amount_minor,
        kind: TransactionKind::Expense,
        category: "Market".to_string(),
        payment_method: "card".to_string(),
        status: TransactionStatus::Completed,
        date: Utc::now(),
        is_recurring: false,
        recurring_day: None,
    }
}

fn income_create(title: &str, amount_minor: i64) -> TransactionCreate {
    TransactionCreate {
        kind: TransactionKind::Income,
        category: "Salary".to_string(),
        ..expense_create(title, amount_minor)
    }
}

#[tokio::test]
async fn dashboard_aggregates_the_current_month() {
    let api = signed_in_client().await;
    for (amount, path_is_income) in [(1000, true), (500, true), (300, false)] {
        let entry = EntryNew {
            title: "entry".to_string(),
            amount_minor: amount,
            category: "General".to_string(),
            date: Utc::now(),
        };
        if path_is_income {
            api.add_income(&entry).await.unwrap();
        } else {
            api.add_expense(&entry).await.unwrap();
        }
    }

    let feed = ChangeFeed::connect(&api).await.unwrap();
    let mut hook = DashboardHook::new(api);
    hook.mount(&feed).await;

    let state = hook.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert!(state.data.balance.is_some());
    assert_eq!(state.data.monthly.income_minor, 1500);
    assert_eq!(state.data.monthly.expense_minor, 300);
}

#[tokio::test]
async fn dashboard_failure_resets_to_the_empty_default() {
    let api = signed_in_client().await;
    let entry = EntryNew {
        title: "salary".to_string(),
        amount_minor: 1000,
        category: "Salary".to_string(),
        date: Utc::now(),
    };
    api.add_income(&entry).await.unwrap();

    let feed = ChangeFeed::connect(&api).await.unwrap();
    let mut hook = DashboardHook::new(api.with_token("not-a-session"));
    hook.mount(&feed).await;

    let state = hook.state();
    assert!(state.error.is_some());
    assert!(state.data.balance.is_none());
    assert!(state.data.incomes.is_empty());
    assert_eq!(state.data.monthly.income_minor, 0);
}

#[tokio::test]
async fn dashboard_refetches_on_change_events() {
    let api = signed_in_client().await;
    let feed = ChangeFeed::connect(&api).await.unwrap();
    let mut hook = DashboardHook::new(api.clone());
    hook.mount(&feed).await;
    assert!(hook.state().data.recent_transactions.is_empty());

    let mut updates = hook.watch();
    api.create_transaction(&expense_create("Market run", 200))
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            updates.changed().await.unwrap();
            if updates.borrow().data.recent_transactions.len() == 1 {
                break;
            }
        }
    })
    .await
    .expect("dashboard never refetched after the change event");
}

#[tokio::test]
async fn dashboard_recent_list_caps_at_ten() {
    let api = signed_in_client().await;
    for n in 1..=11 {
        api.create_transaction(&income_create(&format!("income {n}"), 100))
            .await
            .unwrap();
    }

    let feed = ChangeFeed::connect(&api).await.unwrap();
    let mut hook = DashboardHook::new(api);
    hook.mount(&feed).await;

    assert_eq!(hook.state().data.recent_transactions.len(), 10);
}

#[tokio::test]
async fn transactions_refetch_on_balance_only_events() {
    let api = signed_in_client().await;
    api.create_transaction(&income_create("salary", 1000))
        .await
        .unwrap();

    let feed = ChangeFeed::connect(&api).await.unwrap();
    let mut hook = TransactionsHook::new(api.clone());
    hook.mount(&feed).await;
    // Nothing has recomputed yet, so the provisioned row still reads zero.
    assert_eq!(hook.state().balance.unwrap().total_balance_minor, 0);

    let mut updates = hook.watch();
    api.recompute_balance().await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            updates.changed().await.unwrap();
            let balance = updates.borrow().balance.clone();
            if balance.map(|balance| balance.total_balance_minor) == Some(1000) {
                break;
            }
        }
    })
    .await
    .expect("transactions hook never refreshed after the balance recompute");
}

#[tokio::test]
async fn duplicate_copies_fields_and_reloads() {
    let api = signed_in_client().await;
    let feed = ChangeFeed::connect(&api).await.unwrap();
    let mut hook = TransactionsHook::new(api);
    hook.mount(&feed).await;

    hook.create(&expense_create("Market run", 450)).await.unwrap();
    let source = hook.state().transactions[0].clone();

    hook.duplicate(&source).await.unwrap();
    let state = hook.state();
    assert_eq!(state.transactions.len(), 2);
    assert_eq!(state.total_expense_minor, 900);

    let copy = state
        .transactions
        .iter()
        .find(|tx| tx.id != source.id)
        .unwrap();
    assert_eq!(copy.title, "Market run (copy)");
    assert_eq!(copy.amount_minor, source.amount_minor);
    assert_eq!(copy.category, source.category);
    assert_eq!(copy.payment_method, source.payment_method);
    assert!(copy.date >= source.date);
}

#[tokio::test]
async fn failed_reauthentication_blocks_the_password_change() {
    let api = spawn_server().await;
    api.sign_up(EMAIL, PASSWORD).await.unwrap();
    let session = api.sign_in(EMAIL, PASSWORD).await.unwrap();

    let mut hook = SettingsHook::new(api.clone());
    hook.set_session(&session.token).await.unwrap();

    let result = hook.change_password("wrong-password", "brand-new-pass").await;
    assert!(matches!(result, Err(ClientError::Unauthorized(_))));

    // The old password still works and nothing was stamped.
    api.sign_in(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(hook.state().security.unwrap().last_password_change, None);
}

#[tokio::test]
async fn successful_password_change_stamps_security_settings() {
    let api = spawn_server().await;
    api.sign_up(EMAIL, PASSWORD).await.unwrap();
    let session = api.sign_in(EMAIL, PASSWORD).await.unwrap();

    let mut hook = SettingsHook::new(api.clone());
    hook.set_session(&session.token).await.unwrap();

    hook.change_password(PASSWORD, "brand-new-pass").await.unwrap();

    assert!(matches!(
        api.sign_in(EMAIL, PASSWORD).await,
        Err(ClientError::Unauthorized(_))
    ));
    api.sign_in(EMAIL, "brand-new-pass").await.unwrap();
    assert!(hook.state().security.unwrap().last_password_change.is_some());
}

#[tokio::test]
async fn duplicate_category_names_conflict() {
    let api = signed_in_client().await;
    let feed = ChangeFeed::connect(&api).await.unwrap();
    let mut hook = CategoriesHook::new(api);
    hook.mount(&feed).await;

    let payload = CategoryCreate {
        name: "Market".to_string(),
        kind: CategoryKind::Expense,
        icon: None,
        color: None,
        is_default: None,
    };
    hook.create(&payload).await.unwrap();

    let result = hook.create(&payload).await;
    assert!(matches!(result, Err(ClientError::Conflict(_))));
    assert_eq!(hook.state().categories.len(), 1);
}
