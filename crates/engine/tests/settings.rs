use chrono::Utc;
use sea_orm::Database;

use engine::{
    Engine, EngineError, NewPaymentMethod, PaymentMethodPatch, PreferencesPatch, ProfilePatch,
    SecuritySettingsPatch,
};
use migration::MigratorTrait;

const USER: &str = "alice@example.com";

async fn engine_with_user() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.sign_up(USER, "password1").await.unwrap();
    engine
}

fn card(provider: &str) -> NewPaymentMethod {
    NewPaymentMethod {
        kind: "card".to_string(),
        provider: provider.to_string(),
        last_four: Some("4242".to_string()),
        expiry_date: Some("12/28".to_string()),
        is_default: false,
    }
}

#[tokio::test]
async fn profile_patch_leaves_absent_fields_alone() {
    let engine = engine_with_user().await;

    let updated = engine
        .update_profile(
            USER,
            ProfilePatch {
                first_name: Some("Alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name.as_deref(), Some("Alice"));
    assert_eq!(updated.last_name, None);
    assert_eq!(updated.email, USER);

    let updated = engine
        .update_profile(
            USER,
            ProfilePatch {
                phone: Some("+90 555 000 00 00".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name.as_deref(), Some("Alice"));
    assert_eq!(updated.phone.as_deref(), Some("+90 555 000 00 00"));
}

#[tokio::test]
async fn preferences_patch_round_trip() {
    let engine = engine_with_user().await;

    let updated = engine
        .update_preferences(
            USER,
            PreferencesPatch {
                theme: Some("dark".to_string()),
                notifications_promotions: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.theme, "dark");
    assert!(updated.notifications_promotions);
    // Untouched defaults survive.
    assert_eq!(updated.language, "tr");
    assert!(updated.notifications_mobile);
}

#[tokio::test]
async fn security_settings_stamp() {
    let engine = engine_with_user().await;
    let changed_at = Utc::now();

    let updated = engine
        .update_security_settings(
            USER,
            SecuritySettingsPatch {
                two_factor_enabled: Some(true),
                last_password_change: Some(changed_at),
            },
        )
        .await
        .unwrap();
    assert!(updated.two_factor_enabled);
    assert_eq!(updated.last_password_change, Some(changed_at));
}

#[tokio::test]
async fn payment_methods_crud_in_insertion_order() {
    let engine = engine_with_user().await;
    let first = engine.add_payment_method(USER, card("Visa")).await.unwrap();
    let second = engine
        .add_payment_method(USER, card("Mastercard"))
        .await
        .unwrap();

    let methods = engine.payment_methods(USER).await.unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].id, first.id);
    assert_eq!(methods[1].id, second.id);

    let updated = engine
        .update_payment_method(
            USER,
            second.id,
            PaymentMethodPatch {
                is_default: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_default);
    assert_eq!(updated.provider, "Mastercard");

    engine.delete_payment_method(USER, first.id).await.unwrap();
    assert_eq!(engine.payment_methods(USER).await.unwrap().len(), 1);

    let err = engine
        .delete_payment_method(USER, first.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn settings_reads_require_a_known_user() {
    let engine = engine_with_user().await;

    let err = engine.profile("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
